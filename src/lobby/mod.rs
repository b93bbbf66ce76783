pub mod command;
pub mod phase;
pub mod selection;
pub mod session;
