pub mod authority_plugin;
pub mod icon_selection_plugin;
pub mod transport_plugin;
pub mod waiting_plugin;
