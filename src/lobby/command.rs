use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Commands sent to the game-state authority. Wire form is JSON tagged by
/// `command`, e.g. `{"command":"SELECT_ICON","icon":"fox"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsCommand {
    SelectIcon { icon: String },
}

impl WsCommand {
    pub fn select_icon(icon: impl Into<String>) -> Self {
        Self::SelectIcon { icon: icon.into() }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// A command queued by the local player, drained by the transport.
#[derive(Message, Debug, Clone)]
pub struct OutboundCommand(pub WsCommand);

/// Local player confirmed their look and may leave the picker.
#[derive(Message, Debug, Clone)]
pub struct IconConfirmed {
    /// `None` when the authority never assigned the local player a portrait.
    pub icon: Option<String>,
}

/// Opens the locked portraits. Nothing on the picker screen writes this.
#[derive(Message, Debug, Clone, Default)]
pub struct UnlockLockedIcons;

/// Outbound channel supplied by the composing app.
#[derive(Resource)]
pub struct CommandSink(Box<dyn Fn(&WsCommand) + Send + Sync>);

impl CommandSink {
    pub fn new(send: impl Fn(&WsCommand) + Send + Sync + 'static) -> Self {
        Self(Box::new(send))
    }

    pub fn send(&self, command: &WsCommand) {
        (self.0)(command)
    }
}

impl Default for CommandSink {
    /// Logs the wire form of every command.
    fn default() -> Self {
        Self::new(|command| match command.to_json() {
            Ok(json) => info!("-> server: {json}"),
            Err(e) => error!("Failed to encode {command:?}: {e}"),
        })
    }
}
