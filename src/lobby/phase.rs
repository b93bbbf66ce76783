use bevy::prelude::*;

// ── Lobby phase state ───────────────────────────────────────────────

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LobbyPhase {
    #[default]
    PickLook,
    /// Look confirmed, waiting for the rest of the lobby.
    Waiting,
}
