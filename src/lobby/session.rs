use bevy::prelude::*;
use std::collections::HashMap;

/// Player -> portrait assignments as last reported by the game-state authority.
/// The picker only reads this; mutations go through outbound commands.
#[derive(Resource, Debug, Clone, Default)]
pub struct LobbySession {
    pub player_to_icon: HashMap<String, String>,
    /// Seating order.
    pub players: Vec<String>,
    /// The local player.
    pub user: String,
}

impl LobbySession {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..default()
        }
    }

    /// Seat a player holding `icon`. Re-seating updates the icon only.
    pub fn join(&mut self, player: impl Into<String>, icon: impl Into<String>) {
        let player = player.into();
        if !self.players.contains(&player) {
            self.players.push(player.clone());
        }
        self.player_to_icon.insert(player, icon.into());
    }

    pub fn icon_of(&self, player: &str) -> Option<&str> {
        self.player_to_icon.get(player).map(String::as_str)
    }

    /// The local player's current portrait, if any.
    pub fn current_icon(&self) -> Option<&str> {
        self.icon_of(&self.user)
    }

    /// First seated player holding `icon`.
    pub fn holder_of(&self, icon: &str) -> Option<&str> {
        self.players
            .iter()
            .find(|player| self.icon_of(player) == Some(icon))
            .map(String::as_str)
    }
}
