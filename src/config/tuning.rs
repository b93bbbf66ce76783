use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lobby screen parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyTuning {
    /// Whether locked portraits may be picked. All portraits are open by default.
    pub unlock_locked_icons: bool,
    /// Seconds the confirm button stays inert after a confirm. 0 = disabled.
    pub confirm_cooldown_secs: f32,
    pub icon_size_px: f32,
    /// Local player id. A random one is generated when unset.
    pub local_player_name: Option<String>,
    /// RON portrait catalog. The built-in catalog is used when unset.
    pub catalog_file: Option<String>,
}

impl Default for LobbyTuning {
    fn default() -> Self {
        Self {
            unlock_locked_icons: true,
            confirm_cooldown_secs: 0.0,
            icon_size_px: 96.0,
            local_player_name: None,
            catalog_file: None,
        }
    }
}

impl LobbyTuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("player_look")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(tuning) => return tuning,
                    Err(e) => {
                        warn!("Failed to parse tuning.ron: {e}, using defaults");
                    }
                },
                Err(e) => {
                    warn!("Failed to read tuning.ron: {e}, using defaults");
                }
            }
        }
        let tuning = Self::default();
        tuning.save();
        tuning
    }

    pub fn parse(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Local player id, generating one when none is configured.
    pub fn local_player(&self) -> String {
        self.local_player_name
            .clone()
            .unwrap_or_else(|| format!("player-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog_file.as_ref().map(|file| {
            let path = PathBuf::from(file);
            if path.is_absolute() { path } else { Self::data_dir().join(path) }
        })
    }
}
