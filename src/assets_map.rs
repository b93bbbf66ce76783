use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Portrait catalog: icon id -> image path and alt text, plus the
/// unlocked/locked partitions and the "no selection yet" sentinel.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PortraitCatalog {
    pub images: HashMap<String, String>,
    pub alt_text: HashMap<String, String>,
    pub unlocked: Vec<String>,
    pub locked: Vec<String>,
    pub default_id: String,
}

impl PortraitCatalog {
    pub fn with_defaults() -> Self {
        let mut images = HashMap::new();
        let mut alt_text = HashMap::new();
        let entries = [
            ("default", "Grey silhouette"),
            ("fox", "Orange fox"),
            ("wolf", "Grey wolf"),
            ("owl", "Brown owl"),
            ("bear", "Black bear"),
            ("rabbit", "White rabbit"),
            ("frog", "Green frog"),
            ("dragon", "Red dragon"),
            ("unicorn", "Pastel unicorn"),
        ];
        for (id, alt) in entries {
            images.insert(id.to_string(), format!("portraits/{id}.png"));
            alt_text.insert(id.to_string(), alt.to_string());
        }

        Self {
            images,
            alt_text,
            unlocked: ["fox", "wolf", "owl", "bear", "rabbit", "frog"]
                .map(String::from)
                .to_vec(),
            locked: ["dragon", "unicorn"].map(String::from).to_vec(),
            default_id: "default".into(),
        }
    }

    /// Load a catalog from a RON file, falling back to the built-in one.
    pub fn load_or_default(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read catalog {:?}: {e}, using defaults", path);
                return Self::with_defaults();
            }
        };
        match ron::from_str::<Self>(&contents) {
            Ok(catalog) if catalog.images.contains_key(&catalog.default_id) => {
                catalog.warn_missing_images();
                catalog
            }
            Ok(catalog) => {
                warn!(
                    "Catalog {:?} has no image for default id '{}', using defaults",
                    path, catalog.default_id
                );
                Self::with_defaults()
            }
            Err(e) => {
                warn!("Failed to parse catalog {:?}: {e}, using defaults", path);
                Self::with_defaults()
            }
        }
    }

    fn warn_missing_images(&self) {
        for id in self.unlocked.iter().chain(&self.locked) {
            if !self.contains(id) {
                warn!("Portrait '{id}' has no image and will not be shown");
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.images.contains_key(id)
    }

    pub fn image_path(&self, id: &str) -> Option<&str> {
        self.images.get(id).map(String::as_str)
    }

    /// Alt text for a portrait; falls back to the id itself.
    pub fn alt_text<'a>(&'a self, id: &'a str) -> &'a str {
        self.alt_text.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn is_locked(&self, id: &str) -> bool {
        self.locked.iter().any(|locked| locked == id)
    }

    pub fn is_default(&self, id: &str) -> bool {
        self.default_id == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_partition_known_portraits() {
        let catalog = PortraitCatalog::with_defaults();
        for id in catalog.unlocked.iter().chain(&catalog.locked) {
            assert!(catalog.contains(id), "{id} missing an image");
        }
        assert!(catalog.contains(&catalog.default_id));
        assert!(catalog.is_locked("dragon"));
        assert!(!catalog.is_locked("fox"));
    }

    #[test]
    fn alt_text_falls_back_to_id() {
        let catalog = PortraitCatalog::with_defaults();
        assert_eq!(catalog.alt_text("fox"), "Orange fox");
        assert_eq!(catalog.alt_text("ghost"), "ghost");
    }

    #[test]
    fn missing_file_loads_builtin_catalog() {
        let catalog = PortraitCatalog::load_or_default(Path::new("/nonexistent/catalog.ron"));
        assert_eq!(catalog.default_id, "default");
        assert_eq!(catalog.locked.len(), 2);
    }

    #[test]
    fn parses_ron_catalog() {
        let dir = std::env::temp_dir().join(format!("player_look_catalog_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.ron");
        std::fs::write(
            &path,
            r#"(
                images: { "none": "p/none.png", "cat": "p/cat.png" },
                alt_text: { "cat": "Cat" },
                unlocked: ["cat", "ghost"],
                locked: [],
                default_id: "none",
            )"#,
        )
        .unwrap();

        let catalog = PortraitCatalog::load_or_default(&path);
        assert_eq!(catalog.default_id, "none");
        assert_eq!(catalog.image_path("cat"), Some("p/cat.png"));
        assert!(!catalog.contains("ghost"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn catalog_without_default_image_is_rejected() {
        let dir = std::env::temp_dir().join(format!("player_look_catalog_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.ron");
        std::fs::write(
            &path,
            r#"(images: {}, alt_text: {}, unlocked: [], locked: [], default_id: "none")"#,
        )
        .unwrap();

        let catalog = PortraitCatalog::load_or_default(&path);
        assert_eq!(catalog.default_id, "default");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
