use bevy::prelude::*;

use super::command::WsCommand;
use super::session::LobbySession;
use crate::assets_map::PortraitCatalog;

/// Picker state that is local to this client. Everything else is derived
/// from the [`LobbySession`] on each refresh.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSelection {
    pub unlock_locked_icons: bool,
}

impl Default for IconSelection {
    fn default() -> Self {
        Self { unlock_locked_icons: true }
    }
}

/// One cell of the portrait grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTile {
    pub id: String,
    pub image: String,
    pub alt_text: String,
    pub selected: bool,
    pub enabled: bool,
}

impl IconSelection {
    pub fn new(unlock_locked_icons: bool) -> Self {
        Self { unlock_locked_icons }
    }

    /// Whether any seated player currently holds `icon`.
    pub fn is_icon_in_use(session: &LobbySession, icon: &str) -> bool {
        session
            .players
            .iter()
            .any(|player| session.icon_of(player) == Some(icon))
    }

    fn is_unlocked(&self, catalog: &PortraitCatalog, icon: &str) -> bool {
        !catalog.is_locked(icon) || self.unlock_locked_icons
    }

    /// Whether clicking `icon` should reach the server.
    pub fn can_select(&self, catalog: &PortraitCatalog, session: &LobbySession, icon: &str) -> bool {
        self.is_unlocked(catalog, icon) && !Self::is_icon_in_use(session, icon)
    }

    /// Sends a select command for `icon` when it is selectable. Ineligible
    /// clicks are dropped. Returns whether a command was sent.
    pub fn on_click_icon(
        &self,
        catalog: &PortraitCatalog,
        session: &LobbySession,
        icon: &str,
        send: impl FnOnce(WsCommand),
    ) -> bool {
        if !self.can_select(catalog, session, icon) {
            debug!("Ignoring click on unavailable portrait '{icon}'");
            return false;
        }
        send(WsCommand::select_icon(icon));
        true
    }

    /// Grid cells for `ids` in order. Ids the catalog doesn't know are skipped.
    pub fn icon_tiles<'a>(
        &self,
        catalog: &PortraitCatalog,
        session: &LobbySession,
        ids: impl IntoIterator<Item = &'a str>,
    ) -> Vec<IconTile> {
        ids.into_iter()
            .filter_map(|id| self.tile(catalog, session, id))
            .collect()
    }

    /// Grid cell for a single portrait, `None` when the catalog doesn't know it.
    pub fn tile(&self, catalog: &PortraitCatalog, session: &LobbySession, id: &str) -> Option<IconTile> {
        let image = catalog.image_path(id)?;
        let is_current = session.current_icon() == Some(id);
        // Own portrait counts as available even though it is in use.
        let available = !Self::is_icon_in_use(session, id) || is_current;
        Some(IconTile {
            id: id.to_string(),
            image: image.to_string(),
            alt_text: catalog.alt_text(id).to_string(),
            selected: is_current,
            enabled: self.is_unlocked(catalog, id) && available,
        })
    }

    /// Portraits shown on the picker: unlocked first, then locked ones.
    /// Locked ones stay visible and are greyed out until unlocked.
    pub fn display_order<'a>(&self, catalog: &'a PortraitCatalog) -> Vec<&'a str> {
        catalog
            .unlocked
            .iter()
            .chain(&catalog.locked)
            .map(String::as_str)
            .collect()
    }

    /// Confirm is only held back while the local player sits on the default
    /// portrait. No assignment at all does not block it.
    pub fn can_confirm(catalog: &PortraitCatalog, session: &LobbySession) -> bool {
        session
            .current_icon()
            .is_none_or(|icon| !catalog.is_default(icon))
    }

    /// Runs `confirm` with the local player's portrait unless it is the default.
    pub fn on_confirm(
        catalog: &PortraitCatalog,
        session: &LobbySession,
        confirm: impl FnOnce(Option<&str>),
    ) -> bool {
        if !Self::can_confirm(catalog, session) {
            return false;
        }
        confirm(session.current_icon());
        true
    }

    pub fn unlock(&mut self) {
        self.unlock_locked_icons = true;
    }

    pub fn footer_text(&self) -> &'static str {
        if self.unlock_locked_icons {
            "(All icons are available.)"
        } else {
            "(Locked icons are not available yet.)"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user: &str, seats: &[(&str, &str)]) -> LobbySession {
        let mut session = LobbySession::new(user);
        for (player, icon) in seats {
            session.join(*player, *icon);
        }
        session
    }

    fn clicks(selection: IconSelection, session: &LobbySession, icon: &str) -> Vec<WsCommand> {
        let catalog = PortraitCatalog::with_defaults();
        let mut sent = Vec::new();
        selection.on_click_icon(&catalog, session, icon, |command| sent.push(command));
        sent
    }

    #[test]
    fn click_free_icon_sends_select() {
        let mut session = session("A", &[("A", "default")]);
        session.players.push("B".into());
        assert_eq!(
            clicks(IconSelection::default(), &session, "fox"),
            vec![WsCommand::select_icon("fox")]
        );
    }

    #[test]
    fn click_icon_held_by_other_player_is_ignored() {
        let session = session("A", &[("A", "fox"), ("B", "wolf")]);
        assert!(clicks(IconSelection::default(), &session, "wolf").is_empty());
    }

    #[test]
    fn click_own_icon_is_ignored() {
        let session = session("A", &[("A", "fox")]);
        assert!(clicks(IconSelection::default(), &session, "fox").is_empty());
    }

    #[test]
    fn locked_icon_needs_unlock() {
        let session = session("A", &[("A", "default")]);
        assert!(clicks(IconSelection::new(false), &session, "dragon").is_empty());
        assert_eq!(
            clicks(IconSelection::new(true), &session, "dragon"),
            vec![WsCommand::select_icon("dragon")]
        );
    }

    #[test]
    fn locked_and_held_icon_stays_ignored_after_unlock() {
        let session = session("A", &[("A", "default"), ("B", "dragon")]);
        assert!(clicks(IconSelection::new(true), &session, "dragon").is_empty());
    }

    #[test]
    fn in_use_only_counts_seated_players() {
        let mut session = session("A", &[("A", "fox")]);
        session.player_to_icon.insert("spectator".into(), "wolf".into());
        assert!(IconSelection::is_icon_in_use(&session, "fox"));
        assert!(!IconSelection::is_icon_in_use(&session, "wolf"));
    }

    #[test]
    fn tiles_skip_unknown_ids() {
        let catalog = PortraitCatalog::with_defaults();
        let session = session("A", &[("A", "default")]);
        let tiles = IconSelection::default().icon_tiles(&catalog, &session, ["fox", "ghost", "owl"]);
        let ids: Vec<_> = tiles.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["fox", "owl"]);
        assert_eq!(tiles[0].image, "portraits/fox.png");
        assert_eq!(tiles[0].alt_text, "Orange fox");
    }

    #[test]
    fn tiles_mark_selected_and_disabled() {
        let catalog = PortraitCatalog::with_defaults();
        let session = session("A", &[("A", "fox"), ("B", "wolf")]);
        let tiles = IconSelection::new(false).icon_tiles(&catalog, &session, ["fox", "wolf", "owl", "dragon"]);

        let fox = &tiles[0];
        assert!(fox.selected && fox.enabled);
        let wolf = &tiles[1];
        assert!(!wolf.selected && !wolf.enabled);
        let owl = &tiles[2];
        assert!(!owl.selected && owl.enabled);
        let dragon = &tiles[3];
        assert!(!dragon.enabled);
    }

    #[test]
    fn locked_portraits_are_listed_but_disabled_until_unlocked() {
        let catalog = PortraitCatalog::with_defaults();
        let session = session("A", &[("A", "default")]);
        let mut selection = IconSelection::new(false);

        let order = selection.display_order(&catalog);
        assert_eq!(order.first(), Some(&"fox"));
        assert_eq!(order.last(), Some(&"unicorn"));
        assert_eq!(order.len(), catalog.unlocked.len() + catalog.locked.len());

        let dragon = selection.tile(&catalog, &session, "dragon").unwrap();
        assert!(!dragon.enabled);

        selection.unlock();
        assert_eq!(selection.display_order(&catalog), order);
        assert!(selection.tile(&catalog, &session, "dragon").unwrap().enabled);
    }

    #[test]
    fn confirm_requires_real_portrait() {
        let catalog = PortraitCatalog::with_defaults();

        let mut fired = None;
        let waiting = session("A", &[("A", "default")]);
        assert!(!IconSelection::on_confirm(&catalog, &waiting, |icon| fired = Some(icon.map(String::from))));
        assert_eq!(fired, None);

        let ready = session("A", &[("A", "fox")]);
        assert!(IconSelection::on_confirm(&catalog, &ready, |icon| fired = Some(icon.map(String::from))));
        assert_eq!(fired, Some(Some("fox".to_string())));
    }

    #[test]
    fn confirm_fires_without_assignment() {
        let catalog = PortraitCatalog::with_defaults();
        let mut session = LobbySession::new("A");
        session.players.push("A".into());
        assert!(IconSelection::can_confirm(&catalog, &session));

        let mut fired = None;
        assert!(IconSelection::on_confirm(&catalog, &session, |icon| fired = Some(icon.map(String::from))));
        assert_eq!(fired, Some(None));
    }

    #[test]
    fn footer_tracks_unlock_flag() {
        let mut selection = IconSelection::new(false);
        assert_ne!(selection.footer_text(), "(All icons are available.)");
        selection.unlock();
        assert_eq!(selection.footer_text(), "(All icons are available.)");
    }
}
