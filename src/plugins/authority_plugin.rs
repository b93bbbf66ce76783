use bevy::prelude::*;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::assets_map::PortraitCatalog;
use crate::lobby::command::{CommandSink, UnlockLockedIcons, WsCommand};
use crate::lobby::session::LobbySession;

/// Seconds between bot portrait changes.
const BOT_REPICK_SECS: f32 = 4.0;
const BOTS: [&str; 2] = ["bot-1", "bot-2"];

/// In-process stand-in for the remote game-state authority. Receives wire
/// encoded commands through its inbox and owns every `LobbySession` change.
#[derive(Resource, Clone)]
pub struct LocalAuthority {
    inbox: Arc<Mutex<VecDeque<(String, String)>>>,
    pub allow_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownPlayer(String),
    UnknownIcon(String),
    Locked(String),
    Taken { icon: String, holder: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownPlayer(player) => write!(f, "player '{player}' is not seated"),
            Rejection::UnknownIcon(icon) => write!(f, "portrait '{icon}' does not exist"),
            Rejection::Locked(icon) => write!(f, "portrait '{icon}' is locked"),
            Rejection::Taken { icon, holder } => write!(f, "portrait '{icon}' is held by '{holder}'"),
        }
    }
}

impl LocalAuthority {
    pub fn new(allow_locked: bool) -> Self {
        Self { inbox: Arc::default(), allow_locked }
    }

    /// Outbound channel for `player`: commands are JSON encoded and queued.
    pub fn sink_for(&self, player: impl Into<String>) -> CommandSink {
        let inbox = self.inbox.clone();
        let player = player.into();
        CommandSink::new(move |command| match command.to_json() {
            Ok(json) => match inbox.lock() {
                Ok(mut inbox) => inbox.push_back((player.clone(), json)),
                Err(e) => error!("Authority inbox unavailable: {e}"),
            },
            Err(e) => error!("Failed to encode {command:?}: {e}"),
        })
    }

    fn take_inbox(&self) -> Vec<(String, String)> {
        match self.inbox.lock() {
            Ok(mut inbox) => inbox.drain(..).collect(),
            Err(e) => {
                error!("Authority inbox unavailable: {e}");
                Vec::new()
            }
        }
    }

    /// Applies one command on behalf of `player`.
    pub fn apply(
        &self,
        session: &mut LobbySession,
        catalog: &PortraitCatalog,
        player: &str,
        command: &WsCommand,
    ) -> Result<(), Rejection> {
        match command {
            WsCommand::SelectIcon { icon } => {
                if !session.players.iter().any(|p| p == player) {
                    return Err(Rejection::UnknownPlayer(player.to_string()));
                }
                if !catalog.contains(icon) {
                    return Err(Rejection::UnknownIcon(icon.clone()));
                }
                if catalog.is_locked(icon) && !self.allow_locked {
                    return Err(Rejection::Locked(icon.clone()));
                }
                if let Some(holder) = session.holder_of(icon).filter(|holder| *holder != player) {
                    return Err(Rejection::Taken { icon: icon.clone(), holder: holder.to_string() });
                }
                session.join(player, icon.clone());
                Ok(())
            }
        }
    }
}

#[derive(Resource)]
struct BotClock(f32);

pub struct LocalAuthorityPlugin;

impl Plugin for LocalAuthorityPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(BotClock(BOT_REPICK_SECS));
        app.add_message::<UnlockLockedIcons>();
        app.add_systems(PreStartup, seed_session);
        app.add_systems(PreUpdate, (follow_unlock, process_inbox, repick_bot_icons).chain());
    }
}

fn seed_session(mut session: ResMut<LobbySession>, catalog: Res<PortraitCatalog>) {
    let user = session.user.clone();
    session.join(user, catalog.default_id.clone());
    for (bot, icon) in BOTS.iter().zip(catalog.unlocked.iter().rev()) {
        session.join(*bot, icon.clone());
    }
    info!("Lobby seeded with {} players", session.players.len());
}

/// The stand-in authority opens locked portraits together with the picker.
fn follow_unlock(mut unlocks: MessageReader<UnlockLockedIcons>, mut authority: ResMut<LocalAuthority>) {
    if unlocks.read().count() > 0 && !authority.allow_locked {
        authority.allow_locked = true;
        info!("Authority now accepts locked portraits");
    }
}

fn process_inbox(
    authority: Res<LocalAuthority>,
    catalog: Res<PortraitCatalog>,
    mut session: ResMut<LobbySession>,
) {
    for (player, json) in authority.take_inbox() {
        let command = match WsCommand::from_json(&json) {
            Ok(command) => command,
            Err(e) => {
                warn!("Dropping malformed command from {player}: {e}");
                continue;
            }
        };
        match authority.apply(&mut session, &catalog, &player, &command) {
            Ok(()) => info!("{player} applied {command:?}"),
            Err(rejection) => warn!("Rejected {command:?} from {player}: {rejection}"),
        }
    }
}

/// Bots hop to a free portrait now and then so occupancy changes are visible.
fn repick_bot_icons(
    time: Res<Time>,
    mut clock: ResMut<BotClock>,
    authority: Res<LocalAuthority>,
    catalog: Res<PortraitCatalog>,
    mut session: ResMut<LobbySession>,
) {
    clock.0 -= time.delta_secs();
    if clock.0 > 0.0 {
        return;
    }
    clock.0 = BOT_REPICK_SECS;

    let free: Vec<String> = catalog
        .unlocked
        .iter()
        .filter(|icon| catalog.contains(icon) && session.holder_of(icon).is_none())
        .cloned()
        .collect();
    if free.is_empty() {
        return;
    }

    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as usize;
    let bot = BOTS[nanos % BOTS.len()];
    let icon = WsCommand::select_icon(free[(nanos / 1000) % free.len()].clone());
    if let Err(rejection) = authority.apply(&mut session, &catalog, bot, &icon) {
        debug!("Bot repick rejected: {rejection}");
    }
}
