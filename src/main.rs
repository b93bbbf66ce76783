mod assets_map;
mod config;
mod lobby;
mod plugins;

use bevy::prelude::*;

use assets_map::PortraitCatalog;
use config::tuning::LobbyTuning;
use lobby::phase::LobbyPhase;
use lobby::selection::IconSelection;
use lobby::session::LobbySession;
use plugins::{
    authority_plugin::{LocalAuthority, LocalAuthorityPlugin}, icon_selection_plugin::IconSelectionPlugin,
    transport_plugin::TransportPlugin, waiting_plugin::WaitingPlugin,
};

fn main() {
    let tuning = LobbyTuning::load_or_default();
    let catalog = tuning
        .catalog_path()
        .map(|path| PortraitCatalog::load_or_default(&path))
        .unwrap_or_else(PortraitCatalog::with_defaults);
    let user = tuning.local_player();
    let authority = LocalAuthority::new(tuning.unlock_locked_icons);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Player Look".into(),
                resolution: (900u32, 700u32).into(),
                ..default()
            }),
            ..default()
        }))
        .init_state::<LobbyPhase>()
        .insert_resource(IconSelection::new(tuning.unlock_locked_icons))
        .insert_resource(LobbySession::new(user.clone()))
        .insert_resource(authority.sink_for(user))
        .insert_resource(authority)
        .insert_resource(catalog)
        .insert_resource(tuning)
        .add_plugins(LocalAuthorityPlugin)
        .add_plugins(TransportPlugin)
        .add_plugins(IconSelectionPlugin)
        .add_plugins(WaitingPlugin)
        .add_systems(Startup, spawn_camera)
        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
