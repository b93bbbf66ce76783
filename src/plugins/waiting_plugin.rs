use bevy::prelude::*;

use crate::assets_map::PortraitCatalog;
use crate::lobby::command::IconConfirmed;
use crate::lobby::phase::LobbyPhase;
use crate::lobby::session::LobbySession;

/// Screen shown after the local player confirmed their look.
pub struct WaitingPlugin;

impl Plugin for WaitingPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<IconConfirmed>();
        app.add_systems(Update, advance_on_confirm.run_if(in_state(LobbyPhase::PickLook)));
        app.add_systems(OnEnter(LobbyPhase::Waiting), setup_waiting_ui);
        app.add_systems(OnExit(LobbyPhase::Waiting), despawn_waiting_ui);
        app.add_systems(
            Update,
            (update_roster_display, waiting_input).run_if(in_state(LobbyPhase::Waiting)),
        );
    }
}

#[derive(Component)]
struct WaitingRoot;

#[derive(Component)]
struct RosterText;

pub(crate) fn advance_on_confirm(
    mut confirmed: MessageReader<IconConfirmed>,
    mut next_state: ResMut<NextState<LobbyPhase>>,
) {
    if confirmed.read().last().is_some() {
        next_state.set(LobbyPhase::Waiting);
    }
}

fn setup_waiting_ui(mut commands: Commands) {
    commands
        .spawn((
            WaitingRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.08, 0.08, 0.12, 1.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Waiting for the other players..."),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::srgba(0.2, 0.7, 1.0, 1.0)),
            ));

            parent.spawn((
                RosterText,
                Text::new(""),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            parent.spawn((
                Text::new("Press ESCAPE to change your look"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgba(0.5, 0.5, 0.5, 1.0)),
            ));
        });
}

fn despawn_waiting_ui(mut commands: Commands, query: Query<Entity, With<WaitingRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

/// One line per seated player: name and portrait description.
pub(crate) fn roster_lines(session: &LobbySession, catalog: &PortraitCatalog) -> String {
    session
        .players
        .iter()
        .map(|player| {
            let look = match session.icon_of(player) {
                Some(icon) if !catalog.is_default(icon) => catalog.alt_text(icon),
                _ => "(choosing...)",
            };
            let you = if *player == session.user { " (you)" } else { "" };
            format!("{player}{you}: {look}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn update_roster_display(
    session: Res<LobbySession>,
    catalog: Res<PortraitCatalog>,
    mut text_query: Query<&mut Text, With<RosterText>>,
) {
    for mut text in &mut text_query {
        **text = roster_lines(&session, &catalog);
    }
}

fn waiting_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<LobbyPhase>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(LobbyPhase::PickLook);
    }
}
