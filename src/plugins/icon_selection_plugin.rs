use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::assets_map::PortraitCatalog;
use crate::config::tuning::LobbyTuning;
use crate::lobby::command::{IconConfirmed, OutboundCommand, UnlockLockedIcons};
use crate::lobby::phase::LobbyPhase;
use crate::lobby::selection::{IconSelection, IconTile};
use crate::lobby::session::LobbySession;

// ── Marker components ────────────────────────────────────────────────

#[derive(Component)]
struct IconSelectionRoot;

/// A clickable portrait cell.
#[derive(Component, Debug, Clone)]
pub struct IconButton(pub String);

/// Portrait image inside an [`IconButton`], tinted when unavailable.
#[derive(Component)]
struct IconImage(String);

#[derive(Component)]
pub struct ConfirmButton;

#[derive(Component)]
struct FooterText;

/// Keeps the confirm button inert for a while after a confirm. Lives on the
/// screen root, so leaving the screen drops it.
#[derive(Component, Debug, Clone, Default)]
pub struct ConfirmCooldown {
    pub duration: f32,
    pub remaining: f32,
}

impl ConfirmCooldown {
    pub fn new(duration: f32) -> Self {
        Self { duration: duration.max(0.0), remaining: 0.0 }
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn start(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }
}

// ── Colors ───────────────────────────────────────────────────────────

const COLOR_BG: Color = Color::srgba(0.08, 0.08, 0.12, 1.0);
const COLOR_PANEL: Color = Color::srgba(0.12, 0.14, 0.20, 1.0);
const COLOR_BTN: Color = Color::srgba(0.18, 0.20, 0.28, 1.0);
const COLOR_BTN_HOVER: Color = Color::srgba(0.28, 0.32, 0.42, 1.0);
const COLOR_BTN_DISABLED: Color = Color::srgba(0.14, 0.14, 0.18, 1.0);
const COLOR_SELECTED: Color = Color::srgba(0.15, 0.45, 0.75, 1.0);
const COLOR_SELECTED_HOVER: Color = Color::srgba(0.20, 0.55, 0.85, 1.0);
const COLOR_TEXT: Color = Color::WHITE;
const COLOR_TEXT_DIM: Color = Color::srgba(0.5, 0.5, 0.5, 1.0);
const COLOR_ACCENT: Color = Color::srgba(0.2, 0.7, 1.0, 1.0);
const TINT_ENABLED: Color = Color::WHITE;
const TINT_DISABLED: Color = Color::srgba(1.0, 1.0, 1.0, 0.3);

// ── Plugin ───────────────────────────────────────────────────────────

pub struct IconSelectionPlugin;

impl Plugin for IconSelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<IconSelection>();
        app.init_resource::<LobbyTuning>();
        app.add_message::<OutboundCommand>();
        app.add_message::<IconConfirmed>();
        app.add_message::<UnlockLockedIcons>();

        app.add_systems(OnEnter(LobbyPhase::PickLook), spawn_icon_selection);
        app.add_systems(OnExit(LobbyPhase::PickLook), despawn::<IconSelectionRoot>);
        app.add_systems(
            Update,
            (
                unlock_system,
                tick_confirm_cooldown,
                icon_click_system,
                confirm_click_system,
                update_icon_selection_visuals,
            )
                .chain()
                .run_if(in_state(LobbyPhase::PickLook)),
        );
    }
}

fn despawn<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SCREEN
// ═══════════════════════════════════════════════════════════════════════

fn spawn_icon_selection(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    selection: Res<IconSelection>,
    catalog: Res<PortraitCatalog>,
    session: Res<LobbySession>,
    tuning: Res<LobbyTuning>,
) {
    let tiles = selection.icon_tiles(&catalog, &session, selection.display_order(&catalog));
    let confirm_bg = if IconSelection::can_confirm(&catalog, &session) { COLOR_BTN } else { COLOR_BTN_DISABLED };

    commands
        .spawn((
            IconSelectionRoot,
            ConfirmCooldown::new(tuning.confirm_cooldown_secs),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(30.0)),
                ..default()
            },
            BackgroundColor(COLOR_BG),
        ))
        .with_children(|root| {
            root.spawn((
                Node {
                    max_width: Val::Px(760.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(16.0),
                    padding: UiRect::all(Val::Px(24.0)),
                    border_radius: BorderRadius::all(Val::Px(12.0)),
                    ..default()
                },
                BackgroundColor(COLOR_PANEL),
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new("PLAYER LOOK"),
                    TextFont { font_size: 40.0, ..default() },
                    TextColor(COLOR_ACCENT),
                ));
                panel.spawn((
                    Text::new("Choose a look, then press confirm."),
                    TextFont { font_size: 20.0, ..default() },
                    TextColor(COLOR_TEXT),
                ));

                // ── Portrait grid ──
                panel
                    .spawn(Node {
                        flex_direction: FlexDirection::Row,
                        flex_wrap: FlexWrap::Wrap,
                        justify_content: JustifyContent::Center,
                        column_gap: Val::Px(12.0),
                        row_gap: Val::Px(12.0),
                        ..default()
                    })
                    .with_children(|grid| {
                        for tile in &tiles {
                            spawn_icon_tile(grid, &asset_server, tile, tuning.icon_size_px);
                        }
                    });

                panel.spawn((
                    FooterText,
                    Text::new(selection.footer_text()),
                    TextFont { font_size: 14.0, ..default() },
                    TextColor(COLOR_TEXT_DIM),
                ));

                panel
                    .spawn((
                        ConfirmButton,
                        Button,
                        Node {
                            min_width: Val::Px(160.0),
                            height: Val::Px(44.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            padding: UiRect::horizontal(Val::Px(16.0)),
                            border_radius: BorderRadius::all(Val::Px(6.0)),
                            ..default()
                        },
                        BackgroundColor(confirm_bg),
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new("Confirm"),
                            TextFont { font_size: 20.0, ..default() },
                            TextColor(COLOR_TEXT),
                        ));
                    });
            });
        });
}

fn spawn_icon_tile(parent: &mut ChildSpawnerCommands, asset_server: &AssetServer, tile: &IconTile, size: f32) {
    let image: Handle<Image> = asset_server.load(tile.image.clone());
    parent
        .spawn((
            IconButton(tile.id.clone()),
            Button,
            Node {
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(8.0)),
                row_gap: Val::Px(4.0),
                border_radius: BorderRadius::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(tile_color(tile, &Interaction::None)),
        ))
        .with_children(|cell| {
            cell.spawn((
                IconImage(tile.id.clone()),
                ImageNode {
                    image,
                    color: if tile.enabled { TINT_ENABLED } else { TINT_DISABLED },
                    ..default()
                },
                Node {
                    width: Val::Px(size),
                    height: Val::Px(size),
                    ..default()
                },
            ));
            cell.spawn((
                Text::new(&tile.alt_text),
                TextFont { font_size: 12.0, ..default() },
                TextColor(COLOR_TEXT_DIM),
            ));
        });
}

fn tile_color(tile: &IconTile, interaction: &Interaction) -> Color {
    match (tile.selected, tile.enabled, interaction) {
        (true, _, Interaction::Hovered) => COLOR_SELECTED_HOVER,
        (true, _, _) => COLOR_SELECTED,
        (false, false, _) => COLOR_BTN_DISABLED,
        (false, true, Interaction::Hovered) => COLOR_BTN_HOVER,
        (false, true, _) => COLOR_BTN,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Locked tiles are already on screen; the visuals pass re-enables them.
pub(crate) fn unlock_system(mut unlocks: MessageReader<UnlockLockedIcons>, mut selection: ResMut<IconSelection>) {
    if unlocks.read().count() == 0 || selection.unlock_locked_icons {
        return;
    }
    selection.unlock();
    info!("Locked portraits unlocked");
}

fn tick_confirm_cooldown(time: Res<Time>, mut q: Query<&mut ConfirmCooldown>) {
    for mut cooldown in &mut q {
        if !cooldown.ready() {
            cooldown.tick(time.delta_secs());
        }
    }
}

pub(crate) fn icon_click_system(
    q: Query<(&Interaction, &IconButton), Changed<Interaction>>,
    selection: Res<IconSelection>,
    catalog: Res<PortraitCatalog>,
    session: Res<LobbySession>,
    mut outbound: MessageWriter<OutboundCommand>,
) {
    for (interaction, button) in &q {
        if *interaction != Interaction::Pressed {
            continue;
        }
        selection.on_click_icon(&catalog, &session, &button.0, |command| {
            outbound.write(OutboundCommand(command));
        });
    }
}

pub(crate) fn confirm_click_system(
    q: Query<&Interaction, (Changed<Interaction>, With<ConfirmButton>)>,
    mut cooldowns: Query<&mut ConfirmCooldown>,
    catalog: Res<PortraitCatalog>,
    session: Res<LobbySession>,
    mut confirmed: MessageWriter<IconConfirmed>,
) {
    for interaction in &q {
        if *interaction != Interaction::Pressed {
            continue;
        }
        // Without a single screen root there is no cooldown to honour.
        let mut cooldown = match cooldowns.single_mut() {
            Ok(cooldown) => Some(cooldown),
            Err(e) => {
                warn!("Confirm cooldown unavailable: {e}");
                None
            }
        };
        if let Some(cooldown) = cooldown.as_ref().filter(|cooldown| !cooldown.ready()) {
            debug!("Confirm ignored, {:.2}s cooldown left", cooldown.remaining);
            continue;
        }
        let fired = IconSelection::on_confirm(&catalog, &session, |icon| {
            info!("Confirmed look {icon:?}");
            confirmed.write(IconConfirmed { icon: icon.map(String::from) });
        });
        if let (true, Some(cooldown)) = (fired, cooldown.as_mut()) {
            cooldown.start();
        }
    }
}

pub(crate) fn update_icon_selection_visuals(
    selection: Res<IconSelection>,
    catalog: Res<PortraitCatalog>,
    session: Res<LobbySession>,
    mut buttons: Query<(&IconButton, &Interaction, &mut BackgroundColor), Without<ConfirmButton>>,
    mut images: Query<(&IconImage, &mut ImageNode)>,
    mut confirm: Query<(&Interaction, &mut BackgroundColor), (With<ConfirmButton>, Without<IconButton>)>,
    mut footer: Query<&mut Text, With<FooterText>>,
    cooldowns: Query<&ConfirmCooldown>,
) {
    if selection.is_changed() {
        for mut text in &mut footer {
            **text = selection.footer_text().to_string();
        }
    }

    for (button, interaction, mut bg) in &mut buttons {
        if let Some(tile) = selection.tile(&catalog, &session, &button.0) {
            *bg = BackgroundColor(tile_color(&tile, interaction));
        }
    }
    for (image, mut node) in &mut images {
        if let Some(tile) = selection.tile(&catalog, &session, &image.0) {
            node.color = if tile.enabled { TINT_ENABLED } else { TINT_DISABLED };
        }
    }

    let cooling = cooldowns.iter().any(|cooldown| !cooldown.ready());
    let enabled = IconSelection::can_confirm(&catalog, &session) && !cooling;
    for (interaction, mut bg) in &mut confirm {
        *bg = BackgroundColor(match (enabled, interaction) {
            (false, _) => COLOR_BTN_DISABLED,
            (true, Interaction::Hovered) => COLOR_BTN_HOVER,
            (true, _) => COLOR_BTN,
        });
    }
}
