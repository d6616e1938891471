//! Gallery presentation: the letterbox narrative canvas, progress counter,
//! completion banner, exit marker, and the five revealable gallery pieces.
//!
//! Everything here is plain Bevy UI; the narrative systems drive it by
//! writing to the `NarrativeSurface` model and toggling visibilities.

use bevy::prelude::*;

use crate::game::progression::PUZZLE_COUNT;

/// Root of the narrative overlay (letterbox panels + text slot).
#[derive(Component, Debug)]
pub struct NarrativeCanvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPlacement {
    Top,
    Bottom,
}

/// One of the two fade-able letterbox bars.
#[derive(Component, Debug)]
pub struct NarrativePanel {
    pub placement: PanelPlacement,
}

/// The single narrative text slot.
#[derive(Component, Debug)]
pub struct NarrativeTextSlot;

/// Auxiliary overlay hidden for the duration of a narrative run.
#[derive(Component, Debug)]
pub struct AuxPanel;

/// "N/5" indicator.
#[derive(Component, Debug)]
pub struct ProgressCounter;

/// Transient acknowledgment flashed after each completion.
#[derive(Component, Debug)]
pub struct CompletionBanner;

/// Exit affordance, revealed once the first puzzle is done.
#[derive(Component, Debug)]
pub struct ExitMarker;

/// Gallery piece revealed when its puzzle completes. Reveals are
/// monotonic during a playthrough.
#[derive(Component, Debug)]
pub struct LevelObject {
    pub puzzle: u8,
}

const PANEL_HEIGHT_PCT: f32 = 22.0;

pub struct GalleryUiPlugin;

impl Plugin for GalleryUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_gallery_ui);
    }
}

fn setup_gallery_ui(mut commands: Commands) {
    commands.spawn(Camera2d);

    spawn_narrative_canvas(&mut commands);
    spawn_hud(&mut commands);

    info!("gallery UI spawned");
}

fn spawn_narrative_canvas(commands: &mut Commands) {
    commands
        .spawn((
            NarrativeCanvas,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
            Visibility::Hidden,
            GlobalZIndex(10),
            Name::new("Narrative Canvas"),
        ))
        .with_children(|canvas| {
            canvas.spawn((
                NarrativePanel {
                    placement: PanelPlacement::Top,
                },
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(PANEL_HEIGHT_PCT),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
            ));

            canvas.spawn((
                NarrativeTextSlot,
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(10.0),
                    right: Val::Percent(10.0),
                    top: Val::Percent(44.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                Text::new(""),
                TextFont {
                    font_size: 30.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 1.0)),
            ));

            canvas.spawn((
                NarrativePanel {
                    placement: PanelPlacement::Bottom,
                },
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(PANEL_HEIGHT_PCT),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
            ));
        });
}

fn spawn_hud(commands: &mut Commands) {
    commands.spawn((
        ProgressCounter,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(16.0),
            ..default()
        },
        Text::new(format!("0/{PUZZLE_COUNT}")),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Name::new("Progress Counter"),
    ));

    commands
        .spawn((
            CompletionBanner,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Percent(30.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Visibility::Hidden,
            Name::new("Completion Banner"),
        ))
        .with_children(|banner| {
            banner.spawn((
                Text::new("COMPLETADO"),
                TextFont {
                    font_size: 42.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.85, 0.4)),
            ));
        });

    commands.spawn((
        ExitMarker,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(16.0),
            ..default()
        },
        Text::new("SALIDA"),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::srgb(0.5, 0.9, 0.6)),
        Visibility::Hidden,
        Name::new("Exit Marker"),
    ));

    commands.spawn((
        AuxPanel,
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            left: Val::Px(16.0),
            ..default()
        },
        Text::new("1-5: completar prueba   R: reiniciar"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
        Name::new("Help Overlay"),
    ));

    // The five gallery pieces, revealed one per completed puzzle
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(48.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                column_gap: Val::Px(14.0),
                ..default()
            },
            Name::new("Gallery Pieces"),
        ))
        .with_children(|row| {
            for puzzle in 1..=PUZZLE_COUNT {
                row.spawn((
                    LevelObject { puzzle },
                    Node {
                        width: Val::Px(28.0),
                        height: Val::Px(28.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.8, 0.75, 0.6)),
                    Visibility::Hidden,
                ));
            }
        });
}
