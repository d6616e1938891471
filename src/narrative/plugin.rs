use bevy::prelude::*;

use crate::ui::{AuxPanel, NarrativeCanvas, NarrativePanel, NarrativeTextSlot, PanelPlacement};

use super::engine::NarrativeEngine;
use super::request::SequenceRequest;
use super::surface::NarrativeSurface;

/// Request to start (or supersede) a narrative run.
#[derive(Message, Debug, Clone)]
pub struct StartSequence(pub SequenceRequest);

pub struct NarrativePlugin;

impl Plugin for NarrativePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NarrativeEngine>()
            .init_resource::<NarrativeSurface>()
            .add_message::<StartSequence>()
            .add_systems(
                Update,
                (start_requested_sequences, drive_narrative, apply_surface).chain(),
            );
    }
}

/// Start each requested run, unless the narrative canvas is not fully
/// wired, in which case the request is dropped before any state changes.
fn start_requested_sequences(
    mut requests: MessageReader<StartSequence>,
    mut engine: ResMut<NarrativeEngine>,
    mut surface: ResMut<NarrativeSurface>,
    panels: Query<(), With<NarrativePanel>>,
    text_slots: Query<(), With<NarrativeTextSlot>>,
) {
    for StartSequence(request) in requests.read() {
        if panels.iter().count() < 2 || text_slots.is_empty() {
            warn!("narrative canvas is missing panels or text slot; dropping sequence request");
            continue;
        }

        let token = engine.start(request.clone(), &mut surface);
        info!(
            "narrative run {:?} started ({} texts)",
            token,
            request.text_count()
        );
    }
}

/// Advance the active run by this frame's delta.
fn drive_narrative(
    time: Res<Time>,
    mut engine: ResMut<NarrativeEngine>,
    mut surface: ResMut<NarrativeSurface>,
) {
    if engine.is_running() {
        engine.tick(time.delta_secs(), &mut surface);
    }
}

/// Mirror the surface model onto the UI entities.
fn apply_surface(
    surface: Res<NarrativeSurface>,
    mut canvas: Query<&mut Visibility, With<NarrativeCanvas>>,
    mut panels: Query<(&NarrativePanel, &mut BackgroundColor)>,
    mut slots: Query<(&mut Text, &mut TextColor), With<NarrativeTextSlot>>,
    mut aux: Query<&mut Visibility, (With<AuxPanel>, Without<NarrativeCanvas>)>,
) {
    if !surface.is_changed() {
        return;
    }

    for mut visibility in &mut canvas {
        *visibility = if surface.canvas_enabled {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }

    for (panel, mut background) in &mut panels {
        let group = match panel.placement {
            PanelPlacement::Top => &surface.top_panel,
            PanelPlacement::Bottom => &surface.bottom_panel,
        };
        *background = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, group.alpha));
    }

    for (mut text, mut color) in &mut slots {
        if text.0 != surface.text.content {
            text.0 = surface.text.content.clone();
        }
        *color = TextColor(Color::srgba(1.0, 1.0, 1.0, surface.text.alpha));
    }

    for mut visibility in &mut aux {
        *visibility = if surface.aux_hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
    }
}
