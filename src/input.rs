use bevy::prelude::*;

use crate::game::{ProgressionTracker, PuzzleCompleted, RestartRequested};

/// Keyboard stand-ins for the physical puzzle triggers. The real gallery
/// wires colliders and raycasts to the same messages; the keys exist so
/// the progression can be driven on a desktop build.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (emit_puzzle_completions, emit_restart_requests));
    }
}

const PUZZLE_KEYS: [(KeyCode, u8); 5] = [
    (KeyCode::Digit1, 1),
    (KeyCode::Digit2, 2),
    (KeyCode::Digit3, 3),
    (KeyCode::Digit4, 4),
    (KeyCode::Digit5, 5),
];

fn emit_puzzle_completions(
    keys: Res<ButtonInput<KeyCode>>,
    mut out: MessageWriter<PuzzleCompleted>,
) {
    for (key, puzzle) in PUZZLE_KEYS {
        if keys.just_pressed(key) {
            out.write(PuzzleCompleted { puzzle });
        }
    }
}

/// The restart trigger only arms once the finale has played.
fn emit_restart_requests(
    keys: Res<ButtonInput<KeyCode>>,
    tracker: Res<ProgressionTracker>,
    mut out: MessageWriter<RestartRequested>,
) {
    if keys.just_pressed(KeyCode::KeyR) {
        if tracker.terminal_reached() {
            out.write(RestartRequested);
        } else {
            info!("restart key pressed before the finale; not armed yet");
        }
    }
}
