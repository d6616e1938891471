use bevy::prelude::*;
use std::time::Duration;

use crate::narrative::{NarrativeEngine, NarrativeSurface, SequenceRequest, StartSequence};
use crate::ui::{CompletionBanner, ExitMarker, LevelObject, ProgressCounter};

use super::progression::{CompletionOutcome, ProgressionTracker};
use super::script::{setup_script, ScriptLibrary};

/// Seconds between app start (or restart) and the opening act
const OPENING_DELAY_SECS: f32 = 3.0;
/// Seconds between a completion and the next act's narrative
const NEXT_ACT_DELAY_SECS: f32 = 4.0;
/// How long the COMPLETADO banner stays up
const BANNER_SECS: f32 = 2.0;

/// A puzzle trigger reporting completion. Every puzzle entity writes this
/// message instead of being discovered by type or tag.
#[derive(Message, Debug, Clone, Copy)]
pub struct PuzzleCompleted {
    pub puzzle: u8,
}

/// Fire-and-forget acknowledgment cue; consumed by the audio sink.
#[derive(Message, Debug, Clone, Copy)]
pub struct CompletionCue {
    pub puzzle: u8,
}

/// External restart trigger; only honored once the finale has played.
#[derive(Message, Debug, Clone, Copy)]
pub struct RestartRequested;

/// A narrative request waiting out its deferral before it starts.
#[derive(Component, Debug)]
pub struct DeferredSequence {
    timer: Timer,
    request: SequenceRequest,
}

impl DeferredSequence {
    pub fn new(delay_secs: f32, request: SequenceRequest) -> Self {
        DeferredSequence {
            timer: Timer::from_seconds(delay_secs, TimerMode::Once),
            request,
        }
    }
}

/// Countdown for the transient COMPLETADO banner. The banner is visible
/// exactly while a countdown is running, so clearing the state (restart
/// path) hides it immediately.
#[derive(Resource, Debug, Default)]
pub struct BannerState {
    timer: Option<Timer>,
}

impl BannerState {
    fn show(&mut self) {
        self.timer = Some(Timer::from_seconds(BANNER_SECS, TimerMode::Once));
    }

    fn clear(&mut self) {
        self.timer = None;
    }

    fn advance(&mut self, delta: Duration) {
        if let Some(timer) = self.timer.as_mut() {
            if timer.tick(delta).finished() {
                self.timer = None;
            }
        }
    }

    fn is_visible(&self) -> bool {
        self.timer.is_some()
    }
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProgressionTracker>()
            .init_resource::<BannerState>()
            .add_message::<PuzzleCompleted>()
            .add_message::<CompletionCue>()
            .add_message::<RestartRequested>()
            .add_systems(Startup, (setup_script, schedule_opening).chain())
            .add_systems(
                Update,
                (
                    handle_puzzle_completed,
                    handle_restart,
                    tick_deferred_sequences,
                    sync_progress_ui,
                    tick_completion_banner,
                    completion_cue_sink,
                )
                    .chain(),
            );
    }
}

/// System: queue the opening act a few seconds after the scene is up.
fn schedule_opening(mut commands: Commands, script: Res<ScriptLibrary>) {
    commands.spawn(DeferredSequence::new(
        OPENING_DELAY_SECS,
        script.opening.clone(),
    ));
}

/// System: fold completion events into the tracker and react to each
/// outcome. Invalid and post-finale events are logged and dropped.
fn handle_puzzle_completed(
    mut commands: Commands,
    mut completions: MessageReader<PuzzleCompleted>,
    mut tracker: ResMut<ProgressionTracker>,
    script: Res<ScriptLibrary>,
    mut cues: MessageWriter<CompletionCue>,
    mut sequences: MessageWriter<StartSequence>,
    mut banner: ResMut<BannerState>,
) {
    for event in completions.read() {
        match tracker.record_completion(event.puzzle) {
            CompletionOutcome::InvalidPuzzle => {
                warn!("ignoring completion for unknown puzzle {}", event.puzzle);
            }
            CompletionOutcome::AlreadyTerminal => {
                info!(
                    "puzzle {} completion after the finale; ignoring",
                    event.puzzle
                );
            }
            CompletionOutcome::Advanced { completed } => {
                info!(
                    "puzzle {} completed ({})",
                    event.puzzle,
                    tracker.progress_label()
                );
                cues.write(CompletionCue {
                    puzzle: event.puzzle,
                });
                banner.show();
                if let Some(act) = script.act_after(completed) {
                    commands.spawn(DeferredSequence::new(NEXT_ACT_DELAY_SECS, act.clone()));
                }
            }
            CompletionOutcome::Terminal => {
                info!("all puzzles completed; playing the finale");
                cues.write(CompletionCue {
                    puzzle: event.puzzle,
                });
                banner.show();
                sequences.write(StartSequence(script.finale.clone()));
            }
        }
    }
}

/// System: count down deferred narrative requests and fire them.
fn tick_deferred_sequences(
    mut commands: Commands,
    time: Res<Time>,
    mut pending: Query<(Entity, &mut DeferredSequence)>,
    mut sequences: MessageWriter<StartSequence>,
) {
    for (entity, mut deferred) in &mut pending {
        if deferred.timer.tick(time.delta()).just_finished() {
            sequences.write(StartSequence(deferred.request.clone()));
            commands.entity(entity).despawn();
        }
    }
}

/// System: mirror the tracker onto the HUD. Reveals only ever latch on
/// during a playthrough; the else-branch only matters after a restart
/// swaps in a fresh tracker.
fn sync_progress_ui(
    tracker: Res<ProgressionTracker>,
    mut level_objects: Query<(&LevelObject, &mut Visibility)>,
    mut exits: Query<&mut Visibility, (With<ExitMarker>, Without<LevelObject>)>,
    mut counters: Query<&mut Text, With<ProgressCounter>>,
) {
    if !tracker.is_changed() {
        return;
    }

    for (piece, mut visibility) in &mut level_objects {
        *visibility = if tracker.is_revealed(piece.puzzle) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }

    for mut visibility in &mut exits {
        *visibility = if tracker.completed() > 0 {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }

    for mut text in &mut counters {
        text.0 = tracker.progress_label();
    }
}

/// System: show the COMPLETADO banner while its countdown runs.
/// Independent of the sequence engine; it owns a separate text entity.
/// Visibility follows the state every frame, so a cleared countdown
/// (restart mid-window) takes the banner down with it.
fn tick_completion_banner(
    time: Res<Time>,
    mut state: ResMut<BannerState>,
    mut banners: Query<&mut Visibility, With<CompletionBanner>>,
) {
    state.advance(time.delta());
    let target = if state.is_visible() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };

    for mut visibility in &mut banners {
        if *visibility != target {
            *visibility = target;
        }
    }
}

/// System: the audio sink for completion cues. Playback hardware is an
/// external concern; the cue itself is the contract.
fn completion_cue_sink(mut cues: MessageReader<CompletionCue>) {
    for cue in cues.read() {
        info!("completion chime for puzzle {}", cue.puzzle);
    }
}

/// System: honor a restart only once the finale has played, then bring
/// every piece of process state back to its initial shape.
fn handle_restart(
    mut commands: Commands,
    mut restarts: MessageReader<RestartRequested>,
    mut tracker: ResMut<ProgressionTracker>,
    mut engine: ResMut<NarrativeEngine>,
    mut surface: ResMut<NarrativeSurface>,
    mut banner: ResMut<BannerState>,
    script: Res<ScriptLibrary>,
    pending: Query<Entity, With<DeferredSequence>>,
) {
    if restarts.read().count() == 0 {
        return;
    }
    if !tracker.terminal_reached() {
        info!("restart requested before the finale; ignoring");
        return;
    }

    info!("restarting the gallery");
    tracker.reset();
    engine.reset();
    *surface = NarrativeSurface::default();
    banner.clear();
    for entity in &pending {
        commands.entity(entity).despawn();
    }
    commands.spawn(DeferredSequence::new(
        OPENING_DELAY_SECS,
        script.opening.clone(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_runs_its_countdown() {
        let mut banner = BannerState::default();
        assert!(!banner.is_visible());

        banner.show();
        assert!(banner.is_visible());

        banner.advance(Duration::from_secs_f32(1.0));
        assert!(banner.is_visible());

        banner.advance(Duration::from_secs_f32(1.1));
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_banner_cleared_mid_countdown_hides_immediately() {
        let mut banner = BannerState::default();
        banner.show();
        banner.advance(Duration::from_secs_f32(0.5));
        assert!(banner.is_visible());

        // Restart inside the 2 s window: the banner must not stay up
        banner.clear();
        assert!(!banner.is_visible());
        banner.advance(Duration::from_secs_f32(1.0));
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_banner_can_be_retriggered() {
        let mut banner = BannerState::default();
        banner.show();
        banner.advance(Duration::from_secs_f32(1.9));
        // A fresh completion restarts the countdown from the top
        banner.show();
        banner.advance(Duration::from_secs_f32(0.2));
        assert!(banner.is_visible());
    }
}
