use bevy::log::{debug, info};
use bevy::prelude::Resource;

use super::request::{PanelTransition, SequenceRequest, TextTransition};
use super::surface::NarrativeSurface;

/// Timing for the transition primitives.
#[derive(Debug, Clone, Copy)]
pub struct TransitionTiming {
    /// Seconds for a panel fade (in or out)
    pub panel_fade_secs: f32,
    /// Seconds for each half of a text fade (out, then in)
    pub text_fade_secs: f32,
    /// Seconds between typewriter character reveals (wall-clock cadence)
    pub typewriter_secs: f32,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        TransitionTiming {
            panel_fade_secs: 0.5,
            text_fade_secs: 0.5,
            typewriter_secs: 0.04,
        }
    }
}

/// Generation token issued by [`NarrativeEngine::start`]. Starting a new
/// run invalidates every previously issued token, so a caller can check
/// whether the run it kicked off is still the one on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(u64);

/// Did a step finish this tick, or does it need more time?
enum Step {
    Pending,
    Done,
}

#[derive(Debug, Clone)]
enum PanelAnim {
    Instant,
    Fade { elapsed: f32, start: f32 },
}

#[derive(Debug, Clone)]
enum TextAnim {
    Instant,
    FadeOut { elapsed: f32, start: f32 },
    FadeIn { elapsed: f32 },
    Write { revealed: usize, accum: f32 },
}

/// One step of an active run. Steps execute strictly in order:
/// `PanelIn -> (Text[i] -> Hold[i])* -> clear -> (PanelOut | end)`.
#[derive(Debug, Clone)]
enum Phase {
    PanelIn(PanelAnim),
    Text { index: usize, anim: TextAnim },
    Hold { index: usize, remaining: f32 },
    PanelOut(PanelAnim),
}

#[derive(Debug, Clone)]
struct ActiveRun {
    request: SequenceRequest,
    token: RunToken,
    phase: Phase,
}

/// Single-flight step runner for narrative sequences.
///
/// At most one run is active. [`start`](Self::start) while a run is in
/// flight supersedes it: the old run's next step simply never executes,
/// and nothing resets the surface before the new run's panel-in step
/// overwrites it (last writer wins, same as the stale-state window the
/// original presentation had).
///
/// The engine never blocks: [`tick`](Self::tick) advances the current
/// step by one time slice and returns. Fades and holds consume the
/// tick's delta; the typewriter accumulates delta against its fixed
/// cadence and catches up with multiple reveals when a tick runs long,
/// so its pacing is independent of the host frame rate.
#[derive(Resource, Debug)]
pub struct NarrativeEngine {
    timing: TransitionTiming,
    run: Option<ActiveRun>,
    generation: u64,
}

impl Default for NarrativeEngine {
    fn default() -> Self {
        NarrativeEngine::new(TransitionTiming::default())
    }
}

impl NarrativeEngine {
    pub fn new(timing: TransitionTiming) -> Self {
        NarrativeEngine {
            timing,
            run: None,
            generation: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Is `token` the run currently on screen?
    pub fn is_current(&self, token: RunToken) -> bool {
        self.run.as_ref().is_some_and(|run| run.token == token)
    }

    /// Begin a run, superseding any in-flight one. Hides the auxiliary
    /// panels, enables the canvas, and enters the panel-in step.
    pub fn start(&mut self, request: SequenceRequest, surface: &mut NarrativeSurface) -> RunToken {
        if let Some(old) = self.run.take() {
            info!("superseding narrative run {:?} mid-flight", old.token);
        }

        self.generation += 1;
        let token = RunToken(self.generation);

        surface.aux_hidden = true;
        surface.canvas_enabled = true;

        let anim = enter_panel(request.panel_in(), true, surface);
        self.run = Some(ActiveRun {
            request,
            token,
            phase: Phase::PanelIn(anim),
        });
        token
    }

    /// Drop the active run without starting another (restart path).
    pub fn reset(&mut self) {
        self.run = None;
    }

    /// Advance the active run by `dt` seconds. The current step gets the
    /// whole slice; steps that finish let the next step start within the
    /// same tick with a zero slice, so instant chains complete in one call
    /// while timed steps consume at most one tick each.
    pub fn tick(&mut self, dt: f32, surface: &mut NarrativeSurface) {
        let timing = self.timing;
        let mut finished = false;

        let Some(run) = self.run.as_mut() else {
            return;
        };

        let mut budget = dt;
        loop {
            let step = match &mut run.phase {
                Phase::PanelIn(anim) => advance_panel(anim, true, budget, &timing, surface),
                Phase::Text { index, anim } => {
                    let text = run.request.text(*index).to_owned();
                    advance_text(anim, &text, budget, &timing, surface)
                }
                Phase::Hold { remaining, .. } => {
                    *remaining -= budget;
                    if *remaining <= 0.0 { Step::Done } else { Step::Pending }
                }
                Phase::PanelOut(anim) => advance_panel(anim, false, budget, &timing, surface),
            };

            match step {
                Step::Pending => break,
                Step::Done => {
                    budget = 0.0;
                    if !enter_next_phase(run, surface) {
                        finished = true;
                        break;
                    }
                }
            }
        }

        if finished {
            debug!("narrative run {:?} complete", self.run.as_ref().map(|r| r.token));
            self.run = None;
        }
    }
}

/// Move `run` to the step after the one that just finished. Returns false
/// when the run is over.
fn enter_next_phase(run: &mut ActiveRun, surface: &mut NarrativeSurface) -> bool {
    match &run.phase {
        Phase::PanelIn(_) => {
            if run.request.text_count() == 0 {
                finish_texts(run, surface)
            } else {
                run.phase = Phase::Text {
                    index: 0,
                    anim: enter_text(run.request.text_transition(0), surface),
                };
                true
            }
        }
        Phase::Text { index, .. } => {
            run.phase = Phase::Hold {
                index: *index,
                remaining: run.request.display_time(*index),
            };
            true
        }
        Phase::Hold { index, .. } => {
            let next = index + 1;
            if next < run.request.text_count() {
                run.phase = Phase::Text {
                    index: next,
                    anim: enter_text(run.request.text_transition(next), surface),
                };
                true
            } else {
                finish_texts(run, surface)
            }
        }
        Phase::PanelOut(_) => {
            surface.aux_hidden = false;
            false
        }
    }
}

/// All texts are done: clear the slot, then either fade the panels out or
/// leave the surface held open.
fn finish_texts(run: &mut ActiveRun, surface: &mut NarrativeSurface) -> bool {
    surface.text.content.clear();
    if run.request.no_fade_out() {
        false
    } else {
        run.phase = Phase::PanelOut(enter_panel(run.request.panel_out(), false, surface));
        true
    }
}

fn enter_panel(
    kind: PanelTransition,
    to_visible: bool,
    surface: &mut NarrativeSurface,
) -> PanelAnim {
    match kind {
        PanelTransition::Instant => PanelAnim::Instant,
        PanelTransition::Fade => {
            // A fade-in starts from a known blank state no matter what the
            // previous (possibly superseded) run left behind.
            if to_visible {
                surface.set_panel_alpha(0.0);
            }
            PanelAnim::Fade {
                elapsed: 0.0,
                start: surface.panel_alpha(),
            }
        }
    }
}

fn advance_panel(
    anim: &mut PanelAnim,
    to_visible: bool,
    dt: f32,
    timing: &TransitionTiming,
    surface: &mut NarrativeSurface,
) -> Step {
    let target = if to_visible { 1.0 } else { 0.0 };
    match anim {
        PanelAnim::Instant => {
            surface.set_panel_alpha(target);
            surface.set_panel_interactable(to_visible);
            Step::Done
        }
        PanelAnim::Fade { elapsed, start } => {
            *elapsed += dt;
            let duration = timing.panel_fade_secs;
            if duration <= 0.0 || *elapsed >= duration {
                surface.set_panel_alpha(target);
                surface.set_panel_interactable(to_visible);
                Step::Done
            } else {
                surface.set_panel_alpha(lerp(*start, target, *elapsed / duration));
                Step::Pending
            }
        }
    }
}

fn enter_text(kind: TextTransition, surface: &mut NarrativeSurface) -> TextAnim {
    match kind {
        TextTransition::Instant => TextAnim::Instant,
        TextTransition::Fade => TextAnim::FadeOut {
            elapsed: 0.0,
            start: surface.text.alpha,
        },
        TextTransition::Write => {
            // First visible state of a typewriter reveal is the empty prefix
            surface.text.alpha = 1.0;
            surface.text.content.clear();
            TextAnim::Write {
                revealed: 0,
                accum: 0.0,
            }
        }
    }
}

fn advance_text(
    anim: &mut TextAnim,
    text: &str,
    dt: f32,
    timing: &TransitionTiming,
    surface: &mut NarrativeSurface,
) -> Step {
    match anim {
        TextAnim::Instant => {
            surface.text.content = text.to_owned();
            surface.text.alpha = 1.0;
            Step::Done
        }
        TextAnim::FadeOut { elapsed, start } => {
            *elapsed += dt;
            let duration = timing.text_fade_secs;
            if duration <= 0.0 || *elapsed >= duration {
                surface.text.alpha = 0.0;
                surface.text.content = text.to_owned();
                *anim = TextAnim::FadeIn { elapsed: 0.0 };
                Step::Pending
            } else {
                surface.text.alpha = lerp(*start, 0.0, *elapsed / duration);
                Step::Pending
            }
        }
        TextAnim::FadeIn { elapsed } => {
            *elapsed += dt;
            let duration = timing.text_fade_secs;
            if duration <= 0.0 || *elapsed >= duration {
                surface.text.alpha = 1.0;
                Step::Done
            } else {
                surface.text.alpha = lerp(0.0, 1.0, *elapsed / duration);
                Step::Pending
            }
        }
        TextAnim::Write { revealed, accum } => {
            let chars: Vec<char> = text.chars().collect();
            if *revealed >= chars.len() {
                return Step::Done;
            }

            *accum += dt;
            let cadence = timing.typewriter_secs.max(f32::EPSILON);
            while *accum >= cadence && *revealed < chars.len() {
                *accum -= cadence;
                *revealed += 1;
                surface.text.content = chars[..*revealed].iter().collect();
            }

            if *revealed >= chars.len() {
                Step::Done
            } else {
                Step::Pending
            }
        }
    }
}

fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> NarrativeEngine {
        NarrativeEngine::default()
    }

    /// Tick in small slices until the run ends (bounded so a broken state
    /// machine fails instead of spinning).
    fn run_to_completion(engine: &mut NarrativeEngine, surface: &mut NarrativeSurface) {
        for _ in 0..10_000 {
            if !engine.is_running() {
                return;
            }
            engine.tick(0.016, surface);
        }
        panic!("run never completed");
    }

    #[test]
    fn test_all_instant_run_completes_in_one_tick() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec!["Hi".to_string()],
            vec![TextTransition::Instant],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        )
        .with_display_times(vec![0.0]);

        engine.start(request, &mut surface);
        engine.tick(0.0, &mut surface);

        assert!(!engine.is_running());
        // Panels jumped to 1 then straight back to 0, text was shown and cleared
        assert_eq!(surface.panel_alpha(), 0.0);
        assert!(!surface.top_panel.interactable);
        assert!(surface.text.content.is_empty());
        assert!(!surface.aux_hidden);
    }

    #[test]
    fn test_faded_run_ends_closed_with_empty_text() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec!["A".to_string(), "B".to_string()],
            vec![TextTransition::Write, TextTransition::Fade],
            vec![PanelTransition::Fade, PanelTransition::Fade],
        )
        .with_display_times(vec![0.8, 4.0]);

        engine.start(request, &mut surface);
        run_to_completion(&mut engine, &mut surface);

        assert_eq!(surface.text.content, "");
        assert_eq!(surface.panel_alpha(), 0.0);
        assert!(!surface.aux_hidden);
    }

    #[test]
    fn test_no_fade_out_leaves_surface_held_open() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec!["Fin".to_string()],
            vec![TextTransition::Instant],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        )
        .with_display_times(vec![0.0])
        .with_no_fade_out(true);

        engine.start(request, &mut surface);
        engine.tick(0.0, &mut surface);

        assert!(!engine.is_running());
        assert!(surface.text.content.is_empty());
        // Panel-out was skipped: panels stay up, aux panels stay hidden
        assert_eq!(surface.panel_alpha(), 1.0);
        assert!(surface.aux_hidden);
        assert!(surface.canvas_enabled);
    }

    #[test]
    fn test_typewriter_reveals_one_char_per_cadence() {
        let timing = TransitionTiming {
            typewriter_secs: 0.04,
            ..TransitionTiming::default()
        };
        let mut engine = NarrativeEngine::new(timing);
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec!["Hi".to_string()],
            vec![TextTransition::Write],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        );
        engine.start(request, &mut surface);

        // Panel-in is instant, so the write step starts immediately and
        // its first visible state is the empty prefix.
        engine.tick(0.0, &mut surface);
        assert_eq!(surface.text.content, "");
        assert_eq!(surface.text.alpha, 1.0);

        engine.tick(0.04, &mut surface);
        assert_eq!(surface.text.content, "H");

        engine.tick(0.04, &mut surface);
        assert_eq!(surface.text.content, "Hi");
    }

    #[test]
    fn test_typewriter_catches_up_on_long_ticks() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec!["abcdef".to_string()],
            vec![TextTransition::Write],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        );
        engine.start(request, &mut surface);
        engine.tick(0.0, &mut surface);

        // One slow frame spanning three cadence intervals reveals three chars
        engine.tick(0.12, &mut surface);
        assert_eq!(surface.text.content, "abc");
    }

    #[test]
    fn test_empty_string_write_completes_without_delay() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec![String::new()],
            vec![TextTransition::Write],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        )
        .with_display_times(vec![0.0]);

        engine.start(request, &mut surface);
        engine.tick(0.0, &mut surface);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_panel_fade_in_forces_blank_start_then_reaches_target() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();
        // Stale opacity from an abandoned run
        surface.set_panel_alpha(0.7);

        let request = SequenceRequest::new(
            vec![],
            vec![],
            vec![PanelTransition::Fade, PanelTransition::Instant],
        );
        engine.start(request, &mut surface);
        // Forced to zero before the first sample
        assert_eq!(surface.panel_alpha(), 0.0);

        engine.tick(0.25, &mut surface);
        let halfway = surface.panel_alpha();
        assert!(halfway > 0.0 && halfway < 1.0, "expected mid-fade, got {halfway}");
        assert!(!surface.top_panel.interactable);

        engine.tick(0.25, &mut surface);
        // Snapped exactly to target, interactivity flipped with it
        assert!(!engine.is_running() || surface.panel_alpha() == 1.0);
        run_to_completion(&mut engine, &mut surface);
        assert_eq!(surface.panel_alpha(), 0.0);
    }

    #[test]
    fn test_hold_consumes_configured_time() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec!["X".to_string()],
            vec![TextTransition::Instant],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        )
        .with_display_times(vec![0.5]);

        engine.start(request, &mut surface);
        engine.tick(0.0, &mut surface);
        // Mid-hold: text shown, run still active
        assert_eq!(surface.text.content, "X");
        engine.tick(0.3, &mut surface);
        assert!(engine.is_running());
        engine.tick(0.3, &mut surface);
        // Hold over; the instant panel-out chains within the same tick
        assert!(!engine.is_running());
    }

    #[test]
    fn test_supersession_invalidates_token_and_b_wins() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let run_a = SequenceRequest::new(
            vec!["AAAAAAAAAA".to_string()],
            vec![TextTransition::Write],
            vec![PanelTransition::Fade, PanelTransition::Fade],
        );
        let token_a = engine.start(run_a, &mut surface);
        // Leave A mid-text-reveal
        for _ in 0..40 {
            engine.tick(0.016, &mut surface);
        }
        assert!(engine.is_current(token_a));

        let run_b = SequenceRequest::new(
            vec!["B".to_string()],
            vec![TextTransition::Instant],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        )
        .with_display_times(vec![0.0])
        .with_no_fade_out(true);
        let token_b = engine.start(run_b, &mut surface);

        assert!(!engine.is_current(token_a));
        assert!(engine.is_current(token_b));

        engine.tick(0.0, &mut surface);
        // Final state is exactly B's terminal state regardless of A's progress
        assert!(!engine.is_running());
        assert_eq!(surface.panel_alpha(), 1.0);
        assert!(surface.text.content.is_empty());
        assert!(surface.aux_hidden);
    }

    #[test]
    fn test_text_fade_swaps_content_at_the_bottom_of_the_fade() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();
        surface.text.content = "old".to_string();

        let request = SequenceRequest::new(
            vec!["new".to_string()],
            vec![TextTransition::Fade],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        )
        .with_display_times(vec![0.0]);

        engine.start(request, &mut surface);
        engine.tick(0.0, &mut surface);

        // Mid fade-out the old content is still up
        engine.tick(0.25, &mut surface);
        assert_eq!(surface.text.content, "old");
        assert!(surface.text.alpha < 1.0);

        // Fade-out completes: content swaps while fully transparent
        engine.tick(0.25, &mut surface);
        assert_eq!(surface.text.content, "new");
        assert_eq!(surface.text.alpha, 0.0);

        // Fade back in
        engine.tick(0.5, &mut surface);
        assert_eq!(surface.text.alpha, 1.0);
    }

    #[test]
    fn test_empty_text_list_runs_panels_only() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec![],
            vec![],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        );
        engine.start(request, &mut surface);
        engine.tick(0.0, &mut surface);

        assert!(!engine.is_running());
        assert_eq!(surface.panel_alpha(), 0.0);
        assert!(!surface.aux_hidden);
    }

    #[test]
    fn test_reset_drops_run_without_touching_surface() {
        let mut engine = engine();
        let mut surface = NarrativeSurface::default();

        let request = SequenceRequest::new(
            vec!["X".to_string()],
            vec![TextTransition::Instant],
            vec![PanelTransition::Instant, PanelTransition::Instant],
        );
        engine.start(request, &mut surface);
        engine.tick(0.016, &mut surface);
        engine.reset();

        assert!(!engine.is_running());
        // Ticking after reset is a no-op
        let before = surface.clone();
        engine.tick(1.0, &mut surface);
        assert_eq!(surface, before);
    }
}
