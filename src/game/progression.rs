use bevy::prelude::Resource;

/// Number of puzzles in the gallery
pub const PUZZLE_COUNT: u8 = 5;

/// Outcome of feeding one completion event into the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Progress advanced; the next act's narrative should follow
    Advanced { completed: u8 },
    /// Fifth completion: the finale plays and the restart trigger arms
    Terminal,
    /// Completion received after the terminal state; ignored
    AlreadyTerminal,
    /// Puzzle id outside 1..=5; malformed external event, ignored
    InvalidPuzzle,
}

/// Tracks progression through the five puzzles.
///
/// `completed` counts distinct completions (each puzzle's trigger fires
/// once), `revealed` latches per-puzzle level-object reveals, and the
/// terminal flag latches once all five are done. None of these revert
/// during a playthrough; a restart swaps in a fresh tracker.
#[derive(Resource, Debug, Clone, Default)]
pub struct ProgressionTracker {
    completed: u8,
    terminal_reached: bool,
    revealed: [bool; PUZZLE_COUNT as usize],
}

impl ProgressionTracker {
    pub fn completed(&self) -> u8 {
        self.completed
    }

    pub fn terminal_reached(&self) -> bool {
        self.terminal_reached
    }

    /// Has the level object for `puzzle_id` been revealed?
    pub fn is_revealed(&self, puzzle_id: u8) -> bool {
        (1..=PUZZLE_COUNT).contains(&puzzle_id) && self.revealed[(puzzle_id - 1) as usize]
    }

    /// Record one completion event from a puzzle trigger.
    pub fn record_completion(&mut self, puzzle_id: u8) -> CompletionOutcome {
        if !(1..=PUZZLE_COUNT).contains(&puzzle_id) {
            return CompletionOutcome::InvalidPuzzle;
        }
        if self.completed >= PUZZLE_COUNT {
            // Guard against re-triggered completion sources
            return CompletionOutcome::AlreadyTerminal;
        }

        self.completed += 1;
        self.revealed[(puzzle_id - 1) as usize] = true;

        if self.completed == PUZZLE_COUNT {
            self.terminal_reached = true;
            CompletionOutcome::Terminal
        } else {
            CompletionOutcome::Advanced {
                completed: self.completed,
            }
        }
    }

    /// Progress indicator text, e.g. "3/5".
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.completed, PUZZLE_COUNT)
    }

    /// Back to a fresh playthrough (restart path).
    pub fn reset(&mut self) {
        *self = ProgressionTracker::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_completions_count_up_to_five() {
        let mut tracker = ProgressionTracker::default();

        for puzzle in 1..=5u8 {
            let outcome = tracker.record_completion(puzzle);
            assert_eq!(tracker.completed(), puzzle);
            if puzzle < 5 {
                assert_eq!(outcome, CompletionOutcome::Advanced { completed: puzzle });
                assert!(!tracker.terminal_reached());
            } else {
                assert_eq!(outcome, CompletionOutcome::Terminal);
                assert!(tracker.terminal_reached());
            }
        }
    }

    #[test]
    fn test_sixth_completion_is_a_no_op() {
        let mut tracker = ProgressionTracker::default();
        for puzzle in 1..=5u8 {
            tracker.record_completion(puzzle);
        }

        for puzzle in 1..=5u8 {
            assert_eq!(
                tracker.record_completion(puzzle),
                CompletionOutcome::AlreadyTerminal
            );
        }
        assert_eq!(tracker.completed(), 5);
        assert!(tracker.terminal_reached());
    }

    #[test]
    fn test_invalid_puzzle_ids_change_nothing() {
        let mut tracker = ProgressionTracker::default();
        tracker.record_completion(2);

        assert_eq!(tracker.record_completion(0), CompletionOutcome::InvalidPuzzle);
        assert_eq!(tracker.record_completion(6), CompletionOutcome::InvalidPuzzle);
        assert_eq!(tracker.completed(), 1);
        assert!(tracker.is_revealed(2));
        assert!(!tracker.is_revealed(6));
    }

    #[test]
    fn test_reveals_are_monotonic_and_per_puzzle() {
        let mut tracker = ProgressionTracker::default();

        tracker.record_completion(3);
        assert!(tracker.is_revealed(3));
        assert!(!tracker.is_revealed(1));

        tracker.record_completion(1);
        assert!(tracker.is_revealed(3));
        assert!(tracker.is_revealed(1));
    }

    #[test]
    fn test_progress_label() {
        let mut tracker = ProgressionTracker::default();
        assert_eq!(tracker.progress_label(), "0/5");
        tracker.record_completion(1);
        tracker.record_completion(2);
        assert_eq!(tracker.progress_label(), "2/5");
    }

    #[test]
    fn test_reset_returns_to_fresh_state() {
        let mut tracker = ProgressionTracker::default();
        for puzzle in 1..=5u8 {
            tracker.record_completion(puzzle);
        }

        tracker.reset();
        assert_eq!(tracker.completed(), 0);
        assert!(!tracker.terminal_reached());
        assert!(!tracker.is_revealed(1));
    }
}
