pub mod plugin;
pub mod progression;
pub mod script;

pub use plugin::{GamePlugin, PuzzleCompleted, RestartRequested};
pub use progression::ProgressionTracker;
