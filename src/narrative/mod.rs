pub mod engine;
pub mod plugin;
pub mod request;
pub mod surface;

pub use engine::{NarrativeEngine, RunToken, TransitionTiming};
pub use plugin::{NarrativePlugin, StartSequence};
pub use request::{PanelTransition, SequenceRequest, TextTransition};
pub use surface::NarrativeSurface;
