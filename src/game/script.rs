use bevy::prelude::*;
use serde::Deserialize;

use crate::game::progression::PUZZLE_COUNT;
use crate::narrative::request::{PanelTransition, SequenceRequest, TextTransition};

const SCRIPT_JSON: &str = include_str!("../../assets/narrative_script.json");

/// Resource holding every narrative beat: the opening act, the act played
/// after each of the first four completions, and the finale.
#[derive(Resource, Debug)]
pub struct ScriptLibrary {
    pub opening: SequenceRequest,
    acts: Vec<SequenceRequest>,
    pub finale: SequenceRequest,
}

/// On-disk shape of one beat. Transition names are plain strings so the
/// script can be edited without touching code; unknown names resolve to
/// the instant fallback when converted.
#[derive(Debug, Deserialize)]
struct RawBeat {
    texts: Vec<String>,
    #[serde(default)]
    text_transitions: Vec<String>,
    #[serde(default)]
    panel_transitions: Vec<String>,
    #[serde(default)]
    display_times: Vec<f32>,
    #[serde(default)]
    no_fade_out: bool,
}

#[derive(Debug, Deserialize)]
struct RawScript {
    opening: RawBeat,
    acts: Vec<RawBeat>,
    finale: RawBeat,
}

impl RawBeat {
    fn into_request(self) -> SequenceRequest {
        let text_transitions = self
            .text_transitions
            .iter()
            .map(|name| TextTransition::from_name(name))
            .collect();
        let panel_transitions = self
            .panel_transitions
            .iter()
            .map(|name| PanelTransition::from_name(name))
            .collect();

        SequenceRequest::new(self.texts, text_transitions, panel_transitions)
            .with_display_times(self.display_times)
            .with_no_fade_out(self.no_fade_out)
    }
}

impl ScriptLibrary {
    /// Load the script embedded at build time.
    pub fn load() -> Result<Self, String> {
        Self::from_json(SCRIPT_JSON)
    }

    fn from_json(json: &str) -> Result<Self, String> {
        let raw: RawScript =
            serde_json::from_str(json).map_err(|e| format!("script parse error: {e}"))?;

        let expected_acts = (PUZZLE_COUNT - 1) as usize;
        if raw.acts.len() != expected_acts {
            return Err(format!(
                "script has {} acts, expected {} (one per completion before the finale)",
                raw.acts.len(),
                expected_acts
            ));
        }
        if raw.opening.texts.is_empty() {
            return Err("opening act has no texts".to_string());
        }
        if raw.finale.texts.is_empty() {
            return Err("finale has no texts".to_string());
        }

        Ok(ScriptLibrary {
            opening: raw.opening.into_request(),
            acts: raw.acts.into_iter().map(RawBeat::into_request).collect(),
            finale: raw.finale.into_request(),
        })
    }

    /// The act to narrate after `completed` puzzles are done (1..=4).
    pub fn act_after(&self, completed: u8) -> Option<&SequenceRequest> {
        if completed == 0 {
            return None;
        }
        self.acts.get((completed - 1) as usize)
    }
}

/// System: load and register the narrative script.
/// Runs early in Startup, before the opening act is scheduled.
pub fn setup_script(mut commands: Commands) {
    match ScriptLibrary::load() {
        Ok(script) => {
            info!(
                "script loaded: opening + {} acts + finale",
                (PUZZLE_COUNT - 1)
            );
            commands.insert_resource(script);
        }
        Err(e) => {
            error!("failed to load narrative script: {}", e);
            panic!("cannot continue without the narrative script");
        }
    }
}
