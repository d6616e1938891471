use bevy::log::warn;

/// Seconds a text is held on screen after it finishes revealing, when the
/// request does not carry its own display time for that entry.
pub const DEFAULT_HOLD_SECS: f32 = 1.0;

/// Visual style of a single text reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextTransition {
    /// Swap content and jump to full opacity in one step
    Instant,
    /// Fade the current content out, swap, fade the new content in
    Fade,
    /// Typewriter reveal, one character at a fixed cadence
    #[default]
    Write,
}

impl TextTransition {
    /// Resolve a configured transition name. Unrecognized names fall back
    /// to `Instant` (full text, full opacity) rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name {
            "instant" => TextTransition::Instant,
            "fade" => TextTransition::Fade,
            "write" => TextTransition::Write,
            other => {
                warn!("unknown text transition '{}', using instant", other);
                TextTransition::Instant
            }
        }
    }
}

/// Visual style of a panel show/hide step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelTransition {
    /// Snap opacity and interactivity in one step
    Instant,
    /// Linearly interpolate opacity over the configured duration
    #[default]
    Fade,
}

impl PanelTransition {
    /// Resolve a configured transition name, falling back to `Instant`
    /// for anything unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name {
            "instant" => PanelTransition::Instant,
            "fade" => PanelTransition::Fade,
            other => {
                warn!("unknown panel transition '{}', using instant", other);
                PanelTransition::Instant
            }
        }
    }
}

/// Immutable description of one narrative run: the texts to show in order,
/// how each one appears, how the letterbox panels come and go, and how long
/// each text is held.
///
/// Lists shorter than `texts` are legal; missing entries resolve through the
/// accessors (`write` for texts, `fade` for panels, [`DEFAULT_HOLD_SECS`]
/// for holds). A negative display time also means "use the default".
#[derive(Debug, Clone, Default)]
pub struct SequenceRequest {
    texts: Vec<String>,
    text_transitions: Vec<TextTransition>,
    /// `[in, out]`
    panel_transitions: Vec<PanelTransition>,
    display_times: Vec<f32>,
    no_fade_out: bool,
}

impl SequenceRequest {
    pub fn new(
        texts: Vec<String>,
        text_transitions: Vec<TextTransition>,
        panel_transitions: Vec<PanelTransition>,
    ) -> Self {
        SequenceRequest {
            texts,
            text_transitions,
            panel_transitions,
            display_times: Vec::new(),
            no_fade_out: false,
        }
    }

    /// Per-text hold times in seconds; negative entries mean "default".
    pub fn with_display_times(mut self, display_times: Vec<f32>) -> Self {
        self.display_times = display_times;
        self
    }

    /// Leave the panels up (and the auxiliary panels hidden) after the
    /// final text instead of fading out.
    pub fn with_no_fade_out(mut self, no_fade_out: bool) -> Self {
        self.no_fade_out = no_fade_out;
        self
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn text(&self, index: usize) -> &str {
        &self.texts[index]
    }

    /// Transition for text `index`; missing entries default to `write`.
    pub fn text_transition(&self, index: usize) -> TextTransition {
        self.text_transitions
            .get(index)
            .copied()
            .unwrap_or_default()
    }

    /// Panel-in transition; defaults to `fade`.
    pub fn panel_in(&self) -> PanelTransition {
        self.panel_transitions.first().copied().unwrap_or_default()
    }

    /// Panel-out transition; defaults to `fade`.
    pub fn panel_out(&self) -> PanelTransition {
        self.panel_transitions.get(1).copied().unwrap_or_default()
    }

    /// Hold time after text `index` finishes revealing. Missing or negative
    /// entries resolve to [`DEFAULT_HOLD_SECS`].
    pub fn display_time(&self, index: usize) -> f32 {
        match self.display_times.get(index) {
            Some(&secs) if secs >= 0.0 => secs,
            _ => DEFAULT_HOLD_SECS,
        }
    }

    pub fn no_fade_out(&self) -> bool {
        self.no_fade_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_texts() -> SequenceRequest {
        SequenceRequest::new(
            vec!["A".to_string(), "B".to_string()],
            vec![TextTransition::Instant],
            vec![PanelTransition::Instant],
        )
    }

    #[test]
    fn test_missing_text_transitions_default_to_write() {
        let request = two_texts();
        assert_eq!(request.text_transition(0), TextTransition::Instant);
        assert_eq!(request.text_transition(1), TextTransition::Write);
    }

    #[test]
    fn test_missing_panel_transitions_default_to_fade() {
        let request = two_texts();
        assert_eq!(request.panel_in(), PanelTransition::Instant);
        assert_eq!(request.panel_out(), PanelTransition::Fade);

        let empty = SequenceRequest::new(Vec::new(), Vec::new(), Vec::new());
        assert_eq!(empty.panel_in(), PanelTransition::Fade);
        assert_eq!(empty.panel_out(), PanelTransition::Fade);
    }

    #[test]
    fn test_display_time_defaults() {
        let request = two_texts().with_display_times(vec![0.8, -1.0]);
        assert_eq!(request.display_time(0), 0.8);
        // Negative sentinel and missing entry both mean "default hold"
        assert_eq!(request.display_time(1), DEFAULT_HOLD_SECS);
        assert_eq!(request.display_time(2), DEFAULT_HOLD_SECS);
    }

    #[test]
    fn test_no_fade_out_defaults_false() {
        assert!(!two_texts().no_fade_out());
        assert!(two_texts().with_no_fade_out(true).no_fade_out());
    }

    #[test]
    fn test_unknown_transition_names_fall_back_to_instant() {
        assert_eq!(TextTransition::from_name("write"), TextTransition::Write);
        assert_eq!(TextTransition::from_name("sparkle"), TextTransition::Instant);
        assert_eq!(PanelTransition::from_name("fade"), PanelTransition::Fade);
        assert_eq!(PanelTransition::from_name("wipe"), PanelTransition::Instant);
    }
}
