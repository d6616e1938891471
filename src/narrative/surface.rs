use bevy::prelude::Resource;

/// Opacity and interactivity state for one letterbox panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGroup {
    pub alpha: f32,
    pub interactable: bool,
    pub blocks_raycasts: bool,
}

impl Default for PanelGroup {
    fn default() -> Self {
        PanelGroup {
            alpha: 0.0,
            interactable: false,
            blocks_raycasts: false,
        }
    }
}

/// The single narrative text slot: its content plus its opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSlot {
    pub content: String,
    pub alpha: f32,
}

impl Default for TextSlot {
    fn default() -> Self {
        TextSlot {
            content: String::new(),
            alpha: 1.0,
        }
    }
}

/// Model of the presentation surface the sequence engine drives: two
/// fade-able panels, one text slot, the canvas on/off switch, and whether
/// the auxiliary panels are hidden for the duration of a run.
///
/// During a run the active sequence is the only writer. A superseding run
/// does not normalize this state first; its own panel-in step is what
/// brings the panels back to a known value.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct NarrativeSurface {
    pub top_panel: PanelGroup,
    pub bottom_panel: PanelGroup,
    pub text: TextSlot,
    pub canvas_enabled: bool,
    pub aux_hidden: bool,
}

impl NarrativeSurface {
    /// Set both panels' opacity.
    pub fn set_panel_alpha(&mut self, alpha: f32) {
        self.top_panel.alpha = alpha;
        self.bottom_panel.alpha = alpha;
    }

    /// Set both panels' interactivity and hit-testing.
    pub fn set_panel_interactable(&mut self, interactable: bool) {
        self.top_panel.interactable = interactable;
        self.top_panel.blocks_raycasts = interactable;
        self.bottom_panel.interactable = interactable;
        self.bottom_panel.blocks_raycasts = interactable;
    }

    /// Current panel opacity (the panels always move together).
    pub fn panel_alpha(&self) -> f32 {
        self.top_panel.alpha
    }
}
