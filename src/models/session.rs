use super::geometry::CaptureRegion;
use super::settings::{AppSettings, MAX_CAPTURE_RATE, MIN_CAPTURE_RATE, WindowMatchPriority};

/// Everything the UI session tracks between keystrokes and drag gestures.
///
/// `SessionState` is wrapped in `Arc<RwLock<_>>` by
/// [`crate::state::SessionManager`]; mutate it through the manager so change
/// events are emitted.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    // Search
    pub pattern: String,
    pub exact_length: bool,

    // Capture mode flags (mutually exclusive)
    pub selection_mode: bool,
    pub monitoring: bool,

    // Capture configuration
    pub tracked_window: Option<String>,
    pub match_priority: WindowMatchPriority,
    pub capture_rate: f64,
    pub capture_region: Option<CaptureRegion>,

    // Selection history for undo/redo; `history_index` points at the current entry
    pub selection_history: Vec<CaptureRegion>,
    pub history_index: Option<usize>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            exact_length: false,
            selection_mode: false,
            monitoring: false,
            tracked_window: None,
            match_priority: WindowMatchPriority::default(),
            capture_rate: 1.0,
            capture_region: None,
            selection_history: Vec::new(),
            history_index: None,
        }
    }
}

impl SessionState {
    /// Restore the persisted parts of a session.
    pub fn from_settings(settings: &AppSettings) -> Self {
        let capture = &settings.capture;
        let mut state = Self {
            pattern: settings.last_search_pattern.clone(),
            exact_length: settings.exact_length_match,
            tracked_window: capture.window_title.clone(),
            match_priority: capture.match_priority,
            capture_rate: clamp_capture_rate(capture.capture_rate),
            capture_region: capture.region,
            ..Self::default()
        };

        if let Some(region) = capture.region {
            state.selection_history.push(region);
            state.history_index = Some(0);
        }

        state
    }

    /// Write the persisted parts of the session back into `settings`.
    pub fn store_into(&self, settings: &mut AppSettings) {
        settings.last_search_pattern = self.pattern.clone();
        settings.exact_length_match = self.exact_length;
        settings.capture.window_title = self.tracked_window.clone();
        settings.capture.match_priority = self.match_priority;
        settings.capture.capture_rate = self.capture_rate;
        settings.capture.region = self.capture_region;
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.history_index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.history_index {
            Some(i) => i + 1 < self.selection_history.len(),
            None => false,
        }
    }
}

/// Clamp a capture rate into the supported FPS range. NaN falls back to 1 FPS.
pub fn clamp_capture_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return 1.0;
    }
    rate.clamp(MIN_CAPTURE_RATE, MAX_CAPTURE_RATE)
}
