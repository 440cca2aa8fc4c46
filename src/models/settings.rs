use super::geometry::{BorderCalibration, CaptureRegion};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the word list that receives user additions when nothing else is configured.
pub const DEFAULT_EDITABLE_WORDLIST: &str = "user_added_words.txt";

/// Persisted application settings (`settings.json`).
///
/// Every key is optional on disk. Keys this version does not know about are
/// kept in `extra` so a read-modify-write cycle never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Word lists merged into the vocabulary. `None` means "all discovered".
    #[serde(default)]
    pub selected_wordlists: Option<Vec<String>>,

    #[serde(default = "default_editable_wordlist")]
    pub editable_wordlist: String,

    #[serde(default)]
    pub window_geometry: Option<String>,

    #[serde(default)]
    pub always_on_top: bool,

    #[serde(default)]
    pub last_open_category: Option<String>,

    #[serde(default)]
    pub last_search_pattern: String,

    #[serde(default)]
    pub last_selected_result_index: usize,

    #[serde(default)]
    pub exact_length_match: bool,

    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default)]
    pub keyboard_shortcuts: IndexMap<String, String>,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default)]
    pub capture: CaptureSettings,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

fn default_editable_wordlist() -> String {
    DEFAULT_EDITABLE_WORDLIST.to_string()
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            selected_wordlists: None,
            editable_wordlist: default_editable_wordlist(),
            window_geometry: None,
            always_on_top: false,
            last_open_category: None,
            last_search_pattern: String::new(),
            last_selected_result_index: 0,
            exact_length_match: false,
            theme: default_theme(),
            keyboard_shortcuts: IndexMap::new(),
            debug_mode: false,
            capture: CaptureSettings::default(),
            extra: IndexMap::new(),
        }
    }
}

/// How the capture subsystem re-finds the tracked window between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowMatchPriority {
    #[default]
    MatchTitle,
    MatchExactWindow,
    MatchAnyWindow,
}

impl WindowMatchPriority {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MatchTitle => "Match title",
            Self::MatchExactWindow => "Match exact window",
            Self::MatchAnyWindow => "Match any window",
        }
    }
}

pub const MIN_CAPTURE_RATE: f64 = 0.1;
pub const MAX_CAPTURE_RATE: f64 = 5.0;

/// Capture configuration persisted under the `capture` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSettings {
    #[serde(default)]
    pub window_title: Option<String>,

    #[serde(default)]
    pub match_priority: WindowMatchPriority,

    /// Frames per second, kept within `[MIN_CAPTURE_RATE, MAX_CAPTURE_RATE]`.
    #[serde(default = "default_capture_rate")]
    pub capture_rate: f64,

    #[serde(default)]
    pub region: Option<CaptureRegion>,

    #[serde(default = "default_canvas_margin")]
    pub canvas_margin: f64,

    #[serde(default)]
    pub border: BorderCalibration,
}

fn default_capture_rate() -> f64 {
    1.0
}

fn default_canvas_margin() -> f64 {
    10.0
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            window_title: None,
            match_priority: WindowMatchPriority::default(),
            capture_rate: default_capture_rate(),
            region: None,
            canvas_margin: default_canvas_margin(),
            border: BorderCalibration::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert!(settings.selected_wordlists.is_none());
        assert_eq!(settings.editable_wordlist, "user_added_words.txt");
        assert_eq!(settings.theme, "light");
        assert!(!settings.exact_length_match);
        assert_eq!(settings.capture.capture_rate, 1.0);
        assert_eq!(settings.capture.canvas_margin, 10.0);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let json = r#"{"selected_wordlists": ["nouns.txt"]}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.selected_wordlists, Some(vec!["nouns.txt".to_string()]));
        assert_eq!(settings.editable_wordlist, DEFAULT_EDITABLE_WORDLIST);
        assert_eq!(settings.capture.match_priority, WindowMatchPriority::MatchTitle);
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = r#"{"editable_wordlist": "mine.txt", "future_flag": {"nested": true}}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert!(settings.extra.contains_key("future_flag"));

        let written = serde_json::to_string(&settings).unwrap();
        let reloaded: AppSettings = serde_json::from_str(&written).unwrap();
        assert_eq!(reloaded.extra.get("future_flag"), settings.extra.get("future_flag"));
        assert_eq!(reloaded.editable_wordlist, "mine.txt");
    }

    #[test]
    fn test_capture_region_serialization() {
        let mut settings = AppSettings::default();
        settings.capture.region = Some(CaptureRegion::new(10, 20, 300, 40));

        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.capture.region, Some(CaptureRegion::new(10, 20, 300, 40)));
    }

    #[test]
    fn test_match_priority_labels() {
        assert_eq!(WindowMatchPriority::MatchTitle.label(), "Match title");
        assert_eq!(WindowMatchPriority::MatchAnyWindow.label(), "Match any window");
    }
}
