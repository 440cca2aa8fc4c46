// Pictor - word-guessing assistant
//
// Library crate with the word bank, pattern matcher, capture-region mapper and
// session state. The binary crate (main.rs) provides the console front-end.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, JsonSettingsStore, SettingsStore};
pub use models::{AppSettings, CaptureRegion, SessionState};
pub use services::{DragSelector, PreviewTransform, WordBank, WordBankError};
pub use state::{SessionChange, SessionManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
