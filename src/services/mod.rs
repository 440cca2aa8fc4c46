//! Services - the framework-agnostic core of Pictor.
//!
//! Nothing here knows about a GUI; every operation is synchronous and runs to
//! completion on the calling thread.
//!
//! # Components
//!
//! - [`pattern`]: parsing of typed patterns (`dr_w_ng`) and the
//!   character-by-character matcher, plus the `(length, alphabetical)` result order.
//! - [`WordBank`]: discovers word-list files, merges the selected ones into a
//!   vocabulary, answers queries and persists additions/removals to the
//!   editable list.
//! - [`capture_mapper`]: the preview transform between a tracked window and
//!   the preview canvas, and the drag-selection state machine that produces a
//!   [`CaptureRegion`](crate::models::CaptureRegion).
//!
//! # Usage Example
//!
//! ```ignore
//! use pictor::config::ConfigManager;
//! use pictor::services::WordBank;
//!
//! let config = ConfigManager::new("Pictor Data")?;
//! let mut bank = WordBank::open(config.wordlists_dir(), config.settings_store())?;
//!
//! let matches = bank.query("dr_w", false);
//! bank.add_word("zephyr");
//! ```

pub mod capture_mapper;
pub mod pattern;
pub mod word_bank;

pub use capture_mapper::{
    DragSelector, DragState, MIN_SELECTION_PX, PreviewTransform, canvas_point_to_screen,
    canvas_rect_to_region, compute_transform, screen_point_to_canvas, screen_rect_to_canvas_rect,
};
pub use pattern::{Pattern, WILDCARD};
pub use word_bank::{SourceInfo, WordBank, WordBankError, WordSource, normalize_word};
