//! Data models for Pictor.
//!
//! - [`AppSettings`]: the persisted `settings.json` blob, including [`CaptureSettings`]
//! - [`SessionState`]: the live UI session (pattern, capture flags, selection history)
//! - Geometry types shared by the capture mapper: [`WindowRect`], [`CanvasSize`],
//!   [`CanvasPoint`], [`ScreenPoint`], [`CanvasRect`], [`CaptureRegion`], [`BorderCalibration`]
//!
//! Settings structs derive `Serialize`/`Deserialize` for JSON persistence. Session
//! state is owned by [`SessionManager`](crate::state::SessionManager).

pub mod geometry;
pub mod session;
pub mod settings;

pub use geometry::{
    BorderCalibration, CanvasPoint, CanvasRect, CanvasSize, CaptureRegion, ScreenPoint, WindowRect,
};
pub use session::{SessionState, clamp_capture_rate};
pub use settings::{
    AppSettings, CaptureSettings, DEFAULT_EDITABLE_WORDLIST, MAX_CAPTURE_RATE, MIN_CAPTURE_RATE,
    WindowMatchPriority,
};
