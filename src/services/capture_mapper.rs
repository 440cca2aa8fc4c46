//! Mapping between a tracked window's screen rectangle and its scaled preview.
//!
//! The preview canvas shows the tracked window shrunk uniformly to fit inside
//! the canvas minus a margin, centered. A [`PreviewTransform`] captures that
//! scale and offset; it is recomputed whenever the canvas resizes or the
//! tracked window moves, and never persisted.
//!
//! [`DragSelector`] turns press/drag/release events on the canvas into an
//! absolute [`CaptureRegion`]. Events arriving out of order are ignored. The
//! session's `selection_mode` flag is the source of truth for whether the
//! selector is enabled: seed it with [`DragSelector::sync_with`] and feed it
//! every [`SessionChange`] through [`DragSelector::apply_session_change`].

use crate::models::{CanvasPoint, CanvasRect, CanvasSize, CaptureRegion, ScreenPoint, WindowRect};
use crate::state::{SessionChange, SessionManager};

/// Smallest selection, in canvas pixels, that counts as a deliberate drag.
pub const MIN_SELECTION_PX: f64 = 5.0;

/// Scale and offset of a window depicted on the preview canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    /// Uniform shrink factor; `0.0` means nothing is drawable.
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Screen-space top-left of the tracked window.
    pub source_origin: ScreenPoint,
    pub scaled_width: f64,
    pub scaled_height: f64,
}

impl PreviewTransform {
    pub fn is_degenerate(&self) -> bool {
        self.scale <= 0.0
    }

    /// The scaled window rectangle on the canvas.
    pub fn drawable_bounds(&self) -> CanvasRect {
        CanvasRect {
            x0: self.offset_x,
            y0: self.offset_y,
            x1: self.offset_x + self.scaled_width,
            y1: self.offset_y + self.scaled_height,
        }
    }

    /// Whether `point` lies on the drawable rectangle, edges included.
    pub fn contains(&self, point: CanvasPoint) -> bool {
        let b = self.drawable_bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    /// Pull `point` onto the drawable rectangle.
    pub fn clamp(&self, point: CanvasPoint) -> CanvasPoint {
        let b = self.drawable_bounds();
        CanvasPoint::new(point.x.clamp(b.x0, b.x1), point.y.clamp(b.y0, b.y1))
    }
}

/// Fit `window` into `canvas`, leaving `margin` pixels on every side.
///
/// A zero-area window or a canvas smaller than twice the margin yields scale 0.
pub fn compute_transform(window: &WindowRect, canvas: CanvasSize, margin: f64) -> PreviewTransform {
    let ww = f64::from(window.width);
    let wh = f64::from(window.height);

    let scale = if ww > 0.0 && wh > 0.0 {
        let sx = (canvas.width - 2.0 * margin) / ww;
        let sy = (canvas.height - 2.0 * margin) / wh;
        let s = sx.min(sy);
        if s.is_finite() { s.max(0.0) } else { 0.0 }
    } else {
        0.0
    };

    let scaled_width = ww.max(0.0) * scale;
    let scaled_height = wh.max(0.0) * scale;

    PreviewTransform {
        scale,
        offset_x: (canvas.width - scaled_width) / 2.0,
        offset_y: (canvas.height - scaled_height) / 2.0,
        source_origin: ScreenPoint::new(f64::from(window.left), f64::from(window.top)),
        scaled_width,
        scaled_height,
    }
}

/// Canvas point to absolute screen point. `None` when the transform is degenerate.
pub fn canvas_point_to_screen(point: CanvasPoint, transform: &PreviewTransform) -> Option<ScreenPoint> {
    if transform.is_degenerate() {
        return None;
    }
    Some(ScreenPoint::new(
        transform.source_origin.x + (point.x - transform.offset_x) / transform.scale,
        transform.source_origin.y + (point.y - transform.offset_y) / transform.scale,
    ))
}

/// Absolute screen point to canvas point (unclamped).
pub fn screen_point_to_canvas(point: ScreenPoint, transform: &PreviewTransform) -> CanvasPoint {
    CanvasPoint::new(
        transform.offset_x + (point.x - transform.source_origin.x) * transform.scale,
        transform.offset_y + (point.y - transform.source_origin.y) * transform.scale,
    )
}

/// Screen rectangle to canvas rectangle, clamped to the drawable bounds on all edges.
pub fn screen_rect_to_canvas_rect(rect: &CaptureRegion, transform: &PreviewTransform) -> CanvasRect {
    let top_left = screen_point_to_canvas(
        ScreenPoint::new(f64::from(rect.x), f64::from(rect.y)),
        transform,
    );
    let bottom_right = screen_point_to_canvas(
        ScreenPoint::new(
            f64::from(rect.x) + f64::from(rect.width),
            f64::from(rect.y) + f64::from(rect.height),
        ),
        transform,
    );
    CanvasRect::from_corners(transform.clamp(top_left), transform.clamp(bottom_right))
}

/// Canvas rectangle to an absolute capture region.
///
/// Coordinates are floored to whole screen pixels. `None` when the transform
/// is degenerate.
pub fn canvas_rect_to_region(rect: &CanvasRect, transform: &PreviewTransform) -> Option<CaptureRegion> {
    let origin = canvas_point_to_screen(rect.top_left(), transform)?;
    Some(CaptureRegion::new(
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        (rect.width() / transform.scale).floor() as i32,
        (rect.height() / transform.scale).floor() as i32,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { anchor: CanvasPoint },
}

/// Press → drag → release state machine for selecting a capture region.
#[derive(Debug, Clone)]
pub struct DragSelector {
    state: DragState,
    enabled: bool,
    min_size: f64,
}

impl Default for DragSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DragSelector {
    /// A disabled selector with the default minimum size.
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            enabled: false,
            min_size: MIN_SELECTION_PX,
        }
    }

    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle selection mode. Turning it off abandons any drag in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && matches!(self.state, DragState::Dragging { .. }) {
            tracing::debug!("Selection mode disabled mid-drag, discarding selection");
        }
        self.enabled = enabled;
        if !enabled {
            self.state = DragState::Idle;
        }
    }

    /// Take the enabled flag from the session's current selection mode.
    pub fn sync_with(&mut self, session: &SessionManager) {
        self.set_enabled(session.read(|s| s.selection_mode));
    }

    /// Follow a session event. Leaving selection mode (including when
    /// monitoring starts) cancels any drag in progress.
    pub fn apply_session_change(&mut self, change: &SessionChange) {
        if let SessionChange::SelectionModeChanged { enabled } = change {
            self.set_enabled(*enabled);
        }
    }

    /// Abandon a drag in progress without emitting anything.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Start a drag. Returns whether the press was accepted.
    pub fn press(&mut self, point: CanvasPoint, transform: &PreviewTransform) -> bool {
        if !self.enabled || !transform.contains(point) {
            return false;
        }
        self.state = DragState::Dragging {
            anchor: transform.clamp(point),
        };
        true
    }

    /// Transient rectangle between the anchor and the clamped pointer.
    pub fn drag(&self, point: CanvasPoint, transform: &PreviewTransform) -> Option<CanvasRect> {
        match self.state {
            DragState::Dragging { anchor } if self.enabled => {
                Some(CanvasRect::from_corners(anchor, transform.clamp(point)))
            }
            _ => None,
        }
    }

    /// Finish the drag and map it to screen space.
    ///
    /// Selections narrower or shorter than the minimum size are treated as
    /// accidental clicks and produce nothing.
    pub fn release(&mut self, point: CanvasPoint, transform: &PreviewTransform) -> Option<CaptureRegion> {
        let DragState::Dragging { anchor } = self.state else {
            return None;
        };
        self.state = DragState::Idle;
        if !self.enabled {
            return None;
        }

        let rect = CanvasRect::from_corners(anchor, transform.clamp(point));
        if rect.width() < self.min_size || rect.height() < self.min_size {
            tracing::debug!(
                "Ignoring {:.1}x{:.1} selection below {}px",
                rect.width(),
                rect.height(),
                self.min_size
            );
            return None;
        }

        let region = canvas_rect_to_region(&rect, transform)?;
        tracing::info!("Capture region selected: {}", region);
        Some(region)
    }
}
