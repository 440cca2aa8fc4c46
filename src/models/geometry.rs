use serde::{Deserialize, Serialize};

/// Screen-space geometry of a tracked window, as reported by the OS window
/// enumeration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowRect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Shrink the rectangle by the calibrated border widths.
    ///
    /// Width and height never go below zero; an over-calibrated window simply
    /// becomes a zero-area window.
    pub fn inset(&self, border: &BorderCalibration) -> Self {
        Self {
            left: self.left.saturating_add(border.left),
            top: self.top.saturating_add(border.top),
            width: self
                .width
                .saturating_sub(border.left)
                .saturating_sub(border.right)
                .max(0),
            height: self
                .height
                .saturating_sub(border.top)
                .saturating_sub(border.bottom)
                .max(0),
        }
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= f64::from(self.left)
            && point.y >= f64::from(self.top)
            && point.x <= f64::from(self.left) + f64::from(self.width)
            && point.y <= f64::from(self.top) + f64::from(self.height)
    }
}

/// Pixel size of the preview canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Point in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Point in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas coordinates, stored as two corners with
/// `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl CanvasRect {
    /// Build a normalized rectangle from two arbitrary corners.
    pub fn from_corners(a: CanvasPoint, b: CanvasPoint) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn top_left(&self) -> CanvasPoint {
        CanvasPoint::new(self.x0, self.y0)
    }

    pub fn bottom_right(&self) -> CanvasPoint {
        CanvasPoint::new(self.x1, self.y1)
    }
}

/// Absolute screen rectangle selected for capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CaptureRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl std::fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// User-tunable border widths subtracted from a tracked window before mapping.
///
/// Browsers and some toolkits report window geometry that includes invisible
/// resize borders or a title bar; these insets compensate for that per setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderCalibration {
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub bottom: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_applies_all_edges() {
        let rect = WindowRect::new(100, 200, 800, 600);
        let border = BorderCalibration {
            left: 8,
            top: 31,
            right: 8,
            bottom: 8,
        };

        let inset = rect.inset(&border);
        assert_eq!(inset, WindowRect::new(108, 231, 784, 561));
    }

    #[test]
    fn test_inset_never_negative() {
        let rect = WindowRect::new(0, 0, 10, 10);
        let border = BorderCalibration {
            left: 20,
            top: 0,
            right: 20,
            bottom: 50,
        };

        let inset = rect.inset(&border);
        assert_eq!(inset.width, 0);
        assert_eq!(inset.height, 0);
    }

    #[test]
    fn test_extreme_calibration_saturates() {
        let rect = WindowRect::new(i32::MAX - 5, i32::MIN + 5, 800, 600);
        let border = BorderCalibration {
            left: i32::MAX,
            top: i32::MIN,
            right: i32::MIN,
            bottom: i32::MAX,
        };

        let inset = rect.inset(&border);
        assert_eq!(inset.left, i32::MAX);
        assert_eq!(inset.top, i32::MIN);
        assert_eq!(inset.height, 0);
    }

    #[test]
    fn test_contains_near_i32_limits() {
        let rect = WindowRect::new(i32::MAX - 10, 0, 100, 100);
        assert!(rect.contains(ScreenPoint::new(f64::from(i32::MAX) + 50.0, 50.0)));
        assert!(!rect.contains(ScreenPoint::new(0.0, 50.0)));
    }

    #[test]
    fn test_canvas_rect_normalizes_corners() {
        let rect = CanvasRect::from_corners(CanvasPoint::new(50.0, 10.0), CanvasPoint::new(20.0, 40.0));
        assert_eq!(rect.x0, 20.0);
        assert_eq!(rect.y0, 10.0);
        assert_eq!(rect.width(), 30.0);
        assert_eq!(rect.height(), 30.0);
    }

    #[test]
    fn test_capture_region_display() {
        let region = CaptureRegion::new(120, 240, 300, 150);
        assert_eq!(region.to_string(), "(120, 240, 300, 150)");
    }
}
