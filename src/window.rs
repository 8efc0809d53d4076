/// Intensity windowing: clip calibrated values to `[center - width/2, center + width/2]`
/// and build a 0..255 display copy.
use serde::Serialize;
use tracing::{debug, warn};

use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowParameters {
    pub center: f64,
    pub width: f64,
}

impl WindowParameters {
    pub fn new(center: f64, width: f64) -> Self {
        Self { center, width }
    }

    pub fn upper(&self) -> f64 {
        self.center + self.width / 2.0
    }

    pub fn lower(&self) -> f64 {
        self.center - self.width / 2.0
    }

    /// Clamp a single value into the window.
    #[inline]
    pub fn clip(&self, value: f64) -> f64 {
        let (lower, upper) = (self.lower(), self.upper());
        if value > upper {
            upper
        } else if value < lower {
            lower
        } else {
            value
        }
    }
}

impl Default for WindowParameters {
    fn default() -> Self {
        Self {
            center: 0.0,
            width: 100.0,
        }
    }
}

/// Output of the windowing step.
#[derive(Debug, Clone)]
pub struct WindowedImage {
    /// Values constrained to the window; used for detection and sampling.
    pub clipped: Grid,
    /// Clipped values shifted to start at 0 and scaled to peak at 255.
    pub display: Grid,
    /// True when the clipped image was flat and the display scale fell back to 1.
    pub degenerate: bool,
    pub window: WindowParameters,
}

/// Clip every pixel into the window.
pub fn clip(pixels: &Grid, window: &WindowParameters) -> Grid {
    pixels.map(|v| window.clip(v))
}

/// Window an image, producing both the analysis and display copies.
pub fn apply_window(pixels: &Grid, window: &WindowParameters) -> WindowedImage {
    let clipped = clip(pixels, window);

    let min = clipped.min();
    let shifted = clipped.map(|v| v - min);
    let max = shifted.max();

    let degenerate = max <= 0.0;
    let scale = if degenerate {
        warn!("Flat intensity range after windowing, display scale defaults to 1");
        1.0
    } else {
        255.0 / max
    };
    let display = shifted.map(|v| v * scale);

    debug!(
        "Window [{:.1}, {:.1}] applied, clipped min {:.1}, display scale {:.4}",
        window.lower(),
        window.upper(),
        min,
        scale
    );

    WindowedImage {
        clipped,
        display,
        degenerate,
        window: *window,
    }
}
