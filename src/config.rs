use serde::Serialize;

use crate::window::WindowParameters;

/// Tunables for a single assessment run. Defaults describe the two standard
/// uniformity phantoms (20 cm and 30 cm) on a 512 x 512 reconstruction.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentConfig {
    pub window: WindowParameters,
    /// Pixels below `window.upper() / threshold_rate` are dropped before edge detection
    pub threshold_rate: f64,
    /// Maximum distance in pixels between the detected and geometric center
    pub center_deviation: i64,
    /// Measured diameters below this many millimetres are treated as the small phantom
    pub diameter_split_mm: f64,
    pub small_phantom_radius: usize,
    pub large_phantom_radius: usize,
    /// Radius used when the center could not be located
    pub fallback_radius: usize,
    pub smoothing_factor: f64,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            window: WindowParameters::default(),
            threshold_rate: 1.2,
            center_deviation: 20,
            diameter_split_mm: 250.0,
            small_phantom_radius: 233,
            large_phantom_radius: 220,
            fallback_radius: 50,
            smoothing_factor: 3.0,
        }
    }
}

impl AssessmentConfig {
    pub fn with_window(window: WindowParameters) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }
}
