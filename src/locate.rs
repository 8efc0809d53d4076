//! Phantom center and radius detection.
//!
//! The phantom is assumed to be roughly centered in the field of view, so instead of
//! fitting a circle in 2-D this walks inward from the borders along the two symmetry
//! axes and takes the midpoint of the first edge hit on each side.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AssessmentConfig;
use crate::edges::{edge_map, EdgeMap};
use crate::grid::{Grid, PixelSpacing};

/// Detected phantom geometry in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Circle {
    pub center_row: usize,
    pub center_col: usize,
    pub radius: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DetectionQuality {
    Nominal,
    /// One or both axes fell back to the geometric center.
    Abnormal { column: bool, row: bool },
}

impl DetectionQuality {
    pub fn is_abnormal(&self) -> bool {
        matches!(self, DetectionQuality::Abnormal { .. })
    }
}

/// Distances from each border to the first edge pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeDistances {
    pub left: usize,
    pub right: usize,
    pub up: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleDetection {
    pub circle: Circle,
    pub quality: DetectionQuality,
    pub distances: EdgeDistances,
    /// Radius measured from the edge scan, before standardization
    pub measured_radius: Option<i64>,
    pub measured_diameter_mm: Option<f64>,
}

/// Result of scanning inward from one border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scan {
    distance: usize,
    found: bool,
}

/// Walk positions `1..len` and stop at the first edge pixel reported by `is_edge`.
/// An exhausted scan stops at `len - 1`.
fn scan_inward(len: usize, is_edge: impl Fn(usize) -> bool) -> Scan {
    let mut distance = 0;
    for step in 1..len {
        distance = step;
        if is_edge(step) {
            return Scan {
                distance,
                found: true,
            };
        }
    }
    Scan {
        distance,
        found: false,
    }
}

/// Locate the center along one axis. Returns the (possibly reset) center and whether
/// the axis is abnormal.
fn locate_axis(
    axis: &str,
    guess: usize,
    extent: usize,
    near: Scan,
    far: Scan,
    max_deviation: i64,
) -> (usize, bool) {
    let half = (extent / 2) as i64;
    let shift = (near.distance as i64 - far.distance as i64).div_euclid(2);
    let candidate = guess as i64 + shift;
    debug!("Center {} calculated as: {}", axis, candidate);

    if !near.found || !far.found {
        warn!(
            "No phantom edge found when calculating center {}, use image center now!",
            axis
        );
        return (half as usize, true);
    }
    if candidate > half + max_deviation || candidate < half - max_deviation {
        warn!(
            "It seems abnormal when calculating center {} ({}), use image center now!",
            axis, candidate
        );
        return (half as usize, true);
    }
    (candidate as usize, false)
}

/// Find the phantom center and standardized radius in a windowed image.
pub fn locate_circle(
    clipped: &Grid,
    spacing: PixelSpacing,
    config: &AssessmentConfig,
) -> CircleDetection {
    let cutoff = config.window.upper() / config.threshold_rate;
    let edges = edge_map(clipped, cutoff);
    debug!(
        "Edge map has {} non-zero pixels (threshold {:.2})",
        edges.count_edges(),
        cutoff
    );
    locate_in_edges(&edges, spacing, config)
}

/// Edge-map half of [`locate_circle`].
pub fn locate_in_edges(
    edges: &EdgeMap,
    spacing: PixelSpacing,
    config: &AssessmentConfig,
) -> CircleDetection {
    let (rows, cols) = (edges.rows, edges.cols);
    let guess_row = rows / 2;
    let guess_col = cols / 2;

    let left = scan_inward(cols, |c| edges.get(guess_row, c) != 0);
    let right = scan_inward(cols, |c| edges.get(guess_row, cols - c) != 0);
    let (center_col, col_abnormal) = locate_axis(
        "col",
        guess_col,
        cols,
        left,
        right,
        config.center_deviation,
    );

    let up = scan_inward(rows, |r| edges.get(r, center_col) != 0);
    let low = scan_inward(rows, |r| edges.get(rows - r, center_col) != 0);
    let (center_row, row_abnormal) = locate_axis(
        "row",
        guess_row,
        rows,
        up,
        low,
        config.center_deviation,
    );

    let distances = EdgeDistances {
        left: left.distance,
        right: right.distance,
        up: up.distance,
        low: low.distance,
    };

    if col_abnormal || row_abnormal {
        warn!(
            "Calculated center is abnormal, use {} as radius!",
            config.fallback_radius
        );
        return CircleDetection {
            circle: Circle {
                center_row,
                center_col,
                radius: config.fallback_radius,
            },
            quality: DetectionQuality::Abnormal {
                column: col_abnormal,
                row: row_abnormal,
            },
            distances,
            measured_radius: None,
            measured_diameter_mm: None,
        };
    }

    let measured = (cols as i64 - left.distance as i64 - right.distance as i64).div_euclid(2);
    let diameter = measured as f64 * spacing.row * 2.0;
    debug!(
        "{}pix (radius), {:.2}mm (diameter) <== calculated phantom size",
        measured, diameter
    );

    let radius = if diameter < config.diameter_split_mm {
        config.small_phantom_radius
    } else {
        config.large_phantom_radius
    };
    debug!(
        "Radius standardized to {}pix ({:.2}mm diameter)",
        radius,
        radius as f64 * spacing.row * 2.0
    );

    CircleDetection {
        circle: Circle {
            center_row,
            center_col,
            radius,
        },
        quality: DetectionQuality::Nominal,
        distances,
        measured_radius: Some(measured),
        measured_diameter_mm: Some(diameter),
    }
}
