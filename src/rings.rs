//! Concentric ring sampling.
//!
//! Each ring is traced with the midpoint (Bresenham) circle algorithm and its
//! intensity sum is normalized by the analytic circumference `2πr`, not by the
//! number of emitted points. Rings of different radius stay comparable while the
//! values remain a density rather than a true mean.

use std::f64::consts::PI;

use tracing::debug;

use crate::error::AssessmentError;
use crate::grid::Grid;
use crate::locate::Circle;

/// Offsets `(d_row, d_col)` of a discrete circle, eight symmetric points per step.
///
/// Points on the axes and diagonals are emitted more than once; callers that sum
/// over the iterator count them every time.
#[derive(Debug, Clone)]
pub struct MidpointCircle {
    x: i64,
    y: i64,
    d: i64,
    octant: usize,
}

impl MidpointCircle {
    pub fn new(radius: usize) -> Self {
        let r = radius as i64;
        Self {
            x: 0,
            y: r,
            d: 3 - 2 * r,
            octant: 0,
        }
    }
}

impl Iterator for MidpointCircle {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.y {
            return None;
        }
        let (x, y) = (self.x, self.y);
        let offset = match self.octant {
            0 => (-y, x),
            1 => (y, x),
            2 => (-y, -x),
            3 => (y, -x),
            4 => (-x, y),
            5 => (-x, -y),
            6 => (x, y),
            _ => (x, -y),
        };

        self.octant += 1;
        if self.octant == 8 {
            self.octant = 0;
            if self.d < 0 {
                self.d += 4 * self.x + 6;
            } else {
                self.d += 4 * (self.x - self.y) + 10;
                self.y -= 1;
            }
            self.x += 1;
        }

        Some(offset)
    }
}

/// Per-ring average intensity, indexed by radius. Index 0 is always 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialProfile(pub Vec<f64>);

impl RadialProfile {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sum the pixels on one ring.
pub fn ring_sum(image: &Grid, circle: &Circle, ring: usize) -> Result<f64, AssessmentError> {
    let (cr, cc) = (circle.center_row as i64, circle.center_col as i64);
    let mut sum = 0.0;
    for (dr, dc) in MidpointCircle::new(ring) {
        let (row, col) = (cr + dr, cc + dc);
        sum += image
            .try_get(row, col)
            .ok_or(AssessmentError::OutOfBoundsSample { ring, row, col })?;
    }
    Ok(sum)
}

/// Build the radial profile for rings `1..circle.radius`.
pub fn integrate_rings(image: &Grid, circle: &Circle) -> Result<RadialProfile, AssessmentError> {
    let mut profile = vec![0.0; circle.radius];
    for (ring, slot) in profile.iter_mut().enumerate().skip(1) {
        *slot = ring_sum(image, circle, ring)? / (ring as f64 * 2.0 * PI);
    }
    debug!(
        "Circular integration done over {} rings around ({}, {})",
        circle.radius.saturating_sub(1),
        circle.center_row,
        circle.center_col
    );
    Ok(RadialProfile(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_one_emits_one_step() {
        let points: Vec<_> = MidpointCircle::new(1).collect();
        assert_eq!(
            points,
            vec![(-1, 0), (1, 0), (-1, 0), (1, 0), (0, 1), (0, -1), (0, 1), (0, -1)]
        );
    }

    #[test]
    fn test_radius_zero_is_empty() {
        assert_eq!(MidpointCircle::new(0).count(), 0);
    }

    #[test]
    fn test_points_stay_near_radius() {
        for radius in [5usize, 17, 64, 233] {
            for (dr, dc) in MidpointCircle::new(radius) {
                let dist = ((dr * dr + dc * dc) as f64).sqrt();
                assert!(
                    (dist - radius as f64).abs() < 1.0,
                    "radius {} produced point at distance {}",
                    radius,
                    dist
                );
            }
        }
    }

    #[test]
    fn test_point_count_is_multiple_of_eight() {
        assert_eq!(MidpointCircle::new(2).count(), 16);
        for radius in 1..50 {
            assert_eq!(MidpointCircle::new(radius).count() % 8, 0);
        }
    }

    #[test]
    fn test_uniform_image_normalizes_by_circumference() {
        let k = 37.5;
        let image = Grid::filled(101, 101, k).unwrap();
        let circle = Circle {
            center_row: 50,
            center_col: 50,
            radius: 50,
        };
        let profile = integrate_rings(&image, &circle).unwrap();

        assert_eq!(profile.len(), 50);
        assert_eq!(profile.values()[0], 0.0);
        for r in 1..50 {
            let points = MidpointCircle::new(r).count() as f64;
            let expected = k * points / (r as f64 * 2.0 * PI);
            assert!((profile.values()[r] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_large_rings_approach_ninety_percent() {
        let k = 10.0;
        let image = Grid::filled(301, 301, k).unwrap();
        let circle = Circle {
            center_row: 150,
            center_col: 150,
            radius: 150,
        };
        let profile = integrate_rings(&image, &circle).unwrap();
        for r in 100..150 {
            let ratio = profile.values()[r] / k;
            assert!(ratio > 0.85 && ratio < 0.95, "ring {} ratio {}", r, ratio);
        }
    }

    #[test]
    fn test_out_of_bounds_ring_is_fatal() {
        let image = Grid::filled(100, 100, 1.0).unwrap();
        let circle = Circle {
            center_row: 50,
            center_col: 50,
            radius: 60,
        };
        let err = integrate_rings(&image, &circle).unwrap_err();
        match err {
            AssessmentError::OutOfBoundsSample { ring, .. } => assert_eq!(ring, 50),
            other => panic!("unexpected error: {other}"),
        }
    }
}
