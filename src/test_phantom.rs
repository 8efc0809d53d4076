// Synthetic uniformity phantom tests for the full assessment pipeline.
//
// The phantom is a water disk (0 HU) inside a thin dense shell (100 HU) on an
// air background (-1000 HU), with a little uniform noise that never crosses the
// edge threshold. With the default 0/100 window the shell is the only structure
// left after thresholding, so the edge scan lands on its outer boundary.

use crate::config::AssessmentConfig;
use crate::grid::{Image, PixelSpacing};
use crate::locate::DetectionQuality;
use crate::pipeline::{assess, Pipeline, PipelineState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZE: usize = 512;
const SHELL: f64 = 3.0;

struct SyntheticPhantom {
    pub data: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl SyntheticPhantom {
    fn new(rows: usize, cols: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let data = (0..rows * cols)
            .map(|_| -1000.0 + rng.gen_range(-5.0..5.0))
            .collect();
        SyntheticPhantom { data, rows, cols }
    }

    /// Water disk with a dense outer shell centered at (`row`, `col`).
    fn add_phantom(&mut self, row: f64, col: f64, radius: f64, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for r in 0..self.rows {
            for c in 0..self.cols {
                let dr = r as f64 - row;
                let dc = c as f64 - col;
                let dist = (dr * dr + dc * dc).sqrt();
                if dist <= radius {
                    let base = if dist > radius - SHELL { 100.0 } else { 0.0 };
                    self.data[r * self.cols + c] = base + rng.gen_range(-5.0..5.0);
                }
            }
        }
    }

    fn into_image(self, spacing: f64) -> Image {
        Image::new(
            self.rows,
            self.cols,
            self.data,
            PixelSpacing {
                row: spacing,
                col: spacing,
            },
        )
        .unwrap()
    }
}

#[test]
fn test_small_phantom_found_off_center() {
    let mut phantom = SyntheticPhantom::new(SIZE, SIZE, 1);
    phantom.add_phantom(260.0, 250.0, 200.0, 2);
    let image = phantom.into_image(0.5);

    let report = assess(&image, &AssessmentConfig::default()).unwrap();
    let circle = report.detection.circle;

    assert_eq!(report.detection.quality, DetectionQuality::Nominal);
    assert!((circle.center_row as i64 - 260).abs() <= 1);
    assert!((circle.center_col as i64 - 250).abs() <= 1);
    // 199 px chord radius * 0.5 mm * 2 is well under 250 mm
    assert_eq!(circle.radius, 233);
    assert_eq!(report.profile.len(), 233);
    assert_eq!(report.smoothed.len(), 233);
    assert_eq!(report.profile[0], 0.0);
    assert!(report.profile.iter().all(|v| v.is_finite()));
}

#[test]
fn test_large_phantom_standardizes_to_220() {
    let mut phantom = SyntheticPhantom::new(SIZE, SIZE, 3);
    phantom.add_phantom(256.0, 256.0, 230.0, 4);
    let image = phantom.into_image(0.7);

    let report = assess(&image, &AssessmentConfig::default()).unwrap();
    assert_eq!(report.detection.quality, DetectionQuality::Nominal);
    assert_eq!(report.detection.circle.center_row, 256);
    assert_eq!(report.detection.circle.center_col, 256);
    assert!(report.detection.measured_diameter_mm.unwrap() >= 250.0);
    assert_eq!(report.detection.circle.radius, 220);
}

#[test]
fn test_shell_shows_as_profile_peak() {
    let mut phantom = SyntheticPhantom::new(SIZE, SIZE, 5);
    phantom.add_phantom(256.0, 256.0, 200.0, 6);
    let image = phantom.into_image(0.5);

    let report = assess(&image, &AssessmentConfig::default()).unwrap();
    let (peak, _) = report
        .profile
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        });
    assert!((195..=202).contains(&peak), "peak at ring {}", peak);

    // water inside reads near zero, air outside clips to the lower bound
    assert!(report.profile[100].abs() < 5.0);
    assert!(report.profile[220] < -40.0);
}

#[test]
fn test_off_center_phantom_flags_abnormal() {
    let mut phantom = SyntheticPhantom::new(SIZE, SIZE, 7);
    phantom.add_phantom(256.0, 300.0, 150.0, 8);
    let image = phantom.into_image(0.5);

    let pipeline = Pipeline::new(&image, AssessmentConfig::default()).run();
    assert_eq!(pipeline.state(), &PipelineState::Ready);

    let report = pipeline.report().unwrap();
    assert_eq!(
        report.detection.quality,
        DetectionQuality::Abnormal {
            column: true,
            row: false
        }
    );
    assert_eq!(report.detection.circle.center_col, 256);
    assert_eq!(report.detection.circle.radius, 50);
    assert_eq!(report.profile.len(), 50);
}

#[test]
fn test_source_image_untouched_by_run() {
    let mut phantom = SyntheticPhantom::new(128, 128, 9);
    phantom.add_phantom(64.0, 64.0, 40.0, 10);
    let image = phantom.into_image(1.0);
    let before = image.pixels.clone();

    let _ = Pipeline::new(&image, AssessmentConfig::default()).run();
    assert_eq!(image.pixels, before);
}

#[test]
fn test_nan_pixel_rejected_before_assessment() {
    let mut phantom = SyntheticPhantom::new(128, 128, 11);
    phantom.data[64 * 128 + 74] = f64::NAN;
    let err = Image::new(128, 128, phantom.data, PixelSpacing::default()).unwrap_err();
    assert_eq!(
        err,
        crate::error::AssessmentError::NonFiniteSample { row: 64, col: 74 }
    );
}
