//! PNG output for finished assessments: the display image with the phantom ring
//! drawn on it, and a chart of the smoothed radial profile.

pub mod annotate;
pub mod chart;
pub mod text_render;

use anyhow::{Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder, Rgb, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::grid::Grid;
use crate::pipeline::BandReport;

pub use annotate::{create_annotated_image, parse_color};
pub use chart::render_profile_chart;

/// Where the two PNGs for one assessment go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub annotated: PathBuf,
    pub chart: PathBuf,
}

impl ExportPaths {
    /// `<dir>/<source stem>_<label>.png` and `..._fig.png`.
    pub fn new(output_dir: &Path, source: &Path, label: &str) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "slice".to_string());
        ExportPaths {
            annotated: output_dir.join(format!("{}_{}.png", stem, label)),
            chart: output_dir.join(format!("{}_{}_fig.png", stem, label)),
        }
    }
}

fn write_png(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            image,
            image.width(),
            image.height(),
            ColorType::Rgb8.into(),
        )
        .with_context(|| format!("Failed to write PNG image to {}", path.display()))?;
    Ok(())
}

/// Write the annotated slice and the profile chart.
pub fn export_report(
    display: &Grid,
    report: &BandReport,
    paths: &ExportPaths,
    ring_color: Rgb<u8>,
) -> Result<()> {
    let annotated = create_annotated_image(display, &report.detection.circle, ring_color)?;
    write_png(&annotated, &paths.annotated)?;
    info!("Created annotated image: {}", paths.annotated.display());

    let chart = render_profile_chart(&report.smoothed);
    write_png(&chart, &paths.chart)?;
    info!("Created profile chart: {}", paths.chart.display());

    Ok(())
}
