pub mod config;
pub mod db;
pub mod dicom;
pub mod edges;
pub mod error;
pub mod export;
pub mod grid;
pub mod locate;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod rings;
pub mod smooth;
pub mod utils;
pub mod window;

#[cfg(test)]
mod test_phantom;

// Re-export commonly used items
pub use config::AssessmentConfig;
pub use error::AssessmentError;
pub use grid::{Grid, Image, PixelSpacing};
pub use locate::{Circle, CircleDetection, DetectionQuality};
pub use pipeline::{assess, BandReport, Pipeline, PipelineState};
pub use window::WindowParameters;
