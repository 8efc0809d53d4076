use anyhow::{Context, Result};
use image::Rgb;
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use band_assess::config::AssessmentConfig;
use band_assess::db::Database;
use band_assess::dicom::DicomSlice;
use band_assess::export::{export_report, ExportPaths};
use band_assess::models::{NewAssessment, OutputFormat};
use band_assess::pipeline::Pipeline;
use band_assess::utils::{list_files, truncate_string};

pub struct AssessOptions {
    pub config: AssessmentConfig,
    pub output_dir: Option<PathBuf>,
    pub ring_color: Rgb<u8>,
    pub export: bool,
    pub store: bool,
    pub format: OutputFormat,
}

/// One line of the run summary.
#[derive(Debug, Serialize)]
pub struct AssessmentSummary {
    pub file: String,
    pub label: String,
    pub center_row: usize,
    pub center_col: usize,
    pub radius: usize,
    pub abnormal: bool,
    pub uid: Option<i64>,
}

/// Assess a single DICOM file or every file directly inside a directory.
/// Files that fail to load or assess are logged and skipped.
pub fn assess_path(conn: Option<&Connection>, path: &str, options: &AssessOptions) -> Result<()> {
    let path = Path::new(path);
    let files = if path.is_dir() {
        list_files(path)?
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        return Err(anyhow::anyhow!("Path not found: {}", path.display()));
    };

    if let Some(conn) = conn {
        Database::new(conn).ensure_schema()?;
    }

    info!("Assessing {} file(s) from {}", files.len(), path.display());

    let mut summaries = Vec::new();
    let mut failed = 0;
    for file in &files {
        match assess_file(conn, file, options) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                failed += 1;
                error!("Skipping {}: {:#}", file.display(), e);
            }
        }
    }

    match options.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Csv => output_csv(&summaries),
        OutputFormat::Table => output_table(&summaries, failed),
    }

    Ok(())
}

fn assess_file(
    conn: Option<&Connection>,
    file: &Path,
    options: &AssessOptions,
) -> Result<AssessmentSummary> {
    let slice = DicomSlice::from_file(file)?;
    let label = slice.info.label();
    debug!("Scan mode: {}", label);

    let (report, windowed) = Pipeline::new(&slice.image, options.config.clone())
        .finish()
        .with_context(|| format!("Assessment failed for {}", file.display()))?;

    if report.is_abnormal() {
        warn!(
            "{}: phantom edge not found cleanly ({:?}), using fallback circle",
            file.display(),
            report.detection.quality
        );
    }

    if options.export {
        let output_dir = match &options.output_dir {
            Some(dir) => dir.clone(),
            None => file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;
        let paths = ExportPaths::new(&output_dir, file, &label);
        export_report(&windowed.display, &report, &paths, options.ring_color)?;
    }

    let circle = report.detection.circle;
    let source_file = file.to_string_lossy().to_string();

    let uid = match conn {
        Some(conn) if options.store => {
            let db = Database::new(conn);
            let uid = db.insert_assessment(&NewAssessment {
                serial_number: &slice.info.serial_number,
                tube_voltage: slice.info.kvp,
                tube_current: slice.info.tube_current,
                kernel: &slice.info.kernel,
                total_collimation: slice.info.total_collimation,
                slice_thickness: slice.info.slice_thickness,
                instance: slice.info.instance,
                source_file: &source_file,
                center_row: circle.center_row as i64,
                center_col: circle.center_col as i64,
                radius: circle.radius as i64,
                abnormal: report.is_abnormal(),
                profile: &report.profile,
            })?;
            Some(uid)
        }
        _ => None,
    };

    Ok(AssessmentSummary {
        file: source_file,
        label,
        center_row: circle.center_row,
        center_col: circle.center_col,
        radius: circle.radius,
        abnormal: report.is_abnormal(),
        uid,
    })
}

fn output_table(summaries: &[AssessmentSummary], failed: usize) {
    println!(
        "{:<40} {:<40} {:<10} {:<10} {:<8} {:<10} {:<8}",
        "File", "Scan Mode", "Row", "Col", "Radius", "Status", "UID"
    );
    println!("{:-<130}", "");

    for summary in summaries {
        println!(
            "{:<40} {:<40} {:<10} {:<10} {:<8} {:<10} {:<8}",
            truncate_string(&summary.file, 40),
            truncate_string(&summary.label, 40),
            summary.center_row,
            summary.center_col,
            summary.radius,
            if summary.abnormal { "Abnormal" } else { "OK" },
            summary
                .uid
                .map(|uid| uid.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }

    println!(
        "\nTotal: {} assessed, {} skipped",
        summaries.len(),
        failed
    );
}

fn output_csv(summaries: &[AssessmentSummary]) {
    println!("file,label,center_row,center_col,radius,abnormal,uid");
    for summary in summaries {
        println!(
            "{},{},{},{},{},{},{}",
            summary.file,
            summary.label,
            summary.center_row,
            summary.center_col,
            summary.radius,
            summary.abnormal,
            summary.uid.map(|uid| uid.to_string()).unwrap_or_default()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AssessOptions {
        AssessOptions {
            config: AssessmentConfig::default(),
            output_dir: None,
            ring_color: Rgb([255, 0, 0]),
            export: false,
            store: false,
            format: OutputFormat::Table,
        }
    }

    #[test]
    fn test_missing_path_is_error() {
        assert!(assess_path(None, "/nonexistent/band-assess/scan.dcm", &options()).is_err());
    }

    #[test]
    fn test_directory_of_non_dicom_files_is_skipped() {
        let dir = std::env::temp_dir().join(format!("band-assess-cmd-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("notes.txt"), b"not a dicom file").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        assess_path(Some(&conn), dir.to_str().unwrap(), &options()).unwrap();

        let stored = Database::new(&conn).get_assessments(None).unwrap();
        assert!(stored.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
