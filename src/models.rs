use serde::{Deserialize, Serialize};

/// One stored band assessment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub uid: i64,
    pub serial_number: String,
    pub tube_voltage: f64,
    pub tube_current: i32,
    pub kernel: String,
    pub total_collimation: f64,
    pub slice_thickness: f64,
    pub instance: i32,
    pub source_file: String,
    pub center_row: i64,
    pub center_col: i64,
    pub radius: i64,
    pub abnormal: bool,
    pub created_at: i64,
    /// Raw (unsmoothed) radial profile
    pub profile: Vec<f64>,
}

/// Values for a row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewAssessment<'a> {
    pub serial_number: &'a str,
    pub tube_voltage: f64,
    pub tube_current: i32,
    pub kernel: &'a str,
    pub total_collimation: f64,
    pub slice_thickness: f64,
    pub instance: i32,
    pub source_file: &'a str,
    pub center_row: i64,
    pub center_col: i64,
    pub radius: i64,
    pub abnormal: bool,
    pub profile: &'a [f64],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(anyhow::anyhow!(
                "Invalid format: {}. Use table, json, or csv",
                s
            )),
        }
    }
}
