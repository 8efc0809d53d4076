use clap::{Parser, Subcommand};

use band_assess::config::AssessmentConfig;
use band_assess::db::DEFAULT_DATABASE;
use band_assess::window::WindowParameters;

#[derive(Parser)]
#[command(name = "band-assess")]
#[command(about = "Assess CT image uniformity (banding) from phantom scans", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Show debug output on the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write a debug log to this file
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assess a DICOM file, or every file in a directory
    Assess {
        /// DICOM file or directory of DICOM files
        path: String,

        #[command(flatten)]
        window: WindowOptions,

        /// Directory for the annotated image and profile chart (default: next to the input)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Ring color for the annotated image
        #[arg(long, default_value = "red")]
        color: String,

        /// Skip writing PNG files
        #[arg(long)]
        no_export: bool,

        /// Skip storing results in the database
        #[arg(long)]
        no_store: bool,

        /// Output format (table, json, csv)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// List stored assessments
    List {
        /// Filter by scanner serial number
        #[arg(short, long)]
        serial: Option<String>,

        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Print the stored radial profile of one assessment
    ShowProfile {
        /// Assessment uid
        uid: i64,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct WindowOptions {
    /// Window center in calibrated units (HU)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub center: f64,

    /// Window width in calibrated units (HU)
    #[arg(long, default_value = "100")]
    pub width: f64,
}

impl WindowOptions {
    pub fn to_config(&self) -> AssessmentConfig {
        AssessmentConfig::with_window(WindowParameters::new(self.center, self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_defaults() {
        let cli = Cli::try_parse_from(["band-assess", "assess", "scan.dcm"]).unwrap();
        assert_eq!(cli.database, DEFAULT_DATABASE);
        match cli.command {
            Commands::Assess {
                path,
                window,
                no_export,
                no_store,
                ..
            } => {
                assert_eq!(path, "scan.dcm");
                assert_eq!(window.center, 0.0);
                assert_eq!(window.width, 100.0);
                assert!(!no_export);
                assert!(!no_store);
            }
            _ => panic!("expected assess"),
        }
    }

    #[test]
    fn test_window_options_to_config() {
        let cli = Cli::try_parse_from([
            "band-assess",
            "assess",
            "--center",
            "-20",
            "--width",
            "400",
            "dir/",
        ])
        .unwrap();
        let Commands::Assess { window, .. } = cli.command else {
            panic!("expected assess");
        };
        let config = window.to_config();
        assert_eq!(config.window.upper(), 180.0);
        assert_eq!(config.window.lower(), -220.0);
        assert_eq!(config.fallback_radius, 50);
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["band-assess", "list", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
