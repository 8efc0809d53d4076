mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use rusqlite::Connection;
use std::path::PathBuf;

use band_assess::export::parse_color;
use band_assess::logging::init_logging;
use band_assess::models::OutputFormat;
use cli::{Cli, Commands};
use commands::AssessOptions;

fn open_database(path: &str) -> anyhow::Result<Connection> {
    Connection::open(path).with_context(|| format!("Failed to open database: {}", path))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Assess {
            path,
            window,
            output_dir,
            color,
            no_export,
            no_store,
            format,
        } => {
            let options = AssessOptions {
                config: window.to_config(),
                output_dir: output_dir.map(PathBuf::from),
                ring_color: parse_color(&color),
                export: !no_export,
                store: !no_store,
                format: format.parse::<OutputFormat>()?,
            };
            let conn = if no_store {
                None
            } else {
                Some(open_database(&cli.database)?)
            };
            commands::assess_path(conn.as_ref(), &path, &options)?;
        }
        Commands::List { serial, format } => {
            let conn = open_database(&cli.database)?;
            commands::list_assessments(&conn, serial, format.parse::<OutputFormat>()?)?;
        }
        Commands::ShowProfile { uid } => {
            let conn = open_database(&cli.database)?;
            let factor = band_assess::AssessmentConfig::default().smoothing_factor;
            commands::show_profile(&conn, uid, factor)?;
        }
    }

    Ok(())
}
