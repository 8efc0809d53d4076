use anyhow::Result;
use rusqlite::Connection;

use band_assess::db::Database;
use band_assess::models::{AssessmentRecord, OutputFormat};
use band_assess::utils::{format_timestamp, truncate_string};

pub fn list_assessments(
    conn: &Connection,
    serial_filter: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let db = Database::new(conn);
    db.ensure_schema()?;
    let records = db.get_assessments(serial_filter.as_deref())?;

    match format {
        OutputFormat::Json => output_json(&records)?,
        OutputFormat::Csv => output_csv(&records),
        OutputFormat::Table => output_table(&records),
    }

    Ok(())
}

fn output_table(records: &[AssessmentRecord]) {
    println!(
        "{:<8} {:<15} {:<8} {:<8} {:<10} {:<10} {:<8} {:<10} {:<10} {:<16}",
        "UID", "Serial", "kV", "mA", "Kernel", "Collim.", "Slice", "Instance", "Status", "Date"
    );
    println!("{:-<110}", "");

    for record in records {
        println!(
            "{:<8} {:<15} {:<8} {:<8} {:<10} {:<10} {:<8} {:<10} {:<10} {:<16}",
            record.uid,
            truncate_string(&record.serial_number, 15),
            record.tube_voltage,
            record.tube_current,
            truncate_string(&record.kernel, 10),
            record.total_collimation,
            record.slice_thickness,
            record.instance,
            if record.abnormal { "Abnormal" } else { "OK" },
            format_timestamp(record.created_at)
        );
    }

    println!("\nTotal: {} assessments", records.len());
}

fn output_json(records: &[AssessmentRecord]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

fn output_csv(records: &[AssessmentRecord]) {
    println!("uid,serial_number,tube_voltage,tube_current,kernel,total_collimation,slice_thickness,instance,source_file,center_row,center_col,radius,abnormal,created_at");

    for record in records {
        println!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            record.uid,
            record.serial_number,
            record.tube_voltage,
            record.tube_current,
            record.kernel,
            record.total_collimation,
            record.slice_thickness,
            record.instance,
            record.source_file,
            record.center_row,
            record.center_col,
            record.radius,
            record.abnormal,
            record.created_at
        );
    }
}
