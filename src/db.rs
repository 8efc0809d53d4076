use crate::models::{AssessmentRecord, NewAssessment};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

/// Default database file, created next to where the tool runs
pub const DEFAULT_DATABASE: &str = "BandAssessment.sqlite3.db";

/// Join profile values with `;`. Rust's float formatting is the shortest string
/// that parses back to the same value, so decoding is exact.
pub fn encode_profile(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

pub fn decode_profile(encoded: &str) -> Result<Vec<f64>> {
    if encoded.is_empty() {
        return Ok(vec![]);
    }
    encoded
        .split(';')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid profile value: {:?}", s))
        })
        .collect()
}

/// Database access layer for band assessment results
pub struct Database<'a> {
    conn: &'a Connection,
}

impl<'a> Database<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Database { conn }
    }

    /// Create the results table if it does not exist yet.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS BandAssessment (
                uid INTEGER PRIMARY KEY AUTOINCREMENT,
                serial_number TEXT,
                tube_voltage REAL,
                tube_current INTEGER,
                kernel TEXT,
                total_collimation REAL,
                slice_thickness REAL,
                instance INTEGER,
                integration_result TEXT,
                source_file TEXT,
                center_row INTEGER,
                center_col INTEGER,
                radius INTEGER,
                abnormal INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER
            );",
        )?;
        debug!("BandAssessment table ready");
        Ok(())
    }

    pub fn insert_assessment(&self, record: &NewAssessment) -> Result<i64> {
        let created_at = chrono::Utc::now().timestamp();
        self.conn
            .execute(
                "INSERT INTO BandAssessment (
                    serial_number, tube_voltage, tube_current, kernel,
                    total_collimation, slice_thickness, instance, integration_result,
                    source_file, center_row, center_col, radius, abnormal, created_at
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    record.serial_number,
                    record.tube_voltage,
                    record.tube_current,
                    record.kernel,
                    record.total_collimation,
                    record.slice_thickness,
                    record.instance,
                    encode_profile(record.profile),
                    record.source_file,
                    record.center_row,
                    record.center_col,
                    record.radius,
                    record.abnormal,
                    created_at,
                ],
            )
            .context("Failed to insert assessment")?;

        let uid = self.conn.last_insert_rowid();
        info!("Insert record done (uid {})", uid);
        Ok(uid)
    }

    pub fn get_assessments(&self, serial_filter: Option<&str>) -> Result<Vec<AssessmentRecord>> {
        let mut query = String::from(
            "SELECT uid, serial_number, tube_voltage, tube_current, kernel,
                    total_collimation, slice_thickness, instance, integration_result,
                    source_file, center_row, center_col, radius, abnormal, created_at
             FROM BandAssessment
             WHERE 1=1",
        );

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(serial) = serial_filter {
            query.push_str(" AND serial_number LIKE ?");
            params.push(Box::new(format!("%{}%", serial)));
        }

        query.push_str(" ORDER BY uid");

        let mut stmt = self.conn.prepare(&query)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok((
                    AssessmentRecord {
                        uid: row.get(0)?,
                        serial_number: row.get(1)?,
                        tube_voltage: row.get(2)?,
                        tube_current: row.get(3)?,
                        kernel: row.get(4)?,
                        total_collimation: row.get(5)?,
                        slice_thickness: row.get(6)?,
                        instance: row.get(7)?,
                        source_file: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
                        center_row: row.get::<_, Option<i64>>(10)?.unwrap_or_default(),
                        center_col: row.get::<_, Option<i64>>(11)?.unwrap_or_default(),
                        radius: row.get::<_, Option<i64>>(12)?.unwrap_or_default(),
                        abnormal: row.get(13)?,
                        created_at: row.get::<_, Option<i64>>(14)?.unwrap_or_default(),
                        profile: Vec::new(),
                    },
                    row.get::<_, String>(8)?, // integration_result
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(mut record, encoded)| {
                record.profile = decode_profile(&encoded)
                    .with_context(|| format!("Corrupt profile for uid {}", record.uid))?;
                Ok(record)
            })
            .collect()
    }

    /// Stored raw profile for one assessment, `None` if the uid does not exist.
    pub fn get_profile(&self, uid: i64) -> Result<Option<Vec<f64>>> {
        let encoded: Option<String> = self
            .conn
            .query_row(
                "SELECT integration_result FROM BandAssessment WHERE uid = ?",
                [uid],
                |row| row.get(0),
            )
            .optional()?;

        encoded.map(|s| decode_profile(&s)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_row<'a>(serial: &'a str, profile: &'a [f64]) -> NewAssessment<'a> {
        NewAssessment {
            serial_number: serial,
            tube_voltage: 120.0,
            tube_current: 200,
            kernel: "B30f",
            total_collimation: 38.4,
            slice_thickness: 5.0,
            instance: 1,
            source_file: "IM0001.dcm",
            center_row: 256,
            center_col: 257,
            radius: 233,
            abnormal: false,
            profile,
        }
    }

    #[test]
    fn test_profile_codec_is_exact() {
        let values = vec![0.0, 0.1, -49.99999999, 1.0 / 3.0, 12345.678];
        let encoded = encode_profile(&values);
        assert!(encoded.starts_with("0;0.1;"));
        assert_eq!(decode_profile(&encoded).unwrap(), values);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_profile("1.0;abc;2").is_err());
        assert_eq!(decode_profile("").unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let db = Database::new(&conn);
        db.ensure_schema().unwrap();
        db.ensure_schema().unwrap();
    }

    #[test]
    fn test_insert_and_read_back() {
        let conn = Connection::open_in_memory().unwrap();
        let db = Database::new(&conn);
        db.ensure_schema().unwrap();

        let profile = vec![0.0, 4.5, 4.75, 5.125];
        let first = db.insert_assessment(&new_row("70112", &profile)).unwrap();
        let second = db.insert_assessment(&new_row("80220", &profile[..2])).unwrap();
        assert!(second > first);

        let all = db.get_assessments(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].serial_number, "70112");
        assert_eq!(all[0].profile, profile);
        assert_eq!(all[0].center_col, 257);
        assert!(!all[0].abnormal);

        let filtered = db.get_assessments(Some("802")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].profile, vec![0.0, 4.5]);
    }

    #[test]
    fn test_get_profile() {
        let conn = Connection::open_in_memory().unwrap();
        let db = Database::new(&conn);
        db.ensure_schema().unwrap();

        let profile = vec![0.0, 2.0, 3.0];
        let uid = db.insert_assessment(&new_row("70112", &profile)).unwrap();
        assert_eq!(db.get_profile(uid).unwrap(), Some(profile));
        assert_eq!(db.get_profile(uid + 100).unwrap(), None);
    }
}
