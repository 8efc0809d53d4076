use anyhow::Result;
use rusqlite::Connection;
use tracing::warn;

use band_assess::db::Database;
use band_assess::smooth::{smooth_values, MIN_PROFILE_LEN};

/// Print a stored profile, one ring per line, with its smoothed value.
pub fn show_profile(conn: &Connection, uid: i64, smoothing_factor: f64) -> Result<()> {
    let db = Database::new(conn);
    db.ensure_schema()?;

    let profile = db
        .get_profile(uid)?
        .ok_or_else(|| anyhow::anyhow!("No assessment with uid {}", uid))?;

    println!("{:<8} {:<15} {:<15}", "Ring", "Mean", "Smoothed");
    println!("{:-<40}", "");
    for line in profile_rows(&profile, smoothing_factor)? {
        println!("{}", line);
    }

    Ok(())
}

/// Table rows for a profile. The smoothed column is `-` when the profile is
/// shorter than the smoothing windows.
fn profile_rows(profile: &[f64], smoothing_factor: f64) -> Result<Vec<String>> {
    let smoothed = if profile.len() >= MIN_PROFILE_LEN {
        Some(smooth_values(profile, smoothing_factor)?)
    } else {
        warn!(
            "Profile has {} rings, at least {} are needed to smooth it",
            profile.len(),
            MIN_PROFILE_LEN
        );
        None
    };

    Ok(profile
        .iter()
        .enumerate()
        .map(|(ring, value)| {
            let smooth = smoothed
                .as_ref()
                .map(|s| format!("{:.4}", s[ring]))
                .unwrap_or_else(|| "-".to_string());
            format!("{:<8} {:<15.4} {:<15}", ring, value, smooth)
        })
        .collect())
}
