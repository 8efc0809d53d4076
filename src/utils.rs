use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Shorten `s` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Regular files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Format a unix timestamp for table output.
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "No date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 10), "");
    }

    #[test]
    fn test_truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("1234567890", 5), "12...");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        let path = format!("/data/{}/IM0001.dcm", "Ü".repeat(40));
        let truncated = truncate_string(&path, 40);
        assert_eq!(truncated.chars().count(), 40);
        assert!(truncated.starts_with("/data/ÜÜ"));
        assert!(truncated.ends_with("Ü..."));

        // short enough in characters even though longer in bytes
        assert_eq!(truncate_string("Körper", 6), "Körper");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1693526400), "2023-09-01 00:00");
    }

    #[test]
    fn test_list_files_sorted_and_skips_dirs() {
        let dir = std::env::temp_dir().join(format!("band-assess-list-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("IM0002"), b"").unwrap();
        std::fs::write(dir.join("IM0001"), b"").unwrap();

        let files = list_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["IM0001", "IM0002"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_list_files_missing_dir() {
        assert!(list_files(Path::new("/nonexistent/band-assess")).is_err());
    }
}
