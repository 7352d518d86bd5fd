//! CSV and JSON artifact writers.
//!
//! All outputs are write-once, overwrite-on-rerun, with no schema
//! versioning. Identical inputs produce byte-identical files.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::join::JoinedSample;

/// Write joined rows as CSV with a header row.
pub fn write_csv(path: &Path, rows: &[JoinedSample]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("cannot write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("cannot flush {}", path.display()))?;
    log::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write a value as pretty-printed JSON with a trailing newline.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize artifact")?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomadex_api::AuthorId;

    fn sample_rows() -> Vec<JoinedSample> {
        vec![
            JoinedSample {
                entry_id: Some("e-1".to_string()),
                upload_id: Some("u-1".to_string()),
                upload_name: Some("batch, 7".to_string()),
                main_author_id: Some(AuthorId::from("a")),
                main_author: Some("Alice".to_string()),
                coauthor_ids: "b; c".to_string(),
                coauthors: "Bob; Cara".to_string(),
                published: true,
                upload_create_time: None,
            },
            JoinedSample {
                entry_id: Some("e-2".to_string()),
                upload_id: None,
                upload_name: None,
                main_author_id: None,
                main_author: None,
                coauthor_ids: String::new(),
                coauthors: String::new(),
                published: false,
                upload_create_time: None,
            },
        ]
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        write_csv(&path, &sample_rows()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("entry_id,upload_id,upload_name,main_author_id"));
        // Embedded comma is quoted, not split
        assert!(lines[1].contains("\"batch, 7\""));
    }

    #[test]
    fn csv_export_is_byte_identical_across_reruns() {
        let dir = tempfile::tempdir().unwrap();
        let rows = sample_rows();

        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        write_csv(&first, &rows).unwrap();
        write_csv(&second, &rows).unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn json_artifact_ends_with_newline_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        write_json(&path, &serde_json::json!({"total": 2})).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        assert!(content.contains("\"total\": 2"));

        write_json(&path, &serde_json::json!({"total": 3})).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"total\": 3"));
        assert!(!content.contains("\"total\": 2"));
    }
}
