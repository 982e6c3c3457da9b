//! Report output.
//!
//! Dataset reports are written as JSON, either to a file or to any writer
//! (the CLI uses stdout when no output path is given).
//!
//! # Example
//!
//! ```rust,ignore
//! use column_profiler::reporting::write_report_to_file;
//!
//! let report = DatasetProfiler::new(config)?.profile_dataframe(&df, "train.csv");
//! write_report_to_file(&report, "output/train_profile.json", true)?;
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ProfilerError, Result, ResultExt};
use crate::types::DatasetReport;

/// Serialize a report to a JSON string.
pub fn to_json(report: &DatasetReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Write a report as JSON to `writer`, followed by a newline.
pub fn write_report<W: Write>(report: &DatasetReport, mut writer: W, pretty: bool) -> Result<()> {
    writer.write_all(to_json(report, pretty)?.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a report as JSON to `path`, creating parent directories as needed.
pub fn write_report_to_file(
    report: &DatasetReport,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(ProfilerError::Io)
            .context(format!("Failed to create {}", parent.display()))?;
    }

    let file = File::create(path)
        .map_err(ProfilerError::Io)
        .context(format!("Failed to create {}", path.display()))?;
    write_report(report, BufWriter::new(file), pretty)?;

    info!("Report saved: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use indexmap::IndexMap;

    use crate::types::FeatureReport;

    fn report() -> DatasetReport {
        let mut columns = IndexMap::new();
        columns.insert(
            "a".to_string(),
            FeatureReport {
                num_missing: Some(2),
                ..Default::default()
            },
        );
        DatasetReport {
            source: "memory".to_string(),
            generated_at: Utc::now(),
            shape: (2, 1),
            columns,
            failed_columns: IndexMap::new(),
        }
    }

    #[test]
    fn test_compact_and_pretty_json() {
        let compact = to_json(&report(), false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.contains(r#""columns":{"a":{"num_missing":2}}"#));
        assert!(!compact.contains("failed_columns"));

        let pretty = to_json(&report(), true).unwrap();
        assert!(pretty.contains("\n  \"source\": \"memory\""));
    }

    #[test]
    fn test_write_report_appends_newline() {
        let mut buffer = Vec::new();
        write_report(&report(), &mut buffer, false).unwrap();
        assert_eq!(buffer.last(), Some(&b'\n'));
    }

    #[test]
    fn test_write_report_to_file_creates_directories() {
        let dir = std::env::temp_dir().join(format!("column-profiler-{}", std::process::id()));
        let path = dir.join("nested").join("report.json");

        let written = write_report_to_file(&report(), &path, true).unwrap();
        assert_eq!(written, path);

        let parsed: DatasetReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.columns["a"].num_missing, Some(2));

        fs::remove_dir_all(dir).unwrap();
    }
}
