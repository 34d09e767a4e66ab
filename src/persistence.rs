//! File I/O for command history and telemetry records
//!
//! Each record list is stored as a versioned YAML document:
//!
//! ```yaml
//! version: 1
//! records:
//!   - ...
//! ```
//!
//! Files live next to the config (`history.yaml`, `telemetry.yaml`).

use crate::command_history::CommandHistory;
use crate::error::PersistenceError;
use crate::telemetry::TelemetryAggregator;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version written to every record file.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct RecordFileRef<'a, T> {
    version: u32,
    records: &'a [T],
}

#[derive(Deserialize)]
struct RecordFile<T> {
    version: u32,
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `records` to `path`, replacing the file atomically.
pub fn save_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let contents = serde_yaml_ng::to_string(&RecordFileRef {
        version: FORMAT_VERSION,
        records,
    })?;

    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, contents).map_err(|e| io_error(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;

    log::info!("Saved {} records to {:?}", records.len(), path);
    Ok(())
}

/// Read records from `path`.
///
/// A missing or empty file yields an empty list. A file written by a
/// different format version is rejected.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PersistenceError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let file: RecordFile<T> = serde_yaml_ng::from_str(&contents)?;
    if file.version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: file.version,
            expected: FORMAT_VERSION,
        });
    }

    log::info!("Loaded {} records from {:?}", file.records.len(), path);
    Ok(file.records)
}

/// Save the global history if it changed since the last save.
///
/// Returns whether a file was written.
pub fn save_history(history: &mut CommandHistory, path: &Path) -> Result<bool, PersistenceError> {
    if !history.is_dirty() {
        return Ok(false);
    }
    let entries: Vec<_> = history.entries().iter().cloned().collect();
    save_records(path, &entries)?;
    history.mark_saved();
    Ok(true)
}

pub fn load_history(history: &mut CommandHistory, path: &Path) -> Result<(), PersistenceError> {
    history.restore(load_records(path)?);
    Ok(())
}

/// Save the telemetry log if it changed since the last save.
pub fn save_telemetry(
    telemetry: &mut TelemetryAggregator,
    path: &Path,
) -> Result<bool, PersistenceError> {
    if !telemetry.is_dirty() {
        return Ok(false);
    }
    let events: Vec<_> = telemetry.events().iter().cloned().collect();
    save_records(path, &events)?;
    telemetry.mark_saved();
    Ok(true)
}

pub fn load_telemetry(
    telemetry: &mut TelemetryAggregator,
    path: &Path,
) -> Result<(), PersistenceError> {
    telemetry.restore(load_records(path)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_history::HistoryEntry;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp = tempdir().unwrap();
        let records: Vec<HistoryEntry> = load_records(&temp.path().join("missing.yaml")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_empty_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.yaml");
        std::fs::write(&path, "").unwrap();
        let records: Vec<HistoryEntry> = load_records(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("corrupt.yaml");
        std::fs::write(&path, "not: valid: yaml: [[[").unwrap();
        let result: Result<Vec<HistoryEntry>, _> = load_records(&path);
        assert!(matches!(result, Err(PersistenceError::Yaml(_))));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("future.yaml");
        std::fs::write(&path, "version: 7\nrecords: []\n").unwrap();
        let result: Result<Vec<HistoryEntry>, _> = load_records(&path);
        assert!(matches!(
            result,
            Err(PersistenceError::UnsupportedVersion {
                found: 7,
                expected: FORMAT_VERSION
            })
        ));
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("history.yaml");
        save_records(&path, &[HistoryEntry::new("ls")]).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("yaml.tmp").exists());
        let loaded: Vec<HistoryEntry> = load_records(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].command, "ls");
    }

    #[test]
    fn test_clean_history_is_not_saved() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("history.yaml");
        let mut history = CommandHistory::new(10);
        assert!(!save_history(&mut history, &path).unwrap());
        assert!(!path.exists());

        history.push(HistoryEntry::new("pwd"));
        assert!(save_history(&mut history, &path).unwrap());
        assert!(!history.is_dirty());
    }
}
