//! # Log Store
//!
//! Persists the log as one JSON array in a single file, rewritten in full
//! on every change through the atomic writer. A crash mid-write leaves the
//! previous log intact plus an orphaned temp file, which the next
//! [`LogStore::open`] sweeps away.
//!
//! ## Concurrency
//!
//! One writer per log file. `append` is load, push, save; two processes
//! appending at once can lose one of the records. Callers serialize writes.
//!
//! Inspectors running beside the writer use [`LogStore::open_read_only`],
//! which touches nothing on disk. The sweep in [`LogStore::open`] would
//! delete a temp file the writer is about to rename.

use std::path::{Path, PathBuf};

use credlog_fs::{ensure_directory_exists, path_exists, save_file, sweep_orphans, FsError};
use serde_json::value::RawValue;

use crate::config::StoreConfig;
use crate::error::LogError;
use crate::record::LogRecord;

/// File-backed session log.
#[derive(Debug, Clone)]
pub struct LogStore {
    config: StoreConfig,
    path: PathBuf,
}

impl LogStore {
    /// Open the store described by `config`, creating its directory and
    /// removing temp files left by interrupted writes.
    pub fn open(config: StoreConfig) -> Result<Self, LogError> {
        config.validate()?;
        ensure_directory_exists(&config.storage_dir)?;
        let swept = sweep_orphans(&config.storage_dir)?;
        if swept > 0 {
            tracing::warn!(
                dir = %config.storage_dir.display(),
                count = swept,
                "removed temp files left by interrupted writes"
            );
        }
        let path = config.log_path();
        Ok(Self { config, path })
    }

    /// Open the store described by `config` for reading only.
    ///
    /// Neither creates the directory nor sweeps it. A store whose directory
    /// does not exist yet reads as an empty log.
    pub fn open_read_only(config: StoreConfig) -> Result<Self, LogError> {
        config.validate()?;
        let path = config.log_path();
        Ok(Self { config, path })
    }

    /// The store's configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record, oldest first. A missing log file is an empty log.
    ///
    /// All or nothing: a single record that fails validation makes the
    /// whole load fail with [`LogError::MalformedRecord`], naming the
    /// record's position in the file.
    pub fn load_all(&self) -> Result<Vec<LogRecord>, LogError> {
        if !path_exists(&self.path)? {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(&self.path).map_err(|source| FsError::Io {
            path: self.path.clone(),
            source,
        })?;
        let entries: Vec<Box<RawValue>> = serde_json::from_slice(&bytes).map_err(|e| {
            LogError::MalformedRecord(format!("{}: {e}", self.path.display()))
        })?;
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_str(entry.get()).map_err(|e| {
                    LogError::MalformedRecord(format!(
                        "{}: record {index}: {e}",
                        self.path.display()
                    ))
                })
            })
            .collect()
    }

    /// At most `max` records, newest first. Records completed at the same
    /// instant come in reverse append order.
    pub fn load_newest(&self, max: usize) -> Result<Vec<LogRecord>, LogError> {
        let mut records = self.load_all()?;
        records.reverse();
        records.sort_by(|a, b| b.completed_at().cmp(&a.completed_at()));
        records.truncate(max);
        Ok(records)
    }

    /// Add a record to the log.
    pub fn append(&self, record: LogRecord) -> Result<(), LogError> {
        let kind = record.kind();
        let mut records = self.load_all()?;
        records.push(record);
        self.save(&records)?;
        tracing::info!(%kind, total = records.len(), "appended log record");
        Ok(())
    }

    /// Empty the log.
    pub fn remove_all(&self) -> Result<(), LogError> {
        self.save(&[])?;
        tracing::info!(path = %self.path.display(), "cleared log");
        Ok(())
    }

    fn save(&self, records: &[LogRecord]) -> Result<(), LogError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(LogError::Encoding)?;
        save_file(&self.path, &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use credlog_core::Timestamp;

    use super::*;

    fn removal(at: &str) -> LogRecord {
        LogRecord::for_removal(Timestamp::parse(at).unwrap(), BTreeMap::new())
    }

    fn open(dir: &Path) -> LogStore {
        LogStore::open(StoreConfig::with_storage_dir(dir.join("store"))).unwrap()
    }

    #[test]
    fn missing_file_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        assert!(store.load_all().unwrap().is_empty());
        assert!(store.path().parent().unwrap().is_dir());
    }

    #[test]
    fn append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        store.append(removal("2026-01-01T00:00:00Z")).unwrap();
        store.append(removal("2026-01-02T00:00:00Z")).unwrap();
        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], removal("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn load_newest_orders_and_limits() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        for at in [
            "2026-01-02T00:00:00Z",
            "2026-01-01T00:00:00Z",
            "2026-01-03T00:00:00Z",
        ] {
            store.append(removal(at)).unwrap();
        }
        let newest = store.load_newest(2).unwrap();
        let times: Vec<_> = newest.iter().map(|r| r.completed_at().to_iso8601()).collect();
        assert_eq!(times, ["2026-01-03T00:00:00Z", "2026-01-02T00:00:00Z"]);
        assert!(store.load_newest(0).unwrap().is_empty());
        assert_eq!(store.load_newest(10).unwrap().len(), 3);
    }

    #[test]
    fn remove_all_empties_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        store.append(removal("2026-01-01T00:00:00Z")).unwrap();
        store.remove_all().unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        std::fs::write(store.path(), b"[{").unwrap();
        assert!(matches!(
            store.load_all(),
            Err(LogError::MalformedRecord(_))
        ));
    }

    #[test]
    fn invalid_record_is_reported_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        store.append(removal("2026-01-01T00:00:00Z")).unwrap();
        let mut entries: Vec<serde_json::Value> =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        entries.push(serde_json::json!({"type": "unknown", "time": "2026-01-02T00:00:00Z"}));
        std::fs::write(store.path(), serde_json::to_vec(&entries).unwrap()).unwrap();

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, LogError::MalformedRecord(_)));
        assert!(err.to_string().contains("record 1"), "{err}");
    }

    #[test]
    fn read_only_open_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage_dir = dir.path().join("absent");
        let store = LogStore::open_read_only(StoreConfig::with_storage_dir(&storage_dir)).unwrap();
        assert!(store.load_all().unwrap().is_empty());
        assert!(!storage_dir.exists());
    }

    #[test]
    fn read_only_open_keeps_writer_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = open(dir.path());
        writer.append(removal("2026-01-01T00:00:00Z")).unwrap();

        let staged = credlog_fs::stage_file(writer.path(), b"[]").unwrap();
        let reader = LogStore::open_read_only(writer.config().clone()).unwrap();
        assert_eq!(reader.load_all().unwrap().len(), 1);
        assert!(staged.temp_path().exists());

        staged.commit().unwrap();
        assert!(reader.load_all().unwrap().is_empty());
    }

    #[test]
    fn open_rejects_bad_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            storage_dir: dir.path().to_path_buf(),
            file_name: "../escape.json".into(),
        };
        assert!(matches!(LogStore::open(config.clone()), Err(LogError::Config(_))));
        assert!(matches!(LogStore::open_read_only(config), Err(LogError::Config(_))));
    }
}
