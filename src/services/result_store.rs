//! Shared result file writer
//!
//! All sessions, across all processes serving the same library, append to one
//! `results.csv` in the library base directory. Appends are serialized by an
//! advisory lock on a sibling `results.csv.lock` file, acquired with a
//! bounded wait. On contention timeout the write is deferred: the caller
//! keeps its pending records and retries on a later user action.

use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::models::RatingRecord;

/// File name of the shared result file inside the library base directory
pub const RESULT_FILE: &str = "results.csv";

/// Suffix appended to the result file path to form the lock file path
const LOCK_SUFFIX: &str = ".lock";

/// Poll interval while waiting for the advisory lock
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// CSV header, written at most once per result file
const CSV_HEADER: [&str; 3] = ["filename", "method", "rating"];

/// Result writer errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lock not acquired within the bounded wait; write deferred
    #[error("Result file is busy (another session is submitting), waited {0:?}")]
    Contention(Duration),

    /// I/O error on the result or lock file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StoreError {
    /// Contention is the one recoverable case: pending rows stay queued
    pub fn is_contention(&self) -> bool {
        matches!(self, StoreError::Contention(_))
    }
}

/// Appends rating records to a library's shared result file
#[derive(Debug, Clone)]
pub struct ResultStore {
    lock_timeout: Duration,
}

impl ResultStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self { lock_timeout }
    }

    /// Path of the result file for a library base directory
    pub fn result_path(base_dir: &Path) -> PathBuf {
        base_dir.join(RESULT_FILE)
    }

    /// Append `records` to `base_dir/results.csv`, creating it (with header)
    /// on first write
    ///
    /// Blocking: callers on the async runtime go through `spawn_blocking`.
    /// The whole append runs under the advisory lock, so concurrent sessions
    /// never interleave partial row sets.
    pub fn append(&self, base_dir: &Path, records: &[RatingRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }

        let result_path = Self::result_path(base_dir);
        let lock_path = lock_path_for(&result_path);

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        let _lock = acquire_lock(&lock_file, self.lock_timeout)?;

        // Existence check must happen under the lock: it decides the header
        let write_header = !result_path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&result_path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(CSV_HEADER)?;
        }
        for record in records {
            writer.write_record([
                record.filename.as_str(),
                record.method.as_str(),
                record.rating.as_str(),
            ])?;
        }
        writer.flush().map_err(StoreError::Io)?;

        tracing::info!(
            file = %result_path.display(),
            rows = records.len(),
            header = write_header,
            "Ratings appended to result file"
        );

        Ok(records.len())
    }
}

/// Lock file path for a result file (`results.csv` -> `results.csv.lock`)
fn lock_path_for(result_path: &Path) -> PathBuf {
    let mut name = result_path.as_os_str().to_os_string();
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

/// Poll for the exclusive advisory lock until acquired or `timeout` elapses
fn acquire_lock(file: &File, timeout: Duration) -> Result<LockGuard<'_>, StoreError> {
    let start = Instant::now();
    loop {
        if matches!(FileExt::try_lock_exclusive(file), Ok(true)) {
            return Ok(LockGuard { file });
        }

        let waited = start.elapsed();
        if waited >= timeout {
            tracing::warn!(waited = ?waited, "Result file lock not acquired, deferring write");
            return Err(StoreError::Contention(waited));
        }

        std::thread::sleep(LOCK_POLL_INTERVAL);
    }
}

/// Holds the advisory lock; released on drop, on every exit path
struct LockGuard<'a> {
    file: &'a File,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        let _ = FileExt::unlock(self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> ResultStore {
        ResultStore::new(Duration::from_secs(2))
    }

    fn record(file: &str, method: &str, rating: Rating) -> RatingRecord {
        RatingRecord::new(file, method, rating)
    }

    #[test]
    fn test_append_creates_file_with_header() {
        let temp = TempDir::new().unwrap();

        let written = store()
            .append(temp.path(), &[record("a.wav", "m1", Rating::Identical)])
            .unwrap();
        assert_eq!(written, 1);

        let content = fs::read_to_string(temp.path().join(RESULT_FILE)).unwrap();
        assert_eq!(content, "filename,method,rating\na.wav,m1,1-identical\n");
    }

    #[test]
    fn test_header_written_exactly_once() {
        let temp = TempDir::new().unwrap();
        let store = store();

        store
            .append(temp.path(), &[record("a.wav", "m1", Rating::NearIdentical)])
            .unwrap();
        store
            .append(temp.path(), &[record("b.wav", "m2", Rating::VeryDifferent)])
            .unwrap();

        let content = fs::read_to_string(temp.path().join(RESULT_FILE)).unwrap();
        let header_lines = content
            .lines()
            .filter(|line| *line == "filename,method,rating")
            .count();
        assert_eq!(header_lines, 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_empty_append_is_a_no_op() {
        let temp = TempDir::new().unwrap();

        let written = store().append(temp.path(), &[]).unwrap();
        assert_eq!(written, 0);
        assert!(!temp.path().join(RESULT_FILE).exists());
        assert!(!temp.path().join("results.csv.lock").exists());
    }

    #[test]
    fn test_rows_preserve_submission_order() {
        let temp = TempDir::new().unwrap();
        let records = vec![
            record("a.wav", "m1", Rating::SlightDifference),
            record("a.wav", "m2", Rating::Identical),
            record("b.wav", "m2", Rating::VeryDifferent),
        ];

        store().append(temp.path(), &records).unwrap();

        let content = fs::read_to_string(temp.path().join(RESULT_FILE)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], "a.wav,m1,3-slight-difference");
        assert_eq!(lines[2], "a.wav,m2,1-identical");
        assert_eq!(lines[3], "b.wav,m2,5-very-different");
    }

    #[test]
    fn test_contention_times_out_without_writing() {
        let temp = TempDir::new().unwrap();
        let lock_path = temp.path().join("results.csv.lock");

        // Hold the lock from this thread for the duration of the attempt
        let holder = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .unwrap();
        assert!(matches!(FileExt::try_lock_exclusive(&holder), Ok(true)));

        let short_store = ResultStore::new(Duration::from_millis(200));
        let result = short_store.append(temp.path(), &[record("a.wav", "m1", Rating::Identical)]);

        match result {
            Err(ref e) if e.is_contention() => {}
            other => panic!("Expected Contention, got {:?}", other),
        }
        assert!(!temp.path().join(RESULT_FILE).exists());

        FileExt::unlock(&holder).unwrap();

        // After release the same append goes through
        short_store
            .append(temp.path(), &[record("a.wav", "m1", Rating::Identical)])
            .unwrap();
        assert!(temp.path().join(RESULT_FILE).exists());
    }

    #[test]
    fn test_concurrent_appends_never_interleave() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().to_path_buf();

        let mut handles = Vec::new();
        for batch in 0..4 {
            let base = base.clone();
            handles.push(std::thread::spawn(move || {
                let store = ResultStore::new(Duration::from_secs(5));
                let records: Vec<RatingRecord> = (0..10)
                    .map(|i| {
                        record(
                            &format!("file_{batch}_{i}.wav"),
                            &format!("m{batch}"),
                            Rating::NearIdentical,
                        )
                    })
                    .collect();
                store.append(&base, &records).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(base.join(RESULT_FILE)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 41); // header + 4 batches of 10

        // Each batch's rows are contiguous: no interleaving under the lock
        for batch in 0..4 {
            let marker = format!(",m{batch},");
            let positions: Vec<usize> = lines
                .iter()
                .enumerate()
                .filter(|(_, line)| line.contains(&marker))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(positions.len(), 10);
            assert_eq!(positions.last().unwrap() - positions.first().unwrap(), 9);
        }
    }
}
