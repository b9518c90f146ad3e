//! Listening test session state machine
//!
//! A session progresses `Loading → Rating → Complete`. It is created empty,
//! populated by a library scan, advanced one round per submission, and never
//! persisted: the only durable output is the shared result file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::models::RatingRecord;
use crate::services::library_scanner::Library;

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionState {
    /// No library loaded yet
    Loading,
    /// Rounds remain: `index < audio_files.len()`
    Rating,
    /// All rounds submitted: `index == audio_files.len()`
    Complete,
}

/// One listener's pass over the library (in-memory state)
#[derive(Debug, Clone)]
pub struct EvalSession {
    /// Unique session identifier
    pub session_id: Uuid,

    /// Current state
    pub state: SessionState,

    /// Index of the round being rated, in `[0, audio_files.len()]`
    pub index: usize,

    /// Ratings collected but not yet written to the result file
    pub pending_results: Vec<RatingRecord>,

    /// Sorted audio file names from `original/`
    pub audio_files: Vec<String>,

    /// Sorted method subfolder names, `original` excluded
    pub method_dirs: Vec<String>,

    /// Base directory the library was loaded from
    pub base_dir: PathBuf,

    /// `base_dir/original`
    pub original_dir: PathBuf,

    /// Session start time
    pub started_at: DateTime<Utc>,
}

impl EvalSession {
    /// Create an empty session awaiting a library scan
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: SessionState::Loading,
            index: 0,
            pending_results: Vec::new(),
            audio_files: Vec::new(),
            method_dirs: Vec::new(),
            base_dir: PathBuf::new(),
            original_dir: PathBuf::new(),
            started_at: Utc::now(),
        }
    }

    /// Load a scanned library, discarding any prior progress
    ///
    /// An empty library completes immediately: there is nothing to rate.
    pub fn reset(&mut self, library: Library) {
        self.index = 0;
        self.pending_results.clear();
        self.audio_files = library.audio_files;
        self.method_dirs = library.method_dirs;
        self.base_dir = library.base_dir;
        self.original_dir = library.original_dir;
        self.state = if self.audio_files.is_empty() {
            SessionState::Complete
        } else {
            SessionState::Rating
        };
    }

    /// Total number of rounds in this session
    pub fn total(&self) -> usize {
        self.audio_files.len()
    }

    /// File under evaluation in the current round, None once complete
    pub fn current_file(&self) -> Option<&str> {
        self.audio_files.get(self.index).map(String::as_str)
    }

    /// Append one rating to the unflushed results
    pub fn record(&mut self, record: RatingRecord) {
        self.pending_results.push(record);
    }

    /// Move to the next round; flips to Complete on the last one
    pub fn advance(&mut self) {
        debug_assert!(self.index < self.total());
        self.index += 1;
        if self.index >= self.total() {
            self.state = SessionState::Complete;
        }
    }

    /// True once every round has been submitted
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Take the unflushed results, leaving the session with none
    ///
    /// The caller owns the records until the write succeeds; on failure they
    /// must be handed back via [`restore_pending`](Self::restore_pending).
    pub fn take_pending(&mut self) -> Vec<RatingRecord> {
        std::mem::take(&mut self.pending_results)
    }

    /// Return records after a failed write, ahead of anything recorded since
    pub fn restore_pending(&mut self, mut records: Vec<RatingRecord>) {
        records.append(&mut self.pending_results);
        self.pending_results = records;
    }
}

impl Default for EvalSession {
    fn default() -> Self {
        Self::new()
    }
}
