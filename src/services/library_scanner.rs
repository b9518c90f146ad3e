//! Listening test library scanner
//!
//! A library is a base directory containing an `original` subfolder of
//! reference audio plus one sibling subfolder per watermarking method, each
//! holding processed versions under the same file names:
//!
//! ```text
//! base_dir/
//!   original/   a.wav  b.flac ...
//!   method_a/   a.wav  b.flac ...
//!   method_b/   a.wav  ...
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Audio file extensions accepted into a listening test
const AUDIO_EXTENSIONS: [&str; 2] = ["wav", "flac"];

/// Name of the reference subfolder
pub const ORIGINAL_DIR: &str = "original";

/// Library scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Base directory lacks an `original` subfolder
    #[error("No 'original' subfolder in: {0}")]
    MissingOriginal(PathBuf),

    /// General I/O error while reading the directory tree
    #[error("I/O error reading {0}: {1}")]
    Io(PathBuf, String),
}

/// Scan result: the file and method lists a session is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    /// Base directory the scan ran against
    pub base_dir: PathBuf,
    /// `base_dir/original`
    pub original_dir: PathBuf,
    /// Sorted audio file names found in `original/`
    pub audio_files: Vec<String>,
    /// Sorted immediate subdirectory names of the base, `original` excluded
    pub method_dirs: Vec<String>,
}

/// Scan a base directory into a [`Library`]
///
/// Fails when the path is missing, not a directory, or lacks an `original`
/// subfolder. Unreadable entries inside an otherwise valid tree are skipped
/// with a warning rather than aborting the scan; hidden (dot-prefixed)
/// entries are ignored.
pub fn scan(base_dir: &Path) -> Result<Library, ScanError> {
    if !base_dir.exists() {
        return Err(ScanError::PathNotFound(base_dir.to_path_buf()));
    }
    if !base_dir.is_dir() {
        return Err(ScanError::NotADirectory(base_dir.to_path_buf()));
    }

    let original_dir = base_dir.join(ORIGINAL_DIR);
    if !original_dir.is_dir() {
        return Err(ScanError::MissingOriginal(base_dir.to_path_buf()));
    }

    let mut audio_files = list_audio_files(&original_dir)?;
    audio_files.sort();

    let mut method_dirs = list_method_dirs(base_dir)?;
    method_dirs.sort();

    tracing::info!(
        base = %base_dir.display(),
        files = audio_files.len(),
        methods = method_dirs.len(),
        "Library scan complete"
    );

    Ok(Library {
        base_dir: base_dir.to_path_buf(),
        original_dir,
        audio_files,
        method_dirs,
    })
}

/// List audio file names directly inside `dir` (non-recursive)
fn list_audio_files(dir: &Path) -> Result<Vec<String>, ScanError> {
    let mut files = Vec::new();

    // min_depth(1) skips the directory entry itself; max_depth(1) keeps the
    // listing flat, matching the library layout
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if !has_audio_extension(entry.path()) {
            continue;
        }

        if let Some(name) = entry.file_name().to_str() {
            // Dot-prefixed entries are system junk (.DS_Store and friends),
            // never listening test material
            if !name.starts_with('.') {
                files.push(name.to_string());
            }
        } else {
            tracing::warn!(path = %entry.path().display(), "Skipping non-UTF-8 file name");
        }
    }

    Ok(files)
}

/// List immediate subdirectory names of `base_dir`, excluding `original`
fn list_method_dirs(base_dir: &Path) -> Result<Vec<String>, ScanError> {
    let entries = std::fs::read_dir(base_dir)
        .map_err(|e| ScanError::Io(base_dir.to_path_buf(), e.to_string()))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %base_dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.path().is_dir() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) if name == ORIGINAL_DIR || name.starts_with('.') => {}
            Ok(name) => dirs.push(name),
            Err(name) => {
                tracing::warn!(name = ?name, "Skipping non-UTF-8 directory name");
            }
        }
    }

    Ok(dirs)
}

/// Case-insensitive extension match against the accepted audio formats
fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.iter().any(|accepted| *accepted == ext)
        })
        .unwrap_or(false)
}
