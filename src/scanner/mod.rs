//! Scanner module for listing and hashing a directory's files.
//!
//! This module provides functionality for:
//! - Listing the files of one directory that match a glob, in a stable order
//! - Streaming content digests (BLAKE3 or SHA-256)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`listing`]: Sorted, non-recursive file discovery
//! - [`hasher`]: Chunked file hashing
//!
//! # Example
//!
//! ```no_run
//! use dupseq::scanner::{scan, ScanConfig};
//! use std::path::Path;
//!
//! let outcome = scan(Path::new("images"), "*.webp", &ScanConfig::default()).unwrap();
//! for entry in &outcome.entries {
//!     println!("{} {}", entry.digest, entry.path.display());
//! }
//! for err in &outcome.errors {
//!     eprintln!("Skipped: {err}");
//! }
//! ```

pub mod hasher;
pub mod listing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::progress::ProgressCallback;

// Re-export main types
pub use hasher::{Digest, DigestAlgorithm, Hasher, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
pub use listing::{ensure_directory, list_matching, FilePattern};

/// A listed file together with its content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file
    pub path: PathBuf,
    /// Digest of the full file contents
    pub digest: Digest,
}

impl FileEntry {
    #[must_use]
    pub fn new(path: PathBuf, digest: Digest) -> Self {
        Self { path, digest }
    }

    /// File name for log and report lines.
    #[must_use]
    pub fn name(&self) -> String {
        crate::error::display_name(&self.path)
    }
}

/// Configuration for a scan.
#[derive(Clone, Default)]
pub struct ScanConfig {
    /// Digest algorithm.
    pub algorithm: DigestAlgorithm,
    /// Read buffer size in bytes. `None` uses [`DEFAULT_CHUNK_SIZE`].
    pub chunk_size: Option<usize>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanConfig")
            .field("algorithm", &self.algorithm)
            .field("chunk_size", &self.chunk_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl ScanConfig {
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn hasher(&self) -> Hasher {
        Hasher::new(self.algorithm).with_chunk_size(self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE))
    }
}

/// Result of hashing a listed file set.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Successfully hashed files, in listing order.
    pub entries: Vec<FileEntry>,
    /// Number of files that matched the pattern.
    pub listed: usize,
    /// Files that could not be read.
    pub errors: Vec<ReadError>,
}

impl ScanOutcome {
    /// Paths of every listed file, hashed or not, in listing order.
    #[must_use]
    pub fn all_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .entries
            .iter()
            .map(|e| e.path.clone())
            .chain(self.errors.iter().map(|e| e.path().to_path_buf()))
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        paths
    }
}

/// List the files of `directory` matching `pattern` and digest each one.
///
/// Files that cannot be read are logged, recorded in
/// [`ScanOutcome::errors`] and skipped.
///
/// # Errors
///
/// Fails before reading any file if the directory is missing, is not a
/// directory, or the pattern is invalid.
pub fn scan(directory: &Path, pattern: &str, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    let pattern = FilePattern::new(pattern)?;
    let paths = list_matching(directory, &pattern)?;
    Ok(scan_paths(&paths, config))
}

/// Digest an already-ordered list of paths.
///
/// Order is preserved; unreadable files are skipped and recorded.
#[must_use]
pub fn scan_paths(paths: &[PathBuf], config: &ScanConfig) -> ScanOutcome {
    let hasher = config.hasher();
    let mut outcome = ScanOutcome {
        listed: paths.len(),
        ..Default::default()
    };

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hashing", paths.len());
    }

    for (idx, path) in paths.iter().enumerate() {
        if let Some(ref callback) = config.progress_callback {
            callback.on_progress(idx + 1, path.to_string_lossy().as_ref());
        }

        match hasher.digest_file(path) {
            Ok(digest) => outcome.entries.push(FileEntry::new(path.clone(), digest)),
            Err(e) => {
                log::warn!("Skipping unreadable file: {e}");
                outcome.errors.push(e);
            }
        }
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hashing");
    }

    log::debug!(
        "Hashed {}/{} file(s) with {}",
        outcome.entries.len(),
        outcome.listed,
        hasher.algorithm()
    );
    outcome
}

/// Errors that abort a scan before any file is touched.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The target directory does not exist.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// The target path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The filename pattern could not be compiled.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Why it was rejected
        message: String,
    },

    /// The directory could not be read.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub(crate) fn invalid_pattern(pattern: &str, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            message: message.into(),
        }
    }
}

/// A single file that could not be opened or read while hashing.
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The file disappeared between listing and hashing.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O error while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    pub(crate) fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// The file this error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
