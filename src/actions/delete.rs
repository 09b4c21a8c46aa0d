//! Best-effort deletion of duplicate files.
//!
//! # Overview
//!
//! [`purge`] deletes every requested path, recording a per-file outcome
//! instead of stopping at the first failure. Deletion is permanent by
//! default; with [`DeleteConfig::trash`] files go to the system trash.
//!
//! # Example
//!
//! ```no_run
//! use dupseq::actions::delete::{purge, DeleteConfig};
//! use std::path::PathBuf;
//!
//! let duplicates = vec![PathBuf::from("images/b.webp")];
//! let result = purge(&duplicates, &DeleteConfig::default());
//! println!("{}", result.summary());
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use thiserror::Error;

use crate::error::{display_name, FileFailure};
use crate::progress::ProgressCallback;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// A survivor was about to be deleted.
    #[error("refusing to delete survivor: {0}")]
    WouldDeleteSurvivor(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::WouldDeleteSurvivor(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

/// Results of a purge.
#[derive(Debug, Clone, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions.
    pub failures: Vec<FileFailure>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of files actually deleted.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of deletions requested.
    #[must_use]
    pub fn requested_count(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Paths that were deleted.
    #[must_use]
    pub fn deleted_paths(&self) -> Vec<PathBuf> {
        self.successes.iter().map(|s| s.path.clone()).collect()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {}",
                self.success_count(),
                ByteSize(self.bytes_freed)
            )
        } else {
            format!(
                "Deleted {} of {} file(s), {} failed, freed {}",
                self.success_count(),
                self.requested_count(),
                self.failure_count(),
                ByteSize(self.bytes_freed)
            )
        }
    }
}

/// Configuration for deletion.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    /// Remove files permanently instead of moving them to the trash.
    pub permanent: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self { permanent: true }
    }
}

impl DeleteConfig {
    /// Move files to the system trash.
    #[must_use]
    pub fn trash() -> Self {
        Self { permanent: false }
    }

    /// Remove files permanently.
    #[must_use]
    pub fn permanent() -> Self {
        Self { permanent: true }
    }
}

fn file_size(path: &Path) -> Result<u64, DeleteError> {
    fs::symlink_metadata(path)
        .map(|m| m.len())
        .map_err(|e| DeleteError::from_io(path, e))
}

/// Permanently delete a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for anything else
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = file_size(path)?;
    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;

    log::debug!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: true,
    })
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `TrashFailed` if the platform trash rejects it
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = file_size(path)?;
    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::debug!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
        permanent: false,
    })
}

/// Delete one file according to `config`.
///
/// # Errors
///
/// See [`permanent_delete`] and [`delete_to_trash`].
pub fn delete_file(path: &Path, config: &DeleteConfig) -> Result<DeleteResult, DeleteError> {
    if config.permanent {
        permanent_delete(path)
    } else {
        delete_to_trash(path)
    }
}

/// Delete every path, continuing past failures.
#[must_use]
pub fn purge(paths: &[PathBuf], config: &DeleteConfig) -> BatchDeleteResult {
    purge_with_progress(paths, config, None)
}

/// [`purge`] reporting each file to `progress` under the "purging" phase.
#[must_use]
pub fn purge_with_progress(
    paths: &[PathBuf],
    config: &DeleteConfig,
    progress: Option<&dyn ProgressCallback>,
) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();

    if let Some(callback) = progress {
        callback.on_phase_start("purging", paths.len());
    }

    for (idx, path) in paths.iter().enumerate() {
        if let Some(callback) = progress {
            callback.on_progress(idx + 1, path.to_string_lossy().as_ref());
        }

        match delete_file(path, config) {
            Ok(deleted) => {
                log::info!("[DELETED] {}", display_name(path));
                result.bytes_freed += deleted.size;
                result.successes.push(deleted);
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", path.display(), e);
                result.failures.push(FileFailure::new(path.clone(), e.to_string()));
            }
        }
    }

    if let Some(callback) = progress {
        callback.on_phase_end("purging");
    }

    log::debug!("{}", result.summary());
    result
}

/// Check that no survivor is in the deletion list.
///
/// # Errors
///
/// Returns `WouldDeleteSurvivor` naming the first offending path.
pub fn validate_preserves_survivors(
    to_delete: &[PathBuf],
    survivors: &[PathBuf],
) -> Result<(), DeleteError> {
    let survivors: HashSet<&PathBuf> = survivors.iter().collect();
    match to_delete.iter().find(|p| survivors.contains(p)) {
        Some(path) => {
            log::error!("Deletion list contains survivor {}", path.display());
            Err(DeleteError::WouldDeleteSurvivor(path.clone()))
        }
        None => Ok(()),
    }
}
