//! Collision-safe renumbering into `<prefix><NNNN>.<ext>`.
//!
//! # Overview
//!
//! Renumbering is split into planning and committing. [`RenamePlan::build`]
//! assigns every file its target name and verifies the whole plan before
//! anything on disk changes:
//! - no two files may receive the same target;
//! - a target may not already exist unless it belongs to a file being
//!   renumbered.
//!
//! If some target is the current name of another file in the set, the
//! plan is committed in two phases through hidden temporary names; otherwise
//! files are renamed directly. No individual rename ever replaces an
//! existing file.
//!
//! # Example
//!
//! ```no_run
//! use dupseq::actions::rename::renumber;
//! use std::path::Path;
//!
//! let outcome = renumber(Path::new("images"), "*.webp", "foto", 4).unwrap();
//! for op in &outcome.renamed {
//!     println!("{} -> {}", op.from_name(), op.to_name());
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::error::{display_name, FileFailure};
use crate::progress::ProgressCallback;
use crate::scanner::{list_matching, FilePattern, ScanError};

/// Widest supported zero padding.
pub const MAX_PAD_WIDTH: usize = 12;

/// Error type for renumbering.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The prefix would not produce a plain file name.
    #[error("invalid prefix '{0}': must not contain path separators")]
    InvalidPrefix(String),

    /// Zero padding outside `1..=MAX_PAD_WIDTH`.
    #[error("invalid pad width {0}: must be between 1 and {MAX_PAD_WIDTH}")]
    InvalidPadWidth(usize),

    /// Listing the directory failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Two files were assigned the same target name.
    #[error("target {name} assigned to both {} and {}", .first.display(), .second.display())]
    Conflict {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The target exists and is not one of the files being renumbered.
    #[error("target already exists: {0}")]
    TargetExists(PathBuf),

    /// The rename itself failed.
    #[error("rename {} -> {} failed: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Target naming scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    prefix: String,
    pad_width: usize,
}

impl Naming {
    /// # Errors
    ///
    /// `InvalidPrefix` if the prefix contains `/` or `\`, `InvalidPadWidth`
    /// if the width is 0 or above [`MAX_PAD_WIDTH`].
    pub fn new(prefix: &str, pad_width: usize) -> Result<Self, RenameError> {
        if prefix.contains(['/', '\\']) || prefix == "." || prefix == ".." {
            return Err(RenameError::InvalidPrefix(prefix.to_string()));
        }
        if pad_width == 0 || pad_width > MAX_PAD_WIDTH {
            return Err(RenameError::InvalidPadWidth(pad_width));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            pad_width,
        })
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn pad_width(&self) -> usize {
        self.pad_width
    }

    /// Largest index that fits the pad width.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        10u64.pow(self.pad_width as u32) - 1
    }

    /// Target name for the 1-based `index`, keeping `source`'s extension.
    #[must_use]
    pub fn target_name(&self, index: usize, source: &Path) -> OsString {
        let mut name = OsString::from(format!(
            "{}{:0width$}",
            self.prefix,
            index,
            width = self.pad_width
        ));
        if let Some(ext) = source.extension() {
            name.push(".");
            name.push(ext);
        }
        name
    }
}

/// One file's rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOp {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenameOp {
    #[must_use]
    pub fn from_name(&self) -> String {
        display_name(&self.from)
    }

    #[must_use]
    pub fn to_name(&self) -> String {
        display_name(&self.to)
    }

    /// Already carries its target name.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from.file_name() == self.to.file_name()
    }
}

/// Outcome of committing a plan.
#[derive(Debug, Clone, Default)]
pub struct RenameOutcome {
    /// Renames that were applied, in plan order.
    pub renamed: Vec<RenameOp>,
    /// Files that already had their target name.
    pub unchanged: usize,
    /// Files that could not be renamed.
    pub failures: Vec<FileFailure>,
}

/// A verified set of renames for one directory.
#[derive(Debug, Clone)]
pub struct RenamePlan {
    directory: PathBuf,
    ops: Vec<RenameOp>,
    staged: bool,
}

impl RenamePlan {
    /// Assign targets to `files` (already in listing order) and verify them.
    ///
    /// # Errors
    ///
    /// `Conflict` or `TargetExists`; nothing has been renamed when either
    /// is returned.
    pub fn build(directory: &Path, files: &[PathBuf], naming: &Naming) -> Result<Self, RenameError> {
        Self::build_after_removal(directory, files, naming, &[])
    }

    /// Like [`RenamePlan::build`], treating `removed` as already gone from
    /// disk. Used to preview renumbering before duplicates are deleted.
    ///
    /// # Errors
    ///
    /// `Conflict` or `TargetExists`.
    pub fn build_after_removal(
        directory: &Path,
        files: &[PathBuf],
        naming: &Naming,
        removed: &[PathBuf],
    ) -> Result<Self, RenameError> {
        if files.len() as u64 > naming.capacity() {
            log::warn!(
                "{} files exceed the {}-digit sequence; later names will be wider and sort out of order",
                files.len(),
                naming.pad_width()
            );
        }

        let current: HashSet<&OsStr> = files.iter().filter_map(|p| p.file_name()).collect();
        let removed: HashSet<&OsStr> = removed.iter().filter_map(|p| p.file_name()).collect();
        let mut assigned: HashMap<OsString, &PathBuf> = HashMap::with_capacity(files.len());
        let mut ops = Vec::with_capacity(files.len());

        for (i, from) in files.iter().enumerate() {
            let to_name = naming.target_name(i + 1, from);
            if let Some(first) = assigned.insert(to_name.clone(), from) {
                return Err(RenameError::Conflict {
                    name: to_name.to_string_lossy().into_owned(),
                    first: first.clone(),
                    second: from.clone(),
                });
            }
            ops.push(RenameOp {
                from: from.clone(),
                to: directory.join(&to_name),
            });
        }

        let mut staged = false;
        for op in ops.iter().filter(|op| !op.is_noop()) {
            let target = op.to.file_name().unwrap_or_default();
            if current.contains(target) {
                staged = true;
            } else if !removed.contains(target) && fs::symlink_metadata(&op.to).is_ok() {
                return Err(RenameError::TargetExists(op.to.clone()));
            }
        }

        log::debug!(
            "Rename plan for {}: {} file(s), {} to move{}",
            directory.display(),
            ops.len(),
            ops.iter().filter(|op| !op.is_noop()).count(),
            if staged { ", staged" } else { "" }
        );

        Ok(Self {
            directory: directory.to_path_buf(),
            ops,
            staged,
        })
    }

    /// Every file with its target, including no-ops.
    #[must_use]
    pub fn ops(&self) -> &[RenameOp] {
        &self.ops
    }

    /// Only the files whose name changes.
    pub fn moves(&self) -> impl Iterator<Item = &RenameOp> {
        self.ops.iter().filter(|op| !op.is_noop())
    }

    /// Whether committing goes through temporary names.
    #[must_use]
    pub fn is_staged(&self) -> bool {
        self.staged
    }

    /// Apply the plan. Per-file failures are recorded and skipped.
    #[must_use]
    pub fn commit(&self) -> RenameOutcome {
        self.commit_with_progress(None)
    }

    /// [`RenamePlan::commit`] reporting each final rename under the
    /// "renumbering" phase.
    #[must_use]
    pub fn commit_with_progress(&self, progress: Option<&dyn ProgressCallback>) -> RenameOutcome {
        let total = self.moves().count();
        let mut outcome = RenameOutcome {
            unchanged: self.ops.len() - total,
            ..Default::default()
        };

        if let Some(callback) = progress {
            callback.on_phase_start("renumbering", total);
        }
        let tick = |done: usize, op: &RenameOp| {
            if let Some(callback) = progress {
                callback.on_progress(done, &op.to_name());
            }
        };

        if !self.staged {
            for (i, op) in self.moves().enumerate() {
                tick(i + 1, op);
                match rename_no_clobber(&op.from, &op.to) {
                    Ok(()) => record_rename(&mut outcome, op),
                    Err(e) => record_failure(&mut outcome, &op.from, e.to_string()),
                }
            }
            if let Some(callback) = progress {
                callback.on_phase_end("renumbering");
            }
            return outcome;
        }

        let pid = std::process::id();
        let mut parked = Vec::new();
        for (i, op) in self.moves().enumerate() {
            let temp = self.directory.join(format!(".dupseq-{pid}-{i}.tmp"));
            match rename_no_clobber(&op.from, &temp) {
                Ok(()) => parked.push((op, temp)),
                Err(e) => record_failure(&mut outcome, &op.from, e.to_string()),
            }
        }

        for (i, (op, temp)) in parked.into_iter().enumerate() {
            tick(i + 1, op);
            match rename_no_clobber(&temp, &op.to) {
                Ok(()) => record_rename(&mut outcome, op),
                Err(e) => record_failure(
                    &mut outcome,
                    &op.from,
                    format!("{e}; contents left at {}", temp.display()),
                ),
            }
        }

        if let Some(callback) = progress {
            callback.on_phase_end("renumbering");
        }
        outcome
    }
}

fn record_rename(outcome: &mut RenameOutcome, op: &RenameOp) {
    log::info!("[RENAMED] {} -> {}", op.from_name(), op.to_name());
    outcome.renamed.push(op.clone());
}

fn record_failure(outcome: &mut RenameOutcome, path: &Path, reason: String) {
    log::warn!("Failed to rename {}: {}", path.display(), reason);
    outcome.failures.push(FileFailure::new(path, reason));
}

/// Rename without ever replacing an existing destination.
fn rename_no_clobber(from: &Path, to: &Path) -> Result<(), RenameError> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(RenameError::TargetExists(to.to_path_buf()));
    }
    fs::rename(from, to).map_err(|source| RenameError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Build a plan for the files of `directory` matching `pattern`.
///
/// # Errors
///
/// Listing errors, or a rejected plan.
pub fn plan_renumber(
    directory: &Path,
    pattern: &FilePattern,
    naming: &Naming,
) -> Result<RenamePlan, RenameError> {
    let files = list_matching(directory, pattern)?;
    RenamePlan::build(directory, &files, naming)
}

/// Re-list `directory` and rename matching files to a gap-free sequence.
///
/// # Errors
///
/// Invalid naming or pattern, listing errors, or a rejected plan. Per-file
/// rename failures are reported in the outcome instead.
pub fn renumber(
    directory: &Path,
    pattern: &str,
    prefix: &str,
    pad_width: usize,
) -> Result<RenameOutcome, RenameError> {
    let naming = Naming::new(prefix, pad_width)?;
    let pattern = FilePattern::new(pattern)?;
    Ok(plan_renumber(directory, &pattern, &naming)?.commit())
}
