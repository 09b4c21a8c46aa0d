//! The end-to-end run: scan, classify, purge, renumber.
//!
//! # Overview
//!
//! [`Deduplicator::run`] moves through the [`Stage`]s strictly in order:
//!
//! ```text
//! Scanning -> Classifying -> Purging -> Renumbering -> Done
//! ```
//!
//! Everything that can be rejected up front (naming, pattern, directory) is
//! checked before the first file is touched. After that, per-file failures
//! are collected into the [`RunSummary`] and the run continues. A crash
//! mid-run leaves the directory in a valid intermediate state; there is no
//! rollback.
//!
//! # Example
//!
//! ```no_run
//! use dupseq::config::Config;
//! use dupseq::pipeline::Deduplicator;
//! use std::path::Path;
//!
//! let mut dedup = Deduplicator::new(Config::default());
//! let summary = dedup.run(Path::new("images")).unwrap();
//! println!("{} duplicate(s) removed", summary.deleted);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::{
    purge_with_progress, validate_preserves_survivors, DeleteConfig, DeleteError, Naming,
    RenameError, RenameOp, RenamePlan,
};
use crate::config::Config;
use crate::duplicates::{classify, pair, Classification, Duplicate};
use crate::error::{display_name, FileFailure};
use crate::progress::ProgressCallback;
use crate::scanner::{list_matching, scan_paths, DigestAlgorithm, FilePattern, ScanConfig, ScanError};

/// Rule deciding which files are duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Identical content digest; the first file in listing order survives.
    #[default]
    Content,
    /// Every second file in listing order, without reading content.
    Pairing,
    /// Nothing is a duplicate; only renumber.
    None,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Content => write!(f, "content"),
            Policy::Pairing => write!(f, "pairing"),
            Policy::None => write!(f, "none"),
        }
    }
}

/// Stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Scanning,
    Classifying,
    Purging,
    Renumbering,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Scanning => "scanning",
            Stage::Classifying => "classifying",
            Stage::Purging => "purging",
            Stage::Renumbering => "renumbering",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Rename(#[from] RenameError),

    #[error(transparent)]
    Delete(#[from] DeleteError),

    /// Renumbering could not be planned after duplicates were already deleted.
    #[error("renumbering aborted after deleting {deleted} file(s) ({freed} freed): {source}")]
    RenumberAfterPurge {
        deleted: usize,
        freed: ByteSize,
        #[source]
        source: RenameError,
    },

    /// `run` was called on a finished deduplicator.
    #[error("run already finished; create a new Deduplicator")]
    AlreadyRun,
}

impl PipelineError {
    /// Whether the target directory was missing or not a directory.
    #[must_use]
    pub fn is_directory_error(&self) -> bool {
        matches!(
            self,
            Self::Scan(ScanError::DirectoryNotFound(_) | ScanError::NotADirectory(_))
                | Self::Rename(RenameError::Scan(
                    ScanError::DirectoryNotFound(_) | ScanError::NotADirectory(_)
                ))
        )
    }
}

/// Everything a run did, or would do in a dry run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub directory: PathBuf,
    pub policy: Policy,
    /// Absent when content was not read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<DigestAlgorithm>,
    pub dry_run: bool,
    /// Files matching the pattern.
    pub total_files: usize,
    /// Files kept by classification.
    pub unique_files: usize,
    pub duplicates: Vec<Duplicate>,
    /// Files actually deleted.
    pub deleted: usize,
    pub bytes_freed: u64,
    /// Renames applied, or planned in a dry run.
    pub renames: Vec<RenameOp>,
    /// Files that already had their target name.
    pub unchanged: usize,
    pub renumbered: bool,
    pub read_failures: Vec<FileFailure>,
    pub delete_failures: Vec<FileFailure>,
    pub rename_failures: Vec<FileFailure>,
    pub duration_ms: u64,
}

impl RunSummary {
    fn new(directory: &Path, config: &Config) -> Self {
        Self {
            directory: directory.to_path_buf(),
            policy: config.policy,
            digest: (config.policy == Policy::Content).then_some(config.digest),
            dry_run: config.dry_run,
            total_files: 0,
            unique_files: 0,
            duplicates: Vec::new(),
            deleted: 0,
            bytes_freed: 0,
            renames: Vec::new(),
            unchanged: 0,
            renumbered: false,
            read_failures: Vec::new(),
            delete_failures: Vec::new(),
            rename_failures: Vec::new(),
            duration_ms: 0,
        }
    }

    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    /// Any file-level read, delete or rename failure.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !(self.read_failures.is_empty()
            && self.delete_failures.is_empty()
            && self.rename_failures.is_empty())
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.read_failures.len() + self.delete_failures.len() + self.rename_failures.len()
    }
}

/// Runs one deduplication over one directory.
pub struct Deduplicator {
    config: Config,
    progress: Option<Arc<dyn ProgressCallback>>,
    stage: Stage,
}

impl Deduplicator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            progress: None,
            stage: Stage::Idle,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn advance(&mut self, next: Stage) {
        log::debug!("Stage {} -> {}", self.stage, next);
        self.stage = next;
    }

    /// Run every stage over `directory`.
    ///
    /// # Errors
    ///
    /// Invalid naming or pattern, a missing directory, a deletion list that
    /// would remove a survivor, or a rejected rename plan. Per-file failures
    /// are reported in the summary instead.
    pub fn run(&mut self, directory: &Path) -> Result<RunSummary, PipelineError> {
        if self.stage != Stage::Idle {
            return Err(PipelineError::AlreadyRun);
        }
        let started = Instant::now();
        let naming = Naming::new(&self.config.prefix, self.config.pad_width)?;
        let pattern = FilePattern::new(&self.config.pattern)?;
        let mut summary = RunSummary::new(directory, &self.config);

        self.advance(Stage::Scanning);
        let paths = list_matching(directory, &pattern)?;
        summary.total_files = paths.len();
        log::debug!(
            "{} file(s) matching '{}' in {}",
            paths.len(),
            pattern.as_str(),
            directory.display()
        );

        let classification = self.classify(&paths, &mut summary);
        summary.unique_files = classification.survivors.len();
        let doomed = classification.duplicate_paths();
        summary.duplicates = classification.duplicates;

        // Verify renumbering up front so a rejected plan deletes nothing.
        let preview = if self.config.renumber {
            let doomed_set: HashSet<&PathBuf> = doomed.iter().collect();
            let remaining: Vec<PathBuf> = paths
                .iter()
                .filter(|p| !doomed_set.contains(p))
                .cloned()
                .collect();
            Some(RenamePlan::build_after_removal(
                directory, &remaining, &naming, &doomed,
            )?)
        } else {
            None
        };

        self.advance(Stage::Purging);
        if self.config.dry_run {
            for dup in &summary.duplicates {
                log::info!("[DRY RUN] would delete {}", display_name(&dup.path));
            }
        } else if !doomed.is_empty() {
            validate_preserves_survivors(&doomed, &classification.survivors)?;
            let delete_config = DeleteConfig {
                permanent: !self.config.trash,
            };
            let result = purge_with_progress(&doomed, &delete_config, self.progress.as_deref());
            summary.deleted = result.success_count();
            summary.bytes_freed = result.bytes_freed;
            summary.delete_failures = result.failures;
        }

        if let Some(preview) = preview {
            self.advance(Stage::Renumbering);
            if self.config.dry_run {
                for op in preview.moves() {
                    log::info!("[DRY RUN] would rename {} -> {}", op.from_name(), op.to_name());
                }
                summary.unchanged = preview.ops().len() - preview.moves().count();
                summary.renames = preview.moves().cloned().collect();
            } else {
                self.renumber_survivors(directory, &pattern, &naming, &mut summary)?;
            }
        }

        self.advance(Stage::Done);
        summary.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::debug!(
            "Run finished in {} ms with {} file-level failure(s)",
            summary.duration_ms,
            summary.failure_count()
        );
        Ok(summary)
    }

    /// Re-list after purge and commit the real plan.
    fn renumber_survivors(
        &self,
        directory: &Path,
        pattern: &FilePattern,
        naming: &Naming,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let plan = list_matching(directory, pattern)
            .map_err(RenameError::from)
            .and_then(|remaining| RenamePlan::build(directory, &remaining, naming));
        let plan = match plan {
            Ok(plan) => plan,
            Err(source) if summary.deleted > 0 => {
                log::error!(
                    "Renumbering aborted; {} file(s) were already deleted ({} freed)",
                    summary.deleted,
                    ByteSize(summary.bytes_freed)
                );
                return Err(PipelineError::RenumberAfterPurge {
                    deleted: summary.deleted,
                    freed: ByteSize(summary.bytes_freed),
                    source,
                });
            }
            Err(source) => return Err(source.into()),
        };

        let outcome = plan.commit_with_progress(self.progress.as_deref());
        summary.unchanged = outcome.unchanged;
        summary.renames = outcome.renamed;
        summary.rename_failures = outcome.failures;
        summary.renumbered = true;
        Ok(())
    }

    fn classify(&mut self, paths: &[PathBuf], summary: &mut RunSummary) -> Classification {
        match self.config.policy {
            Policy::Content => {
                let mut scan_config = ScanConfig::default()
                    .with_algorithm(self.config.digest)
                    .with_chunk_size(self.config.chunk_size);
                if let Some(ref progress) = self.progress {
                    scan_config = scan_config.with_progress_callback(Arc::clone(progress));
                }
                let outcome = scan_paths(paths, &scan_config);
                summary.read_failures = outcome
                    .errors
                    .iter()
                    .map(|e| FileFailure::new(e.path(), e.to_string()))
                    .collect();

                self.advance(Stage::Classifying);
                let (index, duplicates) = classify(outcome.entries);
                Classification::from_content(&index, duplicates)
            }
            Policy::Pairing => {
                self.advance(Stage::Classifying);
                pair(paths)
            }
            Policy::None => {
                self.advance(Stage::Classifying);
                Classification::keep_all(paths)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn names(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(Policy::Content.to_string(), "content");
        assert_eq!(Policy::Pairing.to_string(), "pairing");
        assert_eq!(Policy::default(), Policy::Content);
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Scanning < Stage::Classifying);
        assert!(Stage::Purging < Stage::Renumbering);
        assert_eq!(Stage::Done.to_string(), "done");
    }

    #[test]
    fn test_reference_scenario() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.webp", "X");
        write(&dir, "a.webp", "X");
        write(&dir, "c.webp", "Y");

        let mut dedup = Deduplicator::new(Config::default());
        let summary = dedup.run(dir.path()).unwrap();

        assert_eq!(dedup.stage(), Stage::Done);
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.unique_files, 2);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.duplicates[0].path, dir.path().join("b.webp"));
        assert_eq!(names(&dir), vec!["foto0001.webp", "foto0002.webp"]);
        assert_eq!(fs::read_to_string(dir.path().join("foto0001.webp")).unwrap(), "X");
        assert_eq!(fs::read_to_string(dir.path().join("foto0002.webp")).unwrap(), "Y");
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_hidden_file_is_left_alone() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".webp", "A");
        write(&dir, "b.webp", "B");

        Deduplicator::new(Config::default()).run(dir.path()).unwrap();
        assert_eq!(names(&dir), vec![".webp", "foto0001.webp"]);

        let second = Deduplicator::new(Config::default()).run(dir.path()).unwrap();
        assert!(second.renames.is_empty());
        assert_eq!(names(&dir), vec![".webp", "foto0001.webp"]);
    }

    #[test]
    fn test_renumber_failure_after_purge_reports_deletions() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");
        let dedup = Deduplicator::new(Config::default());
        let naming = Naming::new("foto", 4).unwrap();
        let pattern = FilePattern::new("*.webp").unwrap();
        let mut summary = RunSummary::new(&gone, &Config::default());
        summary.deleted = 2;
        summary.bytes_freed = 2048;

        let err = dedup
            .renumber_survivors(&gone, &pattern, &naming, &mut summary)
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::RenumberAfterPurge { deleted: 2, .. }
        ));
        assert!(err.to_string().contains("after deleting 2 file(s)"));
        assert!(!err.is_directory_error());
        assert!(!summary.renumbered);
    }

    #[test]
    fn test_second_run_is_noop() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.webp", "1");
        write(&dir, "b.webp", "1");
        write(&dir, "c.webp", "2");

        Deduplicator::new(Config::default()).run(dir.path()).unwrap();
        let second = Deduplicator::new(Config::default()).run(dir.path()).unwrap();

        assert_eq!(second.duplicate_count(), 0);
        assert!(second.renames.is_empty());
        assert_eq!(second.unchanged, 2);
    }

    #[test]
    fn test_dry_run_mutates_nothing() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.webp", "X");
        write(&dir, "b.webp", "X");
        write(&dir, "c.webp", "Y");
        let config = Config {
            dry_run: true,
            ..Config::default()
        };

        let summary = Deduplicator::new(config).run(dir.path()).unwrap();

        assert_eq!(names(&dir), vec!["a.webp", "b.webp", "c.webp"]);
        assert_eq!(summary.duplicate_count(), 1);
        assert_eq!(summary.deleted, 0);
        assert!(!summary.renumbered);
        let planned: Vec<String> = summary.renames.iter().map(RenameOp::to_name).collect();
        assert_eq!(planned, vec!["foto0001.webp", "foto0002.webp"]);
        assert_eq!(summary.renames[1].from, dir.path().join("c.webp"));
    }

    #[test]
    fn test_no_renumber_stops_after_purge() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.webp", "X");
        write(&dir, "b.webp", "X");
        let config = Config {
            renumber: false,
            ..Config::default()
        };

        let summary = Deduplicator::new(config).run(dir.path()).unwrap();

        assert_eq!(names(&dir), vec!["a.webp"]);
        assert!(summary.renames.is_empty());
    }

    #[test]
    fn test_pairing_policy() {
        let dir = TempDir::new().unwrap();
        for name in ["1.webp", "2.webp", "3.webp", "4.webp", "5.webp"] {
            write(&dir, name, name);
        }
        let config = Config {
            policy: Policy::Pairing,
            ..Config::default()
        };

        let summary = Deduplicator::new(config).run(dir.path()).unwrap();

        assert!(summary.digest.is_none());
        assert_eq!(summary.deleted, 2);
        assert_eq!(
            names(&dir),
            vec!["foto0001.webp", "foto0002.webp", "foto0003.webp"]
        );
        assert_eq!(fs::read_to_string(dir.path().join("foto0003.webp")).unwrap(), "5.webp");
    }

    #[test]
    fn test_missing_directory_is_directory_error() {
        let dir = TempDir::new().unwrap();
        let err = Deduplicator::new(Config::default())
            .run(&dir.path().join("missing"))
            .unwrap_err();
        assert!(err.is_directory_error());
    }

    #[test]
    fn test_invalid_prefix_rejected_before_scanning() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.webp", "X");
        let config = Config {
            prefix: "x/y".to_string(),
            ..Config::default()
        };
        let mut dedup = Deduplicator::new(config);

        let err = dedup.run(dir.path()).unwrap_err();

        assert!(matches!(err, PipelineError::Rename(RenameError::InvalidPrefix(_))));
        assert_eq!(dedup.stage(), Stage::Idle);
        assert_eq!(names(&dir), vec!["a.webp"]);
    }

    #[test]
    fn test_run_twice_rejected() {
        let dir = TempDir::new().unwrap();
        let mut dedup = Deduplicator::new(Config::default());
        dedup.run(dir.path()).unwrap();
        assert!(matches!(dedup.run(dir.path()), Err(PipelineError::AlreadyRun)));
    }
}
