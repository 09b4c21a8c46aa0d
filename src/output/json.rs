//! JSON output formatter for run reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "summary": {
//!     "directory": "/photos",
//!     "policy": "content",
//!     "digest": "blake3",
//!     "dry_run": false,
//!     "total_files": 3,
//!     "unique_files": 2,
//!     "duplicate_files": 1,
//!     "deleted": 1,
//!     "bytes_freed": 1024,
//!     "renamed": 2,
//!     "unchanged": 0,
//!     "failed": 0,
//!     "duration_ms": 12,
//!     "exit_code": 0,
//!     "exit_code_name": "DS000"
//!   },
//!   "duplicates": [
//!     { "path": "/photos/b.webp", "original": "/photos/a.webp", "digest": "af13..." }
//!   ],
//!   "renames": [
//!     { "from": "a.webp", "to": "foto0001.webp" }
//!   ],
//!   "failures": []
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::error::{ExitCode, FileFailure};
use crate::pipeline::RunSummary;

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Directory that was processed
    pub directory: String,
    /// Removal policy ("content", "pairing" or "none")
    pub policy: String,
    /// Digest algorithm, absent when content was not read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Whether nothing was changed
    pub dry_run: bool,
    /// Files matching the pattern
    pub total_files: usize,
    /// Files kept by classification
    pub unique_files: usize,
    /// Files classified as duplicates
    pub duplicate_files: usize,
    /// Files actually deleted
    pub deleted: usize,
    /// Bytes freed by deletion
    pub bytes_freed: u64,
    /// Files renamed (planned in a dry run)
    pub renamed: usize,
    /// Files that already had their target name
    pub unchanged: usize,
    /// File-level failures of any stage
    pub failed: usize,
    /// Duration of the run in milliseconds
    pub duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
}

impl JsonSummary {
    #[must_use]
    pub fn from_run_summary(summary: &RunSummary, exit_code: ExitCode) -> Self {
        Self {
            directory: summary.directory.to_string_lossy().into_owned(),
            policy: summary.policy.to_string(),
            digest: summary.digest.map(|d| d.to_string()),
            dry_run: summary.dry_run,
            total_files: summary.total_files,
            unique_files: summary.unique_files,
            duplicate_files: summary.duplicate_count(),
            deleted: summary.deleted,
            bytes_freed: summary.bytes_freed,
            renamed: summary.renames.len(),
            unchanged: summary.unchanged,
            failed: summary.failure_count(),
            duration_ms: summary.duration_ms,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// A duplicate and the survivor it matched.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    pub path: String,
    pub original: String,
    /// Hex digest, absent for the pairing policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// One rename, by file name.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRename {
    pub from: String,
    pub to: String,
}

/// A file-level failure and the stage it happened in.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    /// "read", "delete" or "rename"
    pub stage: &'static str,
    pub path: String,
    pub reason: String,
}

impl JsonFailure {
    fn new(stage: &'static str, failure: &FileFailure) -> Self {
        Self {
            stage,
            path: failure.path.to_string_lossy().into_owned(),
            reason: failure.reason.clone(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub summary: JsonSummary,
    pub duplicates: Vec<JsonDuplicate>,
    pub renames: Vec<JsonRename>,
    pub failures: Vec<JsonFailure>,
}

impl JsonOutput {
    /// Build the report for a finished run.
    #[must_use]
    pub fn new(summary: &RunSummary, exit_code: ExitCode) -> Self {
        let failures = summary
            .read_failures
            .iter()
            .map(|f| JsonFailure::new("read", f))
            .chain(summary.delete_failures.iter().map(|f| JsonFailure::new("delete", f)))
            .chain(summary.rename_failures.iter().map(|f| JsonFailure::new("rename", f)))
            .collect();

        Self {
            summary: JsonSummary::from_run_summary(summary, exit_code),
            duplicates: summary
                .duplicates
                .iter()
                .map(|d| JsonDuplicate {
                    path: d.path.to_string_lossy().into_owned(),
                    original: d.original.to_string_lossy().into_owned(),
                    digest: d.digest.map(|h| h.to_hex()),
                })
                .collect(),
            renames: summary
                .renames
                .iter()
                .map(|op| JsonRename {
                    from: op.from_name(),
                    to: op.to_name(),
                })
                .collect(),
            failures,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
