//! Structured error handling and exit codes.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Exit codes for the dupseq binary.
///
/// - 0: Success (file-level failures are only logged)
/// - 1: General error (invalid pattern, invalid configuration, rejected rename plan)
/// - 2: Directory not found, or the path is not a directory
/// - 3: Partial failure (only with `--strict`, when any file failed to read, delete or rename)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the run completed.
    Success = 0,
    /// General error: an unexpected or fatal failure.
    GeneralError = 1,
    /// The target directory does not exist or is not a directory.
    DirectoryNotFound = 2,
    /// Completed, but some files could not be processed (strict mode only).
    PartialFailure = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::DirectoryNotFound => "DS002",
            Self::PartialFailure => "DS003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}

/// A file that could not be read, deleted or renamed, with the reason.
///
/// Per-file failures never abort a run; they are collected here so the
/// caller can decide whether partial failure is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl FileFailure {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// File name component for console output, falling back to the full path.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Last path component as a lossy string.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
