//! Single-directory file listing with glob selection.
//!
//! Only the immediate children of the target directory are considered.
//! Results are always sorted by file name in ascending byte order, which is
//! what makes "first seen" (and therefore which copy survives) reproducible
//! across runs.
//!
//! Hidden files (names starting with `.`) only match a pattern that itself
//! starts with `.`, as in shell globbing.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use ignore::overrides::{Override, OverrideBuilder};
use walkdir::WalkDir;

use super::ScanError;

/// A compiled filename glob such as `*.webp`.
#[derive(Debug, Clone)]
pub struct FilePattern {
    glob: String,
    matcher: Override,
    include_hidden: bool,
}

impl FilePattern {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPattern`] for an empty or malformed glob,
    /// or a negated (`!`) glob.
    pub fn new(glob: &str) -> Result<Self, ScanError> {
        let trimmed = glob.trim();
        if trimmed.is_empty() {
            return Err(ScanError::invalid_pattern(glob, "pattern is empty"));
        }
        if trimmed.starts_with('!') {
            return Err(ScanError::invalid_pattern(
                glob,
                "negated patterns are not supported",
            ));
        }

        let mut builder = OverrideBuilder::new(".");
        builder
            .add(trimmed)
            .map_err(|e| ScanError::invalid_pattern(glob, e.to_string()))?;
        let matcher = builder
            .build()
            .map_err(|e| ScanError::invalid_pattern(glob, e.to_string()))?;

        Ok(Self {
            glob: trimmed.to_string(),
            matcher,
            include_hidden: trimmed.starts_with('.'),
        })
    }

    /// The glob this pattern was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.glob
    }

    /// Whether a bare file name matches.
    #[must_use]
    pub fn matches(&self, file_name: &OsStr) -> bool {
        if !self.include_hidden && file_name.as_encoded_bytes().starts_with(b".") {
            return false;
        }
        self.matcher.matched(Path::new(file_name), false).is_whitelist()
    }
}

/// Fail unless `directory` exists and is a directory.
///
/// # Errors
///
/// [`ScanError::DirectoryNotFound`] or [`ScanError::NotADirectory`].
pub fn ensure_directory(directory: &Path) -> Result<(), ScanError> {
    match std::fs::metadata(directory) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory(directory.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ScanError::DirectoryNotFound(directory.to_path_buf()))
        }
        Err(e) => Err(ScanError::Io {
            path: directory.to_path_buf(),
            source: e,
        }),
    }
}

/// List regular files directly inside `directory` whose names match
/// `pattern`, sorted by file name.
///
/// Subdirectories and symbolic links are skipped. Entries that cannot be
/// inspected are logged and skipped.
///
/// # Errors
///
/// Fails if the directory is missing, is not a directory, or cannot be read.
pub fn list_matching(directory: &Path, pattern: &FilePattern) -> Result<Vec<PathBuf>, ScanError> {
    ensure_directory(directory)?;

    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                return Err(ScanError::Io {
                    path: directory.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            log::trace!("Skipping non-file entry: {}", entry.path().display());
            continue;
        }
        if pattern.matches(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    log::debug!(
        "Listed {} file(s) matching '{}' in {}",
        files.len(),
        pattern.as_str(),
        directory.display()
    );
    Ok(files)
}
