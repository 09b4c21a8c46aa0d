//! Content-based classification into survivors and duplicates.
//!
//! # Overview
//!
//! Entries are visited in scan order. The first entry carrying a digest is
//! that digest's survivor and goes into the [`DigestIndex`]; every later
//! entry with the same digest is a [`Duplicate`] of it. Because scan order
//! is the sorted file-name order, the lexicographically smallest name among
//! identical files is always the one kept.
//!
//! # Example
//!
//! ```
//! use dupseq::duplicates::classify;
//! use dupseq::scanner::{FileEntry, Hasher};
//! use std::path::PathBuf;
//!
//! let hasher = Hasher::default();
//! let entries = vec![
//!     FileEntry::new(PathBuf::from("a.webp"), hasher.digest_bytes(b"X")),
//!     FileEntry::new(PathBuf::from("b.webp"), hasher.digest_bytes(b"X")),
//!     FileEntry::new(PathBuf::from("c.webp"), hasher.digest_bytes(b"Y")),
//! ];
//!
//! let (index, duplicates) = classify(entries);
//! assert_eq!(index.len(), 2);
//! assert_eq!(duplicates.len(), 1);
//! assert_eq!(duplicates[0].path, PathBuf::from("b.webp"));
//! assert_eq!(duplicates[0].original, PathBuf::from("a.webp"));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Duplicate;
use crate::scanner::{Digest, FileEntry};

/// Digest → first entry seen with that digest, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DigestIndex {
    survivors: Vec<FileEntry>,
    positions: HashMap<Digest, usize>,
}

impl DigestIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer an entry to the index.
    ///
    /// Returns `None` if the entry became a survivor, or the survivor it
    /// duplicates otherwise.
    pub fn insert(&mut self, entry: FileEntry) -> Option<&FileEntry> {
        if let Some(&pos) = self.positions.get(&entry.digest) {
            return self.survivors.get(pos);
        }
        self.positions.insert(entry.digest, self.survivors.len());
        self.survivors.push(entry);
        None
    }

    /// Survivor path for a digest.
    #[must_use]
    pub fn get(&self, digest: &Digest) -> Option<&Path> {
        self.positions
            .get(digest)
            .and_then(|&pos| self.survivors.get(pos))
            .map(|e| e.path.as_path())
    }

    #[must_use]
    pub fn contains(&self, digest: &Digest) -> bool {
        self.positions.contains_key(digest)
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }

    /// Survivors in first-seen order.
    #[must_use]
    pub fn survivors(&self) -> &[FileEntry] {
        &self.survivors
    }

    /// Iterate `(digest, survivor path)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &Path)> {
        self.survivors.iter().map(|e| (&e.digest, e.path.as_path()))
    }
}

/// Split scanned entries into a survivor index and an ordered duplicate list.
///
/// Survivors plus duplicates always equals the number of input entries.
#[must_use]
pub fn classify(entries: Vec<FileEntry>) -> (DigestIndex, Vec<Duplicate>) {
    let mut index = DigestIndex::new();
    let mut duplicates = Vec::new();

    for entry in entries {
        let path = entry.path.clone();
        let digest = entry.digest;
        if let Some(original) = index.insert(entry) {
            log::info!(
                "[DUPLICATE] {} duplicates {}",
                crate::error::display_name(&path),
                original.name()
            );
            duplicates.push(Duplicate {
                path,
                original: original.path.clone(),
                digest: Some(digest),
            });
        }
    }

    log::debug!(
        "Classified {} unique file(s), {} duplicate(s)",
        index.len(),
        duplicates.len()
    );
    (index, duplicates)
}

/// Policy-independent result of classification.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    /// Files to keep, in scan order.
    pub survivors: Vec<PathBuf>,
    /// Files to delete, in scan order.
    pub duplicates: Vec<Duplicate>,
}

impl Classification {
    /// Build from a content classification.
    #[must_use]
    pub fn from_content(index: &DigestIndex, duplicates: Vec<Duplicate>) -> Self {
        Self {
            survivors: index.survivors().iter().map(|e| e.path.clone()).collect(),
            duplicates,
        }
    }

    /// Every path is a survivor.
    #[must_use]
    pub fn keep_all(paths: &[PathBuf]) -> Self {
        Self {
            survivors: paths.to_vec(),
            duplicates: Vec::new(),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.survivors.len() + self.duplicates.len()
    }

    /// Paths slated for deletion.
    #[must_use]
    pub fn duplicate_paths(&self) -> Vec<PathBuf> {
        self.duplicates.iter().map(|d| d.path.clone()).collect()
    }
}
