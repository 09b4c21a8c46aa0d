//! Positional pairing policy.
//!
//! For sets exported by an editor that writes every photo twice (an
//! original and an edited copy with adjacent names), the second file of
//! each pair is a duplicate of the first. Content is never read: the
//! decision depends only on position in the sorted listing, so this policy
//! must only be used when that pairing is known to hold.

use std::path::PathBuf;

use super::{Classification, Duplicate};

/// Mark every file at an even 1-based position as a duplicate of the file
/// just before it.
///
/// `paths` must already be in listing order.
///
/// # Example
///
/// ```
/// use dupseq::duplicates::pair;
/// use std::path::PathBuf;
///
/// let paths: Vec<PathBuf> = ["1", "2", "3"].iter().map(PathBuf::from).collect();
/// let classification = pair(&paths);
/// assert_eq!(classification.survivors, vec![PathBuf::from("1"), PathBuf::from("3")]);
/// assert_eq!(classification.duplicate_paths(), vec![PathBuf::from("2")]);
/// ```
#[must_use]
pub fn pair(paths: &[PathBuf]) -> Classification {
    let mut classification = Classification::default();

    for chunk in paths.chunks(2) {
        classification.survivors.push(chunk[0].clone());
        if let Some(second) = chunk.get(1) {
            log::info!(
                "[PAIR] {} pairs with {}",
                crate::error::display_name(second),
                crate::error::display_name(&chunk[0])
            );
            classification.duplicates.push(Duplicate {
                path: second.clone(),
                original: chunk[0].clone(),
                digest: None,
            });
        }
    }

    classification
}
