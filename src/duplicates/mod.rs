//! Duplicate detection module.
//!
//! This module provides the two removal policies:
//! - Content classification by digest ([`classify`])
//! - Positional pairing ([`pair`])
//!
//! Both produce a [`Classification`]; the policies are never combined.

pub mod classify;
pub mod pairing;

use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::Digest;

pub use classify::{classify, Classification, DigestIndex};
pub use pairing::pair;

/// A file classified as a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    /// The file to delete
    pub path: PathBuf,
    /// The survivor it duplicates
    pub original: PathBuf,
    /// Shared digest (absent for the pairing policy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
}
