//! File actions module.
//!
//! This module provides the two mutating stages of a run:
//! - Best-effort deletion of duplicates ([`delete`])
//! - Collision-safe renumbering of the remaining files ([`rename`])
//!
//! # Deletion
//!
//! Files are removed permanently by default, or moved to the system trash:
//!
//! ```no_run
//! use dupseq::actions::{purge, DeleteConfig};
//! use std::path::PathBuf;
//!
//! let result = purge(&[PathBuf::from("images/b.webp")], &DeleteConfig::trash());
//! println!("{}", result.summary());
//! ```
//!
//! # Renumbering
//!
//! A [`RenamePlan`] is built and verified in full before the first rename.

pub mod delete;
pub mod rename;

// Re-export commonly used types
pub use delete::{
    delete_file, delete_to_trash, permanent_delete, purge, purge_with_progress,
    validate_preserves_survivors, BatchDeleteResult, DeleteConfig, DeleteError, DeleteResult,
};

pub use rename::{
    plan_renumber, renumber, Naming, RenameError, RenameOp, RenameOutcome, RenamePlan,
    MAX_PAD_WIDTH,
};
