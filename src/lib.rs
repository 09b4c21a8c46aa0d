//! dupseq - remove duplicate files and renumber the rest
//!
//! Files in one directory are listed in file-name order, duplicates are
//! removed by content digest (or by positional pairing), and the remaining
//! files are renamed to a gap-free `<prefix><NNNN>.<ext>` sequence.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod scanner;

pub use app::run_app;
