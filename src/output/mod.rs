//! Run reports.
//!
//! - Text for people, colored with `yansi`
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupseq::config::Config;
//! use dupseq::error::ExitCode;
//! use dupseq::output::{JsonOutput, TextReport};
//! use dupseq::pipeline::Deduplicator;
//! use std::path::Path;
//!
//! let summary = Deduplicator::new(Config::default()).run(Path::new(".")).unwrap();
//!
//! print!("{}", TextReport::new(&summary).render());
//! println!("{}", JsonOutput::new(&summary, ExitCode::Success).to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError};
pub use text::TextReport;
