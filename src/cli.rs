//! Command-line interface definitions for dupseq.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Each removal policy has its own subcommand; they are never combined in one run.
//!
//! # Example
//!
//! ```bash
//! # Remove identical files, then renumber to foto0001.webp, foto0002.webp, ...
//! dupseq dedup ~/event/photos
//!
//! # Preview only, as JSON
//! dupseq dedup ~/event/photos --dry-run --output json
//!
//! # Editor exports written in original/edited pairs: drop every second file
//! dupseq pairs ~/event/exports --prefix fiesta
//!
//! # Only renumber
//! dupseq renumber ~/event/photos --pattern '*.jpg' --pad-width 3
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::Policy;
use crate::scanner::DigestAlgorithm;

/// Remove duplicate files and renumber the survivors into a gap-free sequence.
///
/// Files are listed in file-name order. With `dedup`, the first of several
/// identical files is kept; with `pairs`, every second file is removed. The
/// remaining files are renamed to `<prefix><NNNN>.<ext>`.
#[derive(Debug, Parser)]
#[command(name = "dupseq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dupseq.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Remove files with identical content, then renumber
    Dedup(DedupArgs),
    /// Remove every second file in name order, then renumber
    Pairs(PairsArgs),
    /// Renumber matching files without removing any
    Renumber(RenumberArgs),
}

impl Commands {
    /// Options shared by every subcommand.
    #[must_use]
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Dedup(args) => &args.common,
            Commands::Pairs(args) => &args.common,
            Commands::Renumber(args) => &args.common,
        }
    }

    /// Target directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.common().path
    }

    /// Removal policy selected by the subcommand.
    #[must_use]
    pub fn policy(&self) -> Policy {
        match self {
            Commands::Dedup(_) => Policy::Content,
            Commands::Pairs(_) => Policy::Pairing,
            Commands::Renumber(_) => Policy::None,
        }
    }

    /// Removal options, absent for `renumber`.
    #[must_use]
    pub fn removal(&self) -> Option<&RemovalArgs> {
        match self {
            Commands::Dedup(args) => Some(&args.removal),
            Commands::Pairs(args) => Some(&args.removal),
            Commands::Renumber(_) => None,
        }
    }
}

/// Options shared by every subcommand.
///
/// Value options are optional so that `DUPSEQ_*` environment variables apply
/// when a flag is not given.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Directory holding the files
    #[arg(value_name = "DIR")]
    pub path: PathBuf,

    /// Glob selecting files by name [default: *.webp]
    #[arg(short, long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Name prefix for renumbered files [default: foto]
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Zero-padded width of the sequence number [default: 4]
    #[arg(long, value_name = "N")]
    pub pad_width: Option<usize>,

    /// Report what would be deleted and renamed without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Exit with code 3 if any file could not be read, deleted or renamed
    #[arg(long)]
    pub strict: bool,

    /// Output format [default: text]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

/// Options for subcommands that delete files.
#[derive(Debug, Args)]
pub struct RemovalArgs {
    /// Move duplicates to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Stop after removing duplicates
    #[arg(long)]
    pub no_renumber: bool,
}

/// Arguments for the dedup subcommand.
#[derive(Debug, Args)]
pub struct DedupArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub removal: RemovalArgs,

    /// Content digest algorithm [default: blake3]
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub digest: Option<DigestAlgorithm>,

    /// Read buffer size for hashing (e.g., 64KiB, 1MB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub chunk_size: Option<u64>,
}

/// Arguments for the pairs subcommand.
#[derive(Debug, Args)]
pub struct PairsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub removal: RemovalArgs,
}

/// Arguments for the renumber subcommand.
#[derive(Debug, Args)]
pub struct RenumberArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupseq::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
