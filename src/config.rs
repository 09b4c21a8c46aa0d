//! Run configuration.
//!
//! A [`Config`] is assembled in three layers, later layers winning:
//!
//! 1. built-in defaults ([`Config::default`])
//! 2. environment variables prefixed `DUPSEQ_` (e.g. `DUPSEQ_PREFIX=fiesta`)
//! 3. command-line flags ([`Config::merge_args`])
//!
//! There is no configuration file. The finished value is passed explicitly
//! to the pipeline; nothing reads configuration from global state.

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::MAX_PAD_WIDTH;
use crate::cli::{Commands, OutputFormat};
use crate::pipeline::Policy;
use crate::scanner::{DigestAlgorithm, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "DUPSEQ_";

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob selecting files by name.
    pub pattern: String,
    /// Name prefix for renumbered files.
    pub prefix: String,
    /// Zero-padded width of the sequence number.
    pub pad_width: usize,
    /// Content digest algorithm.
    pub digest: DigestAlgorithm,
    /// Read buffer size for hashing, in bytes.
    pub chunk_size: usize,
    /// Report only; change nothing.
    pub dry_run: bool,
    /// Move duplicates to the trash instead of deleting them.
    pub trash: bool,
    /// Renumber after removal.
    pub renumber: bool,
    /// Treat file-level failures as a failed run.
    pub strict: bool,
    /// Removal policy.
    pub policy: Policy,
    /// Report format.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: "*.webp".to_string(),
            prefix: "foto".to_string(),
            pad_width: 4,
            digest: DigestAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            dry_run: false,
            trash: false,
            renumber: true,
            strict: false,
            policy: Policy::default(),
            output: OutputFormat::default(),
        }
    }
}

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("pattern must not be empty")]
    EmptyPattern,

    #[error("invalid prefix '{0}': must not contain path separators")]
    InvalidPrefix(String),

    #[error("invalid pad width {0}: must be between 1 and {MAX_PAD_WIDTH}")]
    InvalidPadWidth(usize),

    #[error("chunk size must be at least 1 byte")]
    ZeroChunkSize,

    #[error("chunk size {0} is too large: the maximum is {MAX_CHUNK_SIZE} bytes")]
    ChunkSizeTooLarge(usize),
}

impl Config {
    /// Defaults merged with `DUPSEQ_*` environment variables.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load defaults and environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Load` if an environment variable has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load, apply the command line, and validate.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`].
    pub fn from_command(command: &Commands) -> Result<Self, ConfigError> {
        let mut config = Self::load()?;
        config.merge_args(command);
        config.validate()?;
        log::debug!("Effective configuration: {config:?}");
        Ok(config)
    }

    /// Apply flags given on the command line. Absent flags leave the
    /// current value untouched.
    pub fn merge_args(&mut self, command: &Commands) {
        let common = command.common();
        if let Some(ref pattern) = common.pattern {
            self.pattern = pattern.clone();
        }
        if let Some(ref prefix) = common.prefix {
            self.prefix = prefix.clone();
        }
        if let Some(pad_width) = common.pad_width {
            self.pad_width = pad_width;
        }
        if let Some(output) = common.output {
            self.output = output;
        }
        self.dry_run |= common.dry_run;
        self.strict |= common.strict;

        self.policy = command.policy();
        match command.removal() {
            Some(removal) => {
                self.trash |= removal.trash;
                if removal.no_renumber {
                    self.renumber = false;
                }
            }
            None => self.renumber = true,
        }

        if let Commands::Dedup(args) = command {
            if let Some(digest) = args.digest {
                self.digest = digest;
            }
            if let Some(chunk_size) = args.chunk_size {
                self.chunk_size = usize::try_from(chunk_size).unwrap_or(usize::MAX);
            }
        }
    }

    /// # Errors
    ///
    /// Rejects an empty pattern, a prefix with path separators, a pad width
    /// outside `1..=12` and a zero chunk size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.trim().is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        if self.prefix.contains(['/', '\\']) || self.prefix == "." || self.prefix == ".." {
            return Err(ConfigError::InvalidPrefix(self.prefix.clone()));
        }
        if self.pad_width == 0 || self.pad_width > MAX_PAD_WIDTH {
            return Err(ConfigError::InvalidPadWidth(self.pad_width));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ChunkSizeTooLarge(self.chunk_size));
        }
        Ok(())
    }
}
