//! Streaming content digests.
//!
//! # Overview
//!
//! [`Hasher`] reads a file in fixed-size chunks and feeds each chunk into
//! the selected algorithm, so memory use stays at one buffer regardless of
//! file size. Both supported algorithms produce 256-bit digests, stored as
//! a [`Digest`].
//!
//! # Example
//!
//! ```no_run
//! use dupseq::scanner::{DigestAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(DigestAlgorithm::Blake3);
//! let digest = hasher.digest_file(Path::new("photo.webp")).unwrap();
//! println!("{digest}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest as _, Sha256};

use super::ReadError;

/// Default read buffer size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Largest read buffer a [`Hasher`] allocates.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Content digest algorithm.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// BLAKE3 (default)
    #[default]
    Blake3,
    /// SHA-256
    Sha256,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// A 256-bit content fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hexadecimal form (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character hexadecimal string.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 64 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

enum State {
    Blake3(Box<blake3::Hasher>),
    Sha256(Sha256),
}

impl State {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            DigestAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Blake3(h) => {
                h.update(chunk);
            }
            Self::Sha256(h) => h.update(chunk),
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Blake3(h) => Digest(*h.finalize().as_bytes()),
            Self::Sha256(h) => Digest(h.finalize().into()),
        }
    }
}

/// Computes file digests by streaming fixed-size chunks.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: DigestAlgorithm,
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(DigestAlgorithm::default())
    }
}

impl Hasher {
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the read buffer size, clamped to `1..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digest the full contents of a file.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] if the file cannot be opened or read.
    pub fn digest_file(&self, path: &Path) -> Result<Digest, ReadError> {
        let file = File::open(path).map_err(|e| ReadError::from_io(path, e))?;
        let digest = self
            .digest_reader(file)
            .map_err(|e| ReadError::from_io(path, e))?;
        log::trace!("{} {}: {}", self.algorithm, path.display(), digest);
        Ok(digest)
    }

    /// Digest everything a reader yields.
    ///
    /// # Errors
    ///
    /// Propagates read errors other than `Interrupted`, which is retried.
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> io::Result<Digest> {
        let mut state = State::new(self.algorithm);
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => state.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(state.finalize())
    }

    /// Digest an in-memory byte slice.
    #[must_use]
    pub fn digest_bytes(&self, bytes: &[u8]) -> Digest {
        let mut state = State::new(self.algorithm);
        state.update(bytes);
        state.finalize()
    }
}
