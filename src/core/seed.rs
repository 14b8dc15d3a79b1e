//! Salvo Seeds
//!
//! A seed is 256 bits of externally supplied entropy, exchanged as a
//! 64-character hex string. Shot generation consumes it in 16-bit chunks.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use super::hash::{AuditHasher, SEED_DOMAIN};

/// Seed length in bytes.
pub const SEED_BYTES: usize = 32;

/// Seed length in hex characters.
pub const SEED_HEX_LEN: usize = SEED_BYTES * 2;

/// Number of 16-bit chunks before the walk wraps around.
pub const SEED_CHUNKS: usize = SEED_BYTES / 2;

/// Errors raised when parsing a seed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// Seed string is not exactly 64 characters.
    #[error("seed must be {SEED_HEX_LEN} hex characters, got {0}")]
    WrongLength(usize),

    /// Seed string contains a non-hex character.
    #[error("seed contains non-hex characters")]
    NotHex,
}

/// A validated 256-bit salvo seed.
///
/// Parsing is case-insensitive; the canonical text form is lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Seed([u8; SEED_BYTES]);

impl Seed {
    /// Parse a 64-character hex string (either case).
    pub fn parse(text: &str) -> Result<Self, SeedError> {
        if text.len() != SEED_HEX_LEN {
            return Err(SeedError::WrongLength(text.len()));
        }
        let mut bytes = [0u8; SEED_BYTES];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| SeedError::NotHex)?;
        Ok(Self(bytes))
    }

    /// Wrap raw seed bytes.
    pub const fn from_bytes(bytes: [u8; SEED_BYTES]) -> Self {
        Self(bytes)
    }

    /// Raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_BYTES] {
        &self.0
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The `n`th 16-bit chunk of the seed, wrapping cyclically.
    ///
    /// Chunk `n` is hex characters `4n..4n+4` read as a big-endian integer.
    #[inline]
    pub fn chunk(&self, n: usize) -> u16 {
        let i = (n % SEED_CHUNKS) * 2;
        u16::from_be_bytes([self.0[i], self.0[i + 1]])
    }

    /// Derive a round seed from an external beacon value.
    ///
    /// Binds the beacon to one game and round, so a single published
    /// beacon can drive a whole game without reusing shots.
    pub fn derive(beacon: &[u8], game_id: &[u8; 16], round: u32) -> Self {
        let mut hasher = AuditHasher::new(SEED_DOMAIN);
        hasher.update_list(beacon);
        hasher.update_bytes(game_id);
        hasher.update_u32(round);
        Self(hasher.finalize())
    }
}

impl FromStr for Seed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Seed {
    type Error = SeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> String {
        seed.to_hex()
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.to_hex())
    }
}
