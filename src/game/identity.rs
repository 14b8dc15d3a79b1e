//! Player and Game Identifiers
//!
//! Opaque identities parsed once at the boundary. The engine never
//! inspects wallet contents beyond basic well-formedness.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Errors raised when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Wallet string was empty.
    #[error("wallet address is empty")]
    EmptyWallet,

    /// Wallet string contained whitespace.
    #[error("wallet address {0:?} contains whitespace")]
    WhitespaceInWallet(String),

    /// Game id was not a UUID.
    #[error("invalid game id {0:?}")]
    InvalidGameId(String),
}

/// Wallet identity of a participant.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse a wallet address.
    pub fn parse(text: &str) -> Result<Self, IdentityError> {
        if text.is_empty() {
            return Err(IdentityError::EmptyWallet);
        }
        if text.chars().any(char::is_whitespace) {
            return Err(IdentityError::WhitespaceInWallet(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    /// Borrow the address text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for log lines (first 8 characters).
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((i, _)) => &self.0[..i],
            None => &self.0,
        }
    }
}

impl FromStr for WalletAddress {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(wallet: WalletAddress) -> String {
        wallet.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique game identifier (UUID).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(uuid::Uuid);

impl GameId {
    /// Generate a fresh random id.
    pub fn new_v4() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Uuid::from_bytes(bytes))
    }

    /// Parse from UUID string.
    pub fn parse(text: &str) -> Result<Self, IdentityError> {
        uuid::Uuid::parse_str(text)
            .map(Self)
            .map_err(|_| IdentityError::InvalidGameId(text.to_string()))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
