//! Audit Hashing
//!
//! Domain-separated SHA-256 used for round digests, transcript chaining
//! and seed derivation. Order of updates is part of the digest format.

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type AuditDigest = [u8; 32];

/// Domain for per-round audit records.
pub const ROUND_DOMAIN: &[u8] = b"SALVO_ARENA_ROUND_V1";

/// Domain for transcript chaining.
pub const TRANSCRIPT_DOMAIN: &[u8] = b"SALVO_ARENA_TRANSCRIPT_V1";

/// Domain for round seed derivation.
pub const SEED_DOMAIN: &[u8] = b"SALVO_ARENA_SEED_V1";

/// Deterministic hasher for audit data.
///
/// Variable-length fields are length-prefixed so adjacent fields
/// cannot be shifted into each other.
pub struct AuditHasher {
    hasher: Sha256,
}

impl AuditHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Update with raw bytes (no length prefix).
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a length-prefixed string.
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Update with a length-prefixed byte list.
    pub fn update_list(&mut self, values: &[u8]) {
        self.update_u32(values.len() as u32);
        self.hasher.update(values);
    }

    /// Update with a count-prefixed sequence of strings.
    pub fn update_strs<'a>(&mut self, values: impl ExactSizeIterator<Item = &'a str>) {
        self.update_u32(values.len() as u32);
        for value in values {
            self.update_str(value);
        }
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> AuditDigest {
        self.hasher.finalize().into()
    }
}

/// Compute hash with domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> AuditDigest {
    let mut hasher = AuditHasher::new(domain);
    hasher.update_bytes(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_determinism() {
        let make_hash = || {
            let mut hasher = AuditHasher::new(ROUND_DOMAIN);
            hasher.update_u32(3);
            hasher.update_str("wallet-a");
            hasher.update_list(&[1, 2, 3]);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_wallet_order_matters() {
        let digest = |wallets: &[&str]| {
            let mut h = AuditHasher::new(ROUND_DOMAIN);
            h.update_strs(wallets.iter().copied());
            h.finalize()
        };

        assert_ne!(digest(&["p1", "p2"]), digest(&["p2", "p1"]));
        assert_ne!(digest(&["p1"]), digest(&["p1", ""]));
    }

    #[test]
    fn test_length_prefix_prevents_shifting() {
        let split = |a: &str, b: &str| {
            let mut h = AuditHasher::new(SEED_DOMAIN);
            h.update_str(a);
            h.update_str(b);
            h.finalize()
        };

        assert_ne!(split("ab", "c"), split("a", "bc"));
        assert_eq!(split("ab", "c"), split("ab", "c"));
    }

    #[test]
    fn test_domain_separation() {
        let data = [1u8, 2, 3, 4];
        assert_ne!(
            hash_with_domain(ROUND_DOMAIN, &data),
            hash_with_domain(TRANSCRIPT_DOMAIN, &data),
        );
    }
}
