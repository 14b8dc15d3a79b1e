//! Round Audit Trail
//!
//! Lets anyone re-check a finished game from published data:
//! - Per-round records (seed, fleet snapshot, shots, outcome)
//! - Hash-chained game transcripts
//! - Verification by deterministic recomputation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AUDIT TRAIL                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  record.rs   - RoundRecord + GameTranscript, digests, codecs│
//! │  verify.rs   - Recompute shots and outcomes from seeds      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod record;
pub mod verify;

// Re-export key types
pub use record::{RoundRecord, GameTranscript, RECORD_VERSION};
pub use verify::{verify_shots, verify_round, verify_transcript, AuditError};
