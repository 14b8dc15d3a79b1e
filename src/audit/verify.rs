//! Verification API
//!
//! Verify rounds by deterministic recomputation. Anyone holding a record
//! can re-derive the shots from the seed and the outcome from the fleet.

use thiserror::Error;

use crate::game::salvo::{generate_shots, process_salvo, SalvoError};

use super::record::{GameTranscript, RoundRecord, RECORD_VERSION};

/// Errors that can occur during verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// Record format version not understood.
    #[error("version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version
        expected: u8,
        /// Record version
        got: u8,
    },

    /// Recorded shots differ from the seed's shots.
    #[error("round {round}: recorded shots do not match seed")]
    ShotMismatch {
        /// Round number
        round: u32,
    },

    /// Recorded hits/eliminations/survivors differ from recomputation.
    #[error("round {round}: recorded outcome does not match recomputation")]
    OutcomeMismatch {
        /// Round number
        round: u32,
    },

    /// Shot count differs from the game's config.
    #[error("round {round}: shot count {got} does not match configured {expected}")]
    ShotCountMismatch {
        /// Round number
        round: u32,
        /// Configured count
        expected: u8,
        /// Recorded count
        got: u8,
    },

    /// Round numbers not consecutive.
    #[error("expected round {expected}, got {got}")]
    RoundOutOfOrder {
        /// Next expected round
        expected: u32,
        /// Round found
        got: u32,
    },

    /// Record belongs to a different game.
    #[error("round {round} belongs to a different game")]
    GameMismatch {
        /// Round number
        round: u32,
    },

    /// Seed or shot count invalid.
    #[error(transparent)]
    Salvo(#[from] SalvoError),

    /// Encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(String),
}

/// Check a record's shots against its seed.
pub fn verify_shots(record: &RoundRecord) -> Result<(), AuditError> {
    if record.version != RECORD_VERSION {
        return Err(AuditError::VersionMismatch {
            expected: RECORD_VERSION,
            got: record.version,
        });
    }
    let shots = generate_shots(&record.seed, record.shot_count as usize)?;
    if shots != record.shots {
        return Err(AuditError::ShotMismatch { round: record.round });
    }
    Ok(())
}

/// Check shots and the full outcome of a record.
pub fn verify_round(record: &RoundRecord) -> Result<(), AuditError> {
    verify_shots(record)?;
    let recomputed = process_salvo(&record.seed, record.shot_count as usize, &record.fleet)?;
    if recomputed != record.result() {
        return Err(AuditError::OutcomeMismatch { round: record.round });
    }
    Ok(())
}

/// Verify every round of a transcript, in order.
pub fn verify_transcript(transcript: &GameTranscript) -> Result<(), AuditError> {
    for (i, record) in transcript.rounds.iter().enumerate() {
        let expected = i as u32 + 1;
        if record.round != expected {
            return Err(AuditError::RoundOutOfOrder { expected, got: record.round });
        }
        if record.game_id != transcript.game_id {
            return Err(AuditError::GameMismatch { round: record.round });
        }
        if record.shot_count != transcript.config.shots_per_salvo {
            return Err(AuditError::ShotCountMismatch {
                round: record.round,
                expected: transcript.config.shots_per_salvo,
                got: record.shot_count,
            });
        }
        verify_round(record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::CellIndex;
    use crate::core::seed::Seed;
    use crate::game::config::GameConfig;
    use crate::game::identity::{GameId, WalletAddress};
    use crate::game::placement::{validate_placement, ShipSize};
    use crate::game::state::PlayerState;

    fn record() -> RoundRecord {
        let seed = Seed::parse(&"a".repeat(64)).unwrap();
        let fleet = vec![
            PlayerState::new(
                WalletAddress::parse("p1").unwrap(),
                validate_placement(&[10, 11], ShipSize::Two).unwrap(),
            ),
            PlayerState::new(
                WalletAddress::parse("p2").unwrap(),
                validate_placement(&[0, 1], ShipSize::Two).unwrap(),
            ),
        ];
        let result = process_salvo(&seed, 5, &fleet).unwrap();
        RoundRecord::new(GameId::from_bytes([3; 16]), 1, seed, 5, &fleet, &result)
    }

    #[test]
    fn test_honest_record_verifies() {
        assert_eq!(verify_round(&record()), Ok(()));
    }

    #[test]
    fn test_tampered_shots_detected() {
        let mut rec = record();
        rec.shots[0] = CellIndex::new(0).unwrap();
        assert_eq!(verify_shots(&rec), Err(AuditError::ShotMismatch { round: 1 }));
    }

    #[test]
    fn test_tampered_outcome_detected() {
        let mut rec = record();
        rec.eliminations.clear();
        assert_eq!(verify_round(&rec), Err(AuditError::OutcomeMismatch { round: 1 }));
    }

    #[test]
    fn test_version_checked() {
        let mut rec = record();
        rec.version = 9;
        assert!(matches!(verify_round(&rec), Err(AuditError::VersionMismatch { got: 9, .. })));
    }

    #[test]
    fn test_transcript_shot_count_checked() {
        let rec = record();
        let config = GameConfig { shots_per_salvo: 6, ..GameConfig::default() };
        let mut transcript = GameTranscript::new(rec.game_id, config);
        transcript.push(rec).unwrap();
        assert!(matches!(
            verify_transcript(&transcript),
            Err(AuditError::ShotCountMismatch { expected: 6, got: 5, .. })
        ));

        transcript.config.shots_per_salvo = 5;
        assert_eq!(verify_transcript(&transcript), Ok(()));
    }
}
