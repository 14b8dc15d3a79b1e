//! Round Records and Game Transcripts
//!
//! Everything needed to re-derive a round's outcome from public data:
//! the seed, the shot count and the fleet as it stood before the salvo.
//! Records are stored as JSON for operators and bincode for archives.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::core::grid::CellIndex;
use crate::core::hash::{hash_with_domain, AuditDigest, AuditHasher, ROUND_DOMAIN, TRANSCRIPT_DOMAIN};
use crate::core::seed::Seed;
use crate::game::config::GameConfig;
use crate::game::identity::{GameId, WalletAddress};
use crate::game::salvo::SalvoResult;
use crate::game::state::PlayerState;

use super::verify::AuditError;

/// Current record format version.
pub const RECORD_VERSION: u8 = 1;

/// Audit record of one fired salvo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Format version.
    pub version: u8,

    /// Game the round belongs to.
    pub game_id: GameId,

    /// Round number (1-based).
    pub round: u32,

    /// Seed the shots were generated from.
    pub seed: Seed,

    /// Shots requested.
    pub shot_count: u8,

    /// Player records immediately before the salvo.
    pub fleet: Vec<PlayerState>,

    /// Fired cells.
    pub shots: Vec<CellIndex>,

    /// New hits per player.
    pub hits: BTreeMap<WalletAddress, Vec<CellIndex>>,

    /// Players eliminated this round.
    pub eliminations: Vec<WalletAddress>,

    /// Players standing after this round.
    pub survivors: Vec<WalletAddress>,
}

impl RoundRecord {
    /// Record a resolved salvo.
    pub fn new(
        game_id: GameId,
        round: u32,
        seed: Seed,
        shot_count: u8,
        fleet: &[PlayerState],
        result: &SalvoResult,
    ) -> Self {
        Self {
            version: RECORD_VERSION,
            game_id,
            round,
            seed,
            shot_count,
            fleet: fleet.to_vec(),
            shots: result.shots.clone(),
            hits: result.hits.clone(),
            eliminations: result.eliminations.clone(),
            survivors: result.survivors.clone(),
        }
    }

    /// The recorded outcome as a salvo result.
    pub fn result(&self) -> SalvoResult {
        SalvoResult {
            shots: self.shots.clone(),
            hits: self.hits.clone(),
            eliminations: self.eliminations.clone(),
            survivors: self.survivors.clone(),
        }
    }

    /// Digest over every field, in declaration order.
    pub fn digest(&self) -> AuditDigest {
        let mut hasher = AuditHasher::new(ROUND_DOMAIN);
        hasher.update_u8(self.version);
        hasher.update_bytes(self.game_id.as_bytes());
        hasher.update_u32(self.round);
        hasher.update_bytes(self.seed.as_bytes());
        hasher.update_u8(self.shot_count);

        hasher.update_u32(self.fleet.len() as u32);
        for player in &self.fleet {
            hasher.update_str(player.wallet.as_str());
            hasher.update_list(&cell_bytes(player.position.cells()));
            hasher.update_list(&cell_bytes(&player.hits));
            hasher.update_u8(player.is_eliminated as u8);
        }

        hasher.update_list(&cell_bytes(&self.shots));
        hasher.update_u32(self.hits.len() as u32);
        for (wallet, cells) in &self.hits {
            hasher.update_str(wallet.as_str());
            hasher.update_list(&cell_bytes(cells));
        }
        hasher.update_strs(self.eliminations.iter().map(|w| w.as_str()));
        hasher.update_strs(self.survivors.iter().map(|w| w.as_str()));
        hasher.finalize()
    }

    /// Hex digest for logs and publication.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, AuditError> {
        serde_json::to_string(self).map_err(|e| AuditError::Codec(e.to_string()))
    }

    /// Deserialize from JSON.
    pub fn from_json(text: &str) -> Result<Self, AuditError> {
        serde_json::from_str(text).map_err(|e| AuditError::Codec(e.to_string()))
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AuditError> {
        bincode::serialize(self).map_err(|e| AuditError::Codec(e.to_string()))
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, AuditError> {
        bincode::deserialize(data).map_err(|e| AuditError::Codec(e.to_string()))
    }
}

fn cell_bytes(cells: &[CellIndex]) -> Vec<u8> {
    cells.iter().map(|c| c.index()).collect()
}

/// Ordered log of every round in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTranscript {
    /// Game identifier.
    pub game_id: GameId,

    /// Settings the game ran with.
    pub config: GameConfig,

    /// Rounds in firing order.
    pub rounds: Vec<RoundRecord>,
}

impl GameTranscript {
    /// Start an empty transcript.
    pub fn new(game_id: GameId, config: GameConfig) -> Self {
        Self {
            game_id,
            config,
            rounds: Vec::new(),
        }
    }

    /// Append the next round.
    ///
    /// Rounds must belong to this game and arrive in order starting at 1.
    pub fn push(&mut self, record: RoundRecord) -> Result<(), AuditError> {
        if record.game_id != self.game_id {
            return Err(AuditError::GameMismatch { round: record.round });
        }
        let expected = self.rounds.len() as u32 + 1;
        if record.round != expected {
            return Err(AuditError::RoundOutOfOrder { expected, got: record.round });
        }
        self.rounds.push(record);
        Ok(())
    }

    /// Most recent round, if any.
    pub fn last_round(&self) -> Option<&RoundRecord> {
        self.rounds.last()
    }

    /// Hash chain over the game id and every round digest.
    ///
    /// Publishing the head after each round commits to the full history.
    pub fn digest(&self) -> AuditDigest {
        let mut head = hash_with_domain(TRANSCRIPT_DOMAIN, self.game_id.as_bytes());
        for record in &self.rounds {
            let mut hasher = AuditHasher::new(TRANSCRIPT_DOMAIN);
            hasher.update_bytes(&head);
            hasher.update_bytes(&record.digest());
            head = hasher.finalize();
        }
        head
    }

    /// Hex chain head.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AuditError> {
        bincode::serialize(self).map_err(|e| AuditError::Codec(e.to_string()))
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, AuditError> {
        bincode::deserialize(data).map_err(|e| AuditError::Codec(e.to_string()))
    }
}
