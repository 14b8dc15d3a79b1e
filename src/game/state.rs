//! Game State Definitions
//!
//! Player and game records. `GameState` is only ever produced by
//! [`crate::game::machine::transition`]; player records are updated by
//! applying salvo results and reposition submissions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::core::grid::CellIndex;
use crate::game::config::GameConfig;
use crate::game::identity::WalletAddress;
use crate::game::placement::{Placement, PlacementError};

// =============================================================================
// PLAYER STATE
// =============================================================================

/// State of a single participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Wallet identity
    pub wallet: WalletAddress,

    /// Optional display handle
    pub handle: Option<String>,

    /// Current ship position
    pub position: Placement,

    /// Cells already struck (sorted, only grows)
    pub hits: Vec<CellIndex>,

    /// Has every ship cell been struck?
    pub is_eliminated: bool,

    /// Round in which the player was eliminated
    pub eliminated_round: Option<u32>,

    /// Last round in which the player submitted a new position
    pub repositioned_round: Option<u32>,
}

impl PlayerState {
    /// Create a player on join.
    pub fn new(wallet: WalletAddress, position: Placement) -> Self {
        Self {
            wallet,
            handle: None,
            position,
            hits: Vec::new(),
            is_eliminated: false,
            eliminated_round: None,
            repositioned_round: None,
        }
    }

    /// Attach a display handle.
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Still in the game?
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_eliminated
    }

    /// Cells of the current position not yet struck.
    pub fn unhit_cells(&self) -> Vec<CellIndex> {
        self.position
            .cells()
            .iter()
            .copied()
            .filter(|c| self.hits.binary_search(c).is_err())
            .collect()
    }

    /// Merge newly struck cells into `hits`.
    pub fn record_hits(&mut self, cells: &[CellIndex]) {
        for &cell in cells {
            if let Err(i) = self.hits.binary_search(&cell) {
                self.hits.insert(i, cell);
            }
        }
    }

    /// Mark eliminated in `round`. Has no effect if already eliminated.
    pub fn eliminate(&mut self, round: u32) {
        if self.is_eliminated {
            return;
        }
        self.is_eliminated = true;
        self.eliminated_round = Some(round);
    }

    /// Move the ship during a reposition window.
    ///
    /// Allowed only while at least one current cell is unhit. The new
    /// placement must be the same size as the current one.
    pub fn reposition(&mut self, placement: Placement, round: u32) -> Result<(), PlacementError> {
        if self.is_eliminated || self.unhit_cells().is_empty() {
            return Err(PlacementError::NoUnhitCells);
        }
        if placement.len() != self.position.len() {
            return Err(PlacementError::WrongLength {
                expected: self.position.len(),
                got: placement.len(),
            });
        }
        self.position = placement;
        self.repositioned_round = Some(round);
        Ok(())
    }
}

// =============================================================================
// GAME STATUS
// =============================================================================

/// Lifecycle status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum GameStatus {
    /// Accepting players
    #[default]
    Waiting,
    /// Salvo pending or in flight
    Active,
    /// Survivors may move before the next salvo
    Repositioning,
    /// Winners decided (terminal)
    Complete,
    /// Game called off, entries refunded (terminal)
    Cancelled,
}

impl GameStatus {
    /// No further events are accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Complete | GameStatus::Cancelled)
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Waiting => "waiting",
            GameStatus::Active => "active",
            GameStatus::Repositioning => "repositioning",
            GameStatus::Complete => "complete",
            GameStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a game was cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// Fewer than two players when the join deadline passed
    InsufficientPlayers,
    /// Cancelled by an operator
    AdminCancelled,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Lifecycle state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current status
    pub status: GameStatus,

    /// Round number (0 while waiting, then 1..)
    pub round: u32,

    /// Join or reposition deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Winners (only once complete)
    pub winners: Vec<WalletAddress>,

    /// Cancel reason (only once cancelled)
    pub cancel_reason: Option<CancelReason>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh waiting state with no deadline.
    pub fn new() -> Self {
        Self {
            status: GameStatus::Waiting,
            round: 0,
            deadline: None,
            winners: Vec::new(),
            cancel_reason: None,
        }
    }

    /// Waiting state whose join deadline starts at `now`.
    pub fn open(now: DateTime<Utc>, config: &GameConfig) -> Self {
        Self {
            deadline: Some(now + config.join_window()),
            ..Self::new()
        }
    }

    /// Is the game over?
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}
