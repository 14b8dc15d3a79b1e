//! Lifecycle Events and Side Effects
//!
//! Events are the only inputs to the state machine. Side effects are
//! declarative instructions it returns for collaborators to execute,
//! in order. Both serialize as tagged JSON for persistence and queues.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::core::seed::Seed;
use crate::game::identity::WalletAddress;
use crate::game::placement::Placement;

/// Input to [`crate::game::machine::transition`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    /// A player paid in and placed a ship.
    PlayerJoined {
        /// Joining wallet
        wallet: WalletAddress,
    },

    /// The orchestrator observed a full lobby.
    MaxPlayersReached,

    /// The join deadline passed.
    DeadlineReached,

    /// Operator starts the game early.
    AdminForceStart,

    /// Operator cancels the game.
    AdminCancel,

    /// A salvo was fired and applied to player records.
    SalvoComplete {
        /// Seed the salvo was generated from
        seed: Seed,
        /// Active players after the salvo
        survivors: Vec<WalletAddress>,
    },

    /// A survivor moved their ship.
    RepositionSubmitted {
        /// Moving wallet
        wallet: WalletAddress,
        /// New position
        position: Placement,
    },

    /// The reposition window closed.
    RepositionTimeout,
}

impl GameEvent {
    /// Wire name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "PLAYER_JOINED",
            GameEvent::MaxPlayersReached => "MAX_PLAYERS_REACHED",
            GameEvent::DeadlineReached => "DEADLINE_REACHED",
            GameEvent::AdminForceStart => "ADMIN_FORCE_START",
            GameEvent::AdminCancel => "ADMIN_CANCEL",
            GameEvent::SalvoComplete { .. } => "SALVO_COMPLETE",
            GameEvent::RepositionSubmitted { .. } => "REPOSITION_SUBMITTED",
            GameEvent::RepositionTimeout => "REPOSITION_TIMEOUT",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Instruction for an external collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SideEffect {
    /// Send a message to players (`None` = everyone in the game).
    NotifyPlayers {
        /// Message text
        message: String,
        /// Recipients
        #[serde(skip_serializing_if = "Option::is_none")]
        wallets: Option<Vec<WalletAddress>>,
    },

    /// Split the pot among winners.
    ProcessPayouts {
        /// Winning wallets
        winners: Vec<WalletAddress>,
    },

    /// Return entry fees.
    ProcessRefunds {
        /// Wallets to refund
        wallets: Vec<WalletAddress>,
    },

    /// Deliver `event` back to the state machine after `duration_ms`.
    ScheduleTimeout {
        /// Delay in milliseconds
        duration_ms: u64,
        /// Event to deliver
        event: GameEvent,
    },

    /// Public announcement.
    PostTweet {
        /// Announcement text
        content: String,
    },

    /// Fire the next salvo.
    TriggerSalvo,
}

impl SideEffect {
    /// Notify everyone.
    pub fn notify_all(message: impl Into<String>) -> Self {
        SideEffect::NotifyPlayers {
            message: message.into(),
            wallets: None,
        }
    }

    /// Notify a subset of players.
    pub fn notify(message: impl Into<String>, wallets: Vec<WalletAddress>) -> Self {
        SideEffect::NotifyPlayers {
            message: message.into(),
            wallets: Some(wallets),
        }
    }

    /// Wire name of the effect kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SideEffect::NotifyPlayers { .. } => "NOTIFY_PLAYERS",
            SideEffect::ProcessPayouts { .. } => "PROCESS_PAYOUTS",
            SideEffect::ProcessRefunds { .. } => "PROCESS_REFUNDS",
            SideEffect::ScheduleTimeout { .. } => "SCHEDULE_TIMEOUT",
            SideEffect::PostTweet { .. } => "POST_TWEET",
            SideEffect::TriggerSalvo => "TRIGGER_SALVO",
        }
    }
}
