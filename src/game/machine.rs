//! Lifecycle State Machine
//!
//! A pure reducer: `(state, event, context) -> (new state, side effects)`.
//!
//! ```text
//! waiting ──► active ──► repositioning ──► active ──► ... ──► complete
//!    │                        │
//!    └──────► cancelled ◄─────┘
//! ```
//!
//! ## Determinism
//!
//! `transition` performs no I/O and reads no clock: the caller supplies
//! `now` in the context. The same inputs always give the same state and
//! the same ordered effect list. Callers must serialize transitions per
//! game and persist the returned state before executing its effects.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::game::config::GameConfig;
use crate::game::events::{GameEvent, SideEffect};
use crate::game::identity::WalletAddress;
use crate::game::placement::Placement;
use crate::game::state::{CancelReason, GameState, GameStatus, PlayerState};

/// Minimum active players for a game to run.
pub const MIN_PLAYERS: usize = 2;

/// Event rejected for the current lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot apply {event} to {status} game (round {round}): {reason}")]
pub struct InvalidTransitionError {
    /// Status when the event arrived
    pub status: GameStatus,
    /// Round when the event arrived
    pub round: u32,
    /// Event kind
    pub event: &'static str,
    /// What was wrong
    pub reason: String,
}

impl InvalidTransitionError {
    fn new(state: &GameState, event: &GameEvent, reason: impl Into<String>) -> Self {
        Self {
            status: state.status,
            round: state.round,
            event: event.kind(),
            reason: reason.into(),
        }
    }
}

/// Everything a transition may read besides state and event.
#[derive(Clone, Copy, Debug)]
pub struct TransitionContext<'a> {
    /// Game settings
    pub config: &'a GameConfig,
    /// Current player snapshot (salvo results already applied)
    pub players: &'a [PlayerState],
    /// Wall-clock time supplied by the caller
    pub now: DateTime<Utc>,
}

impl<'a> TransitionContext<'a> {
    /// Build a context.
    pub fn new(config: &'a GameConfig, players: &'a [PlayerState], now: DateTime<Utc>) -> Self {
        Self { config, players, now }
    }

    fn active_players(&self) -> impl Iterator<Item = &'a PlayerState> {
        let players: &'a [PlayerState] = self.players;
        players.iter().filter(|p| p.is_active())
    }

    fn find_active(&self, wallet: &WalletAddress) -> Option<&'a PlayerState> {
        self.active_players().find(|p| p.wallet == *wallet)
    }

    fn all_wallets(&self) -> Vec<WalletAddress> {
        self.players.iter().map(|p| p.wallet.clone()).collect()
    }
}

/// New state plus the effects to execute, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State to persist
    pub state: GameState,
    /// Effects to execute after persisting
    pub effects: Vec<SideEffect>,
}

/// Apply `event` to `state`.
pub fn transition(
    state: &GameState,
    event: &GameEvent,
    ctx: &TransitionContext<'_>,
) -> Result<Transition, InvalidTransitionError> {
    let outcome = match (state.status, event) {
        (GameStatus::Waiting, GameEvent::PlayerJoined { wallet }) => {
            Ok(on_player_joined(state, wallet, ctx))
        }
        (GameStatus::Waiting, GameEvent::MaxPlayersReached) => Ok(start_game(
            ctx,
            format!("Game is full with {} players. Round 1 begins!", ctx.players.len()),
            true,
        )),
        (GameStatus::Waiting, GameEvent::DeadlineReached) => Ok(on_join_deadline(state, ctx)),
        (GameStatus::Waiting, GameEvent::AdminForceStart) => on_force_start(state, event, ctx),
        (GameStatus::Waiting | GameStatus::Repositioning, GameEvent::AdminCancel) => {
            Ok(cancel(state, CancelReason::AdminCancelled, ctx))
        }
        (GameStatus::Active, GameEvent::SalvoComplete { survivors, .. }) => {
            on_salvo_complete(state, event, survivors, ctx)
        }
        (GameStatus::Repositioning, GameEvent::RepositionSubmitted { wallet, position }) => {
            on_reposition_submitted(state, event, wallet, position, ctx)
        }
        (GameStatus::Repositioning, GameEvent::RepositionTimeout) => Ok(next_round(
            state,
            format!("Reposition window closed. Round {} salvo incoming!", state.round + 1),
        )),
        (status, _) if status.is_terminal() => {
            Err(InvalidTransitionError::new(state, event, "game is over"))
        }
        _ => Err(InvalidTransitionError::new(
            state,
            event,
            "event not accepted in this state",
        )),
    };

    match &outcome {
        Ok(next) => {
            debug!(
                event = event.kind(),
                from = %state.status,
                to = %next.state.status,
                round = next.state.round,
                effects = next.effects.len(),
                "Transition applied"
            );
            #[cfg(feature = "debug-tracing")]
            for effect in &next.effects {
                tracing::trace!(?effect, "Side effect emitted");
            }
        }
        Err(e) => warn!("Transition rejected: {}", e),
    }

    outcome
}

// =============================================================================
// WAITING
// =============================================================================

fn on_player_joined(state: &GameState, wallet: &WalletAddress, ctx: &TransitionContext<'_>) -> Transition {
    // Accept snapshots taken either before or after the join was recorded.
    let already_listed = ctx.players.iter().any(|p| p.wallet == *wallet);
    let count = ctx.players.len() + usize::from(!already_listed);
    let max = ctx.config.max_players;

    if count >= max {
        return start_game(
            ctx,
            format!("{} joined. Game is full ({}/{}), round 1 begins!", wallet.short(), count, max),
            true,
        );
    }

    Transition {
        state: state.clone(),
        effects: vec![SideEffect::notify_all(format!(
            "{} joined ({}/{})",
            wallet.short(),
            count,
            max
        ))],
    }
}

fn on_join_deadline(state: &GameState, ctx: &TransitionContext<'_>) -> Transition {
    let active = ctx.active_players().count();
    if active < MIN_PLAYERS {
        return cancel(state, CancelReason::InsufficientPlayers, ctx);
    }
    start_game(
        ctx,
        format!("Join deadline reached with {} players. Round 1 begins!", active),
        true,
    )
}

fn on_force_start(
    state: &GameState,
    event: &GameEvent,
    ctx: &TransitionContext<'_>,
) -> Result<Transition, InvalidTransitionError> {
    let active = ctx.active_players().count();
    if active < MIN_PLAYERS {
        return Err(InvalidTransitionError::new(
            state,
            event,
            format!("need at least {} players, have {}", MIN_PLAYERS, active),
        ));
    }
    Ok(start_game(
        ctx,
        format!("Game started by admin with {} players. Round 1 begins!", active),
        false,
    ))
}

fn start_game(ctx: &TransitionContext<'_>, message: String, announce: bool) -> Transition {
    let mut effects = vec![SideEffect::notify_all(message)];
    if announce {
        effects.push(SideEffect::PostTweet {
            content: format!(
                "A new Salvo Arena game has started! {} ships on a 5x5 grid, {} shots per salvo. Pot: {}",
                ctx.players.len(),
                ctx.config.shots_per_salvo,
                ctx.config.pot(ctx.players.len()),
            ),
        });
    }
    effects.push(SideEffect::TriggerSalvo);

    Transition {
        state: GameState {
            status: GameStatus::Active,
            round: 1,
            deadline: None,
            winners: Vec::new(),
            cancel_reason: None,
        },
        effects,
    }
}

fn cancel(state: &GameState, reason: CancelReason, ctx: &TransitionContext<'_>) -> Transition {
    let message = match reason {
        CancelReason::InsufficientPlayers => "Game cancelled: not enough players joined. Entry fees will be refunded.",
        CancelReason::AdminCancelled => "Game cancelled by admin. Entry fees will be refunded.",
    };

    Transition {
        state: GameState {
            status: GameStatus::Cancelled,
            round: state.round,
            deadline: None,
            winners: Vec::new(),
            cancel_reason: Some(reason),
        },
        effects: vec![
            SideEffect::ProcessRefunds { wallets: ctx.all_wallets() },
            SideEffect::notify_all(message),
        ],
    }
}

// =============================================================================
// ACTIVE
// =============================================================================

fn on_salvo_complete(
    state: &GameState,
    event: &GameEvent,
    survivors: &[WalletAddress],
    ctx: &TransitionContext<'_>,
) -> Result<Transition, InvalidTransitionError> {
    // The survivor list must be exactly the active players in the snapshot.
    if let Some(stranger) = survivors.iter().find(|w| ctx.find_active(w).is_none()) {
        return Err(InvalidTransitionError::new(
            state,
            event,
            format!("survivor {} is not an active player", stranger),
        ));
    }
    let listed: BTreeSet<&WalletAddress> = survivors.iter().collect();
    if listed.len() != survivors.len() {
        return Err(InvalidTransitionError::new(
            state,
            event,
            "survivor list contains duplicates",
        ));
    }
    if let Some(missing) = ctx.active_players().find(|p| !listed.contains(&p.wallet)) {
        return Err(InvalidTransitionError::new(
            state,
            event,
            format!("{} is still active but not listed as a survivor", missing.wallet),
        ));
    }

    match survivors.len() {
        0 => {
            // Everyone still standing went down together: they split the pot.
            let winners: Vec<WalletAddress> = ctx
                .players
                .iter()
                .filter(|p| p.eliminated_round == Some(state.round))
                .map(|p| p.wallet.clone())
                .collect();
            if winners.is_empty() {
                return Err(InvalidTransitionError::new(
                    state,
                    event,
                    "no survivors reported but nobody was eliminated this round",
                ));
            }
            Ok(complete(
                state,
                winners,
                ctx,
                format!("Round {}: every remaining ship was sunk. The pot is split!", state.round),
            ))
        }
        1 => Ok(complete(
            state,
            survivors.to_vec(),
            ctx,
            format!("Round {}: {} is the last ship afloat!", state.round, survivors[0].short()),
        )),
        n if state.round >= ctx.config.max_rounds => Ok(complete(
            state,
            survivors.to_vec(),
            ctx,
            format!("Final round {} survived by {} players. The pot is split!", state.round, n),
        )),
        n => Ok(Transition {
            state: GameState {
                status: GameStatus::Repositioning,
                round: state.round,
                deadline: Some(ctx.now + ctx.config.reposition_window()),
                winners: Vec::new(),
                cancel_reason: None,
            },
            effects: vec![
                SideEffect::notify(
                    format!(
                        "You survived round {} ({} ships left). Reposition within {} minutes.",
                        state.round, n, ctx.config.reposition_window_minutes
                    ),
                    survivors.to_vec(),
                ),
                SideEffect::ScheduleTimeout {
                    duration_ms: ctx.config.reposition_window_ms(),
                    event: GameEvent::RepositionTimeout,
                },
            ],
        }),
    }
}

fn complete(
    state: &GameState,
    winners: Vec<WalletAddress>,
    ctx: &TransitionContext<'_>,
    message: String,
) -> Transition {
    let names: Vec<&str> = winners.iter().map(|w| w.short()).collect();
    let tweet = format!(
        "Salvo Arena game over after {} round(s)! Winner(s): {}. Pot: {}",
        state.round,
        names.join(", "),
        ctx.config.pot(ctx.players.len()),
    );

    Transition {
        state: GameState {
            status: GameStatus::Complete,
            round: state.round,
            deadline: None,
            winners: winners.clone(),
            cancel_reason: None,
        },
        effects: vec![
            SideEffect::ProcessPayouts { winners },
            SideEffect::notify_all(message),
            SideEffect::PostTweet { content: tweet },
        ],
    }
}

// =============================================================================
// REPOSITIONING
// =============================================================================

fn on_reposition_submitted(
    state: &GameState,
    event: &GameEvent,
    wallet: &WalletAddress,
    position: &Placement,
    ctx: &TransitionContext<'_>,
) -> Result<Transition, InvalidTransitionError> {
    if ctx.find_active(wallet).is_none() {
        return Err(InvalidTransitionError::new(
            state,
            event,
            format!("{} is not an active player", wallet),
        ));
    }
    if position.len() != ctx.config.ship_size.cells() {
        return Err(InvalidTransitionError::new(
            state,
            event,
            format!(
                "position {} has {} cells, ships have {}",
                position,
                position.len(),
                ctx.config.ship_size.cells()
            ),
        ));
    }

    let everyone_moved = ctx
        .active_players()
        .all(|p| p.wallet == *wallet || p.repositioned_round == Some(state.round));

    if everyone_moved {
        return Ok(next_round(
            state,
            format!("All survivors repositioned. Round {} salvo incoming!", state.round + 1),
        ));
    }

    Ok(Transition {
        state: state.clone(),
        effects: vec![SideEffect::notify(
            "Your new position is locked in.",
            vec![wallet.clone()],
        )],
    })
}

fn next_round(state: &GameState, message: String) -> Transition {
    Transition {
        state: GameState {
            status: GameStatus::Active,
            round: state.round + 1,
            deadline: None,
            winners: Vec::new(),
            cancel_reason: None,
        },
        effects: vec![SideEffect::notify_all(message), SideEffect::TriggerSalvo],
    }
}
