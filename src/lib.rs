//! # Salvo Arena Game Engine
//!
//! Deterministic core for a multiplayer elimination game on a 5x5 grid:
//! players place ships, a seeded salvo is fired each round, sunk ships are
//! eliminated and survivors may move before the next round.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SALVO ARENA ENGINE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── grid.rs     - CellIndex and A1-E5 labels                │
//! │  ├── seed.rs     - 256-bit hex seeds                         │
//! │  └── hash.rs     - Domain-separated audit hashing            │
//! │                                                              │
//! │  game/           - Game rules (deterministic)                │
//! │  ├── placement.rs- Ship placement validation/enumeration     │
//! │  ├── salvo.rs    - Shot generation and hit resolution        │
//! │  ├── state.rs    - Player and game records                   │
//! │  ├── events.rs   - Lifecycle events and side effects         │
//! │  └── machine.rs  - Lifecycle state machine                   │
//! │                                                              │
//! │  audit/          - Round records and verification            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Nothing in this crate performs I/O, reads the clock or holds global state:
//! - Shots depend only on the seed and shot count
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - `transition` takes `now` from its caller
//!
//! Persistence, payments, notifications and timers are external
//! collaborators driven by the [`SideEffect`] values the state machine
//! returns. Callers must apply at most one transition per game at a time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod audit;

// Re-export commonly used types
pub use crate::core::grid::{CellIndex, GRID_SIZE, CELL_COUNT};
pub use crate::core::seed::Seed;
pub use game::events::{GameEvent, SideEffect};
pub use game::machine::{transition, Transition, TransitionContext, InvalidTransitionError};
pub use game::placement::{Placement, PlacementError, ShipSize};
pub use game::salvo::{generate_shots, process_salvo, SalvoResult, SalvoError};
pub use game::state::{GameState, GameStatus, PlayerState};
pub use game::{GameConfig, GameId, WalletAddress};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
