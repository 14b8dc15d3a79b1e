//! Game Logic Module
//!
//! All game rules. 100% deterministic, no I/O.
//!
//! ## Module Structure
//!
//! - `identity`: Wallet and game identifiers
//! - `config`: Per-game settings
//! - `placement`: Ship placement validation and enumeration
//! - `salvo`: Shot generation and hit resolution
//! - `state`: Player and game records
//! - `events`: Lifecycle events and side effects
//! - `machine`: Lifecycle state machine

pub mod identity;
pub mod config;
pub mod placement;
pub mod salvo;
pub mod state;
pub mod events;
pub mod machine;

// Re-export key types
pub use identity::{WalletAddress, GameId, IdentityError};
pub use config::{GameConfig, ConfigError};
pub use placement::{
    Placement, PlacementError, ShipSize, Orientation,
    validate_placement, cell_label, parse_cell_label, valid_placements,
};
pub use salvo::{
    SalvoResult, SalvoError,
    generate_shots, generate_shots_hex, process_salvo, apply_salvo, would_be_hit, calculate_hits,
};
pub use state::{PlayerState, GameState, GameStatus, CancelReason};
pub use events::{GameEvent, SideEffect};
pub use machine::{transition, Transition, TransitionContext, InvalidTransitionError};
