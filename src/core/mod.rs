//! Core deterministic primitives.
//!
//! Board addressing, seeds and audit hashing. Nothing here depends on
//! game rules; the `game/` engines are built on top of these types.

pub mod grid;
pub mod seed;
pub mod hash;

// Re-export core types
pub use grid::{CellIndex, CellError, GRID_SIZE, CELL_COUNT};
pub use seed::{Seed, SeedError};
pub use hash::{AuditDigest, AuditHasher};
