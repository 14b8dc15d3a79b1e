//! Game Configuration
//!
//! Immutable per-game settings, fixed at game creation.

use chrono::Duration;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::grid::CELL_COUNT;
use crate::game::placement::ShipSize;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A field failed validation.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// An environment variable could not be parsed.
    #[error("environment variable {var} has invalid value {value:?}")]
    BadEnv {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// JSON config could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Settings for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Entry fee in the settlement asset's smallest unit.
    pub entry_fee: u64,
    /// Players needed to fill the game.
    pub max_players: usize,
    /// Cells per ship.
    pub ship_size: ShipSize,
    /// Unique cells fired per salvo (1-25).
    pub shots_per_salvo: u8,
    /// Time allowed to fill the game before the deadline check.
    pub join_deadline_minutes: u32,
    /// Time survivors get to move between rounds.
    pub reposition_window_minutes: u32,
    /// Last round; survivors after it split the pot.
    pub max_rounds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            entry_fee: 0,
            max_players: 8,
            ship_size: ShipSize::Two,
            shots_per_salvo: 5,
            join_deadline_minutes: 60,
            reposition_window_minutes: 5,
            max_rounds: 10,
        }
    }
}

impl GameConfig {
    /// Check invariants the engines rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_players < 2 {
            return Err(ConfigError::Invalid {
                field: "max_players",
                reason: format!("need at least 2, got {}", self.max_players),
            });
        }
        if self.shots_per_salvo == 0 || self.shots_per_salvo > CELL_COUNT {
            return Err(ConfigError::Invalid {
                field: "shots_per_salvo",
                reason: format!("must be 1-{}, got {}", CELL_COUNT, self.shots_per_salvo),
            });
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::Invalid {
                field: "max_rounds",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.reposition_window_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "reposition_window_minutes",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let ship_size: u8 = env_or("SALVO_SHIP_SIZE", defaults.ship_size.into())?;
        let config = Self {
            entry_fee: env_or("SALVO_ENTRY_FEE", defaults.entry_fee)?,
            max_players: env_or("SALVO_MAX_PLAYERS", defaults.max_players)?,
            ship_size: ShipSize::try_from(ship_size).map_err(|_| ConfigError::BadEnv {
                var: "SALVO_SHIP_SIZE",
                value: ship_size.to_string(),
            })?,
            shots_per_salvo: env_or("SALVO_SHOTS_PER_SALVO", defaults.shots_per_salvo)?,
            join_deadline_minutes: env_or("SALVO_JOIN_DEADLINE_MINUTES", defaults.join_deadline_minutes)?,
            reposition_window_minutes: env_or(
                "SALVO_REPOSITION_WINDOW_MINUTES",
                defaults.reposition_window_minutes,
            )?,
            max_rounds: env_or("SALVO_MAX_ROUNDS", defaults.max_rounds)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Join window as a duration.
    pub fn join_window(&self) -> Duration {
        Duration::minutes(self.join_deadline_minutes as i64)
    }

    /// Reposition window as a duration.
    pub fn reposition_window(&self) -> Duration {
        Duration::minutes(self.reposition_window_minutes as i64)
    }

    /// Reposition window in milliseconds (for timer collaborators).
    pub fn reposition_window_ms(&self) -> u64 {
        self.reposition_window_minutes as u64 * 60_000
    }

    /// Total pot for `players` paid entries.
    pub fn pot(&self, players: usize) -> u64 {
        self.entry_fee.saturating_mul(players as u64)
    }
}

fn env_or<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::BadEnv { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let bad = GameConfig { max_players: 1, ..GameConfig::default() };
        assert!(bad.validate().is_err());

        let bad = GameConfig { shots_per_salvo: 0, ..GameConfig::default() };
        assert!(bad.validate().is_err());

        let bad = GameConfig { shots_per_salvo: 26, ..GameConfig::default() };
        assert!(bad.validate().is_err());

        let bad = GameConfig { max_rounds: 0, ..GameConfig::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(r#"{"max_players": 2, "ship_size": 3}"#).unwrap();
        assert_eq!(config.max_players, 2);
        assert_eq!(config.ship_size, ShipSize::Three);
        assert_eq!(config.shots_per_salvo, 5);

        assert!(GameConfig::from_json(r#"{"ship_size": 4}"#).is_err());
        assert!(GameConfig::from_json(r#"{"max_players": 1}"#).is_err());
    }

    #[test]
    fn test_windows() {
        let config = GameConfig { reposition_window_minutes: 3, ..GameConfig::default() };
        assert_eq!(config.reposition_window_ms(), 180_000);
        assert_eq!(config.reposition_window(), Duration::minutes(3));
    }

    #[test]
    fn test_pot() {
        let config = GameConfig { entry_fee: 250, ..GameConfig::default() };
        assert_eq!(config.pot(4), 1000);
    }
}
