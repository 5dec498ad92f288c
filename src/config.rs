//! Rule constants and match configuration.
//!
//! Everything here has a `Default` matching the standard game; a JSON file
//! may override any subset of fields.

use std::path::{Path, PathBuf};
use std::fs;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{Intelligence, Player, PlayerId};

/// Maximum number of players in a game.
pub const MAX_PLAYERS: usize = 8;

/// Economic and environmental constants. Carried inside the game state so a
/// saved game always resumes under the rules it started with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Price of one peasant.
    pub peasant_cost: i32,
    /// Price of one castle.
    pub castle_cost: i32,
    /// Starting treasury per kingdom tile.
    pub starting_savings_per_tile: i32,
    /// Share of all land a single kingdom must hold to win.
    pub victory_share: f64,
    /// Chance per tree per round that it seeds an empty neighbor.
    pub tree_spread_chance: f64,
    /// Chance per empty tile per round that a tree appears.
    pub tree_spawn_chance: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            peasant_cost: 10,
            castle_cost: 15,
            starting_savings_per_tile: 5,
            victory_share: 0.8,
            tree_spread_chance: 0.2,
            tree_spawn_chance: 0.002,
        }
    }
}

/// Parameters for landmass generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Number of land tiles.
    pub land_mass: usize,
    /// Compactness of the landmass. 0 grows a uniform random walk; larger
    /// values prefer cells with fewer free neighbors.
    pub density: f64,
    /// Fraction of tiles that start with a tree.
    pub vegetation_density: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            land_mass: 200,
            density: 1.0,
            vegetation_density: 0.1,
        }
    }
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,
    /// Bot tier; `None` seats a human.
    #[serde(default)]
    pub intelligence: Option<Intelligence>,
}

impl PlayerConfig {
    /// A bot seat.
    #[must_use]
    pub fn bot(name: impl Into<String>, intelligence: Intelligence) -> Self {
        Self {
            name: name.into(),
            intelligence: Some(intelligence),
        }
    }
}

/// Complete description of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Landmass parameters.
    pub map: MapConfig,
    /// Seats in initial order (the generator reorders them by income).
    pub players: Vec<PlayerConfig>,
    /// Rounds before the match is called without a winner.
    pub max_turns: u32,
    /// Economic constants.
    pub rules: Rules,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            players: vec![
                PlayerConfig::bot("red", Intelligence::Hard),
                PlayerConfig::bot("blue", Intelligence::Medium),
            ],
            max_turns: 200,
            rules: Rules::default(),
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for a [`MatchConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The values are out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl MatchConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.players.len();
        if n < 2 {
            return Err(ConfigError::Invalid(format!(
                "need at least 2 players, got {n}"
            )));
        }
        if n > MAX_PLAYERS {
            return Err(ConfigError::Invalid(format!(
                "maximum {MAX_PLAYERS} players, got {n}"
            )));
        }
        if self.map.land_mass < 2 * n {
            return Err(ConfigError::Invalid(format!(
                "land mass {} is too small for {n} players",
                self.map.land_mass
            )));
        }
        if self.map.density < 0.0 || self.map.vegetation_density < 0.0 {
            return Err(ConfigError::Invalid("densities must be non-negative".into()));
        }
        if self.rules.peasant_cost <= 0 || self.rules.castle_cost <= 0 {
            return Err(ConfigError::Invalid("costs must be positive".into()));
        }
        Ok(())
    }

    /// Materialize the seats as players with ids in seat order.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn build_players(&self) -> Vec<Player> {
        self.players
            .iter()
            .enumerate()
            .map(|(i, seat)| {
                let id = i as PlayerId;
                match seat.intelligence {
                    Some(tier) => Player::bot(id, seat.name.clone(), tier),
                    None => Player::human(id, seat.name.clone()),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_too_few_players() {
        let mut config = MatchConfig::default();
        config.players.truncate(1);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_land_too_small() {
        let mut config = MatchConfig::default();
        config.map.land_mass = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_turns": 50, "map": {{ "land_mass": 80 }} }}"#).unwrap();
        let config = MatchConfig::load(file.path()).unwrap();
        assert_eq!(config.max_turns, 50);
        assert_eq!(config.map.land_mass, 80);
        assert_eq!(config.rules, Rules::default());
        assert_eq!(config.players.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = MatchConfig::load(Path::new("/nonexistent/hexreign.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_build_players() {
        let mut config = MatchConfig::default();
        config.players.push(PlayerConfig {
            name: "you".into(),
            intelligence: None,
        });
        let players = config.build_players();
        assert_eq!(players.len(), 3);
        assert_eq!(players[2].id, 2);
        assert_eq!(players[2].intelligence(), None);
    }
}
