//! CLI command implementations for Hexreign.

pub(crate) mod generate;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use hexreign::config::{MatchConfig, PlayerConfig};
use hexreign::game::Intelligence;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Match settings shared by every command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MatchArgs {
    /// JSON match configuration (defaults apply to missing fields)
    #[arg(short, long)]
    pub(crate) config: Option<std::path::PathBuf>,

    /// Bot tiers, one per seat; overrides the configured players
    #[arg(short, long, value_delimiter = ',')]
    pub(crate) bots: Vec<Intelligence>,

    /// Number of land tiles
    #[arg(short, long)]
    pub(crate) land: Option<usize>,

    /// Rounds before the match is called
    #[arg(short = 't', long)]
    pub(crate) max_turns: Option<u32>,
}

impl MatchArgs {
    /// Load the config file if given and apply the overrides.
    pub(crate) fn resolve(&self) -> Result<MatchConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MatchConfig::default(),
        };
        if !self.bots.is_empty() {
            config.players = self
                .bots
                .iter()
                .enumerate()
                .map(|(i, tier)| PlayerConfig::bot(format!("bot{}", i + 1), *tier))
                .collect();
        }
        if let Some(land) = self.land {
            config.map.land_mass = land;
        }
        if let Some(turns) = self.max_turns {
            config.max_turns = turns;
        }
        config
            .validate()
            .map_err(|e| CliError::new(e.to_string()))?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<MatchConfig, CliError> {
    MatchConfig::load(path).map_err(|e| CliError::new(e.to_string()))
}

/// The given seed, or one derived from the clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<hexreign::tournament::TournamentError> for CliError {
    fn from(e: hexreign::tournament::TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<hexreign::persistence::PersistError> for CliError {
    fn from(e: hexreign::persistence::PersistError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<hexreign::game::MapGenError> for CliError {
    fn from(e: hexreign::game::MapGenError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
