//! Headless match runner for bot-only games.
//!
//! Provides a pure function interface: `(seed, config) -> GameResult`
//!
//! The runner handles:
//! - Deterministic map generation
//! - Playing every seat with its bot tier, one turn at a time
//! - Tracking eliminations and per-player statistics
//! - Running many seeds in parallel with rayon

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::bot::run_bot_turn;
use crate::config::{ConfigError, MatchConfig};
use crate::game::{generate, GameState, Intelligence, MapGenError, PlayerId};

/// Statistics for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    /// Player identifier after seating.
    pub player_id: PlayerId,
    /// Display name from the config.
    pub name: String,
    /// Bot tier.
    pub intelligence: Intelligence,
    /// Tiles owned at the end.
    pub tiles: usize,
    /// Kingdoms owned at the end.
    pub kingdoms: usize,
    /// Largest kingdom at the end, in tiles.
    pub largest_kingdom: usize,
    /// Engine moves made over the whole match.
    pub moves: u64,
    /// Round the player was defeated in (None if survived).
    pub eliminated_turn: Option<u32>,
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// The seed used for this game.
    pub seed: u64,
    /// The winning player (None if the turn cap was reached).
    pub winner: Option<PlayerId>,
    /// Completed rounds.
    pub turns_played: u32,
    /// Per-player statistics in seat order.
    pub player_stats: Vec<PlayerStats>,
    /// Elimination order (first defeated is index 0).
    pub elimination_order: Vec<PlayerId>,
    /// Hash of the final state.
    pub final_hash: u64,
}

impl GameResult {
    /// Name of the winner, if any.
    #[must_use]
    pub fn winner_name(&self) -> Option<&str> {
        let winner = self.winner?;
        self.player_stats
            .iter()
            .find(|p| p.player_id == winner)
            .map(|p| p.name.as_str())
    }
}

/// Error type for tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// The match configuration is out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A seat has no bot tier.
    #[error("seat {seat} ({name}) is not a bot")]
    HumanSeat {
        /// Seat index in the config.
        seat: usize,
        /// Seat name.
        name: String,
    },
    /// Map generation failed.
    #[error("map generation failed: {0}")]
    MapGeneration(#[from] MapGenError),
}

/// Run a complete game with the given seed and configuration.
///
/// This is the main entry point - a pure function from inputs to result.
///
/// # Determinism
///
/// Given the same seed and configuration, this function always produces
/// the same `GameResult`.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration fails validation
/// - Any seat is not a bot
/// - Map generation fails
pub fn run_game(seed: u64, config: &MatchConfig) -> Result<GameResult, TournamentError> {
    play_match(seed, config).map(|(result, _)| result)
}

/// [`run_game`], also handing back the final state.
///
/// # Errors
///
/// Same as [`run_game`].
pub fn play_match(
    seed: u64,
    config: &MatchConfig,
) -> Result<(GameResult, GameState), TournamentError> {
    let runner = GameRunner::new(seed, config)?;
    Ok(runner.run())
}

/// Run `games` matches with consecutive seeds in parallel.
///
/// Results are returned in seed order.
///
/// # Errors
///
/// Returns the first error in seed order; errors do not depend on the seed
/// except for map generation giving up.
pub fn run_games(
    base_seed: u64,
    games: u64,
    config: &MatchConfig,
) -> Result<Vec<GameResult>, TournamentError> {
    (0..games)
        .into_par_iter()
        .map(|i| run_game(base_seed.wrapping_add(i), config))
        .collect()
}

/// Drives one match.
struct GameRunner {
    state: GameState,
    seed: u64,
    max_turns: u32,
    moves: Vec<u64>,
    eliminated_turn: Vec<Option<u32>>,
    elimination_order: Vec<PlayerId>,
}

impl GameRunner {
    fn new(seed: u64, config: &MatchConfig) -> Result<Self, TournamentError> {
        config.validate()?;
        if let Some((seat, p)) = config
            .players
            .iter()
            .enumerate()
            .find(|(_, p)| p.intelligence.is_none())
        {
            return Err(TournamentError::HumanSeat {
                seat,
                name: p.name.clone(),
            });
        }

        let state = generate(config.build_players(), &config.map, config.rules, seed)?;
        let seats = state.players.len();
        Ok(Self {
            state,
            seed,
            max_turns: config.max_turns,
            moves: vec![0; seats],
            eliminated_turn: vec![None; seats],
            elimination_order: Vec::new(),
        })
    }

    fn is_over(&self) -> bool {
        self.state.winner.is_some()
            || self.state.alive_players().count() <= 1
            || self.state.turn >= self.max_turns
    }

    fn run(mut self) -> (GameResult, GameState) {
        while !self.is_over() {
            self.play_turn();
        }
        let result = self.build_result();
        (result, self.state)
    }

    /// Let the active seat play, then hand over.
    fn play_turn(&mut self) {
        let player = self.state.active_player_id();
        if let Some(tier) = self.state.active_player().intelligence() {
            let report = run_bot_turn(&mut self.state, tier);
            self.moves[usize::from(player)] += report.engine_moves() as u64;
        }
        self.state.end_turn();
        self.update_eliminations();
    }

    fn update_eliminations(&mut self) {
        for p in &self.state.players {
            let slot = &mut self.eliminated_turn[usize::from(p.id)];
            if p.defeated && slot.is_none() {
                *slot = Some(self.state.turn);
                self.elimination_order.push(p.id);
                tracing::info!(
                    seed = self.seed,
                    player = p.id,
                    turn = self.state.turn,
                    "match.eliminated"
                );
            }
        }
    }

    fn build_result(&self) -> GameResult {
        let state = &self.state;
        let winner = state.winner.or_else(|| {
            let mut alive = state.alive_players();
            match (alive.next(), alive.next()) {
                (Some(last), None) => Some(last.id),
                _ => None,
            }
        });

        let player_stats = state
            .players
            .iter()
            .map(|p| PlayerStats {
                player_id: p.id,
                name: p.name.clone(),
                intelligence: p.intelligence().unwrap_or(Intelligence::Dumb),
                tiles: state.map.tiles_owned_by(p.id).count(),
                kingdoms: state.kingdoms_of(p.id).count(),
                largest_kingdom: state.largest_kingdom_size(p.id),
                moves: self.moves[usize::from(p.id)],
                eliminated_turn: self.eliminated_turn[usize::from(p.id)],
            })
            .collect();

        tracing::info!(
            seed = self.seed,
            winner = ?winner,
            turns = state.turn,
            "match.finished"
        );

        GameResult {
            seed: self.seed,
            winner,
            turns_played: state.turn,
            player_stats,
            elimination_order: self.elimination_order.clone(),
            final_hash: state.state_hash(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfig, PlayerConfig};

    fn small() -> MatchConfig {
        MatchConfig {
            map: MapConfig {
                land_mass: 60,
                ..MapConfig::default()
            },
            max_turns: 40,
            ..MatchConfig::default()
        }
    }

    #[test]
    fn test_tournament_error_display() {
        let err = TournamentError::HumanSeat {
            seat: 1,
            name: "you".into(),
        };
        assert!(format!("{err}").contains("not a bot"));
    }

    #[test]
    fn test_run_game_too_few_players() {
        let mut config = small();
        config.players.truncate(1);
        assert!(matches!(run_game(42, &config), Err(TournamentError::Config(_))));
    }

    #[test]
    fn test_run_game_rejects_humans() {
        let mut config = small();
        config.players.push(PlayerConfig {
            name: "you".into(),
            intelligence: None,
        });
        assert!(matches!(
            run_game(42, &config),
            Err(TournamentError::HumanSeat { seat: 2, .. })
        ));
    }

    #[test]
    fn test_run_game_terminates() {
        let config = small();
        let result = run_game(5, &config).unwrap();
        assert!(result.turns_played <= config.max_turns);
        assert_eq!(result.player_stats.len(), 2);
        let total: usize = result.player_stats.iter().map(|p| p.tiles).sum();
        assert_eq!(total, 60);
        if let Some(w) = result.winner {
            assert!(result.player_stats[usize::from(w)].eliminated_turn.is_none());
        }
    }

    #[test]
    fn test_run_game_is_deterministic() {
        let config = small();
        assert_eq!(run_game(17, &config).unwrap(), run_game(17, &config).unwrap());
    }

    #[test]
    fn test_play_match_returns_final_state() {
        let config = small();
        let (result, state) = play_match(9, &config).unwrap();
        assert_eq!(result.final_hash, state.state_hash());
        assert_eq!(result.turns_played, state.turn);
        assert!(crate::game::check_invariants(&state).is_empty());
    }

    #[test]
    fn test_run_games_keeps_seed_order() {
        let config = small();
        let results = run_games(100, 4, &config).unwrap();
        let seeds: Vec<u64> = results.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
        assert_eq!(results[2], run_game(102, &config).unwrap());
    }
}
