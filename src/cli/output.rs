//! Output formatting utilities for CLI.
//!
//! Seats are reordered by starting income at generation, so tournament
//! statistics are keyed by seat name rather than player id.

// Averages over game counts
#![allow(clippy::cast_precision_loss)]

use hexreign::tournament::GameResult;
use serde::Serialize;
use std::fmt::Write;

/// JSON-serializable game result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGameResult<'a> {
    /// Random seed used.
    seed: u64,
    /// Winner name (null if undecided).
    winner: Option<&'a str>,
    /// Completed rounds.
    turns_played: u32,
    /// Hash of the final state.
    final_hash: String,
    /// Per-player results.
    players: Vec<JsonPlayerResult<'a>>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
struct JsonPlayerResult<'a> {
    /// Player id after seating.
    id: u8,
    /// Seat name.
    name: &'a str,
    /// Tiles owned at the end.
    tiles: usize,
    /// Kingdoms owned at the end.
    kingdoms: usize,
    /// Engine moves over the match.
    moves: u64,
    /// Round defeated in (null if survived).
    eliminated_turn: Option<u32>,
}

impl<'a> JsonGameResult<'a> {
    /// Create from a `GameResult`.
    pub(super) fn from_game_result(result: &'a GameResult) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner_name(),
            turns_played: result.turns_played,
            final_hash: format!("{:016x}", result.final_hash),
            players: result
                .player_stats
                .iter()
                .map(|ps| JsonPlayerResult {
                    id: ps.player_id,
                    name: &ps.name,
                    tiles: ps.tiles,
                    kingdoms: ps.kingdoms,
                    moves: ps.moves,
                    eliminated_turn: ps.eliminated_turn,
                })
                .collect(),
        }
    }
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    match result.winner_name() {
        Some(name) => {
            let _ = writeln!(output, "  Winner: {name}");
        }
        None => output.push_str("  Winner: none (turn limit)\n"),
    }
    let _ = writeln!(output, "  Turns: {}", result.turns_played);
    let _ = writeln!(output, "  Final hash: {:016x}\n", result.final_hash);

    for stats in &result.player_stats {
        let _ = write!(
            output,
            "  Player {} ({}, {:?}): {} tiles in {} kingdoms, {} moves",
            stats.player_id, stats.name, stats.intelligence, stats.tiles, stats.kingdoms, stats.moves
        );
        if let Some(turn) = stats.eliminated_turn {
            let _ = write!(output, " [defeated turn {turn}]");
        }
        output.push('\n');
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct TournamentStats {
    /// Seat names, in config order.
    names: Vec<String>,
    /// Total games played.
    pub(super) games_played: u64,
    /// Win count per seat.
    pub(super) wins: Vec<u64>,
    /// Games without a winner.
    pub(super) draws: u64,
    /// Final tile count summed per seat.
    total_tiles: Vec<f64>,
    /// Tile count sum of squares for std dev calculation.
    tile_sq_sums: Vec<f64>,
    /// Total rounds across all games.
    total_turns: u64,
}

impl TournamentStats {
    /// Create new stats for the given seats.
    pub(super) fn new(names: &[String]) -> Self {
        let n = names.len();
        Self {
            names: names.to_vec(),
            games_played: 0,
            wins: vec![0; n],
            draws: 0,
            total_tiles: vec![0.0; n],
            tile_sq_sums: vec![0.0; n],
            total_turns: 0,
        }
    }

    fn seat(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);

        match result.winner_name().and_then(|name| self.seat(name)) {
            Some(seat) => self.wins[seat] += 1,
            None => self.draws += 1,
        }

        for stats in &result.player_stats {
            if let Some(seat) = self.seat(&stats.name) {
                let tiles = stats.tiles as f64;
                self.total_tiles[seat] += tiles;
                self.tile_sq_sums[seat] += tiles * tiles;
            }
        }
    }

    /// Merge another set of stats into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.total_turns += other.total_turns;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_tiles.iter_mut().zip(&other.total_tiles) {
            *a += b;
        }
        for (a, b) in self.tile_sq_sums.iter_mut().zip(&other.tile_sq_sums) {
            *a += b;
        }
    }

    /// Get win rate for a seat (0.0-1.0).
    pub(super) fn win_rate(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(seat).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get average final tile count for a seat.
    pub(super) fn avg_tiles(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_tiles.get(seat).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Get final tile count standard deviation for a seat.
    pub(super) fn tiles_std_dev(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_tiles(seat);
        let sq_sum = self.tile_sq_sums.get(seat).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 {
            0.0
        } else {
            variance.sqrt()
        }
    }

    /// Get average game length.
    pub(super) fn avg_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Per-seat statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Games without a winner.
    draws: u64,
    /// Average game length in rounds.
    avg_turns: f64,
}

/// JSON-serializable per-seat tournament stats.
#[derive(Debug, Serialize)]
struct JsonTournamentPlayer {
    /// Seat index (0-based, config order).
    seat: usize,
    /// Seat name.
    name: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average final tiles.
    avg_tiles: f64,
    /// Final tiles standard deviation.
    tiles_std_dev: f64,
}

impl JsonTournamentResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &TournamentStats) -> Self {
        let players = stats
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonTournamentPlayer {
                seat: i,
                name: name.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_tiles: stats.avg_tiles(i),
                tiles_std_dev: stats.tiles_std_dev(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            avg_turns: stats.avg_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in stats.names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        let _ = writeln!(output, "  {name}: {rate:.1}% ({wins} wins)");
    }
    let draw_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.draws as f64 / stats.games_played as f64 * 100.0
    };
    let _ = writeln!(output, "  Undecided: {} ({draw_rate:.1}%)\n", stats.draws);

    output.push_str("Average Final Tiles:\n");
    for (i, name) in stats.names.iter().enumerate() {
        let _ = writeln!(
            output,
            "  {name}: {:.1} (+/- {:.1})",
            stats.avg_tiles(i),
            stats.tiles_std_dev(i)
        );
    }

    let _ = writeln!(output, "\nAverage Game Length: {:.0} turns", stats.avg_turns());

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats) -> String {
    let mut output = String::new();

    output.push_str("seat,name,wins,win_rate,avg_tiles,tiles_std_dev\n");
    for (i, name) in stats.names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{i},{name},{},{:.4},{:.2},{:.2}",
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_tiles(i),
            stats.tiles_std_dev(i)
        );
    }

    output
}
