//! Deterministic landmass generation.
//!
//! The island grows one tile at a time by a random walk. Each new tile goes
//! to a player drawn in proportion to how much of their share is left, so
//! every player ends up with the same number of tiles scattered across the
//! island. Dead ends are escaped by walking back along the placement path.

// Map generation uses intentional casts for weights and coin amounts
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::{MapConfig, Rules, MAX_PLAYERS};
use crate::game::{assert_invariants, kingdom_income, GameState, KingdomId, Player, PlayerId, Rng};
use crate::hex::Hex;

/// Whole-island attempts before giving up on a seed.
const MAX_ATTEMPTS: u32 = 64;

/// Error type for map generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapGenError {
    /// Fewer than two players.
    #[error("need at least 2 players, got {0}")]
    TooFewPlayers(usize),
    /// More players than the game supports.
    #[error("maximum {MAX_PLAYERS} players, got {0}")]
    TooManyPlayers(usize),
    /// Not enough land for every player to form a kingdom.
    #[error("land mass {land} is too small for {players} players")]
    LandTooSmall {
        /// Requested tiles.
        land: usize,
        /// Number of players.
        players: usize,
    },
    /// Every attempt left some player without a kingdom.
    #[error("no fair map after {0} attempts")]
    Exhausted(u32),
}

/// Generate a starting position.
///
/// Players are reseated in ascending order of starting income, ids
/// reassigned to match. Every kingdom gets a capital and five coins per
/// tile; kingdoms of players other than the first have their first income
/// deducted up front, since they collect it when their turn starts.
///
/// # Errors
///
/// Returns an error if the player count or land mass is out of range, or
/// if no attempt gave every player a kingdom.
pub fn generate(
    players: Vec<Player>,
    config: &MapConfig,
    rules: Rules,
    seed: u64,
) -> Result<GameState, MapGenError> {
    let n = players.len();
    if n < 2 {
        return Err(MapGenError::TooFewPlayers(n));
    }
    if n > MAX_PLAYERS {
        return Err(MapGenError::TooManyPlayers(n));
    }
    if config.land_mass < 2 * n {
        return Err(MapGenError::LandTooSmall {
            land: config.land_mass,
            players: n,
        });
    }

    let mut rng = Rng::new(seed);
    for attempt in 0..MAX_ATTEMPTS {
        let owners = grow_landmass(&mut rng, n, config);
        let mut state = GameState::from_owned_tiles(players.clone(), owners, rules, seed);
        state.rng = rng;

        let missing = state
            .players
            .iter()
            .find(|p| state.kingdoms_of(p.id).next().is_none())
            .map(|p| p.id);
        if let Some(player) = missing {
            tracing::debug!(attempt, player, "mapgen.retry");
            rng = state.rng;
            continue;
        }

        finish(&mut state, config);
        assert_invariants(&state);
        tracing::debug!(
            seed,
            attempt,
            tiles = state.total_land(),
            kingdoms = state.kingdom_count(),
            "mapgen.done"
        );
        return Ok(state);
    }
    Err(MapGenError::Exhausted(MAX_ATTEMPTS))
}

/// Grow the island and hand out tiles. Returns `(coordinate, owner)` pairs.
fn grow_landmass(rng: &mut Rng, players: usize, config: &MapConfig) -> Vec<(Hex, PlayerId)> {
    let land = config.land_mass;
    let mut quota: Vec<f64> = (0..players)
        .map(|i| (land / players + usize::from(i < land % players)) as f64)
        .collect();
    let mut placed: BTreeMap<Hex, PlayerId> = BTreeMap::new();
    let mut history: Vec<Hex> = Vec::new();

    let mut current = Hex::new(0, 0);
    placed.insert(current, draw_owner(rng, &mut quota));

    while placed.len() < land {
        let candidates: Vec<Hex> = current
            .neighbors()
            .into_iter()
            .filter(|c| !placed.contains_key(c))
            .collect();

        if candidates.is_empty() {
            current = match history.pop() {
                Some(previous) => previous,
                None => frontier(&placed),
            };
            continue;
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|c| {
                let free = c.neighbors().iter().filter(|n| !placed.contains_key(n)).count();
                (7.0 - free as f64).powf(config.density)
            })
            .collect();
        let next = rng
            .weighted_index(&weights)
            .map_or(candidates[0], |i| candidates[i]);

        placed.insert(next, draw_owner(rng, &mut quota));
        history.push(current);
        current = next;
    }

    placed.into_iter().collect()
}

/// A placed tile that still has a free neighbor.
fn frontier(placed: &BTreeMap<Hex, PlayerId>) -> Hex {
    placed
        .keys()
        .copied()
        .find(|h| h.neighbors().iter().any(|n| !placed.contains_key(n)))
        .unwrap_or_default()
}

fn draw_owner(rng: &mut Rng, quota: &mut [f64]) -> PlayerId {
    let i = rng.weighted_index(quota).unwrap_or(0);
    quota[i] = (quota[i] - 1.0).max(0.0);
    i as PlayerId
}

/// Capitals, vegetation, seating order, and starting treasuries.
fn finish(state: &mut GameState, config: &MapConfig) {
    let ids: Vec<KingdomId> = state.kingdoms().map(|k| k.id).collect();
    for id in &ids {
        state.create_capital(*id, None);
    }

    let coords: Vec<Hex> = state.map.coords().collect();
    for coord in coords {
        if state.content_at(coord).is_none() && state.rng.chance(config.vegetation_density) {
            state.plant(coord);
        }
    }

    reseat_by_income(state);

    for id in ids {
        let income = kingdom_income(state, id);
        let per_tile = state.rules.starting_savings_per_tile;
        if let Some(k) = state.kingdom_mut(id) {
            k.savings = k.size() as i32 * per_tile;
            if k.owner != 0 {
                k.savings -= income;
            }
        }
    }
}

/// Sort players by total starting income, poorest first; ties keep seat order.
fn reseat_by_income(state: &mut GameState) {
    let income = |state: &GameState, player: PlayerId| -> i32 {
        state
            .kingdoms_of(player)
            .map(|k| kingdom_income(state, k.id))
            .sum()
    };
    let mut order: Vec<PlayerId> = state.players.iter().map(|p| p.id).collect();
    order.sort_by_key(|p| income(state, *p));

    let mut remap = [0 as PlayerId; MAX_PLAYERS];
    for (new, old) in order.iter().enumerate() {
        remap[usize::from(*old)] = new as PlayerId;
    }

    let mut seated: Vec<Player> = order
        .iter()
        .map(|old| state.players[usize::from(*old)].clone())
        .collect();
    for (new, player) in seated.iter_mut().enumerate() {
        player.id = new as PlayerId;
    }
    state.players = seated;

    for tile in state.map.iter_mut() {
        tile.owner = tile.owner.map(|o| remap[usize::from(o)]);
    }
    let ids: Vec<KingdomId> = state.kingdoms().map(|k| k.id).collect();
    for id in ids {
        if let Some(k) = state.kingdom_mut(id) {
            k.owner = remap[usize::from(k.owner)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{check_invariants, Content};

    fn players(n: u8) -> Vec<Player> {
        (0..n).map(|i| Player::human(i, format!("p{i}"))).collect()
    }

    #[test]
    fn test_generate_small_map() {
        let config = MapConfig {
            land_mass: 50,
            density: 0.0,
            vegetation_density: 0.1,
        };
        let state = generate(players(2), &config, Rules::default(), 42).unwrap();
        assert_eq!(state.total_land(), 50);
        for p in &state.players {
            assert!(state.kingdoms_of(p.id).count() >= 1, "player {} has no kingdom", p.id);
        }
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_landmass_is_connected() {
        let config = MapConfig::default();
        let state = generate(players(3), &config, Rules::default(), 7).unwrap();
        let all = state.map.coords().collect();
        let reached = state.flood(Hex::new(0, 0), &all);
        assert_eq!(reached.len(), config.land_mass);
    }

    #[test]
    fn test_every_kingdom_has_capital_and_savings() {
        let state = generate(players(4), &MapConfig::default(), Rules::default(), 11).unwrap();
        for k in state.kingdoms() {
            assert!(state.capital_of(k.id).is_some());
            assert!(k.savings > 0);
            assert!(k.savings <= k.size() as i32 * 5);
        }
    }

    #[test]
    fn test_players_sorted_by_income() {
        let state = generate(players(4), &MapConfig::default(), Rules::default(), 3).unwrap();
        let incomes: Vec<i32> = state
            .players
            .iter()
            .map(|p| state.kingdoms_of(p.id).map(|k| kingdom_income(&state, k.id)).sum())
            .collect();
        assert!(incomes.windows(2).all(|w| w[0] <= w[1]));
        for (i, p) in state.players.iter().enumerate() {
            assert_eq!(usize::from(p.id), i);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = MapConfig::default();
        let a = generate(players(2), &config, Rules::default(), 99).unwrap();
        let b = generate(players(2), &config, Rules::default(), 99).unwrap();
        let c = generate(players(2), &config, Rules::default(), 100).unwrap();
        assert_eq!(a.state_hash(), b.state_hash());
        assert_ne!(a.state_hash(), c.state_hash());
    }

    #[test]
    fn test_no_vegetation() {
        let config = MapConfig {
            vegetation_density: 0.0,
            ..MapConfig::default()
        };
        let state = generate(players(2), &config, Rules::default(), 5).unwrap();
        assert!(state
            .map
            .iter()
            .all(|t| !matches!(t.content, Some(Content::Tree | Content::PalmTree))));
    }

    #[test]
    fn test_rejects_bad_player_counts() {
        let config = MapConfig::default();
        assert_eq!(
            generate(players(1), &config, Rules::default(), 1).unwrap_err(),
            MapGenError::TooFewPlayers(1)
        );
        assert!(matches!(
            generate(players(9), &config, Rules::default(), 1),
            Err(MapGenError::TooManyPlayers(9))
        ));
        let tiny = MapConfig {
            land_mass: 3,
            ..config
        };
        assert!(matches!(
            generate(players(2), &tiny, Rules::default(), 1),
            Err(MapGenError::LandTooSmall { .. })
        ));
    }
}
