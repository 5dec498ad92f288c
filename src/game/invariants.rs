//! Game invariants - structural checks that detect engine bugs.
//!
//! None of these should ever fire after a completed operation on a state
//! reached through legal moves. If one does, the mutation engine is broken.

use std::collections::BTreeSet;

use crate::game::{Content, GameState};
use crate::hex::Hex;

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(violations: &mut Vec<InvariantViolation>, message: String) {
    violations.push(InvariantViolation { message });
}

/// Check all game invariants.
///
/// Returns every violation found, or an empty list if the state is sound:
/// - tile and kingdom references agree in both directions
/// - every kingdom tile is owned by the kingdom's owner
/// - every kingdom has at least two tiles, is connected, and is maximal
/// - no kingdom has more than one capital
/// - units, castles and capitals only stand inside kingdoms
/// - treasuries are non-negative
/// - the neighbor cache matches the map
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for tile in state.map.iter() {
        if let Some(id) = tile.kingdom {
            match state.kingdom(id) {
                None => violation(
                    &mut violations,
                    format!("Tile {} references missing kingdom {id}", tile.coord),
                ),
                Some(k) => {
                    if !k.contains(tile.coord) {
                        violation(
                            &mut violations,
                            format!("Tile {} claims {id} but is not a member", tile.coord),
                        );
                    }
                    if tile.owner != Some(k.owner) {
                        violation(
                            &mut violations,
                            format!(
                                "Tile {} owned by {:?} inside {id} of player {}",
                                tile.coord, tile.owner, k.owner
                            ),
                        );
                    }
                }
            }
        } else if matches!(
            tile.content,
            Some(Content::Unit(_) | Content::Castle | Content::Capital)
        ) {
            violation(
                &mut violations,
                format!("Lone tile {} holds {:?}", tile.coord, tile.content),
            );
        }

        for (slot, dir) in tile.neighbor_slots().iter().zip(Hex::DIRECTIONS) {
            let expected = tile.coord + dir;
            let cached = slot.is_some();
            if cached != state.map.contains(expected) || slot.is_some_and(|h| h != expected) {
                violation(
                    &mut violations,
                    format!("Tile {} has a stale neighbor cache", tile.coord),
                );
                break;
            }
        }
    }

    for kingdom in state.kingdoms() {
        let id = kingdom.id;
        if kingdom.size() < 2 {
            violation(
                &mut violations,
                format!("Kingdom {id} has {} tiles", kingdom.size()),
            );
        }
        if kingdom.savings < 0 {
            violation(
                &mut violations,
                format!("Kingdom {id} has negative savings {}", kingdom.savings),
            );
        }
        if usize::from(kingdom.owner) >= state.players.len() {
            violation(
                &mut violations,
                format!("Kingdom {id} owned by unknown player {}", kingdom.owner),
            );
        }
        for coord in &kingdom.tiles {
            let back = state.map.get(*coord).and_then(|t| t.kingdom);
            if back != Some(id) {
                violation(
                    &mut violations,
                    format!("Kingdom {id} lists {coord} which points at {back:?}"),
                );
            }
        }

        let capitals = kingdom
            .tiles
            .iter()
            .filter(|h| state.content_at(**h) == Some(Content::Capital))
            .count();
        if capitals > 1 {
            violation(
                &mut violations,
                format!("Kingdom {id} has {capitals} capitals"),
            );
        }

        if let Some(seed) = kingdom.tiles.first() {
            let reached = state.flood(*seed, &kingdom.tiles);
            if reached.len() != kingdom.size() {
                violation(
                    &mut violations,
                    format!(
                        "Kingdom {id} is disconnected: {} of {} tiles reachable",
                        reached.len(),
                        kingdom.size()
                    ),
                );
            }
        }
    }

    // Maximality: adjacent tiles of one owner never sit in different
    // kingdoms or outside one.
    let mut reported: BTreeSet<(Hex, Hex)> = BTreeSet::new();
    for tile in state.map.iter() {
        let Some(owner) = tile.owner else { continue };
        for n in tile.neighbors() {
            let Some(other) = state.map.get(n) else { continue };
            if other.owner == Some(owner)
                && (tile.kingdom != other.kingdom || tile.kingdom.is_none())
                && reported.insert((tile.coord.min(n), tile.coord.max(n)))
            {
                violation(
                    &mut violations,
                    format!(
                        "Adjacent tiles {} and {n} of player {owner} are not in one kingdom",
                        tile.coord
                    ),
                );
            }
        }
    }

    violations
}

/// Assert all invariants hold (panics on violation).
///
/// Only runs in debug builds; a no-op in release.
///
/// # Panics
///
/// Panics if any invariant is violated (debug builds only).
#[inline]
pub fn assert_invariants(state: &GameState) {
    #[cfg(debug_assertions)]
    {
        let violations = check_invariants(state);
        if !violations.is_empty() {
            let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
            panic!("Game invariants violated:\n{}", messages.join("\n"));
        }
    }
    #[cfg(not(debug_assertions))]
    let _ = state;
}
