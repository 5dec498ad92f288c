//! Tile evaluation for the planner.
//!
//! Each scorer is a pure read of the board. Candidates are scored in
//! parallel and ranked afterwards by one deterministic comparator (score
//! descending, then tile order), so the result never depends on thread
//! scheduling. A score of `-1` marks a tile that is not a candidate.

use rayon::prelude::*;

use crate::game::{protection_level, Content, GameState, KingdomId, PlayerId};
use crate::hex::Hex;

/// Score marking a non-candidate.
pub const NOT_A_CANDIDATE: i32 = -1;

/// Score every tile in parallel and return the candidates best first.
pub(super) fn ranked<F>(candidates: &[Hex], score: F) -> Vec<(Hex, i32)>
where
    F: Fn(Hex) -> i32 + Sync,
{
    let mut scored: Vec<(Hex, i32)> = candidates
        .par_iter()
        .map(|h| (*h, score(*h)))
        .filter(|(_, s)| *s > NOT_A_CANDIDATE)
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
}

/// The single best candidate.
pub(super) fn best<F>(candidates: &[Hex], score: F) -> Option<(Hex, i32)>
where
    F: Fn(Hex) -> i32 + Sync,
{
    ranked(candidates, score).into_iter().next()
}

fn in_kingdom(state: &GameState, coord: Hex, kingdom: KingdomId) -> bool {
    state.map.get(coord).is_some_and(|t| t.kingdom == Some(kingdom))
}

/// A tile in a kingdom of another player.
fn is_foreign_kingdom(state: &GameState, coord: Hex, player: PlayerId) -> bool {
    state
        .map
        .get(coord)
        .is_some_and(|t| t.kingdom.is_some() && t.owner != Some(player))
}

/// Empty tiles of `kingdom` within two steps of a foreign kingdom.
#[must_use]
pub(super) fn border_tiles(state: &GameState, kingdom: KingdomId) -> Vec<Hex> {
    let Some(k) = state.kingdom(kingdom) else {
        return Vec::new();
    };
    k.tiles
        .iter()
        .copied()
        .filter(|h| state.content_at(*h).is_none())
        .filter(|h| {
            h.neighbors()
                .into_iter()
                .chain(h.ring2())
                .any(|n| is_foreign_kingdom(state, n, k.owner))
        })
        .collect()
}

/// Empty tiles of `kingdom`.
#[must_use]
pub(super) fn empty_tiles(state: &GameState, kingdom: KingdomId) -> Vec<Hex> {
    state.kingdom(kingdom).map_or_else(Vec::new, |k| {
        k.tiles
            .iter()
            .copied()
            .filter(|h| state.content_at(*h).is_none())
            .collect()
    })
}

/// Defensive value of putting something on `coord`.
///
/// Counts the border relations `(T, E)` that are currently unprotected,
/// where `T` is `coord` or one of its neighbors in the kingdom and `E` is a
/// neighbor of `T` in a foreign kingdom. Occupied tiles are not candidates.
#[must_use]
pub fn defense_score(state: &GameState, kingdom: KingdomId, coord: Hex, smart: bool) -> i32 {
    if !in_kingdom(state, coord, kingdom) || state.content_at(coord).is_some() {
        return NOT_A_CANDIDATE;
    }
    if !smart {
        return 0;
    }
    let Some(player) = state.kingdom(kingdom).map(|k| k.owner) else {
        return NOT_A_CANDIDATE;
    };
    let guarded = std::iter::once(coord)
        .chain(coord.neighbors().into_iter().filter(|n| in_kingdom(state, *n, kingdom)));
    let mut score = 0;
    for t in guarded {
        if protection_level(state, t) > 0 {
            continue;
        }
        let exposed = t
            .neighbors()
            .into_iter()
            .filter(|e| is_foreign_kingdom(state, *e, player))
            .count();
        score += i32::try_from(exposed).unwrap_or(0);
    }
    score
}

/// Tiles outside `kingdom` that it borders and does not own.
#[must_use]
pub(super) fn conquest_candidates(state: &GameState, kingdom: KingdomId) -> Vec<Hex> {
    let Some(k) = state.kingdom(kingdom) else {
        return Vec::new();
    };
    let mut out: Vec<Hex> = k
        .tiles
        .iter()
        .flat_map(|h| h.neighbors())
        .filter(|n| state.map.get(*n).is_some_and(|t| t.owner != Some(k.owner)))
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Value of taking `coord`: capitals first, then defenders by strength,
/// then kingdom tiles over lone ones, plus how many of our tiles touch it.
#[must_use]
pub fn conquest_score(state: &GameState, kingdom: KingdomId, coord: Hex, smart: bool) -> i32 {
    let Some(tile) = state.map.get(coord) else {
        return NOT_A_CANDIDATE;
    };
    if tile.kingdom == Some(kingdom) {
        return NOT_A_CANDIDATE;
    }
    if !smart {
        return 0;
    }
    let mut score = match tile.content {
        Some(Content::Capital) => 20,
        Some(c @ (Content::Unit(_) | Content::Castle)) => 5 * i32::from(c.strength()),
        _ => 0,
    };
    score += if tile.kingdom.is_some() { 4 } else { 1 };
    let touching = tile
        .neighbors()
        .filter(|n| in_kingdom(state, *n, kingdom))
        .count();
    score + i32::try_from(touching).unwrap_or(0)
}

/// Strength needed to take `coord`; `None` if even a baron is not enough.
#[must_use]
pub fn required_strength(state: &GameState, coord: Hex) -> Option<u8> {
    let needed = protection_level(state, coord) + 1;
    (needed <= 4).then_some(needed)
}

/// Urgency of clearing a tree or gravestone on `coord`.
///
/// Palm trees and trees near the beach spread along the coast; a tree with
/// a partner tree in the kingdom and empty ground next to it will spread
/// inland. Gravestones turn into trees at the end of the round.
#[must_use]
pub(super) fn blocking_score(state: &GameState, kingdom: KingdomId, coord: Hex, smart: bool) -> i32 {
    let Some(tile) = state.map.get(coord) else {
        return NOT_A_CANDIDATE;
    };
    if tile.kingdom != Some(kingdom) || !tile.content.is_some_and(Content::is_blocking) {
        return NOT_A_CANDIDATE;
    }
    if !smart {
        return 0;
    }
    let neighbors: Vec<_> = tile.neighbors().filter_map(|n| state.map.get(n)).collect();
    let room = neighbors
        .iter()
        .any(|n| n.kingdom == Some(kingdom) && n.is_empty());
    let mut score = i32::from(room);
    match tile.content {
        Some(Content::Gravestone) => score += 1,
        Some(Content::PalmTree) => score += 2,
        _ => {
            if neighbors.iter().any(|n| n.is_coastal() && n.is_empty()) {
                score += 2;
            }
            if neighbors
                .iter()
                .any(|n| n.kingdom == Some(kingdom) && n.has_tree())
            {
                score += 1;
            }
        }
    }
    score
}

/// Blocking tiles of `kingdom`.
#[must_use]
pub(super) fn blocking_tiles(state: &GameState, kingdom: KingdomId) -> Vec<Hex> {
    state.kingdom(kingdom).map_or_else(Vec::new, |k| {
        k.tiles
            .iter()
            .copied()
            .filter(|h| state.content_at(*h).is_some_and(Content::is_blocking))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::line_state;
    use crate::game::{Unit, UnitKind};

    #[test]
    fn test_ranked_is_stable() {
        let tiles = [Hex::new(2, 0), Hex::new(0, 0), Hex::new(1, 0)];
        let out = ranked(&tiles, |h| if h.q == 2 { -1 } else { 5 });
        assert_eq!(out, vec![(Hex::new(0, 0), 5), (Hex::new(1, 0), 5)]);
    }

    #[test]
    fn test_defense_score_counts_exposed_relations() {
        let mut state = line_state(&[0, 0, 0, 1, 1]);
        let ours = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        // (2,0) touches (3,0); placing at (1,0) or (2,0) covers (2,0).
        assert_eq!(defense_score(&state, ours, Hex::new(2, 0), true), 1);
        assert_eq!(defense_score(&state, ours, Hex::new(1, 0), true), 1);
        assert_eq!(defense_score(&state, ours, Hex::new(0, 0), true), 0);
        assert_eq!(defense_score(&state, ours, Hex::new(3, 0), true), NOT_A_CANDIDATE);
        state.set_content(Hex::new(1, 0), Some(Content::Castle));
        assert_eq!(defense_score(&state, ours, Hex::new(2, 0), true), 0);
        assert_eq!(defense_score(&state, ours, Hex::new(1, 0), true), NOT_A_CANDIDATE);
        assert_eq!(border_tiles(&state, ours), vec![Hex::new(2, 0)]);
    }

    #[test]
    fn test_conquest_scores() {
        let mut state = line_state(&[0, 0, 1, 1, 1]);
        let ours = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        assert_eq!(conquest_candidates(&state, ours), vec![Hex::new(2, 0)]);
        assert_eq!(conquest_score(&state, ours, Hex::new(2, 0), true), 4 + 1);
        state.set_content(Hex::new(2, 0), Some(Content::Capital));
        assert_eq!(conquest_score(&state, ours, Hex::new(2, 0), true), 20 + 4 + 1);
        assert_eq!(conquest_score(&state, ours, Hex::new(2, 0), false), 0);
        assert_eq!(required_strength(&state, Hex::new(2, 0)), Some(2));
        state.set_content(Hex::new(3, 0), Some(Content::Unit(Unit::ready(UnitKind::Baron))));
        assert_eq!(required_strength(&state, Hex::new(2, 0)), None);
    }

    #[test]
    fn test_blocking_score() {
        let mut state = line_state(&[0, 0, 0, 0]);
        let ours = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        state.set_content(Hex::new(1, 0), Some(Content::PalmTree));
        state.set_content(Hex::new(3, 0), Some(Content::Gravestone));
        // Every tile of a single row is coastal.
        assert_eq!(blocking_score(&state, ours, Hex::new(1, 0), true), 1 + 2);
        assert_eq!(blocking_score(&state, ours, Hex::new(3, 0), true), 1 + 1);
        assert_eq!(blocking_score(&state, ours, Hex::new(0, 0), true), NOT_A_CANDIDATE);
        assert_eq!(blocking_score(&state, ours, Hex::new(1, 0), false), 0);
        assert_eq!(blocking_tiles(&state, ours), vec![Hex::new(1, 0), Hex::new(3, 0)]);
    }
}
