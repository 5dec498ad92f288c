//! Kingdom topology: union, merge, split detection and resolution, capitals.
//!
//! A kingdom is always a maximal connected set of same-owner tiles with at
//! least two members. Conquest edits one tile at a time, so everything here
//! repairs the invariant locally instead of recomputing the whole board.

use std::collections::{BTreeSet, VecDeque};

use crate::game::{Content, GameState, KingdomId, PlayerId};
use crate::hex::Hex;

/// Whether removing `center` from a kingdom may disconnect it.
///
/// `remaining` are the neighbor slots of `center` (in [`Hex::DIRECTIONS`]
/// order) that are still members of the shrunk kingdom. Consecutive slots
/// are adjacent to each other, so members forming one unbroken run around
/// the ring stay connected without `center`. Two or more runs may have
/// relied on `center` to reach each other, which only a flood fill can
/// settle. Never reports `false` for an actual split.
#[must_use]
pub fn may_split(remaining: [bool; 6]) -> bool {
    let count = remaining.iter().filter(|m| **m).count();
    if count <= 1 || count >= 5 {
        return false;
    }
    // Count run starts: a member whose counter-clockwise predecessor is not.
    let runs = (0..6)
        .filter(|&i| remaining[i] && !remaining[(i + 5) % 6])
        .count();
    runs > 1
}

impl GameState {
    /// Group every owned tile into kingdoms by scanning neighbor pairs.
    ///
    /// Two adjacent same-owner tiles end up in one kingdom; when they already
    /// belong to different kingdoms those are merged.
    pub(crate) fn union_kingdoms(&mut self) {
        let coords: Vec<Hex> = self.map.coords().collect();
        for coord in coords {
            let Some(owner) = self.map.get(coord).and_then(|t| t.owner) else {
                continue;
            };
            let neighbors: Vec<Hex> = self.map.neighbors(coord).collect();
            for n in neighbors {
                let Some((other_owner, theirs)) = self.map.get(n).map(|t| (t.owner, t.kingdom))
                else {
                    continue;
                };
                if other_owner != Some(owner) {
                    continue;
                }
                let mine = self.map.get(coord).and_then(|t| t.kingdom);
                match (mine, theirs) {
                    (None, None) => {
                        let id = self.create_kingdom(owner);
                        self.assign_tile(coord, id);
                        self.assign_tile(n, id);
                    }
                    (Some(id), None) => self.assign_tile(n, id),
                    (None, Some(id)) => self.assign_tile(coord, id),
                    (Some(a), Some(b)) if a != b => self.merge_kingdoms(a, b),
                    _ => {}
                }
            }
        }
    }

    /// Absorb `absorbed` into `keep`.
    ///
    /// Treasuries add up, the absorbed kingdom's capital is removed, and
    /// `keep` is no longer done moving unless both were.
    ///
    /// # Panics
    ///
    /// Panics if either kingdom is missing or the owners differ.
    pub(crate) fn merge_kingdoms(&mut self, keep: KingdomId, absorbed: KingdomId) {
        if keep == absorbed {
            return;
        }
        let Some(gone) = self.kingdoms_remove_for_merge(absorbed, keep) else {
            panic!("merging missing kingdom {absorbed} into {keep}");
        };
        let Some(target) = self.kingdom_mut(keep) else {
            panic!("merging {absorbed} into missing kingdom {keep}");
        };
        assert_eq!(
            target.owner, gone.owner,
            "merging kingdoms {keep} and {absorbed} with different owners"
        );
        target.savings += gone.savings;
        if !gone.done_moving {
            target.done_moving = false;
        }
        target.was_active_in_current_turn |= gone.was_active_in_current_turn;

        for coord in &gone.tiles {
            let tile = self.tile_mut(*coord);
            tile.kingdom = Some(keep);
            if tile.content == Some(Content::Capital) {
                tile.content = None;
            }
        }
        if let Some(target) = self.kingdom_mut(keep) {
            target.tiles.extend(gone.tiles.iter().copied());
        }
        tracing::debug!(
            keep = %keep,
            absorbed = %absorbed,
            tiles = gone.tiles.len(),
            "kingdom.merged"
        );
    }

    /// Remove a kingdom that is being merged; a selection on it moves to
    /// the surviving kingdom.
    fn kingdoms_remove_for_merge(
        &mut self,
        absorbed: KingdomId,
        keep: KingdomId,
    ) -> Option<crate::game::Kingdom> {
        let was_active = self.active_kingdom == Some(absorbed);
        let removed = self.remove_kingdom(absorbed);
        if was_active {
            self.active_kingdom = Some(keep);
        }
        removed
    }

    /// Split `kingdom` into its connected components.
    ///
    /// The component holding the capital (or, without one, the first
    /// component of two or more tiles) keeps the kingdom's id, treasury
    /// and flags; every other component of two or more tiles becomes a new
    /// kingdom with an empty treasury and a fresh capital. Single-tile
    /// components are dissolved: the tile leaves all kingdoms and loses any
    /// non-tree content.
    ///
    /// # Panics
    ///
    /// Panics if the kingdom does not exist or has no tiles.
    pub(crate) fn update_split_kingdom(&mut self, kingdom: KingdomId) {
        let Some(original) = self.remove_kingdom_keep_selection(kingdom) else {
            panic!("split resolution on missing kingdom {kingdom}");
        };
        assert!(
            !original.tiles.is_empty(),
            "split resolution on empty kingdom {kingdom}"
        );

        let owner = original.owner;
        let mut remaining: BTreeSet<Hex> = original.tiles.clone();
        let mut heir = Some(original);
        let mut components = 0usize;

        while !remaining.is_empty() {
            let capital_seed = heir.as_ref().and_then(|_| {
                remaining
                    .iter()
                    .copied()
                    .find(|h| self.content_at(*h) == Some(Content::Capital))
            });
            let seed = capital_seed.or_else(|| remaining.first().copied());
            let Some(seed) = seed else { break };
            let component = self.flood(seed, &remaining);
            for coord in &component {
                remaining.remove(coord);
            }
            components += 1;

            if component.len() < 2 {
                self.dissolve(&component);
                continue;
            }

            // The first surviving component inherits the kingdom; it is the
            // capital's component whenever the capital survived.
            let id = match heir.take() {
                Some(mut kept) => {
                    kept.tiles = component.clone();
                    let id = kept.id;
                    self.restore_kingdom(kept);
                    id
                }
                None => self.create_kingdom(owner),
            };
            for coord in &component {
                self.assign_tile(*coord, id);
            }
            if self.capital_of(id).is_none() {
                self.create_capital(id, None);
            }
        }

        tracing::debug!(
            kingdom = %kingdom,
            components,
            kept_identity = heir.is_none(),
            "kingdom.split"
        );
    }

    /// Remove a kingdom for re-partitioning; the selection is preserved so a
    /// kingdom that keeps its identity stays selected.
    fn remove_kingdom_keep_selection(&mut self, id: KingdomId) -> Option<crate::game::Kingdom> {
        let active = self.active_kingdom;
        let removed = self.remove_kingdom(id);
        self.active_kingdom = active;
        removed
    }

    /// Tiles of `within` reachable from `seed` through `within`.
    pub(crate) fn flood(&self, seed: Hex, within: &BTreeSet<Hex>) -> BTreeSet<Hex> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        seen.insert(seed);
        queue.push_back(seed);
        while let Some(current) = queue.pop_front() {
            for n in self.map.neighbors(current) {
                if within.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    /// Detach tiles from every kingdom and clear their non-tree content.
    fn dissolve(&mut self, tiles: &BTreeSet<Hex>) {
        for coord in tiles {
            let tile = self.tile_mut(*coord);
            tile.kingdom = None;
            if !tile.content.is_some_and(Content::is_tree) {
                tile.content = None;
            }
            tracing::debug!(tile = %coord, "kingdom.dissolved");
        }
    }

    /// Place a capital for `kingdom`.
    ///
    /// Preference order: an empty member next to `vacated` (the capital tile
    /// being lost), then any empty member, then any member next to `vacated`
    /// that still touches another member besides `vacated`. Returns the
    /// chosen tile, or `None` if nothing qualifies; the kingdom then simply
    /// has no capital.
    pub(crate) fn create_capital(&mut self, kingdom: KingdomId, vacated: Option<Hex>) -> Option<Hex> {
        let members = self.kingdom(kingdom)?.tiles.clone();
        let is_empty = |state: &Self, h: Hex| state.map.get(h).is_some_and(|t| t.is_empty());

        let mut choice = vacated.and_then(|v| {
            v.neighbors()
                .into_iter()
                .find(|n| members.contains(n) && is_empty(self, *n))
        });

        if choice.is_none() {
            let empties: Vec<Hex> = members
                .iter()
                .copied()
                .filter(|h| Some(*h) != vacated && is_empty(self, *h))
                .collect();
            choice = self.rng.pick(&empties);
        }

        if choice.is_none() {
            choice = vacated.and_then(|v| {
                v.neighbors().into_iter().find(|n| {
                    members.contains(n)
                        && n.neighbors()
                            .into_iter()
                            .any(|m| m != v && members.contains(&m))
                })
            });
        }

        match choice {
            Some(coord) => {
                self.set_content(coord, Some(Content::Capital));
                tracing::debug!(kingdom = %kingdom, tile = %coord, "capital.placed");
                Some(coord)
            }
            None => {
                tracing::warn!(kingdom = %kingdom, "capital.no_eligible_tile");
                None
            }
        }
    }

    /// Owner of a kingdom that must exist.
    ///
    /// # Panics
    ///
    /// Panics if the kingdom is missing.
    pub(crate) fn owner_of(&self, kingdom: KingdomId) -> PlayerId {
        match self.kingdom(kingdom) {
            Some(k) => k.owner,
            None => panic!("kingdom {kingdom} has no owner record"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_support::{line_state, two_players};
    use crate::config::Rules;

    #[test]
    fn test_may_split_cases() {
        // Single run around the ring never splits.
        assert!(!may_split([true, true, false, false, false, false]));
        assert!(!may_split([true, false, false, false, false, true]));
        assert!(!may_split([true, true, true, true, false, false]));
        // Opposite members may be disconnected.
        assert!(may_split([true, false, false, true, false, false]));
        assert!(may_split([true, false, true, false, true, false]));
        assert!(may_split([true, true, false, true, true, false]));
        // Trivial counts.
        assert!(!may_split([false; 6]));
        assert!(!may_split([true; 6]));
        assert!(!may_split([true, true, true, true, true, false]));
    }

    #[test]
    fn test_merge_sums_savings_and_drops_capital() {
        let tiles = [
            (Hex::new(0, 0), 0),
            (Hex::new(1, 0), 0),
            (Hex::new(3, 0), 0),
            (Hex::new(4, 0), 0),
        ];
        let mut state = GameState::from_owned_tiles(two_players(), tiles, Rules::default(), 5);
        let a = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        let b = state.kingdom_at(Hex::new(3, 0)).unwrap().id;
        state.kingdom_mut(a).unwrap().savings = 7;
        state.kingdom_mut(b).unwrap().savings = 11;
        state.kingdom_mut(a).unwrap().done_moving = true;
        state.set_content(Hex::new(0, 0), Some(Content::Capital));
        state.set_content(Hex::new(3, 0), Some(Content::Capital));

        state.merge_kingdoms(a, b);

        let merged = state.kingdom(a).unwrap();
        assert_eq!(merged.savings, 18);
        assert_eq!(merged.size(), 4);
        assert!(!merged.done_moving);
        assert!(state.kingdom(b).is_none());
        assert_eq!(state.content_at(Hex::new(3, 0)), None);
        assert_eq!(state.content_at(Hex::new(0, 0)), Some(Content::Capital));
        assert_eq!(state.map.get(Hex::new(4, 0)).unwrap().kingdom, Some(a));
    }

    #[test]
    fn test_split_keeps_identity_on_capital_side() {
        let mut state = line_state(&[0, 0, 0, 0, 0]);
        let id = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        state.kingdom_mut(id).unwrap().savings = 30;
        state.set_content(Hex::new(3, 0), Some(Content::Capital));

        // Cut the middle tile out by hand.
        let middle = Hex::new(2, 0);
        state.kingdom_mut(id).unwrap().tiles.remove(&middle);
        state.tile_mut(middle).kingdom = None;
        state.tile_mut(middle).owner = Some(1);

        state.update_split_kingdom(id);

        let kept = state.kingdom(id).unwrap();
        assert_eq!(kept.savings, 30);
        assert!(kept.contains(Hex::new(3, 0)));
        assert!(kept.contains(Hex::new(4, 0)));

        let other = state.kingdom_at(Hex::new(0, 0)).unwrap();
        assert_ne!(other.id, id);
        assert_eq!(other.savings, 0);
        assert!(state.capital_of(other.id).is_some());
    }

    #[test]
    fn test_split_dissolves_singletons_but_keeps_trees() {
        let mut state = line_state(&[0, 0, 0]);
        let id = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        state.set_content(Hex::new(0, 0), Some(Content::Tree));
        state.set_content(Hex::new(2, 0), Some(Content::Capital));

        let middle = Hex::new(1, 0);
        state.kingdom_mut(id).unwrap().tiles.remove(&middle);
        state.tile_mut(middle).kingdom = None;

        state.update_split_kingdom(id);

        assert_eq!(state.kingdom_count(), 0);
        assert_eq!(state.content_at(Hex::new(0, 0)), Some(Content::Tree));
        assert_eq!(state.content_at(Hex::new(2, 0)), None);
        assert!(state.map.get(Hex::new(2, 0)).unwrap().kingdom.is_none());
    }

    #[test]
    fn test_create_capital_prefers_vacated_neighbor() {
        let mut state = line_state(&[0, 0, 0, 0]);
        let id = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        let placed = state.create_capital(id, Some(Hex::new(1, 0)));
        assert!(matches!(placed, Some(h) if h == Hex::new(0, 0) || h == Hex::new(2, 0)));
    }

    #[test]
    fn test_create_capital_last_resort_overwrites() {
        let mut state = line_state(&[0, 0, 0]);
        let id = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        for q in 0..3 {
            state.set_content(Hex::new(q, 0), Some(Content::Tree));
        }
        // Neighbors of (0,0): only (1,0) is a member, and it also touches (2,0).
        let placed = state.create_capital(id, Some(Hex::new(0, 0)));
        assert_eq!(placed, Some(Hex::new(1, 0)));
        assert_eq!(state.content_at(Hex::new(1, 0)), Some(Content::Capital));
    }

    #[test]
    fn test_create_capital_none_eligible() {
        let mut state = line_state(&[0, 0]);
        let id = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        state.set_content(Hex::new(0, 0), Some(Content::Tree));
        state.set_content(Hex::new(1, 0), Some(Content::Tree));
        assert_eq!(state.create_capital(id, None), None);
    }
}
