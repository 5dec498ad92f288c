//! Economy system: income, salaries, protection, and vegetation.
//!
//! All queries are recomputed on demand from the board. A kingdom earns one
//! coin per tile that is not covered by a tree and pays each unit's salary
//! at the start of its owner's turn. A kingdom that cannot pay goes
//! bankrupt: every unit dies and leaves a gravestone.

use crate::game::{Content, GameState, KingdomId, PlayerId, Rng, Unit};
use crate::hex::Hex;

/// Income of a kingdom: member tiles minus tree-covered tiles.
#[must_use]
pub fn kingdom_income(state: &GameState, kingdom: KingdomId) -> i32 {
    let Some(k) = state.kingdom(kingdom) else {
        return 0;
    };
    let trees = k
        .tiles
        .iter()
        .filter(|h| state.content_at(**h).is_some_and(Content::is_tree))
        .count();
    to_coins(k.size() - trees)
}

/// Total salary of the units standing on a kingdom's tiles.
#[must_use]
pub fn kingdom_salaries(state: &GameState, kingdom: KingdomId) -> i32 {
    state.kingdom(kingdom).map_or(0, |k| {
        k.tiles
            .iter()
            .filter_map(|h| state.content_at(*h))
            .map(Content::salary)
            .sum()
    })
}

/// Strongest defender of `coord`: the tile's own content and the content of
/// its neighbors in the same kingdom.
#[must_use]
pub fn protection_level(state: &GameState, coord: Hex) -> u8 {
    let Some(tile) = state.map.get(coord) else {
        return 0;
    };
    let own = tile.content.map_or(0, Content::strength);
    let Some(kingdom) = tile.kingdom else {
        return own;
    };
    tile.neighbors()
        .filter_map(|n| state.map.get(n))
        .filter(|n| n.kingdom == Some(kingdom))
        .filter_map(|n| n.content)
        .map(Content::strength)
        .fold(own, u8::max)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn to_coins(n: usize) -> i32 {
    n as i32
}

impl GameState {
    /// Collect income and pay salaries for every kingdom of `player`.
    ///
    /// Units of a solvent kingdom become ready to act. An insolvent kingdom
    /// pays nothing and all its units turn into gravestones.
    pub(crate) fn start_turn_for(&mut self, player: PlayerId) {
        let ids: Vec<KingdomId> = self.kingdoms_of(player).map(|k| k.id).collect();
        for id in ids {
            let income = kingdom_income(self, id);
            let salaries = kingdom_salaries(self, id);
            let Some(kingdom) = self.kingdom_mut(id) else {
                continue;
            };
            kingdom.done_moving = false;
            kingdom.savings += income;
            let bankrupt = kingdom.savings < salaries;
            if !bankrupt {
                kingdom.savings -= salaries;
            }
            let tiles: Vec<Hex> = kingdom.tiles.iter().copied().collect();

            let mut casualties = 0usize;
            for coord in tiles {
                let tile = self.tile_mut(coord);
                if let Some(Content::Unit(unit)) = tile.content {
                    if bankrupt {
                        tile.content = Some(Content::Gravestone);
                        casualties += 1;
                    } else {
                        tile.content = Some(Content::Unit(Unit::ready(unit.kind)));
                    }
                }
            }
            if bankrupt {
                tracing::debug!(
                    kingdom = %id,
                    income,
                    salaries,
                    casualties,
                    "kingdom.bankrupt"
                );
            }
        }
    }

    /// Global vegetation pass, run once per round.
    ///
    /// Uses its own RNG seeded from the state hash so the outcome depends
    /// only on the position. Trees present at the start of the pass may
    /// seed one empty neighbor; palm trees only seed coastal neighbors.
    /// Empty tiles may sprout a tree, and gravestones rot into trees. Any
    /// tree that lands on a coastal tile is a palm tree.
    pub(crate) fn grow_trees(&mut self) {
        let mut rng = Rng::new(self.state_hash());
        let spread = self.rules.tree_spread_chance;
        let spawn = self.rules.tree_spawn_chance;

        let snapshot: Vec<(Hex, Option<Content>)> =
            self.map.iter().map(|t| (t.coord, t.content)).collect();
        let mut grown = 0usize;

        for (coord, content) in snapshot {
            match content {
                Some(Content::Tree | Content::PalmTree) => {
                    if !rng.chance(spread) {
                        continue;
                    }
                    let palm_only = content == Some(Content::PalmTree);
                    let targets: Vec<Hex> = self
                        .map
                        .neighbors(coord)
                        .filter(|n| {
                            self.map
                                .get(*n)
                                .is_some_and(|t| t.is_empty() && (!palm_only || t.is_coastal()))
                        })
                        .collect();
                    if let Some(target) = rng.pick(&targets) {
                        self.plant(target);
                        grown += 1;
                    }
                }
                Some(Content::Gravestone) => self.plant(coord),
                None => {
                    if rng.chance(spawn) {
                        self.plant(coord);
                        grown += 1;
                    }
                }
                Some(_) => {}
            }
        }
        tracing::debug!(turn = self.turn, grown, "trees.grown");
    }

    pub(crate) fn plant(&mut self, coord: Hex) {
        let tile = self.tile_mut(coord);
        tile.content = Some(if tile.is_coastal() {
            Content::PalmTree
        } else {
            Content::Tree
        });
    }
}
