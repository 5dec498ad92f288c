//! Player actions on the held-object slot.
//!
//! Every operation here assumes the move was already accepted by the
//! validator in [`crate::game::rules`]; none of them re-check legality.
//! Broken preconditions that would corrupt the board panic instead.

use serde::{Deserialize, Serialize};

use crate::game::territory::may_split;
use crate::game::{Content, GameState, Unit, UnitKind};
use crate::hex::Hex;

/// Something a kingdom can buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purchase {
    /// A fresh peasant, ready to act.
    Peasant,
    /// A castle.
    Castle,
}

impl Purchase {
    /// The object put into the hand.
    #[must_use]
    pub const fn content(self) -> Content {
        match self {
            Purchase::Peasant => Content::Unit(Unit::ready(UnitKind::Peasant)),
            Purchase::Castle => Content::Castle,
        }
    }
}

impl GameState {
    /// Select the kingdom containing `coord`.
    pub fn activate_kingdom(&mut self, coord: Hex) {
        self.active_kingdom = self.map.get(coord).and_then(|t| t.kingdom);
        if let Some(id) = self.active_kingdom {
            if let Some(k) = self.kingdom_mut(id) {
                k.was_active_in_current_turn = true;
            }
        }
    }

    /// Move the content of `coord` into the hand.
    pub fn pickup_object(&mut self, coord: Hex) {
        let content = self.tile_mut(coord).content.take();
        debug_assert!(self.held.is_none(), "picking up at {coord} with a full hand");
        self.held = content;
    }

    /// Put the held object on a tile of the active kingdom.
    ///
    /// A unit that has to clear a tree or gravestone to stand there has
    /// spent its action.
    ///
    /// # Panics
    ///
    /// Panics if nothing is held.
    pub fn place_own(&mut self, coord: Hex) {
        let Some(held) = self.held.take() else {
            panic!("placing at {coord} with an empty hand");
        };
        let tile = self.tile_mut(coord);
        let cleared = tile.content.is_some_and(Content::is_blocking);
        tile.content = Some(match held {
            Content::Unit(unit) if cleared => Content::Unit(Unit::spent(unit.kind)),
            other => other,
        });
    }

    /// Merge the held unit with the unit standing on `coord`.
    ///
    /// The participant that is not a peasant moves up one tier (two
    /// peasants make a spearman). The result keeps the standing unit's
    /// action flag and is placed on `coord`.
    ///
    /// # Panics
    ///
    /// Panics unless both the hand and the tile hold units whose
    /// combination exists.
    pub fn combine_units(&mut self, coord: Hex) {
        let held = self.held.take().and_then(Content::unit);
        let standing = self.content_at(coord).and_then(Content::unit);
        let (Some(held), Some(standing)) = (held, standing) else {
            panic!("combining at {coord} requires a held unit and a standing unit");
        };
        let base = if held.kind == UnitKind::Peasant {
            standing.kind
        } else {
            held.kind
        };
        let Some(kind) = base.upgraded() else {
            panic!("no unit above {base:?} to combine into at {coord}");
        };
        self.set_content(coord, None);
        self.held = Some(Content::Unit(Unit {
            kind,
            can_act: standing.can_act,
        }));
        self.place_own(coord);
    }

    /// Pay for `object` from the active kingdom and put it in the hand.
    ///
    /// # Panics
    ///
    /// Panics if no kingdom is active.
    pub fn buy(&mut self, object: Purchase) {
        let id = self.require_active();
        let cost = self.cost_of(object);
        if let Some(k) = self.kingdom_mut(id) {
            k.savings -= cost;
        }
        debug_assert!(self.held.is_none(), "buying {object:?} with a full hand");
        self.held = Some(object.content());
    }

    /// Buy a peasant for the active kingdom.
    pub fn buy_peasant(&mut self) {
        self.buy(Purchase::Peasant);
    }

    /// Buy a castle for the active kingdom.
    pub fn buy_castle(&mut self) {
        self.buy(Purchase::Castle);
    }

    /// Tear down a castle on a tile of the active kingdom and refund its
    /// price.
    ///
    /// # Panics
    ///
    /// Panics if no kingdom is active.
    pub fn refund_castle(&mut self, coord: Hex) {
        let id = self.require_active();
        debug_assert_eq!(self.content_at(coord), Some(Content::Castle));
        self.set_content(coord, None);
        let refund = self.rules.castle_cost;
        if let Some(k) = self.kingdom_mut(id) {
            k.savings += refund;
        }
    }

    /// Price of a purchase under the current rules.
    #[must_use]
    pub const fn cost_of(&self, object: Purchase) -> i32 {
        match object {
            Purchase::Peasant => self.rules.peasant_cost,
            Purchase::Castle => self.rules.castle_cost,
        }
    }

    /// Take `coord` with the held unit for the active kingdom.
    ///
    /// Losing a capital in a kingdom of more than two tiles relocates it and
    /// wipes the treasury. The conquered tile joins the attacker, pulling in
    /// the conqueror's adjacent lone tiles and merging the conqueror's
    /// adjacent kingdoms. If the victim may have been cut in two it is
    /// re-partitioned.
    ///
    /// # Panics
    ///
    /// Panics if no kingdom is active or nothing is held.
    pub fn conquer(&mut self, coord: Hex) {
        let attacker = self.require_active();
        let Some(held) = self.held.take() else {
            panic!("conquering {coord} with an empty hand");
        };
        let held = match held {
            Content::Unit(unit) => Content::Unit(Unit::spent(unit.kind)),
            other => other,
        };
        let owner = self.owner_of(attacker);
        let victim = self.map.get(coord).and_then(|t| t.kingdom);

        if let Some(old) = victim {
            let size = self.kingdom(old).map_or(0, |k| k.size());
            if self.content_at(coord) == Some(Content::Capital) && size > 2 {
                self.set_content(coord, None);
                self.create_capital(old, Some(coord));
                if let Some(k) = self.kingdom_mut(old) {
                    k.savings = 0;
                }
                tracing::debug!(kingdom = %old, tile = %coord, "capital.lost");
            }
            if let Some(k) = self.kingdom_mut(old) {
                k.tiles.remove(&coord);
            }
            self.tile_mut(coord).kingdom = None;
        }

        self.assign_tile(coord, attacker);
        self.set_content(coord, Some(held));

        let slots = *self.tile_mut(coord).neighbor_slots();
        let mut remaining = [false; 6];
        for (i, slot) in slots.iter().enumerate() {
            let Some(n) = *slot else { continue };
            let Some((n_owner, n_kingdom)) = self.map.get(n).map(|t| (t.owner, t.kingdom)) else {
                continue;
            };
            if n_owner == Some(owner) {
                match n_kingdom {
                    None => self.assign_tile(n, attacker),
                    Some(other) if other != attacker => self.merge_kingdoms(attacker, other),
                    Some(_) => {}
                }
            } else if victim.is_some() && n_kingdom == victim {
                remaining[i] = true;
            }
        }

        if let Some(old) = victim {
            let size = self.kingdom(old).map_or(0, |k| k.size());
            if size < 2 || may_split(remaining) {
                self.update_split_kingdom(old);
            }
        }
        if self.capital_of(attacker).is_none() {
            self.create_capital(attacker, None);
        }
        tracing::debug!(kingdom = %attacker, tile = %coord, "tile.conquered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rules;
    use crate::game::test_support::{line_state, two_players};
    use crate::game::{check_invariants, KingdomId};

    fn peasant() -> Content {
        Content::Unit(Unit::ready(UnitKind::Peasant))
    }

    fn select(state: &mut GameState, coord: Hex) -> KingdomId {
        state.activate_kingdom(coord);
        state.active_kingdom.unwrap()
    }

    #[test]
    fn test_pickup_and_place() {
        let mut state = line_state(&[0, 0, 0]);
        select(&mut state, Hex::new(0, 0));
        state.set_content(Hex::new(0, 0), Some(peasant()));
        state.pickup_object(Hex::new(0, 0));
        assert_eq!(state.held, Some(peasant()));
        assert_eq!(state.content_at(Hex::new(0, 0)), None);
        state.place_own(Hex::new(2, 0));
        assert_eq!(state.held, None);
        assert_eq!(state.content_at(Hex::new(2, 0)), Some(peasant()));
    }

    #[test]
    fn test_clearing_tree_spends_unit() {
        let mut state = line_state(&[0, 0]);
        select(&mut state, Hex::new(0, 0));
        state.set_content(Hex::new(1, 0), Some(Content::Tree));
        state.held = Some(peasant());
        state.place_own(Hex::new(1, 0));
        assert_eq!(
            state.content_at(Hex::new(1, 0)),
            Some(Content::Unit(Unit::spent(UnitKind::Peasant)))
        );
    }

    #[test]
    fn test_placement_spends_only_when_clearing() {
        let mut state = line_state(&[0, 0, 0]);
        select(&mut state, Hex::new(0, 0));
        state.set_content(Hex::new(1, 0), Some(Content::Gravestone));
        state.held = Some(Content::Unit(Unit::ready(UnitKind::Baron)));
        state.place_own(Hex::new(1, 0));
        assert_eq!(
            state.content_at(Hex::new(1, 0)),
            Some(Content::Unit(Unit::spent(UnitKind::Baron)))
        );
        state.held = Some(Content::Unit(Unit::ready(UnitKind::Knight)));
        state.place_own(Hex::new(2, 0));
        assert_eq!(
            state.content_at(Hex::new(2, 0)),
            Some(Content::Unit(Unit::ready(UnitKind::Knight)))
        );
    }

    #[test]
    fn test_combine_upgrades_and_keeps_flag() {
        let mut state = line_state(&[0, 0]);
        select(&mut state, Hex::new(0, 0));
        state.set_content(
            Hex::new(0, 0),
            Some(Content::Unit(Unit::spent(UnitKind::Spearman))),
        );
        state.held = Some(peasant());
        state.combine_units(Hex::new(0, 0));
        assert_eq!(
            state.content_at(Hex::new(0, 0)),
            Some(Content::Unit(Unit::spent(UnitKind::Knight)))
        );
        assert!(state.held.is_none());
    }

    #[test]
    fn test_buy_and_refund() {
        let mut state = line_state(&[0, 0]);
        let id = select(&mut state, Hex::new(0, 0));
        state.kingdom_mut(id).unwrap().savings = 40;
        state.buy_castle();
        assert_eq!(state.kingdom(id).unwrap().savings, 25);
        state.place_own(Hex::new(1, 0));
        state.refund_castle(Hex::new(1, 0));
        assert_eq!(state.kingdom(id).unwrap().savings, 40);
        assert_eq!(state.content_at(Hex::new(1, 0)), None);
        state.buy_peasant();
        assert_eq!(state.kingdom(id).unwrap().savings, 30);
        assert_eq!(state.held, Some(peasant()));
    }

    #[test]
    fn test_conquer_capital_relocates_and_wipes_savings() {
        // Attacker 0 at q=0..1, victim 1 at q=2..4.
        let mut state = line_state(&[0, 0, 1, 1, 1]);
        let victim = state.kingdom_at(Hex::new(2, 0)).unwrap().id;
        state.kingdom_mut(victim).unwrap().savings = 25;
        state.set_content(Hex::new(2, 0), Some(Content::Capital));
        state.set_content(Hex::new(0, 0), Some(Content::Capital));
        let attacker = select(&mut state, Hex::new(0, 0));
        state.held = Some(Content::Unit(Unit::ready(UnitKind::Spearman)));

        state.conquer(Hex::new(2, 0));

        let k = state.kingdom(victim).unwrap();
        assert_eq!(k.savings, 0);
        assert_eq!(k.size(), 2);
        assert_eq!(state.capital_of(victim), Some(Hex::new(3, 0)));
        assert!(state.kingdom(attacker).unwrap().contains(Hex::new(2, 0)));
        assert_eq!(
            state.content_at(Hex::new(2, 0)),
            Some(Content::Unit(Unit::spent(UnitKind::Spearman)))
        );
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_conquer_dissolves_two_tile_kingdom() {
        let mut state = line_state(&[0, 0, 1, 1]);
        state.set_content(Hex::new(3, 0), Some(Content::Castle));
        select(&mut state, Hex::new(0, 0));
        state.held = Some(peasant());

        state.conquer(Hex::new(2, 0));

        assert_eq!(state.kingdoms_of(1).count(), 0);
        let lone = state.map.get(Hex::new(3, 0)).unwrap();
        assert!(lone.kingdom.is_none());
        assert_eq!(lone.owner, Some(1));
        assert_eq!(lone.content, None);
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_conquer_merges_and_annexes() {
        // Kingdoms of 0 west and south-east of the target, a lone tile of 0
        // north-east of it, and a two-tile kingdom of 1 holding the target.
        let tiles = [
            (Hex::new(0, 0), 0),
            (Hex::new(1, 0), 0),
            (Hex::new(2, 1), 0),
            (Hex::new(2, 2), 0),
            (Hex::new(3, -1), 0),
            (Hex::new(2, 0), 1),
            (Hex::new(2, -1), 1),
        ];
        let mut state = GameState::from_owned_tiles(two_players(), tiles, Rules::default(), 3);
        let left = state.kingdom_at(Hex::new(0, 0)).unwrap().id;
        let right = state.kingdom_at(Hex::new(2, 2)).unwrap().id;
        assert!(state.kingdom_at(Hex::new(3, -1)).is_none());
        state.kingdom_mut(left).unwrap().savings = 4;
        state.kingdom_mut(right).unwrap().savings = 9;
        state.set_content(Hex::new(0, 0), Some(Content::Capital));
        state.set_content(Hex::new(2, 2), Some(Content::Capital));
        select(&mut state, Hex::new(0, 0));
        state.held = Some(peasant());

        state.conquer(Hex::new(2, 0));

        let merged = state.kingdom(left).unwrap();
        assert_eq!(merged.savings, 13);
        assert_eq!(merged.size(), 6);
        assert!(merged.contains(Hex::new(3, -1)));
        assert!(state.kingdom(right).is_none());
        assert_eq!(state.content_at(Hex::new(2, 2)), None);
        assert_eq!(state.kingdoms_of(1).count(), 0);
        assert!(state.map.get(Hex::new(2, -1)).unwrap().kingdom.is_none());
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_conquer_splits_victim() {
        // Victim row q=1..5 on r=0, attacker reaches (3,0) from above.
        let mut tiles: Vec<(Hex, u8)> = (1..=5).map(|q| (Hex::new(q, 0), 1)).collect();
        tiles.push((Hex::new(3, -1), 0));
        tiles.push((Hex::new(4, -1), 0));
        let mut state = GameState::from_owned_tiles(two_players(), tiles, Rules::default(), 3);
        let victim = state.kingdom_at(Hex::new(1, 0)).unwrap().id;
        state.kingdom_mut(victim).unwrap().savings = 12;
        state.set_content(Hex::new(5, 0), Some(Content::Capital));
        select(&mut state, Hex::new(3, -1));
        state.held = Some(peasant());

        state.conquer(Hex::new(3, 0));

        let kept = state.kingdom(victim).unwrap();
        assert_eq!(kept.savings, 12);
        assert_eq!(kept.tiles.iter().copied().collect::<Vec<_>>(), vec![Hex::new(4, 0), Hex::new(5, 0)]);
        let split_off = state.kingdom_at(Hex::new(1, 0)).unwrap();
        assert_ne!(split_off.id, victim);
        assert_eq!(split_off.size(), 2);
        assert_eq!(split_off.savings, 0);
        assert!(state.capital_of(split_off.id).is_some());
        assert!(check_invariants(&state).is_empty());
    }
}
