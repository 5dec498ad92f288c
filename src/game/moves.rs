//! The move vocabulary of the controller and its dispatch to engine
//! operations.

use serde::{Deserialize, Serialize};

use crate::game::{Content, GameState, Purchase};
use crate::hex::Hex;

/// One player input, mapped one-to-one onto an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Lift a unit into the hand.
    PickUp(Hex),
    /// Set the held object down inside the active kingdom.
    PlaceOwn(Hex),
    /// Merge the held unit into a standing unit.
    Combine(Hex),
    /// Take a tile with the held unit.
    Conquer(Hex),
    /// Buy a peasant into the hand.
    BuyPeasant,
    /// Buy a castle into the hand.
    BuyCastle,
    /// Buy and immediately place, combine, or conquer.
    BuyAndPlace {
        /// Target tile.
        hex: Hex,
        /// What to buy.
        object: Purchase,
    },
    /// Select the kingdom containing a tile.
    ActivateKingdom(Hex),
    /// Pass the turn.
    EndTurn,
}

impl Move {
    /// The tile the move acts on, if any.
    #[must_use]
    pub const fn target(&self) -> Option<Hex> {
        match *self {
            Move::PickUp(h)
            | Move::PlaceOwn(h)
            | Move::Combine(h)
            | Move::Conquer(h)
            | Move::ActivateKingdom(h)
            | Move::BuyAndPlace { hex: h, .. } => Some(h),
            Move::BuyPeasant | Move::BuyCastle | Move::EndTurn => None,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::PickUp(h) => write!(f, "pick up {h}"),
            Move::PlaceOwn(h) => write!(f, "place {h}"),
            Move::Combine(h) => write!(f, "combine {h}"),
            Move::Conquer(h) => write!(f, "conquer {h}"),
            Move::BuyPeasant => write!(f, "buy peasant"),
            Move::BuyCastle => write!(f, "buy castle"),
            Move::BuyAndPlace { hex, object } => write!(f, "buy {object:?} at {hex}"),
            Move::ActivateKingdom(h) => write!(f, "activate {h}"),
            Move::EndTurn => write!(f, "end turn"),
        }
    }
}

/// Apply an already validated move.
pub fn apply_move(state: &mut GameState, mv: Move) {
    match mv {
        Move::PickUp(h) => state.pickup_object(h),
        Move::PlaceOwn(h) => state.place_own(h),
        Move::Combine(h) => state.combine_units(h),
        Move::Conquer(h) => state.conquer(h),
        Move::BuyPeasant => state.buy_peasant(),
        Move::BuyCastle => state.buy_castle(),
        Move::BuyAndPlace { hex, object } => {
            state.buy(object);
            state.use_held(hex);
        }
        Move::ActivateKingdom(h) => state.activate_kingdom(h),
        Move::EndTurn => state.end_turn(),
    }
}

impl GameState {
    /// Use the held object on `coord` the way a tap would: combine with a
    /// unit of the active kingdom, place on any other tile of it, or
    /// conquer outside it.
    pub fn use_held(&mut self, coord: Hex) {
        let inside = self.active_kingdom.is_some()
            && self.map.get(coord).and_then(|t| t.kingdom) == self.active_kingdom;
        let combining = matches!(self.held, Some(Content::Unit(_)))
            && self.content_at(coord).and_then(Content::unit).is_some();
        if inside && combining {
            self.combine_units(coord);
        } else if inside {
            self.place_own(coord);
        } else {
            self.conquer(coord);
        }
    }

    /// The state after `mv`, leaving `self` untouched.
    #[must_use]
    pub fn preview(&self, mv: Move) -> GameState {
        let mut next = self.clone();
        apply_move(&mut next, mv);
        next
    }
}
