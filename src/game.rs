//! Game layer for Hexreign.
//!
//! Implements the rules on top of the hex board:
//! - Map of land tiles with owners and content
//! - Kingdoms: connected same-owner territories with a treasury
//! - Actions: pick up, place, combine, buy, conquer
//! - Economy: income, salaries, bankruptcy, vegetation
//! - Turn sequencing and victory
//! - Map generation and move validation

mod actions;
mod content;
mod economy;
mod hashing;
mod invariants;
mod kingdom;
mod map;
mod mapgen;
mod moves;
mod player;
mod rng;
mod rules;
mod state;
mod territory;
mod turn;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::Purchase;
pub use content::{Content, Unit, UnitKind};
pub use economy::{kingdom_income, kingdom_salaries, protection_level};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use kingdom::{Kingdom, KingdomId};
pub use map::{Map, Tile};
pub use mapgen::{generate, MapGenError};
pub use moves::{apply_move, Move};
pub use player::{Intelligence, Player, PlayerId, PlayerKind};
pub use rng::Rng;
pub use rules::{
    can_activate, can_afford, can_buy_and_place, can_buy_castle, can_buy_peasant, can_combine,
    can_conquer, can_end_turn, can_pickup, can_place_own, has_forgotten_kingdom, is_legal,
};
pub use state::GameState;
pub use territory::may_split;
