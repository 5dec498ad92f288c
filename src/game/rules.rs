//! Move validation.
//!
//! The engine never checks legality itself; a controller asks these queries
//! first and only forwards accepted moves. Every query is phrased for a
//! specific player and is `false` whenever it is not that player's turn.

use crate::game::{protection_level, Content, GameState, KingdomId, Move, PlayerId, Purchase};
use crate::hex::Hex;

/// The active kingdom, if `player` is on turn and owns it.
fn acting_kingdom(state: &GameState, player: PlayerId) -> Option<KingdomId> {
    if state.players.is_empty() || state.active_player_id() != player {
        return None;
    }
    state.active().filter(|k| k.owner == player).map(|k| k.id)
}

fn in_kingdom(state: &GameState, coord: Hex, kingdom: KingdomId) -> bool {
    state.map.get(coord).is_some_and(|t| t.kingdom == Some(kingdom))
}

/// `player` may lift the unit on `coord` into an empty hand.
#[must_use]
pub fn can_pickup(state: &GameState, player: PlayerId, coord: Hex) -> bool {
    let Some(kingdom) = acting_kingdom(state, player) else {
        return false;
    };
    state.held.is_none()
        && in_kingdom(state, coord, kingdom)
        && state
            .content_at(coord)
            .and_then(Content::unit)
            .is_some_and(|u| u.can_act)
}

/// `player` may set the held object down on `coord`.
#[must_use]
pub fn can_place_own(state: &GameState, player: PlayerId, coord: Hex) -> bool {
    state
        .held
        .is_some_and(|held| placement_fits(state, player, held, coord))
}

fn placement_fits(state: &GameState, player: PlayerId, held: Content, coord: Hex) -> bool {
    let Some(kingdom) = acting_kingdom(state, player) else {
        return false;
    };
    if !in_kingdom(state, coord, kingdom) {
        return false;
    }
    match (held, state.content_at(coord)) {
        (_, None) => true,
        (Content::Unit(_), Some(target)) => target.is_blocking(),
        _ => false,
    }
}

/// `player` may merge the held unit into the unit on `coord`.
#[must_use]
pub fn can_combine(state: &GameState, player: PlayerId, coord: Hex) -> bool {
    state
        .held
        .is_some_and(|held| combination_fits(state, player, held, coord))
}

fn combination_fits(state: &GameState, player: PlayerId, held: Content, coord: Hex) -> bool {
    let Some(kingdom) = acting_kingdom(state, player) else {
        return false;
    };
    let (Some(a), Some(b)) = (
        held.unit(),
        state.content_at(coord).and_then(Content::unit),
    ) else {
        return false;
    };
    in_kingdom(state, coord, kingdom)
        && (a.kind.strength() == 1 || b.kind.strength() == 1)
        && a.kind.strength() + b.kind.strength() <= 4
}

/// `player` may attack `coord` with the held unit.
///
/// The target must border the active kingdom, must not be part of one of
/// the player's own kingdoms, and the unit must be stronger than every
/// defender of the tile.
#[must_use]
pub fn can_conquer(state: &GameState, player: PlayerId, coord: Hex) -> bool {
    state
        .held
        .is_some_and(|held| conquest_fits(state, player, held, coord))
}

fn conquest_fits(state: &GameState, player: PlayerId, held: Content, coord: Hex) -> bool {
    let Some(kingdom) = acting_kingdom(state, player) else {
        return false;
    };
    let Some(unit) = held.unit().filter(|u| u.can_act) else {
        return false;
    };
    let Some(tile) = state.map.get(coord) else {
        return false;
    };
    if tile.owner == Some(player) && tile.kingdom.is_some() {
        return false;
    }
    tile.neighbors().any(|n| in_kingdom(state, n, kingdom))
        && unit.kind.strength() > protection_level(state, coord)
}

/// The active kingdom of `player` holds at least `cost`.
#[must_use]
pub fn can_afford(state: &GameState, player: PlayerId, cost: i32) -> bool {
    acting_kingdom(state, player)
        .and_then(|id| state.kingdom(id))
        .is_some_and(|k| k.savings >= cost)
}

/// `player` may buy a peasant into an empty hand.
#[must_use]
pub fn can_buy_peasant(state: &GameState, player: PlayerId) -> bool {
    state.held.is_none() && can_afford(state, player, state.rules.peasant_cost)
}

/// `player` may buy a castle into an empty hand.
#[must_use]
pub fn can_buy_castle(state: &GameState, player: PlayerId) -> bool {
    state.held.is_none() && can_afford(state, player, state.rules.castle_cost)
}

/// `player` may buy `object` and immediately use it on `coord`.
#[must_use]
pub fn can_buy_and_place(
    state: &GameState,
    player: PlayerId,
    object: Purchase,
    coord: Hex,
) -> bool {
    let affordable = match object {
        Purchase::Peasant => can_buy_peasant(state, player),
        Purchase::Castle => can_buy_castle(state, player),
    };
    let held = object.content();
    affordable
        && (placement_fits(state, player, held, coord)
            || combination_fits(state, player, held, coord)
            || conquest_fits(state, player, held, coord))
}

/// `player` may select the kingdom at `coord`.
#[must_use]
pub fn can_activate(state: &GameState, player: PlayerId, coord: Hex) -> bool {
    !state.players.is_empty()
        && state.active_player_id() == player
        && state.held.is_none()
        && state.kingdom_at(coord).is_some_and(|k| k.owner == player)
}

/// `player` may pass the turn: it is their turn and nothing is in hand.
///
/// A recorded winner does not end play; the title can still change hands.
#[must_use]
pub fn can_end_turn(state: &GameState, player: PlayerId) -> bool {
    !state.players.is_empty() && state.active_player_id() == player && state.held.is_none()
}

/// A hint that `player` is about to end the turn with a kingdom they never
/// looked at although it could still act: it has a ready unit or enough
/// savings for a peasant.
#[must_use]
pub fn has_forgotten_kingdom(state: &GameState, player: PlayerId) -> bool {
    state
        .kingdoms_of(player)
        .filter(|k| !k.was_active_in_current_turn)
        .any(|k| {
            k.savings >= state.rules.peasant_cost
                || k.tiles.iter().any(|h| {
                    state
                        .content_at(*h)
                        .and_then(Content::unit)
                        .is_some_and(|u| u.can_act)
                })
        })
}

/// Whether the player on turn may make `mv`.
#[must_use]
pub fn is_legal(state: &GameState, mv: &Move) -> bool {
    if state.players.is_empty() {
        return false;
    }
    let player = state.active_player_id();
    match *mv {
        Move::PickUp(h) => can_pickup(state, player, h),
        Move::PlaceOwn(h) => can_place_own(state, player, h),
        Move::Combine(h) => can_combine(state, player, h),
        Move::Conquer(h) => can_conquer(state, player, h),
        Move::BuyPeasant => can_buy_peasant(state, player),
        Move::BuyCastle => can_buy_castle(state, player),
        Move::BuyAndPlace { hex, object } => can_buy_and_place(state, player, object, hex),
        Move::ActivateKingdom(h) => can_activate(state, player, h),
        Move::EndTurn => can_end_turn(state, player),
    }
}
