//! Small hand-built positions for unit tests.

use crate::config::Rules;
use crate::game::{GameState, Player, PlayerId};
use crate::hex::Hex;

/// Two human players, ids 0 and 1.
pub(crate) fn two_players() -> Vec<Player> {
    vec![Player::human(0, "red"), Player::human(1, "blue")]
}

/// A single row of tiles at `(q, 0)` owned by `owners[q]`, grouped into
/// kingdoms. No capitals, empty treasuries.
pub(crate) fn line_state(owners: &[PlayerId]) -> GameState {
    let tiles = owners
        .iter()
        .enumerate()
        .map(|(q, owner)| (Hex::new(i32::try_from(q).unwrap_or(i32::MAX), 0), *owner));
    GameState::from_owned_tiles(two_players(), tiles, Rules::default(), 7)
}

/// Tiles within `radius` of the origin, all owned by `owner`.
pub(crate) fn blob_state(radius: i32, owner: PlayerId) -> GameState {
    let mut tiles = Vec::new();
    for q in -radius..=radius {
        for r in -radius..=radius {
            let h = Hex::new(q, r);
            if h.distance(Hex::new(0, 0)) <= radius {
                tiles.push((h, owner));
            }
        }
    }
    GameState::from_owned_tiles(two_players(), tiles, Rules::default(), 7)
}
