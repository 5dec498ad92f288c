//! Kingdoms: connected groups of same-owner tiles.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::game::PlayerId;
use crate::hex::Hex;

/// Stable kingdom identifier. Ids are never reused within a game, so
/// ascending id order is creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct KingdomId(pub u32);

impl std::fmt::Display for KingdomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "K{}", self.0)
    }
}

/// A maximal connected set of tiles with a shared treasury.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kingdom {
    /// Identifier, referenced from `Tile::kingdom`.
    pub id: KingdomId,
    /// Owner of every tile in the kingdom.
    pub owner: PlayerId,
    /// Member tiles.
    pub tiles: BTreeSet<Hex>,
    /// Treasury.
    pub savings: i32,
    /// Bot bookkeeping: the kingdom was already planned this turn.
    pub done_moving: bool,
    /// UI hint: the kingdom was selected at some point this turn.
    pub was_active_in_current_turn: bool,
}

impl Kingdom {
    /// Create an empty kingdom.
    #[must_use]
    pub const fn new(id: KingdomId, owner: PlayerId) -> Self {
        Self {
            id,
            owner,
            tiles: BTreeSet::new(),
            savings: 0,
            done_moving: false,
            was_active_in_current_turn: false,
        }
    }

    /// Number of member tiles.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Whether `coord` is a member.
    #[must_use]
    pub fn contains(&self, coord: Hex) -> bool {
        self.tiles.contains(&coord)
    }
}
