//! Map and tile types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::{Content, KingdomId, PlayerId};
use crate::hex::Hex;

/// A single land tile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tile {
    /// Position on the grid.
    pub coord: Hex,
    /// Owning player (`None` only while a map is being generated).
    pub owner: Option<PlayerId>,
    /// Kingdom this tile belongs to (`None` = a lone tile).
    pub kingdom: Option<KingdomId>,
    /// What stands on the tile.
    pub content: Option<Content>,
    /// Cached neighbor coordinates in [`Hex::DIRECTIONS`] order; `None` is water.
    #[serde(skip)]
    neighbors: [Option<Hex>; 6],
}

impl Tile {
    /// Create an unowned, empty tile.
    #[must_use]
    pub const fn new(coord: Hex) -> Self {
        Self {
            coord,
            owner: None,
            kingdom: None,
            content: None,
            neighbors: [None; 6],
        }
    }

    /// Create an empty tile owned by `owner`.
    #[must_use]
    pub const fn owned(coord: Hex, owner: PlayerId) -> Self {
        let mut tile = Self::new(coord);
        tile.owner = Some(owner);
        tile
    }

    /// Cached neighbor slots; `None` entries are water.
    #[must_use]
    #[inline]
    pub const fn neighbor_slots(&self) -> &[Option<Hex>; 6] {
        &self.neighbors
    }

    /// Land neighbors of this tile.
    pub fn neighbors(&self) -> impl Iterator<Item = Hex> + '_ {
        self.neighbors.iter().flatten().copied()
    }

    /// A tile touching water on at least one side.
    #[must_use]
    pub fn is_coastal(&self) -> bool {
        self.neighbors.iter().any(Option::is_none)
    }

    /// No content at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    /// The unit on this tile, if any.
    #[must_use]
    pub fn unit(&self) -> Option<crate::game::Unit> {
        self.content.and_then(Content::unit)
    }

    /// Whether the tile holds a tree or palm tree.
    #[must_use]
    pub fn has_tree(&self) -> bool {
        self.content.is_some_and(Content::is_tree)
    }
}

/// The landmass: every land tile keyed by coordinate.
///
/// Iteration is in [`Hex`] order, which makes every scan over the map
/// deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct Map {
    tiles: BTreeMap<Hex, Tile>,
}

impl Map {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of land tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the map has no land.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether a land tile exists at `coord`.
    #[must_use]
    #[inline]
    pub fn contains(&self, coord: Hex) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Get a reference to the tile at the given coordinate.
    #[must_use]
    #[inline]
    pub fn get(&self, coord: Hex) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Get a mutable reference to the tile at the given coordinate.
    #[must_use]
    #[inline]
    pub fn get_mut(&mut self, coord: Hex) -> Option<&mut Tile> {
        self.tiles.get_mut(&coord)
    }

    /// Insert a tile, refreshing the neighbor caches around it.
    pub fn insert(&mut self, mut tile: Tile) {
        let coord = tile.coord;
        for (i, n) in coord.neighbors().into_iter().enumerate() {
            if let Some(other) = self.tiles.get_mut(&n) {
                // The opposite direction of `i` points back at `coord`
                other.neighbors[(i + 3) % 6] = Some(coord);
                tile.neighbors[i] = Some(n);
            } else {
                tile.neighbors[i] = None;
            }
        }
        self.tiles.insert(coord, tile);
    }

    /// Cached land neighbors of `coord` (empty if `coord` is water).
    pub fn neighbors(&self, coord: Hex) -> impl Iterator<Item = Hex> + '_ {
        self.tiles
            .get(&coord)
            .into_iter()
            .flat_map(|tile| tile.neighbors())
    }

    /// Neighbors of `coord` that are water.
    pub fn unused_neighbors(&self, coord: Hex) -> impl Iterator<Item = Hex> + '_ {
        crate::hex::unused_neighbors(coord, |h| self.contains(h))
    }

    /// Iterate over all tiles in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Iterate mutably over all tiles in coordinate order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.values_mut()
    }

    /// All coordinates in order.
    pub fn coords(&self) -> impl Iterator<Item = Hex> + '_ {
        self.tiles.keys().copied()
    }

    /// Get all tiles owned by a specific player.
    pub fn tiles_owned_by(&self, player: PlayerId) -> impl Iterator<Item = &Tile> {
        self.iter().filter(move |tile| tile.owner == Some(player))
    }

    /// Recompute every tile's neighbor cache from scratch.
    pub fn rebuild_neighbors(&mut self) {
        let coords: Vec<Hex> = self.tiles.keys().copied().collect();
        for coord in coords {
            let slots = coord.neighbors().map(|n| self.contains(n).then_some(n));
            if let Some(tile) = self.tiles.get_mut(&coord) {
                tile.neighbors = slots;
            }
        }
    }
}

impl From<Vec<Tile>> for Map {
    fn from(tiles: Vec<Tile>) -> Self {
        let mut map = Self {
            tiles: tiles.into_iter().map(|t| (t.coord, t)).collect(),
        };
        map.rebuild_neighbors();
        map
    }
}

impl From<Map> for Vec<Tile> {
    fn from(map: Map) -> Self {
        map.tiles.into_values().collect()
    }
}
