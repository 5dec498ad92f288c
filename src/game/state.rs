//! Game state management.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::Rules;
use crate::game::hashing::FnvHasher;
use crate::game::{Content, Kingdom, KingdomId, Map, Player, PlayerId, Rng, Tile};
use crate::hex::Hex;

/// Complete game state: the aggregate root every engine operation mutates.
///
/// Tiles and kingdoms reference each other by id (`Tile::kingdom` and
/// `Kingdom::tiles`), so the whole graph is a plain value that clones and
/// serializes without special handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// All players in seat order; `players[i].id == i`.
    pub players: Vec<Player>,
    /// Index of the player whose turn it is.
    pub player_turn: usize,
    /// Completed rounds.
    pub turn: u32,
    /// The landmass.
    pub map: Map,
    #[serde(with = "kingdom_list")]
    kingdoms: BTreeMap<KingdomId, Kingdom>,
    next_kingdom_id: u32,
    /// The kingdom currently selected for the active player.
    pub active_kingdom: Option<KingdomId>,
    /// The one object in hand, awaiting placement.
    pub held: Option<Content>,
    /// Game RNG, seeded once at generation.
    pub rng: Rng,
    /// Seed the map was generated from.
    pub seed: u64,
    /// Player whose kingdom last reached the victory share.
    pub winner: Option<PlayerId>,
    /// Economic constants.
    pub rules: Rules,
}

impl GameState {
    /// Create a state with the given players and map and no kingdoms.
    #[must_use]
    pub fn new(players: Vec<Player>, map: Map, rules: Rules, seed: u64) -> Self {
        Self {
            players,
            player_turn: 0,
            turn: 0,
            map,
            kingdoms: BTreeMap::new(),
            next_kingdom_id: 0,
            active_kingdom: None,
            held: None,
            rng: Rng::new(seed),
            seed,
            winner: None,
            rules,
        }
    }

    /// Build a state from owned tiles and group them into kingdoms.
    ///
    /// No capitals are placed and treasuries start empty; this is the
    /// starting point for hand-built positions.
    #[must_use]
    pub fn from_owned_tiles(
        players: Vec<Player>,
        tiles: impl IntoIterator<Item = (Hex, PlayerId)>,
        rules: Rules,
        seed: u64,
    ) -> Self {
        let mut map = Map::new();
        for (coord, owner) in tiles {
            map.insert(Tile::owned(coord, owner));
        }
        let mut state = Self::new(players, map, rules, seed);
        state.union_kingdoms();
        state
    }

    /// The player whose turn it is.
    ///
    /// # Panics
    ///
    /// Panics if the state has no players.
    #[must_use]
    pub fn active_player(&self) -> &Player {
        &self.players[self.player_turn]
    }

    /// Id of the player whose turn it is.
    #[must_use]
    pub fn active_player_id(&self) -> PlayerId {
        self.active_player().id
    }

    /// Get a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    /// Get a kingdom by id.
    #[must_use]
    pub fn kingdom(&self, id: KingdomId) -> Option<&Kingdom> {
        self.kingdoms.get(&id)
    }

    /// Get a mutable kingdom by id.
    #[must_use]
    pub fn kingdom_mut(&mut self, id: KingdomId) -> Option<&mut Kingdom> {
        self.kingdoms.get_mut(&id)
    }

    /// All kingdoms in creation order.
    pub fn kingdoms(&self) -> impl Iterator<Item = &Kingdom> {
        self.kingdoms.values()
    }

    /// Number of kingdoms on the board.
    #[must_use]
    pub fn kingdom_count(&self) -> usize {
        self.kingdoms.len()
    }

    /// Kingdoms owned by `player` in creation order.
    pub fn kingdoms_of(&self, player: PlayerId) -> impl Iterator<Item = &Kingdom> {
        self.kingdoms.values().filter(move |k| k.owner == player)
    }

    /// The kingdom containing `coord`, if any.
    #[must_use]
    pub fn kingdom_at(&self, coord: Hex) -> Option<&Kingdom> {
        self.map
            .get(coord)
            .and_then(|t| t.kingdom)
            .and_then(|id| self.kingdoms.get(&id))
    }

    /// The selected kingdom.
    #[must_use]
    pub fn active(&self) -> Option<&Kingdom> {
        self.active_kingdom.and_then(|id| self.kingdoms.get(&id))
    }

    /// The selected kingdom, which the caller requires to exist.
    ///
    /// # Panics
    ///
    /// Panics if no kingdom is selected.
    #[must_use]
    pub(crate) fn require_active(&self) -> KingdomId {
        match self.active_kingdom {
            Some(id) if self.kingdoms.contains_key(&id) => id,
            other => panic!("operation requires an active kingdom, found {other:?}"),
        }
    }

    /// Location of a kingdom's capital.
    #[must_use]
    pub fn capital_of(&self, id: KingdomId) -> Option<Hex> {
        let kingdom = self.kingdoms.get(&id)?;
        kingdom.tiles.iter().copied().find(|&h| {
            self.map
                .get(h)
                .is_some_and(|t| t.content == Some(Content::Capital))
        })
    }

    /// Content of the tile at `coord`.
    #[must_use]
    pub fn content_at(&self, coord: Hex) -> Option<Content> {
        self.map.get(coord).and_then(|t| t.content)
    }

    /// Replace the content of the tile at `coord`.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is water.
    pub fn set_content(&mut self, coord: Hex, content: Option<Content>) {
        self.tile_mut(coord).content = content;
    }

    /// Mutable tile that the caller knows exists.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is water.
    pub(crate) fn tile_mut(&mut self, coord: Hex) -> &mut Tile {
        match self.map.get_mut(coord) {
            Some(tile) => tile,
            None => panic!("no land tile at {coord}"),
        }
    }

    /// Register a new, empty kingdom.
    pub(crate) fn create_kingdom(&mut self, owner: PlayerId) -> KingdomId {
        let id = KingdomId(self.next_kingdom_id);
        self.next_kingdom_id += 1;
        self.kingdoms.insert(id, Kingdom::new(id, owner));
        id
    }

    /// Put a previously removed kingdom back under its own id.
    pub(crate) fn restore_kingdom(&mut self, kingdom: Kingdom) {
        self.kingdoms.insert(kingdom.id, kingdom);
    }

    /// Drop a kingdom from the list, deselecting it if it was active.
    pub(crate) fn remove_kingdom(&mut self, id: KingdomId) -> Option<Kingdom> {
        if self.active_kingdom == Some(id) {
            self.active_kingdom = None;
        }
        self.kingdoms.remove(&id)
    }

    /// Move `coord` into `kingdom`, updating both sides of the reference.
    pub(crate) fn assign_tile(&mut self, coord: Hex, kingdom: KingdomId) {
        let owner = self
            .kingdoms
            .get(&kingdom)
            .map(|k| k.owner)
            .unwrap_or_else(|| panic!("assigning {coord} to missing kingdom {kingdom}"));
        let tile = self.tile_mut(coord);
        let previous = tile.kingdom.replace(kingdom);
        tile.owner = Some(owner);
        if let Some(prev) = previous.filter(|p| *p != kingdom) {
            if let Some(k) = self.kingdoms.get_mut(&prev) {
                k.tiles.remove(&coord);
            }
        }
        if let Some(k) = self.kingdoms.get_mut(&kingdom) {
            k.tiles.insert(coord);
        }
    }

    /// Total number of land tiles.
    #[must_use]
    pub fn total_land(&self) -> usize {
        self.map.len()
    }

    /// Deterministic hash of everything that affects play.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = FnvHasher::new();
        self.turn.hash(&mut hasher);
        self.player_turn.hash(&mut hasher);
        for tile in self.map.iter() {
            tile.coord.hash(&mut hasher);
            tile.owner.hash(&mut hasher);
            tile.kingdom.hash(&mut hasher);
            tile.content.hash(&mut hasher);
        }
        for kingdom in self.kingdoms.values() {
            kingdom.id.hash(&mut hasher);
            kingdom.owner.hash(&mut hasher);
            kingdom.savings.hash(&mut hasher);
        }
        self.held.hash(&mut hasher);
        self.rng.hash(&mut hasher);
        self.winner.hash(&mut hasher);
        hasher.finish()
    }

    /// Players that still own at least one kingdom.
    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.defeated)
    }
}

/// Kingdoms serialize as a list; ids live inside each entry.
mod kingdom_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::game::{Kingdom, KingdomId};

    pub(super) fn serialize<S: Serializer>(
        kingdoms: &BTreeMap<KingdomId, Kingdom>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&Kingdom> = kingdoms.values().collect();
        list.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<KingdomId, Kingdom>, D::Error> {
        let list = Vec::<Kingdom>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|k| (k.id, k)).collect())
    }
}
