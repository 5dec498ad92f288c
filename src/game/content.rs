//! Tile content: units, buildings and blocking objects.

use serde::{Deserialize, Serialize};

/// Unit tiers, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Strength 1.
    Peasant,
    /// Strength 2.
    Spearman,
    /// Strength 3.
    Knight,
    /// Strength 4.
    Baron,
}

impl UnitKind {
    /// All tiers in ascending strength.
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Peasant,
        UnitKind::Spearman,
        UnitKind::Knight,
        UnitKind::Baron,
    ];

    /// Combat strength (1..=4).
    #[must_use]
    pub const fn strength(self) -> u8 {
        match self {
            UnitKind::Peasant => 1,
            UnitKind::Spearman => 2,
            UnitKind::Knight => 3,
            UnitKind::Baron => 4,
        }
    }

    /// Upkeep paid at the start of each of the owner's turns.
    #[must_use]
    pub const fn salary(self) -> i32 {
        match self {
            UnitKind::Peasant => 2,
            UnitKind::Spearman => 6,
            UnitKind::Knight => 18,
            UnitKind::Baron => 54,
        }
    }

    /// The tier with the given strength, if any.
    #[must_use]
    pub const fn from_strength(strength: u8) -> Option<Self> {
        match strength {
            1 => Some(UnitKind::Peasant),
            2 => Some(UnitKind::Spearman),
            3 => Some(UnitKind::Knight),
            4 => Some(UnitKind::Baron),
            _ => None,
        }
    }

    /// The next tier up, or `None` for a baron.
    #[must_use]
    pub const fn upgraded(self) -> Option<Self> {
        Self::from_strength(self.strength() + 1)
    }
}

/// A unit standing on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Tier.
    pub kind: UnitKind,
    /// Whether the unit may still move this turn.
    pub can_act: bool,
}

impl Unit {
    /// A fresh unit that may act this turn.
    #[must_use]
    pub const fn ready(kind: UnitKind) -> Self {
        Self {
            kind,
            can_act: true,
        }
    }

    /// A unit that has already acted this turn.
    #[must_use]
    pub const fn spent(kind: UnitKind) -> Self {
        Self {
            kind,
            can_act: false,
        }
    }
}

/// What occupies a tile. An empty tile is `Option::<Content>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Content {
    /// A unit.
    Unit(Unit),
    /// A defensive building.
    Castle,
    /// The kingdom's treasury anchor.
    Capital,
    /// An inland tree.
    Tree,
    /// A coastal tree.
    PalmTree,
    /// Left behind by units lost to bankruptcy.
    Gravestone,
}

impl Content {
    /// Defensive strength contributed to the tile and its kingdom neighbors.
    #[must_use]
    pub const fn strength(self) -> u8 {
        match self {
            Content::Unit(unit) => unit.kind.strength(),
            Content::Castle => 2,
            Content::Capital => 1,
            Content::Tree | Content::PalmTree | Content::Gravestone => 0,
        }
    }

    /// Blocking objects must be cleared by a unit before the tile is useful.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Content::Tree | Content::PalmTree | Content::Gravestone)
    }

    /// Trees and palm trees; these are what reduce income.
    #[must_use]
    pub const fn is_tree(self) -> bool {
        matches!(self, Content::Tree | Content::PalmTree)
    }

    /// The unit, if this content is one.
    #[must_use]
    pub const fn unit(self) -> Option<Unit> {
        match self {
            Content::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    /// Upkeep owed for this content.
    #[must_use]
    pub const fn salary(self) -> i32 {
        match self {
            Content::Unit(unit) => unit.kind.salary(),
            _ => 0,
        }
    }
}
