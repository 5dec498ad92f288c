//! Player state management.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player; also its index in `GameState::players`.
pub type PlayerId = u8;

/// Bot difficulty presets, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intelligence {
    /// Unweighted scoring; nearly random play.
    Dumb,
    /// Heuristic scoring, cautious.
    Easy,
    /// Heuristic scoring, reconsiders defense after attacking.
    Medium,
    /// Heuristic scoring, always attacks.
    Hard,
}

impl std::str::FromStr for Intelligence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dumb" => Ok(Self::Dumb),
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown intelligence tier: {other}")),
        }
    }
}

/// Who makes the decisions for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    /// Moves come from outside the core.
    Human,
    /// Moves come from the bot decision engine.
    Bot(Intelligence),
}

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Human or bot.
    pub kind: PlayerKind,
    /// Set once the player owns no kingdom.
    pub defeated: bool,
}

impl Player {
    /// Create a human player.
    #[must_use]
    pub fn human(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: PlayerKind::Human,
            defeated: false,
        }
    }

    /// Create a bot player.
    #[must_use]
    pub fn bot(id: PlayerId, name: impl Into<String>, intelligence: Intelligence) -> Self {
        Self {
            id,
            name: name.into(),
            kind: PlayerKind::Bot(intelligence),
            defeated: false,
        }
    }

    /// The bot tier, if this player is a bot.
    #[must_use]
    pub const fn intelligence(&self) -> Option<Intelligence> {
        match self.kind {
            PlayerKind::Bot(tier) => Some(tier),
            PlayerKind::Human => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::bot(1, "blue", Intelligence::Hard);
        assert_eq!(player.id, 1);
        assert!(!player.defeated);
        assert_eq!(player.intelligence(), Some(Intelligence::Hard));
        assert_eq!(Player::human(0, "red").intelligence(), None);
    }

    #[test]
    fn test_intelligence_from_str() {
        assert_eq!("Medium".parse::<Intelligence>(), Ok(Intelligence::Medium));
        assert!("genius".parse::<Intelligence>().is_err());
    }

    #[test]
    fn test_intelligence_ordering() {
        assert!(Intelligence::Dumb < Intelligence::Hard);
    }
}
