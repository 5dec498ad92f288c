//! Turn sequencing: victory, defeat, and handing over to the next player.

use crate::game::{GameState, PlayerId};

impl GameState {
    /// Finish the active player's turn.
    ///
    /// Records a winner if the active player holds a kingdom with at least
    /// the victory share of all land, clears the selection, marks players
    /// without kingdoms as defeated, and advances to the next player still
    /// in the game. Wrapping past the last seat completes a round and runs
    /// the vegetation pass. The incoming player then collects income and
    /// pays salaries.
    pub fn end_turn(&mut self) {
        self.check_winner();

        self.active_kingdom = None;
        for id in self.kingdoms().map(|k| k.id).collect::<Vec<_>>() {
            if let Some(k) = self.kingdom_mut(id) {
                k.was_active_in_current_turn = false;
            }
        }
        self.update_defeated();

        let seats = self.players.len();
        for _ in 0..seats {
            self.player_turn += 1;
            if self.player_turn >= seats {
                self.player_turn = 0;
                self.turn += 1;
                self.grow_trees();
            }
            if !self.players[self.player_turn].defeated {
                break;
            }
        }

        let next = self.active_player_id();
        self.start_turn_for(next);
        tracing::debug!(turn = self.turn, player = next, "turn.started");
    }

    /// Largest kingdom of `player`, in tiles.
    #[must_use]
    pub fn largest_kingdom_size(&self, player: PlayerId) -> usize {
        self.kingdoms_of(player).map(|k| k.size()).max().unwrap_or(0)
    }

    fn check_winner(&mut self) {
        if self.players.is_empty() {
            return;
        }
        let player = self.active_player_id();
        #[allow(clippy::cast_precision_loss)]
        let share = self.largest_kingdom_size(player) as f64 / self.total_land().max(1) as f64;
        if share >= self.rules.victory_share {
            if self.winner != Some(player) {
                tracing::info!(player, share, "game.winner");
            }
            self.winner = Some(player);
        }
    }

    fn update_defeated(&mut self) {
        for i in 0..self.players.len() {
            let id = self.players[i].id;
            let defeated = self.kingdoms_of(id).next().is_none();
            if defeated && !self.players[i].defeated {
                tracing::info!(player = id, turn = self.turn, "player.defeated");
            }
            self.players[i].defeated = defeated;
        }
    }
}
