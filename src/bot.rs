//! Bot decision engine.
//!
//! A bot turn plans each of the player's kingdoms in turn order. Planning
//! works only through engine operations (plus moving units between the
//! engine's hand and the bot's own tally), so every intermediate state is
//! a valid game state.

mod hand;
mod planner;
mod runner;
mod scoring;
mod tier;

use serde::{Deserialize, Serialize};

use crate::game::{Content, GameState, Intelligence, Move, Unit, UnitKind};
use crate::hex::Hex;

pub use hand::Hand;
pub use runner::{spawn_bot_turn, BotOptions, BotTurnHandle, CancelToken};
pub use scoring::{conquest_score, defense_score, required_strength, NOT_A_CANDIDATE};
pub use tier::TierParams;

use planner::Planner;

/// One step of a bot turn, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotAction {
    /// A validated engine move.
    Engine(Move),
    /// The unit in the engine's hand went into the bot's tally.
    Stash(UnitKind),
    /// A tallied unit went into the engine's hand.
    Draw(UnitKind),
    /// A castle bought this kingdom-turn was torn down for its price.
    Refund(Hex),
    /// A tallied unit had nowhere to go and was disbanded.
    Discard(UnitKind),
}

/// What a bot turn did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReport {
    /// Every step, replayable with [`replay_action`].
    pub actions: Vec<BotAction>,
    /// Kingdom passes completed.
    pub kingdoms_planned: usize,
    /// The turn stopped early on request.
    pub cancelled: bool,
}

impl BotReport {
    /// Number of engine moves made.
    #[must_use]
    pub fn engine_moves(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, BotAction::Engine(_)))
            .count()
    }
}

/// Play the active player's kingdoms with the given tier.
///
/// Does not end the turn.
pub fn run_bot_turn(state: &mut GameState, intelligence: Intelligence) -> BotReport {
    run_bot_turn_with(state, intelligence, &CancelToken::new(), |_| {})
}

/// [`run_bot_turn`] with cancellation and a hook called after each kingdom.
///
/// `cancel` is polled before each kingdom; a cancelled turn stops with the
/// state as left by the last completed step.
pub fn run_bot_turn_with(
    state: &mut GameState,
    intelligence: Intelligence,
    cancel: &CancelToken,
    mut after_kingdom: impl FnMut(&GameState),
) -> BotReport {
    let params = TierParams::of(intelligence);
    let player = state.active_player_id();
    let mut report = BotReport::default();
    let max_passes = state.total_land().max(1);

    while report.kingdoms_planned < max_passes {
        if cancel.is_cancelled() {
            report.cancelled = true;
            tracing::debug!(player, "bot.cancelled");
            break;
        }
        let next = state
            .kingdoms_of(player)
            .find(|k| !k.done_moving)
            .and_then(|k| k.tiles.first().map(|h| (k.id, *h)));
        let Some((id, anchor)) = next else { break };
        if let Some(k) = state.kingdom_mut(id) {
            k.done_moving = true;
        }

        apply_move(state, &mut report.actions, Move::ActivateKingdom(anchor));
        Planner::new(state, params, id, &mut report.actions).run();
        report.kingdoms_planned += 1;
        after_kingdom(state);
    }

    tracing::debug!(
        player,
        tier = ?intelligence,
        kingdoms = report.kingdoms_planned,
        moves = report.engine_moves(),
        "bot.turn_done"
    );
    report
}

fn apply_move(state: &mut GameState, log: &mut Vec<BotAction>, mv: Move) {
    debug_assert!(crate::game::is_legal(state, &mv), "bot attempted illegal move: {mv}");
    crate::game::apply_move(state, mv);
    log.push(BotAction::Engine(mv));
}

/// Re-apply one recorded step to a state.
pub fn replay_action(state: &mut GameState, action: &BotAction) {
    match *action {
        BotAction::Engine(mv) => crate::game::apply_move(state, mv),
        BotAction::Stash(_) => state.held = None,
        BotAction::Draw(kind) => state.held = Some(Content::Unit(Unit::ready(kind))),
        BotAction::Refund(coord) => state.refund_castle(coord),
        BotAction::Discard(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MapConfig, Rules};
    use crate::game::{check_invariants, generate, Player};

    fn bots() -> Vec<Player> {
        vec![
            Player::bot(0, "a", Intelligence::Hard),
            Player::bot(1, "b", Intelligence::Easy),
        ]
    }

    #[test]
    fn test_bot_turn_marks_kingdoms_done() {
        let mut state = generate(bots(), &MapConfig::default(), Rules::default(), 17).unwrap();
        let player = state.active_player_id();
        let report = run_bot_turn(&mut state, Intelligence::Hard);
        assert!(report.kingdoms_planned >= 1);
        assert!(state.kingdoms_of(player).all(|k| k.done_moving));
        assert!(state.held.is_none());
        assert!(check_invariants(&state).is_empty());
    }

    #[test]
    fn test_cancelled_before_start() {
        let mut state = generate(bots(), &MapConfig::default(), Rules::default(), 17).unwrap();
        let before = state.state_hash();
        let cancel = CancelToken::new();
        cancel.cancel();
        let report = run_bot_turn_with(&mut state, Intelligence::Medium, &cancel, |_| {});
        assert!(report.cancelled);
        assert!(report.actions.is_empty());
        assert_eq!(state.state_hash(), before);
    }

    #[test]
    fn test_replay_reproduces_turn() {
        let start = generate(bots(), &MapConfig::default(), Rules::default(), 23).unwrap();
        let mut played = start.clone();
        let report = run_bot_turn(&mut played, Intelligence::Hard);
        let mut replayed = start;
        for action in &report.actions {
            replay_action(&mut replayed, action);
        }
        assert_eq!(replayed.state_hash(), played.state_hash());
    }
}
