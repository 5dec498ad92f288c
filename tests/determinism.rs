//! Same seed, same moves, same bytes.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use hexreign::config::{MapConfig, MatchConfig, PlayerConfig, Rules};
use hexreign::game::{generate, GameState, Intelligence, Player};
use hexreign::tournament::{run_game, run_games};
use hexreign::{persistence, run_bot_turn, spawn_bot_turn};

fn players() -> Vec<Player> {
    vec![
        Player::bot(0, "a", Intelligence::Hard),
        Player::bot(1, "b", Intelligence::Easy),
        Player::bot(2, "c", Intelligence::Medium),
    ]
}

fn fresh(seed: u64) -> GameState {
    generate(players(), &MapConfig::default(), Rules::default(), seed).unwrap()
}

fn bytes(state: &GameState) -> String {
    persistence::to_json(state).unwrap()
}

#[test]
fn test_generation_is_byte_identical() {
    for seed in [0, 1, 42, u64::MAX] {
        assert_eq!(bytes(&fresh(seed)), bytes(&fresh(seed)), "seed {seed}");
    }
}

#[test]
fn test_bot_turns_are_byte_identical() {
    let mut a = fresh(77);
    let mut b = fresh(77);
    for _ in 0..9 {
        let tier = a.active_player().intelligence().unwrap();
        let ra = run_bot_turn(&mut a, tier);
        let rb = run_bot_turn(&mut b, tier);
        assert_eq!(ra, rb);
        a.end_turn();
        b.end_turn();
        assert_eq!(bytes(&a), bytes(&b));
    }
}

#[test]
fn test_background_turns_match_inline_turns() {
    let mut inline = fresh(5);
    let mut threaded = fresh(5);
    for _ in 0..4 {
        let tier = inline.active_player().intelligence().unwrap();
        run_bot_turn(&mut inline, tier);
        let (state, _) = spawn_bot_turn(threaded, tier, Default::default())
            .join()
            .unwrap();
        threaded = state;
        assert_eq!(inline.state_hash(), threaded.state_hash());
        inline.end_turn();
        threaded.end_turn();
    }
}

#[test]
fn test_parallel_batch_matches_sequential_runs() {
    let config = MatchConfig {
        map: MapConfig {
            land_mass: 80,
            ..MapConfig::default()
        },
        players: vec![
            PlayerConfig::bot("hard", Intelligence::Hard),
            PlayerConfig::bot("dumb", Intelligence::Dumb),
        ],
        max_turns: 60,
        rules: Rules::default(),
    };
    let batch = run_games(1000, 6, &config).unwrap();
    for result in &batch {
        assert_eq!(result, &run_game(result.seed, &config).unwrap());
    }
}
