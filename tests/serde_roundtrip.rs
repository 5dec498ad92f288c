//! A saved game loads back into the same object graph.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use hexreign::config::{MapConfig, Rules};
use hexreign::game::{check_invariants, generate, GameState, Intelligence, Player};
use hexreign::{persistence, run_bot_turn, Hex};

/// A position with units, castles, and a few rounds of history.
fn played(seed: u64) -> GameState {
    let players = vec![
        Player::bot(0, "a", Intelligence::Hard),
        Player::bot(1, "b", Intelligence::Medium),
    ];
    let mut state = generate(players, &MapConfig::default(), Rules::default(), seed).unwrap();
    for _ in 0..10 {
        if state.winner.is_some() {
            break;
        }
        let tier = state.active_player().intelligence().unwrap();
        run_bot_turn(&mut state, tier);
        state.end_turn();
    }
    state
}

fn assert_same_graph(a: &GameState, b: &GameState) {
    assert_eq!(a.players, b.players);
    assert_eq!(a.player_turn, b.player_turn);
    assert_eq!(a.turn, b.turn);
    assert_eq!(a.seed, b.seed);
    assert_eq!(a.rules, b.rules);
    assert_eq!(a.held, b.held);
    assert_eq!(a.active_kingdom, b.active_kingdom);
    assert_eq!(a.kingdom_count(), b.kingdom_count());
    for (ka, kb) in a.kingdoms().zip(b.kingdoms()) {
        assert_eq!(ka, kb);
        for h in &kb.tiles {
            assert_eq!(b.map.get(*h).unwrap().kingdom, Some(kb.id));
        }
    }
    for tile in a.map.iter() {
        let other = b.map.get(tile.coord).unwrap();
        assert_eq!(tile.owner, other.owner);
        assert_eq!(tile.kingdom, other.kingdom);
        assert_eq!(tile.content, other.content);
        let na: Vec<Hex> = tile.neighbors().collect();
        let nb: Vec<Hex> = other.neighbors().collect();
        assert_eq!(na, nb);
    }
    assert_eq!(a.state_hash(), b.state_hash());
}

#[test]
fn test_json_round_trip() {
    let state = played(8);
    let text = persistence::to_json(&state).unwrap();
    let loaded = persistence::from_json(&text).unwrap();
    assert_same_graph(&state, &loaded);
    assert!(check_invariants(&loaded).is_empty());
}

#[test]
fn test_file_round_trip_and_continue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("midgame.json");
    let mut original = played(21);
    persistence::save(&original, &path).unwrap();
    let mut loaded = persistence::load(&path).unwrap();
    assert_same_graph(&original, &loaded);

    // Play on from both copies; the RNG state was saved too.
    for _ in 0..4 {
        if original.winner.is_some() {
            break;
        }
        let tier = original.active_player().intelligence().unwrap();
        run_bot_turn(&mut original, tier);
        run_bot_turn(&mut loaded, tier);
        original.end_turn();
        loaded.end_turn();
    }
    assert_eq!(original.state_hash(), loaded.state_hash());
}

#[test]
fn test_plain_serde_round_trip() {
    let state = played(3);
    let value = serde_json::to_value(&state).unwrap();
    let back: GameState = serde_json::from_value(value).unwrap();
    assert_same_graph(&state, &back);
}
