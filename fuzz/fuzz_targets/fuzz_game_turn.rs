#![no_main]

//! Move sequence fuzzer.
//!
//! Generates a small island, then feeds it a fuzzer-chosen sequence of
//! moves. Each move is checked with the validator first; accepted moves are
//! applied and the full invariant set is checked after every one. Bot turns
//! are mixed in so the planner sees the odd positions the fuzzer builds.

use arbitrary::Arbitrary;
use hexreign::config::{MapConfig, Rules};
use hexreign::game::{
    apply_move, check_invariants, generate, is_legal, GameState, Intelligence, Move, Player,
    Purchase,
};
use hexreign::{run_bot_turn, Hex};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated input.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzMove {
    PickUp(i8, i8),
    PlaceOwn(i8, i8),
    Combine(i8, i8),
    Conquer(i8, i8),
    BuyPeasant,
    BuyCastle,
    BuyAndPlace { q: i8, r: i8, castle: bool },
    Activate(i8, i8),
    EndTurn,
    /// Let a bot of the given tier play the active player's turn.
    Bot(u8),
}

/// Structured input for move sequence fuzzing.
#[derive(Arbitrary, Debug)]
struct GameInput {
    seed: u64,
    land: u8,
    players: u8,
    moves: Vec<FuzzMove>,
}

fn hex(q: i8, r: i8) -> Hex {
    Hex::new(i32::from(q % 12), i32::from(r % 12))
}

fn to_move(m: FuzzMove) -> Option<Move> {
    Some(match m {
        FuzzMove::PickUp(q, r) => Move::PickUp(hex(q, r)),
        FuzzMove::PlaceOwn(q, r) => Move::PlaceOwn(hex(q, r)),
        FuzzMove::Combine(q, r) => Move::Combine(hex(q, r)),
        FuzzMove::Conquer(q, r) => Move::Conquer(hex(q, r)),
        FuzzMove::BuyPeasant => Move::BuyPeasant,
        FuzzMove::BuyCastle => Move::BuyCastle,
        FuzzMove::BuyAndPlace { q, r, castle } => Move::BuyAndPlace {
            hex: hex(q, r),
            object: if castle { Purchase::Castle } else { Purchase::Peasant },
        },
        FuzzMove::Activate(q, r) => Move::ActivateKingdom(hex(q, r)),
        FuzzMove::EndTurn => Move::EndTurn,
        FuzzMove::Bot(_) => return None,
    })
}

fn tier(n: u8) -> Intelligence {
    match n % 4 {
        0 => Intelligence::Dumb,
        1 => Intelligence::Easy,
        2 => Intelligence::Medium,
        _ => Intelligence::Hard,
    }
}

fn check(state: &GameState, after: &str) {
    let violations = check_invariants(state);
    assert!(violations.is_empty(), "after {after}: {violations:?}");
}

fuzz_target!(|input: GameInput| {
    let players: Vec<Player> = (0..2 + input.players % 3)
        .map(|i| Player::human(i, format!("p{i}")))
        .collect();
    let config = MapConfig {
        land_mass: 20 + usize::from(input.land % 80),
        ..MapConfig::default()
    };
    let Ok(mut state) = generate(players, &config, Rules::default(), input.seed) else {
        return;
    };
    check(&state, "generation");

    for m in input.moves.into_iter().take(200) {
        match to_move(m) {
            Some(mv) => {
                if is_legal(&state, &mv) {
                    apply_move(&mut state, mv);
                    check(&state, &mv.to_string());
                }
            }
            None => {
                if state.held.is_none() {
                    let FuzzMove::Bot(n) = m else { continue };
                    run_bot_turn(&mut state, tier(n));
                    check(&state, "bot turn");
                }
            }
        }
    }
});
