//! Benchmarks for map generation, bot turns, and complete matches.
//!
//! The bot turn is the hot path: every kingdom rescans its borders and
//! conquest candidates after each placement.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use hexreign::config::{MapConfig, MatchConfig, PlayerConfig, Rules};
use hexreign::game::{GameState, Intelligence, Player, generate};
use hexreign::run_bot_turn;
use hexreign::tournament::run_game;

fn players(n: u8, tier: Intelligence) -> Vec<Player> {
    (0..n).map(|i| Player::bot(i, format!("bot{i}"), tier)).collect()
}

fn map(land_mass: usize) -> MapConfig {
    MapConfig {
        land_mass,
        ..MapConfig::default()
    }
}

fn bench_mapgen(c: &mut Criterion) {
    let config = map(400);
    c.bench_function("mapgen_400_4p", |b| {
        b.iter(|| {
            let state = generate(
                players(4, Intelligence::Hard),
                black_box(&config),
                Rules::default(),
                black_box(42),
            );
            black_box(state)
        });
    });
}

/// A position a few rounds in, so kingdoms have units and borders.
fn midgame() -> GameState {
    let mut state = generate(players(4, Intelligence::Hard), &map(400), Rules::default(), 7).unwrap();
    for _ in 0..12 {
        run_bot_turn(&mut state, Intelligence::Hard);
        state.end_turn();
    }
    state
}

fn bench_bot_turn(c: &mut Criterion) {
    let start = midgame();
    for tier in [Intelligence::Easy, Intelligence::Hard] {
        c.bench_function(&format!("bot_turn_{tier:?}").to_lowercase(), |b| {
            b.iter_batched(
                || start.clone(),
                |mut state| black_box(run_bot_turn(&mut state, tier)),
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_full_match(c: &mut Criterion) {
    let config = MatchConfig {
        map: map(200),
        players: vec![
            PlayerConfig::bot("hard", Intelligence::Hard),
            PlayerConfig::bot("medium", Intelligence::Medium),
        ],
        max_turns: 100,
        rules: Rules::default(),
    };
    c.bench_function("match_200_2p", |b| {
        b.iter(|| black_box(run_game(black_box(42), black_box(&config))));
    });
}

criterion_group!(benches, bench_mapgen, bench_bot_turn, bench_full_match);
criterion_main!(benches);
