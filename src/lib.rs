// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Hexreign: a deterministic hex-grid territory conquest engine.
//!
//! Players own tiles on an island of hexagons. Connected tiles of one
//! owner form a kingdom with its own treasury; kingdoms buy peasants and
//! castles, combine units into stronger ones, and conquer neighboring
//! land. Conquest merges and splits kingdoms, relocates capitals, and
//! dissolves fragments that are too small to stand on their own.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / Tournament / Persistence    │
//! ├─────────────────────────────────────┤
//! │        Bot Decision Engine          │
//! ├─────────────────────────────────────┤
//! │     Kingdom Mutation Engine         │
//! ├─────────────────────────────────────┤
//! │           Hex grid                  │
//! └─────────────────────────────────────┘
//! ```
//!
//! The engine never validates moves itself: callers check legality with
//! the queries in [`game`] (`can_conquer`, `can_place_own`, ...) before
//! applying a [`Move`].

pub mod bot;
pub mod config;
pub mod game;
pub mod hex;
pub mod persistence;
pub mod tournament;

pub use bot::{run_bot_turn, spawn_bot_turn, BotAction, BotReport, CancelToken};
pub use config::{MapConfig, MatchConfig, Rules};
pub use game::{
    apply_move, generate, Content, GameState, Intelligence, Kingdom, KingdomId, Map, Move, Player,
    PlayerId, Tile, Unit, UnitKind,
};
pub use hex::Hex;
