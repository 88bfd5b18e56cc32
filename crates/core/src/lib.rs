// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Forfeit core game engine.
//!
//! A [Game](game::Game) owns a [Ledger](ledger::Ledger) with the participants
//! resource pools and runs [Rounds](round::Round) with the participants that
//! still have units left:
//!
//! ```
//! # use forfeit_core::{game::{Config, Game}, round::{Decision, Mode}};
//! let config = Config {
//!     mode: Mode::Strategic,
//!     seed: Some(1),
//!     ..Config::default()
//! };
//!
//! let mut game = Game::new(config).unwrap();
//! while !game.is_game_over() {
//!     let mut round = game.start_round().unwrap();
//!     while !round.is_complete() {
//!         let phase = round.phase();
//!         for id in round.pending() {
//!             round.submit(phase, id, Decision::Stay).unwrap();
//!         }
//!         round.advance().unwrap();
//!     }
//!
//!     game.finish_round(round).unwrap();
//! }
//!
//! assert!(game.winner().is_some());
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod error;
pub use error::{Error, Result};
pub mod game;
pub use game::{Config, Game, RoundReport};
pub mod ledger;
pub mod poker;
pub mod round;
