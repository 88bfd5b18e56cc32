// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Forfeit poker hand evaluator.
//!
//! Evaluates the best five cards hand out of two hole cards and up to five
//! board cards. The hand strength is a [HandKey] made of the hand category and
//! the tie break card values, keys are totally ordered so that hands can be
//! compared directly:
//!
//! ```
//! # use forfeit_eval::*;
//! let cards = |s: &str| -> Vec<Card> {
//!     s.split_whitespace().map(|c| c.parse().unwrap()).collect()
//! };
//!
//! let board = cards("3C 4S 5H 9C KD");
//! let wheel = HandValue::eval(&cards("AH 2D"), &board).unwrap();
//! assert_eq!(wheel.rank(), HandRank::Straight);
//!
//! let kings = HandValue::eval(&cards("KH KS"), &board).unwrap();
//! assert_eq!(kings.rank(), HandRank::ThreeOfAKind);
//! assert!(wheel > kings);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{EvalError, HandKey, HandRank, HandValue};

// Reexport cards types.
pub use forfeit_cards::{Card, Deck, Rank, Suit};
