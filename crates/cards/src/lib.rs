// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Forfeit cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use forfeit_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! assert_eq!(ah.value(), 14);
//! assert_eq!(ah.to_string(), "AH");
//! assert_eq!("AH".parse(), Ok(ah));
//! ```
//!
//! and a [Deck] type for shuffling and dealing cards, the shuffle uses the given
//! random source so that a seeded generator always produces the same deck:
//!
//! ```
//! # use forfeit_cards::Deck;
//! # use rand::{SeedableRng, rngs::StdRng};
//! let mut deck = Deck::new_and_shuffled(&mut StdRng::seed_from_u64(1));
//! assert_eq!(deck.count(), Deck::SIZE);
//!
//! let card = deck.deal();
//! assert!(card.is_some());
//! assert_eq!(deck.count(), Deck::SIZE - 1);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, ParseCardError, Rank, Suit};
