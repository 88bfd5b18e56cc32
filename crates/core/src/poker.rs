// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Types shared by rounds and the ledger.
use serde::{Deserialize, Serialize};
use std::fmt;

pub use forfeit_eval::{Card, Deck, HandKey, HandRank, HandValue, Rank, Suit};

/// A unique participant identifier within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(u32);

impl ParticipantId {
    /// Creates a participant id from a stored value.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The integer value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ParticipantId {
    fn from(val: u32) -> Self {
        ParticipantId(val)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The participant cards as seen from outside a round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCards {
    /// The participant has no cards or they have been mucked.
    #[default]
    None,
    /// The participant has cards but their values are covered.
    Covered,
    /// The participant cards.
    Cards(Card, Card),
}
