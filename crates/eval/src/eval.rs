// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! Evaluates a hand made of two hole cards and up to five board cards by
//! searching all the five cards subsets for the one with the highest
//! [HandKey]. The key is a category tag followed by the tie break values,
//! two hands compare equal only if both parts are equal.
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use thiserror::Error;

use crate::{Card, Rank};

/// The number of cards in a complete poker hand.
pub const HAND_SIZE: usize = 5;

/// The maximum number of board cards.
pub const BOARD_SIZE: usize = 5;

/// Invalid evaluator input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The hand doesn't have two hole cards.
    #[error("expected 2 hole cards, got {0}")]
    HoleCards(usize),
    /// Too many board cards.
    #[error("expected at most 5 board cards, got {0}")]
    BoardCards(usize),
    /// A card appears more than once.
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
}

/// A hand category from the weakest to the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// High card.
    HighCard = 0,
    /// One pair.
    OnePair,
    /// Two pair.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Straight.
    Straight,
    /// Flush.
    Flush,
    /// Full house.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Straight flush.
    StraightFlush,
}

impl HandRank {
    /// Returns all the categories from the weakest to the strongest.
    pub fn ranks() -> impl DoubleEndedIterator<Item = HandRank> {
        use HandRank::*;
        [
            HighCard,
            OnePair,
            TwoPair,
            ThreeOfAKind,
            Straight,
            Flush,
            FullHouse,
            FourOfAKind,
            StraightFlush,
        ]
        .into_iter()
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
        };

        write!(f, "{label}")
    }
}

/// The comparison key for a hand.
///
/// Keys are compared lexicographically: the category first and then the tie
/// break values, ordered from the most to the least significant and padded
/// with zeros. Straights only carry their high card so a wheel has a 5 tie
/// break value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandKey {
    rank: HandRank,
    tie_break: [u8; HAND_SIZE],
}

impl HandKey {
    /// The key category.
    pub fn rank(&self) -> HandRank {
        self.rank
    }

    /// The tie break card values.
    pub fn tie_break(&self) -> &[u8] {
        let len = self
            .tie_break
            .iter()
            .position(|v| *v == 0)
            .unwrap_or(HAND_SIZE);
        &self.tie_break[..len]
    }

    /// Computes the key for a hand with at most five cards.
    ///
    /// Straights and flushes are only possible with five cards.
    fn classify(cards: &[Card]) -> HandKey {
        debug_assert!(!cards.is_empty() && cards.len() <= HAND_SIZE);

        // Count card values, index 14 is the ace.
        let mut counts = [0u8; 15];
        for card in cards {
            counts[card.value() as usize] += 1;
        }

        // Sort (count, value) groups by count and then by value.
        let mut groups = [(0u8, 0u8); HAND_SIZE];
        let mut ngroups = 0;
        for value in (2..=Rank::Ace.value()).rev() {
            let count = counts[value as usize];
            if count > 0 {
                groups[ngroups] = (count, value);
                ngroups += 1;
            }
        }

        let groups = &mut groups[..ngroups];
        groups.sort_by(|g1, g2| g2.cmp(g1));

        let mut tie_break = [0u8; HAND_SIZE];
        for (tb, (_, value)) in tie_break.iter_mut().zip(groups.iter()) {
            *tb = *value;
        }

        let is_five = cards.len() == HAND_SIZE;
        let is_flush = is_five && cards.iter().all(|c| c.suit() == cards[0].suit());
        let straight_high = if is_five && ngroups == HAND_SIZE {
            // Values are distinct and in descending order.
            let (high, low) = (groups[0].1, groups[HAND_SIZE - 1].1);
            if high - low == 4 {
                Some(high)
            } else if high == Rank::Ace.value() && groups[1].1 == Rank::Five.value() {
                // The wheel A-2-3-4-5 plays as a five high straight.
                Some(Rank::Five.value())
            } else {
                None
            }
        } else {
            None
        };

        let rank = match (straight_high, is_flush, groups[0].0, groups.get(1)) {
            (Some(_), true, _, _) => HandRank::StraightFlush,
            (_, _, 4, _) => HandRank::FourOfAKind,
            (_, _, 3, Some((2, _))) => HandRank::FullHouse,
            (_, true, _, _) => HandRank::Flush,
            (Some(_), _, _, _) => HandRank::Straight,
            (_, _, 3, _) => HandRank::ThreeOfAKind,
            (_, _, 2, Some((2, _))) => HandRank::TwoPair,
            (_, _, 2, _) => HandRank::OnePair,
            _ => HandRank::HighCard,
        };

        if let Some(high) = straight_high {
            if matches!(rank, HandRank::Straight | HandRank::StraightFlush) {
                tie_break = [high, 0, 0, 0, 0];
            }
        }

        HandKey { rank, tie_break }
    }
}

/// A hand value with its key and the cards that make the hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandValue {
    key: HandKey,
    hand: Vec<Card>,
}

impl HandValue {
    /// Evaluates the best hand given two hole cards and up to five board cards.
    ///
    /// With fewer than five cards in total the whole pool is the hand.
    pub fn eval(hole: &[Card], board: &[Card]) -> Result<HandValue, EvalError> {
        if hole.len() != 2 {
            return Err(EvalError::HoleCards(hole.len()));
        }

        if board.len() > BOARD_SIZE {
            return Err(EvalError::BoardCards(board.len()));
        }

        let mut seen = AHashSet::with_capacity(hole.len() + board.len());
        let mut pool = Vec::with_capacity(hole.len() + board.len());
        for card in hole.iter().chain(board) {
            if !seen.insert(*card) {
                return Err(EvalError::DuplicateCard(*card));
            }

            pool.push(*card);
        }

        if pool.len() <= HAND_SIZE {
            return Ok(Self::new(HandKey::classify(&pool), pool));
        }

        let mut best_hand = [pool[0]; HAND_SIZE];
        best_hand.copy_from_slice(&pool[..HAND_SIZE]);
        let mut best_key = HandKey::classify(&best_hand);

        for_each_subset(&pool, |hand| {
            let key = HandKey::classify(hand);
            if key > best_key {
                best_key = key;
                best_hand.copy_from_slice(hand);
            }
        });

        Ok(Self::new(best_key, best_hand.to_vec()))
    }

    fn new(key: HandKey, mut hand: Vec<Card>) -> Self {
        // Sort by rank for the UI.
        hand.sort_by(|c1, c2| c2.cmp(c1));
        Self { key, hand }
    }

    /// The hand category.
    pub fn rank(&self) -> HandRank {
        self.key.rank
    }

    /// The hand comparison key.
    pub fn key(&self) -> HandKey {
        self.key
    }

    /// The cards that make the best hand sorted from the highest rank.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }
}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    /// Compares hands by key only, different cards can make equal hands.
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key.rank)?;
        for (idx, card) in self.hand.iter().enumerate() {
            let sep = if idx == 0 { " " } else { "," };
            write!(f, "{sep}{card}")?;
        }

        Ok(())
    }
}

/// Calls `f` for each five cards subset of `cards` in lexicographic order.
fn for_each_subset<F>(cards: &[Card], mut f: F)
where
    F: FnMut(&[Card]),
{
    let n = cards.len();
    if n < HAND_SIZE {
        return;
    }

    let mut idx = [0, 1, 2, 3, 4];
    let mut hand = [cards[0]; HAND_SIZE];

    loop {
        for (h, i) in hand.iter_mut().zip(idx) {
            *h = cards[i];
        }

        f(&hand);

        // Find the rightmost index that can be moved forward.
        let Some(pos) = (0..HAND_SIZE).rev().find(|&p| idx[p] < n - HAND_SIZE + p) else {
            break;
        };

        idx[pos] += 1;
        for p in pos + 1..HAND_SIZE {
            idx[p] = idx[p - 1] + 1;
        }
    }
}
