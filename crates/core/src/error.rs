// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game engine errors.
use thiserror::Error;

use forfeit_eval::EvalError;

use crate::poker::ParticipantId;

/// Errors returned by rounds, the ledger and the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The round or game cannot be created with the given participants.
    #[error("invalid setup: {0}")]
    InvalidSetup(String),
    /// The evaluator was given an invalid hand.
    #[error("invalid hand input: {0}")]
    InvalidHandInput(#[from] EvalError),
    /// The request is not valid in the current round state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    /// Not enough cards left in the deck.
    #[error("deck exhausted: {requested} cards requested, {available} available")]
    DeckExhaustion {
        /// The number of cards requested.
        requested: usize,
        /// The number of cards left in the deck.
        available: usize,
    },
    /// The participant is not in the ledger or in the round.
    #[error("unknown participant {0}")]
    UnknownParticipant(ParticipantId),
    /// The participant has no units left to lose.
    #[error("participant {0} has no units left")]
    NoUnitsLeft(ParticipantId),
}

/// Result type for the game engine.
pub type Result<T> = std::result::Result<T, Error>;
