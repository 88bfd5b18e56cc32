// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Round state machine.
//!
//! A round is stepped by the caller: in strategic mode every participant still
//! in the hand submits a [Decision] for the current [Phase] and then the caller
//! requests [Round::advance], the round never moves by itself. A simplified
//! round is dealt and resolved when it is created.
use ahash::AHashSet;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use forfeit_eval::eval::BOARD_SIZE;

use crate::{
    error::{Error, Result},
    poker::{Card, Deck, HandRank, HandValue, ParticipantId, PlayerCards},
};

/// The round mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// All cards are dealt at once and the best hands are penalized.
    Simplified,
    /// Cards are revealed in phases with fold decisions and the worst hands
    /// are penalized.
    #[default]
    Strategic,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Simplified => write!(f, "simplified"),
            Mode::Strategic => write!(f, "strategic"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simplified" => Ok(Mode::Simplified),
            "strategic" => Ok(Mode::Strategic),
            _ => Err(format!("invalid mode '{s}', use simplified or strategic")),
        }
    }
}

/// The round phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Hole cards dealt, no board cards.
    Preflop,
    /// Three board cards.
    Flop,
    /// Four board cards.
    Turn,
    /// Five board cards, hands compared.
    Showdown,
}

impl Phase {
    /// The number of board cards dealt when entering this phase.
    fn cards_to_deal(&self) -> usize {
        match self {
            Phase::Preflop => 0,
            Phase::Flop => 3,
            Phase::Turn | Phase::Showdown => 1,
        }
    }

    fn next(&self) -> Option<Phase> {
        match self {
            Phase::Preflop => Some(Phase::Flop),
            Phase::Flop => Some(Phase::Turn),
            Phase::Turn => Some(Phase::Showdown),
            Phase::Showdown => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::Showdown => "showdown",
        };

        write!(f, "{phase}")
    }
}

/// A participant decision before a phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Stay in the round.
    Stay,
    /// Withdraw from the round, a folded participant is never penalized.
    Fold,
}

/// How a complete round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Hands have been compared.
    Showdown,
    /// All other participants folded.
    Uncontested(ParticipantId),
    /// Every participant folded.
    Abandoned,
}

/// A participant hand as seen from outside the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandView {
    /// The hand owner.
    pub participant_id: ParticipantId,
    /// The hole cards, covered until revealed.
    pub cards: PlayerCards,
    /// The hand category if revealed.
    pub rank: Option<HandRank>,
    /// The best hand cards if revealed.
    pub hand: Vec<Card>,
    /// The participant has folded.
    pub folded: bool,
}

/// A participant seat in the round.
struct Seat {
    participant_id: ParticipantId,
    hole_cards: [Card; 2],
    hand: Option<HandValue>,
    decision: Option<Decision>,
    folded: bool,
}

impl Seat {
    fn is_active(&self) -> bool {
        !self.folded
    }
}

/// A round of play.
pub struct Round {
    mode: Mode,
    phase: Phase,
    deck: Deck,
    board: Vec<Card>,
    seats: Vec<Seat>,
    winners: Vec<ParticipantId>,
    losers: Vec<ParticipantId>,
    outcome: Option<Outcome>,
}

// Hole cards and the deck order are not shown.
impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Round")
            .field("mode", &self.mode)
            .field("phase", &self.phase)
            .field("board", &self.board)
            .field("participants", &self.participants().collect::<Vec<_>>())
            .field("folded", &self.folded().collect::<Vec<_>>())
            .field("winners", &self.winners)
            .field("losers", &self.losers)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl Round {
    /// The maximum number of participants that can be dealt from one deck.
    pub const MAX_PARTICIPANTS: usize = (Deck::SIZE - BOARD_SIZE) / 2;

    /// Creates a round for the given roster and deals the cards.
    ///
    /// The deck is shuffled with `rng`, a simplified round is complete when
    /// this function returns.
    pub fn new<R: Rng + ?Sized>(mode: Mode, roster: &[ParticipantId], rng: &mut R) -> Result<Self> {
        if roster.len() < 2 {
            return Err(Error::InvalidSetup(format!(
                "a round needs at least 2 participants, got {}",
                roster.len()
            )));
        }

        let mut seen = AHashSet::with_capacity(roster.len());
        if let Some(id) = roster.iter().find(|id| !seen.insert(**id)) {
            return Err(Error::InvalidSetup(format!("duplicate participant {id}")));
        }

        let requested = roster.len() * 2 + BOARD_SIZE;
        if requested > Deck::SIZE {
            return Err(Error::DeckExhaustion {
                requested,
                available: Deck::SIZE,
            });
        }

        let mut round = Self {
            mode,
            phase: Phase::Preflop,
            deck: Deck::new_and_shuffled(rng),
            board: Vec::with_capacity(BOARD_SIZE),
            seats: Vec::with_capacity(roster.len()),
            winners: Vec::default(),
            losers: Vec::default(),
            outcome: None,
        };

        // Deal cards to each participant.
        for id in roster {
            let hole_cards = [round.deal()?, round.deal()?];
            round.seats.push(Seat {
                participant_id: *id,
                hole_cards,
                hand: None,
                decision: None,
                folded: false,
            });
        }

        debug!("Dealt {} hands in {mode} mode", roster.len());

        if mode == Mode::Simplified {
            while round.board.len() < BOARD_SIZE {
                let card = round.deal()?;
                round.board.push(card);
            }

            round.phase = Phase::Showdown;
            round.showdown()?;
        }

        Ok(round)
    }

    /// The round mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The board cards revealed so far.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// Checks if the winners and losers are final.
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// How the round ended, `None` while the round is in progress.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The round winners.
    pub fn winners(&self) -> &[ParticipantId] {
        &self.winners
    }

    /// The round losers.
    pub fn losers(&self) -> &[ParticipantId] {
        &self.losers
    }

    /// The participants who lose a unit.
    ///
    /// Simplified rounds penalize the winners, strategic rounds penalize the
    /// losers at showdown. Nobody is penalized if the round ends before the
    /// showdown or is still in progress.
    pub fn penalized(&self) -> &[ParticipantId] {
        match (self.mode, self.outcome) {
            (Mode::Simplified, Some(Outcome::Showdown)) => &self.winners,
            (Mode::Strategic, Some(Outcome::Showdown)) => &self.losers,
            _ => &[],
        }
    }

    /// All the participants dealt in this round.
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.seats.iter().map(|s| s.participant_id)
    }

    /// The participants who haven't folded.
    pub fn active(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.seats
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.participant_id)
    }

    /// The participants who have folded.
    pub fn folded(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.seats
            .iter()
            .filter(|s| s.folded)
            .map(|s| s.participant_id)
    }

    /// The active participants who have to decide before the round can advance.
    pub fn pending(&self) -> Vec<ParticipantId> {
        if self.is_complete() {
            return Vec::default();
        }

        self.seats
            .iter()
            .filter(|s| s.is_active() && s.decision.is_none())
            .map(|s| s.participant_id)
            .collect()
    }

    /// Submits a participant decision for the given phase.
    ///
    /// The phase must be the current round phase, decisions for a phase that
    /// the round has already left are rejected.
    pub fn submit(&mut self, phase: Phase, id: ParticipantId, decision: Decision) -> Result<()> {
        if self.is_complete() {
            return Err(Error::InvalidTransition("round is complete".to_string()));
        }

        if phase != self.phase {
            return Err(Error::InvalidTransition(format!(
                "decision for {phase} while round is at {}",
                self.phase
            )));
        }

        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.participant_id == id)
            .ok_or(Error::UnknownParticipant(id))?;

        if seat.folded {
            return Err(Error::InvalidTransition(format!(
                "participant {id} has folded"
            )));
        }

        if seat.decision.is_some() {
            return Err(Error::InvalidTransition(format!(
                "participant {id} has already decided at {phase}"
            )));
        }

        seat.decision = Some(decision);
        Ok(())
    }

    /// Advances the round to the next phase and returns the new phase.
    ///
    /// All active participants must have submitted a decision. If the folds
    /// leave one participant, that participant wins without a showdown, if
    /// they leave none the round is abandoned. In both cases the round is
    /// complete and the phase doesn't change.
    pub fn advance(&mut self) -> Result<Phase> {
        if self.is_complete() {
            return Err(Error::InvalidTransition("round is complete".to_string()));
        }

        let pending = self.pending();
        if !pending.is_empty() {
            return Err(Error::InvalidTransition(format!(
                "waiting for {} decisions at {}",
                pending.len(),
                self.phase
            )));
        }

        let Some(next_phase) = self.phase.next() else {
            return Err(Error::InvalidTransition(format!(
                "cannot advance from {}",
                self.phase
            )));
        };

        let requested = next_phase.cards_to_deal();
        if self.deck.count() < requested {
            return Err(Error::DeckExhaustion {
                requested,
                available: self.deck.count(),
            });
        }

        // Apply folds and reset decisions for the next phase.
        for seat in self.seats.iter_mut() {
            if let Some(Decision::Fold) = seat.decision.take() {
                debug!("Participant {} folds at {}", seat.participant_id, self.phase);
                seat.folded = true;
            }
        }

        let active = self.active().collect::<Vec<_>>();
        match active.as_slice() {
            [] => {
                info!("Round abandoned at {}, everybody folded", self.phase);
                self.outcome = Some(Outcome::Abandoned);
                return Ok(self.phase);
            }
            [winner] => {
                info!("Participant {winner} wins uncontested at {}", self.phase);
                let winner = *winner;
                self.evaluate(winner)?;
                self.winners = vec![winner];
                self.outcome = Some(Outcome::Uncontested(winner));
                return Ok(self.phase);
            }
            _ => {}
        }

        for _ in 0..requested {
            let card = self.deal()?;
            self.board.push(card);
        }

        self.phase = next_phase;
        debug!("Entered {} with board {:?}", self.phase, self.board);

        if self.phase == Phase::Showdown {
            self.showdown()?;
        }

        Ok(self.phase)
    }

    /// Returns a participant hand with the information visible outside the round.
    ///
    /// In strategic mode the hole cards and category are covered until the
    /// showdown, or until a participant wins uncontested in which case only
    /// that participant hand is shown. Folded hands are never shown.
    pub fn hand(&self, id: ParticipantId) -> Option<HandView> {
        let seat = self.seats.iter().find(|s| s.participant_id == id)?;

        let revealed = !seat.folded
            && match (self.mode, self.outcome) {
                (Mode::Simplified, _) => true,
                (Mode::Strategic, Some(Outcome::Showdown)) => true,
                (Mode::Strategic, Some(Outcome::Uncontested(winner))) => winner == id,
                _ => false,
            };

        let view = if revealed {
            let [c1, c2] = seat.hole_cards;
            HandView {
                participant_id: id,
                cards: PlayerCards::Cards(c1, c2),
                rank: seat.hand.as_ref().map(HandValue::rank),
                hand: seat
                    .hand
                    .as_ref()
                    .map(|hv| hv.hand().to_vec())
                    .unwrap_or_default(),
                folded: false,
            }
        } else {
            HandView {
                participant_id: id,
                cards: if seat.folded {
                    PlayerCards::None
                } else {
                    PlayerCards::Covered
                },
                rank: None,
                hand: Vec::default(),
                folded: seat.folded,
            }
        };

        Some(view)
    }

    fn deal(&mut self) -> Result<Card> {
        self.deck.deal().ok_or(Error::DeckExhaustion {
            requested: 1,
            available: 0,
        })
    }

    /// Evaluates a participant hand with the current board.
    fn evaluate(&mut self, id: ParticipantId) -> Result<()> {
        if let Some(seat) = self.seats.iter_mut().find(|s| s.participant_id == id) {
            seat.hand = Some(HandValue::eval(&seat.hole_cards, &self.board)?);
        }

        Ok(())
    }

    /// Compares the active hands and sets winners and losers.
    fn showdown(&mut self) -> Result<()> {
        for seat in self.seats.iter_mut().filter(|s| s.is_active()) {
            seat.hand = Some(HandValue::eval(&seat.hole_cards, &self.board)?);
        }

        let best = self
            .seats
            .iter()
            .filter_map(|s| s.hand.as_ref().map(HandValue::key))
            .max();

        for seat in self.seats.iter().filter(|s| s.is_active()) {
            if let Some(hand) = &seat.hand {
                if Some(hand.key()) == best {
                    self.winners.push(seat.participant_id);
                } else {
                    self.losers.push(seat.participant_id);
                }

                debug!("Participant {} shows {hand}", seat.participant_id);
            }
        }

        info!(
            "Showdown winners {:?} losers {:?}",
            self.winners, self.losers
        );

        self.outcome = Some(Outcome::Showdown);
        Ok(())
    }
}
