// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game driver that runs rounds against the ledger.
use ahash::AHashSet;
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use forfeit_eval::eval::BOARD_SIZE;

use crate::{
    error::{Error, Result},
    ledger::{Ledger, Loss, Participant},
    poker::{Deck, ParticipantId},
    round::{Mode, Outcome, Round},
};

/// The default units, the first `n` are used for a pool of `n` units.
pub const CLOTHING_ITEMS: [&str; 10] = [
    "Socks",
    "Shoes",
    "Pants/Shorts",
    "Underwear",
    "Shirt/Top",
    "Bra",
    "Jacket",
    "Hat",
    "Jewelry",
    "Glasses",
];

/// Game configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The rounds mode.
    pub mode: Mode,
    /// The participants names.
    pub players: Vec<String>,
    /// The labels of the units each participant starts with.
    pub items: Vec<String>,
    /// Seed for reproducible games.
    pub seed: Option<u64>,
}

impl Config {
    /// Returns the default unit labels for a pool of `count` units.
    pub fn default_items(count: usize) -> Vec<String> {
        (0..count)
            .map(|idx| match CLOTHING_ITEMS.get(idx) {
                Some(item) => item.to_string(),
                None => format!("Item {}", idx + 1),
            })
            .collect()
    }

    /// Returns default participant names for `count` participants.
    pub fn default_players(count: usize) -> Vec<String> {
        (1..=count).map(|idx| format!("Player {idx}")).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            players: Self::default_players(3),
            items: Self::default_items(5),
            seed: None,
        }
    }
}

/// The effects of a round on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// The round number starting from 1.
    pub round: usize,
    /// The round mode.
    pub mode: Mode,
    /// How the round ended.
    pub outcome: Outcome,
    /// The round winners.
    pub winners: Vec<ParticipantId>,
    /// The round losers.
    pub losers: Vec<ParticipantId>,
    /// The units removed from the penalized participants.
    pub losses: Vec<Loss>,
    /// The participants who run out of units in this round.
    pub eliminated: Vec<ParticipantId>,
}

/// A game played until one participant is left.
#[derive(Debug)]
pub struct Game {
    mode: Mode,
    ledger: Ledger,
    rng: StdRng,
    rounds: usize,
}

impl Game {
    /// Creates a game from a config, seeded from `config.seed` if present.
    pub fn new(config: Config) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self::with_rng(config, rng)
    }

    /// Creates a game with user initialized randomness.
    pub fn with_rng(config: Config, rng: StdRng) -> Result<Self> {
        if config.players.len() < 2 {
            return Err(Error::InvalidSetup(format!(
                "a game needs at least 2 players, got {}",
                config.players.len()
            )));
        }

        if config.players.len() > Round::MAX_PARTICIPANTS {
            return Err(Error::DeckExhaustion {
                requested: config.players.len() * 2 + BOARD_SIZE,
                available: Deck::SIZE,
            });
        }

        if config.items.is_empty() {
            return Err(Error::InvalidSetup("players need at least 1 item".to_string()));
        }

        let mut ledger = Ledger::new();
        for name in &config.players {
            ledger.join(name, config.items.iter().cloned())?;
        }

        info!(
            "New {} game with {} players and {} items",
            config.mode,
            config.players.len(),
            config.items.len()
        );

        Ok(Self::from_ledger(ledger, config.mode, rng))
    }

    /// Resumes a game from a stored ledger.
    pub fn from_ledger(ledger: Ledger, mode: Mode, rng: StdRng) -> Self {
        Self {
            mode,
            ledger,
            rng,
            rounds: 0,
        }
    }

    /// The game ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The configured rounds mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The number of rounds finished so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Checks if at most one participant is left.
    pub fn is_game_over(&self) -> bool {
        self.ledger.is_game_over()
    }

    /// The game winner when the game is over.
    pub fn winner(&self) -> Option<&Participant> {
        self.ledger.winner()
    }

    /// Starts a round with the active participants in the configured mode.
    pub fn start_round(&mut self) -> Result<Round> {
        self.start_round_with_mode(self.mode)
    }

    /// Starts a round with the active participants in the given mode.
    pub fn start_round_with_mode(&mut self, mode: Mode) -> Result<Round> {
        let roster = self
            .ledger
            .active_roster()
            .iter()
            .map(|p| p.id())
            .collect::<Vec<_>>();

        Round::new(mode, &roster, &mut self.rng)
    }

    /// Applies a complete round outcome to the ledger.
    ///
    /// The round must have been dealt to the current active roster, a round
    /// started before another round eliminated a participant is rejected.
    pub fn finish_round(&mut self, round: Round) -> Result<RoundReport> {
        let Some(outcome) = round.outcome() else {
            return Err(Error::InvalidTransition(format!(
                "round at {} is not complete",
                round.phase()
            )));
        };

        let active = self
            .ledger
            .active_roster()
            .iter()
            .map(|p| p.id())
            .collect::<AHashSet<_>>();
        let dealt = round.participants().collect::<AHashSet<_>>();
        if active != dealt {
            return Err(Error::InvalidTransition(
                "round roster doesn't match the active participants".to_string(),
            ));
        }

        let losses = self.ledger.apply_loss(round.penalized(), &mut self.rng)?;
        self.rounds += 1;

        let eliminated = losses
            .iter()
            .filter(|l| l.remaining == 0)
            .map(|l| l.participant_id)
            .collect::<Vec<_>>();

        let report = RoundReport {
            round: self.rounds,
            mode: round.mode(),
            outcome,
            winners: round.winners().to_vec(),
            losers: round.losers().to_vec(),
            losses,
            eliminated,
        };

        info!(
            "Round {} {:?}: {} units lost, {} players left",
            report.round,
            report.outcome,
            report.losses.len(),
            self.ledger.count_active()
        );

        if let Some(winner) = self.ledger.winner() {
            info!("{} wins the game", winner.name());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::{Decision, Phase};

    fn new_game(mode: Mode, players: usize, items: usize, seed: u64) -> Game {
        let config = Config {
            mode,
            players: Config::default_players(players),
            items: Config::default_items(items),
            seed: Some(seed),
        };

        Game::new(config).unwrap()
    }

    fn total_units(game: &Game) -> usize {
        game.ledger()
            .participants()
            .map(|p| p.pool().remaining())
            .sum()
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::Strategic);
        assert_eq!(config.players, vec!["Player 1", "Player 2", "Player 3"]);
        assert_eq!(config.items, CLOTHING_ITEMS[..5].to_vec());

        let items = Config::default_items(12);
        assert_eq!(items[9], "Glasses");
        assert_eq!(items[11], "Item 12");
    }

    #[test]
    fn invalid_config() {
        let config = Config {
            players: Config::default_players(1),
            ..Config::default()
        };
        assert!(matches!(Game::new(config), Err(Error::InvalidSetup(_))));

        let config = Config {
            items: Vec::default(),
            ..Config::default()
        };
        assert!(matches!(Game::new(config), Err(Error::InvalidSetup(_))));

        let config = Config {
            players: Config::default_players(24),
            ..Config::default()
        };
        assert!(matches!(
            Game::new(config),
            Err(Error::DeckExhaustion { .. })
        ));
    }

    #[test]
    fn finish_incomplete_round() {
        let mut game = new_game(Mode::Strategic, 3, 2, 1);
        let round = game.start_round().unwrap();
        let res = game.finish_round(round);
        assert!(matches!(res, Err(Error::InvalidTransition(_))));
        assert_eq!(game.rounds(), 0);
        assert_eq!(total_units(&game), 6);
    }

    #[test]
    fn simplified_round_debits_winners() {
        let mut game = new_game(Mode::Simplified, 4, 3, 11);
        let round = game.start_round().unwrap();
        let winners = round.winners().to_vec();

        let report = game.finish_round(round).unwrap();
        assert_eq!(report.round, 1);
        assert_eq!(report.winners, winners);
        assert_eq!(report.losses.len(), winners.len());
        assert_eq!(total_units(&game), 12 - winners.len());

        for id in &winners {
            let p = game.ledger().participant(*id).unwrap();
            assert_eq!(p.pool().remaining(), 2);
        }

        for id in &report.losers {
            let p = game.ledger().participant(*id).unwrap();
            assert_eq!(p.pool().remaining(), 3);
        }
    }

    #[test]
    fn uncontested_round_debits_nobody() {
        let mut game = new_game(Mode::Strategic, 3, 2, 3);
        let mut round = game.start_round().unwrap();
        let ids = round.participants().collect::<Vec<_>>();

        round.submit(Phase::Preflop, ids[0], Decision::Fold).unwrap();
        round.submit(Phase::Preflop, ids[1], Decision::Fold).unwrap();
        round.submit(Phase::Preflop, ids[2], Decision::Stay).unwrap();
        round.advance().unwrap();

        let report = game.finish_round(round).unwrap();
        assert_eq!(report.outcome, Outcome::Uncontested(ids[2]));
        assert!(report.losses.is_empty());
        assert_eq!(total_units(&game), 6);
    }

    #[test]
    fn stale_round_is_rejected() {
        let mut game = new_game(Mode::Simplified, 3, 1, 2);
        let r1 = game.start_round().unwrap();
        let r2 = game.start_round().unwrap();

        let report = game.finish_round(r1).unwrap();
        assert!(!report.eliminated.is_empty());
        let units = total_units(&game);

        let res = game.finish_round(r2);
        assert!(matches!(res, Err(Error::InvalidTransition(_))));
        assert_eq!(game.rounds(), 1);
        assert_eq!(total_units(&game), units);
    }

    #[test]
    fn abandoned_round_debits_nobody() {
        let mut game = new_game(Mode::Strategic, 4, 2, 9);
        let mut round = game.start_round().unwrap();

        let phase = round.phase();
        for id in round.pending() {
            round.submit(phase, id, Decision::Fold).unwrap();
        }
        round.advance().unwrap();

        let report = game.finish_round(round).unwrap();
        assert_eq!(report.outcome, Outcome::Abandoned);
        assert!(report.winners.is_empty());
        assert!(report.losses.is_empty());
        assert!(report.eliminated.is_empty());
        assert_eq!(total_units(&game), 8);
        assert_eq!(game.ledger().count_active(), 4);
    }

    #[test]
    fn strategic_game_runs_to_the_end() {
        let mut game = new_game(Mode::Strategic, 4, 2, 21);

        while !game.is_game_over() {
            let units = total_units(&game);
            let mut round = game.start_round().unwrap();
            while !round.is_complete() {
                let phase = round.phase();
                for id in round.pending() {
                    round.submit(phase, id, Decision::Stay).unwrap();
                }
                round.advance().unwrap();
            }

            let losers = round.losers().len();
            let report = game.finish_round(round).unwrap();
            assert_eq!(report.losses.len(), losers);
            assert_eq!(total_units(&game), units - losers);

            for id in &report.eliminated {
                let active = game.ledger().active_roster();
                assert!(active.iter().all(|p| p.id() != *id));
            }

            assert!(game.rounds() < 100);
        }

        // Strategic rounds always leave the best hands untouched.
        assert!(game.winner().is_some());
        assert!(matches!(
            game.start_round(),
            Err(Error::InvalidSetup(_))
        ));
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let play = |seed| {
            let mut game = new_game(Mode::Simplified, 5, 3, seed);
            let mut reports = Vec::new();
            while !game.is_game_over() {
                let round = game.start_round().unwrap();
                reports.push(game.finish_round(round).unwrap());
            }
            reports
        };

        assert_eq!(play(7), play(7));
    }

    #[test]
    fn resume_from_ledger() {
        let mut ledger = Ledger::new();
        ledger
            .restore(ParticipantId::new(0), "Alice", ["Socks", "Hat"], 1)
            .unwrap();
        ledger
            .restore(ParticipantId::new(1), "Bob", ["Socks", "Hat"], 2)
            .unwrap();
        ledger
            .restore(ParticipantId::new(2), "Carol", ["Socks", "Hat"], 0)
            .unwrap();

        let mut game = Game::from_ledger(ledger, Mode::Simplified, StdRng::seed_from_u64(4));
        let round = game.start_round().unwrap();
        assert_eq!(round.participants().count(), 2);
        assert!(round.participants().all(|id| id != ParticipantId::new(2)));
    }
}
