// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Plays a full game with random fold decisions.
use anyhow::{Context, Result};
use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};

use forfeit_core::{
    game::{Config, Game},
    ledger::Ledger,
    poker::{Card, ParticipantId, PlayerCards},
    round::{Decision, Round},
};

/// Simulation settings.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    /// Probability a participant folds at each decision point.
    pub fold_chance: f64,
    /// Maximum number of rounds to play.
    pub max_rounds: usize,
}

/// Plays a game until it is over or the rounds limit is reached.
pub fn run(config: Config, settings: Settings) -> Result<()> {
    // Decisions use their own generator so that the cards dealt by a seeded
    // game do not depend on the fold chance.
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };

    let mut game = Game::new(config).context("cannot create game")?;

    while !game.is_game_over() && game.rounds() < settings.max_rounds {
        let mut round = game.start_round()?;
        play_round(&mut round, &mut rng, settings.fold_chance)?;
        log_hands(&round, game.ledger());

        game.finish_round(round)?;
    }

    print_standings(&game);
    Ok(())
}

fn play_round<R: Rng>(round: &mut Round, rng: &mut R, fold_chance: f64) -> Result<()> {
    while !round.is_complete() {
        let phase = round.phase();
        info!("{phase} board [{}]", cards_list(round.board()));

        for id in round.pending() {
            let decision = if rng.random_bool(fold_chance) {
                Decision::Fold
            } else {
                Decision::Stay
            };

            round.submit(phase, id, decision)?;
        }

        round.advance()?;
    }

    Ok(())
}

fn log_hands(round: &Round, ledger: &Ledger) {
    for id in round.participants() {
        let Some(view) = round.hand(id) else {
            continue;
        };

        let name = name(ledger, id);
        match (view.cards, view.rank) {
            (PlayerCards::Cards(c1, c2), Some(rank)) => {
                info!("{name} shows {c1} {c2}: {rank} [{}]", cards_list(&view.hand));
            }
            _ if view.folded => info!("{name} folded"),
            _ => info!("{name} mucks"),
        }
    }
}

fn print_standings(game: &Game) {
    println!("Standings after {} rounds:", game.rounds());

    let mut participants = game.ledger().participants().collect::<Vec<_>>();
    participants.sort_by_key(|p| std::cmp::Reverse(p.pool().remaining()));

    for p in participants {
        let items = p
            .pool()
            .units()
            .iter()
            .filter(|u| u.is_present())
            .map(|u| u.label())
            .collect::<Vec<_>>();

        println!(
            "  {:<10} {}/{} [{}]",
            p.name(),
            p.pool().remaining(),
            p.pool().capacity(),
            items.join(", ")
        );
    }

    match game.winner() {
        Some(winner) => println!("Winner: {}", winner.name()),
        None if game.is_game_over() => println!("No winner, everybody is out"),
        None => println!("No winner after {} rounds", game.rounds()),
    }
}

fn name(ledger: &Ledger, id: ParticipantId) -> String {
    ledger
        .participant(id)
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| id.to_string())
}

fn cards_list(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
