// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Forfeit game simulator.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use clap::Parser;
use log::error;

use forfeit_core::{game::Config, round::Mode};

pub mod play;

#[derive(Debug, Parser)]
struct Cli {
    /// Number of players.
    #[clap(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=8))]
    players: u8,
    /// Number of items each player starts with.
    #[clap(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
    items: u8,
    /// The rounds mode, strategic or simplified.
    #[clap(long, short, default_value_t = Mode::Strategic)]
    mode: Mode,
    /// Seed for a reproducible game.
    #[clap(long, short)]
    seed: Option<u64>,
    /// Percent chance a player folds at each decision.
    #[clap(long, default_value_t = 20, value_parser = clap::value_parser!(u8).range(0..=100))]
    fold_chance: u8,
    /// Stop after this many rounds.
    #[clap(long, default_value_t = 100)]
    max_rounds: usize,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = Config {
        mode: cli.mode,
        players: Config::default_players(cli.players as usize),
        items: Config::default_items(cli.items as usize),
        seed: cli.seed,
    };

    let settings = play::Settings {
        fold_chance: f64::from(cli.fold_chance) / 100.0,
        max_rounds: cli.max_rounds,
    };

    if let Err(e) = play::run(config, settings) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
