use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod animation;
mod engine;
mod error;
mod tui;
mod tuigems;

use engine::grid::GridEngine;
use tui::crossterm::{Crossterm, CrosstermEvents};
use tuigems::{SystemClock, TuiGems};

/// Match-3 in the terminal: swap neighbouring gems to line up three or more of a kind.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Seed for the gem generator; games are reproducible with the same seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Length of a round in seconds, 0 to play without a time limit.
    #[arg(long, default_value_t = 60)]
    game_length: u64,

    /// Where to write the log.
    #[arg(long, default_value = "./tuigems.log")]
    log_file: PathBuf,

    #[command(flatten)]
    verbose: Verbosity,
}

fn setup_logging(args: &Args) -> error::Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(args.verbose.log_level_filter())
        .chain(fern::log_file(&args.log_file)?)
        .apply()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args)?;

    let rng = match args.seed {
        Some(seed) => {
            log::info!("seeding with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let game_length = match args.game_length {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let engine = GridEngine::new(rng);
    let w = stdout().lock();
    let renderer = Crossterm::new(Box::new(w))?;
    let tuigems = TuiGems::new(
        engine,
        renderer,
        CrosstermEvents::default(),
        SystemClock,
        game_length,
    )?;
    tuigems.run()?;

    Ok(())
}
