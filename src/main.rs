use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sweeper::config::Cli;
use sweeper::{run, Game, GameConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::from(&cli);
    info!(?config, seed = ?cli.seed, "starting game");

    let mut game = match cli.seed {
        Some(seed) => Game::seeded(config.width, config.height, config.mines, seed),
        None => Game::new(config.width, config.height, config.mines),
    }
    .with_context(|| format!("cannot build a game from {:?}", config))?;

    let stdout = io::stdout();
    let end = run(&mut game, io::stdin().lock(), &mut stdout.lock()).context("terminal i/o failed")?;
    info!(?end, "session finished");
    Ok(())
}
