//! Command line front end: start, play, verify and repair games.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use commands::{Check, New, Play, Verify};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Arithmetic merge puzzle engine
#[derive(Parser, Debug)]
#[command(name = "opmerge", version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// TOML file overriding the standard game rules
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Start a game and print its first grid
    New(New),

    /// Play moves from a seed and show where they lead
    Play(Play),

    /// Replay a seed and move list the way the server does
    Verify(Verify),

    /// Load a stored game record, resetting it if corrupt
    Check(Check),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbose.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Command::New(cmd) => cmd.execute(config),
        Command::Play(cmd) => cmd.execute(config),
        Command::Verify(cmd) => cmd.execute(config),
        Command::Check(cmd) => cmd.execute(),
    }
}
