//! hexgame - Hex with a Monte Carlo opponent
//!
//! Commands:
//! - play: Play an interactive game
//! - selfplay: Let the bot play itself

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexgame_cli::{play, selfplay};

#[derive(Parser)]
#[command(name = "hexgame")]
#[command(version, about = "Hex board game with a Monte Carlo bot")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game
    Play(play::PlayArgs),
    /// Bot against bot, alternating the first move
    Selfplay(selfplay::SelfplayArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Selfplay(args) => selfplay::run(args),
    }
}

/// Log to stderr so that stdout stays clean for the board and JSON
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
