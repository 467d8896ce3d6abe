//! Morris CLI - Command-line interface
//!
//! Commands:
//! - match: Play a series of games between two AI levels
//! - ladder: Round robin across AI levels

mod ladder;
mod match_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "morris")]
#[command(about = "Nine Men's Morris AI match runner")]
struct Cli {
    /// Base random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play games between two difficulty levels
    Match(match_cmd::MatchArgs),
    /// Round robin between difficulty levels
    Ladder(ladder::LadderArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Ladder(args) => ladder::run(args, cli.seed),
    }
}
