//! Match command - play games between two difficulty levels
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_with_progress(), report_results()
//! - Level 3: apply_overrides()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use morris_tournament::{play_match, MatchConfig, MatchResult};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct MatchArgs {
    /// Difficulty of the first seat (1-5)
    #[arg(long)]
    pub one: Option<u8>,

    /// Difficulty of the second seat (1-5)
    #[arg(long)]
    pub two: Option<u8>,

    /// Number of games to play (seats alternate)
    #[arg(long)]
    pub games: Option<usize>,

    /// Turns after which a game is scored a draw
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Match configuration JSON file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Play games one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build the match configuration
/// 2. Play the match
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!(
        "Starting match: level {} vs level {} ({} games, max {} turns)",
        config.player_one.difficulty,
        config.player_two.difficulty,
        config.games,
        config.max_turns
    );

    let results = play_with_progress(&config, !args.json)?;

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the config file if given, then apply flag overrides
fn build_config(args: &MatchArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let base = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    let config = apply_overrides(base, args, seed);
    config.validate()?;
    Ok(config)
}

/// Play the match behind a spinner
fn play_with_progress(config: &MatchConfig, show_progress: bool) -> Result<MatchResult> {
    let spinner = if show_progress {
        Some(create_spinner(format!("playing {} games", config.games))?)
    } else {
        None
    };

    let result = play_match(config).context("match aborted")?;

    if let Some(pb) = spinner {
        pb.finish_with_message("done");
    }
    Ok(result)
}

fn report_results(results: &MatchResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn apply_overrides(mut config: MatchConfig, args: &MatchArgs, seed: Option<u64>) -> MatchConfig {
    if let Some(one) = args.one {
        config.player_one.difficulty = one;
    }
    if let Some(two) = args.two {
        config.player_two.difficulty = two;
    }
    if let Some(games) = args.games {
        config.games = games;
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    if args.sequential {
        config.parallel = false;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

pub(crate) fn create_spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("invalid progress template")?,
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

pub(crate) fn percent(count: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32 * 100.0
    }
}

/// Print results as text
fn print_text_results(results: &MatchResult) {
    let total = results.games_played;

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "Level {} wins: {} ({:.1}%)",
        results.a_level,
        results.a_wins,
        percent(results.a_wins, total)
    );
    println!(
        "Level {} wins: {} ({:.1}%)",
        results.b_level,
        results.b_wins,
        percent(results.b_wins, total)
    );
    println!(
        "Draws:        {} ({:.1}%)",
        results.draws,
        percent(results.draws, total)
    );
    println!(
        "First mover:  {} ({:.1}%)",
        results.first_mover_wins,
        percent(results.first_mover_wins, total)
    );
    println!("Avg turns:    {:.1}", results.avg_turns);

    println!("\nGame details:");
    for game in &results.games {
        let winner = match game.outcome.winner {
            None => "draw".to_string(),
            Some(_) if game.a_won() => format!("level {}", results.a_level),
            Some(_) => format!("level {}", results.b_level),
        };
        println!(
            "  Game {}: {} ({:?}) in {} turns, {} mills",
            game.game_number,
            winner,
            game.outcome.reason,
            game.outcome.turns,
            game.outcome.mills()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
