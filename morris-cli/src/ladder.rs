//! Ladder command - round robin between difficulty levels
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), report_results()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use morris_tournament::{run_ladder, LadderConfig, LadderResult};

use crate::match_cmd::create_spinner;

#[derive(Args, Debug, Default)]
pub struct LadderArgs {
    /// Participating levels, comma separated
    #[arg(long, value_delimiter = ',')]
    pub levels: Vec<u8>,

    /// Games per pairing (seats alternate)
    #[arg(long)]
    pub games: Option<usize>,

    /// Turns after which a game is scored a draw
    #[arg(long)]
    pub max_turns: Option<u32>,

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

pub fn run(args: LadderArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!(
        "Starting ladder: levels {:?}, {} games per pairing",
        config.levels,
        config.games_per_pair
    );

    let spinner = if args.json {
        None
    } else {
        Some(create_spinner(format!(
            "running ladder over {} levels",
            config.levels.len()
        ))?)
    };

    let result = run_ladder(&config).context("ladder aborted")?;

    if let Some(pb) = spinner {
        pb.finish_with_message("done");
    }

    report_results(&result, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &LadderArgs, seed: Option<u64>) -> Result<LadderConfig> {
    let mut config = LadderConfig::default();
    if !args.levels.is_empty() {
        config.levels = args.levels.clone();
    }
    if let Some(games) = args.games {
        config.games_per_pair = games;
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    if args.sequential {
        config.parallel = false;
    }
    config.seed = seed;

    if config.levels.len() < 2 {
        anyhow::bail!("a ladder needs at least two levels");
    }
    config.validate()?;
    Ok(config)
}

fn report_results(result: &LadderResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_standings(result);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_standings(result: &LadderResult) {
    println!("\n=== Ladder Standings ===");
    println!(
        "{:<4} {:<7} {:>6} {:>5} {:>6} {:>5} {:>7}",
        "#", "Level", "Score", "Wins", "Losses", "Draws", "Win %"
    );
    for (rank, s) in result.standings.iter().enumerate() {
        println!(
            "{:<4} {:<7} {:>6.1} {:>5} {:>6} {:>5} {:>6.1}%",
            rank + 1,
            s.level,
            s.score,
            s.wins,
            s.losses,
            s.draws,
            s.win_rate() * 100.0
        );
    }

    println!("\nPairings:");
    for m in &result.matches {
        println!(
            "  {} vs {}: {}-{} ({} draws, avg {:.1} turns)",
            m.a_level, m.b_level, m.a_wins, m.b_wins, m.draws, m.avg_turns
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels() {
        let config = build_config(&LadderArgs::default(), Some(1)).unwrap();
        assert_eq!(config.levels, vec![1, 2, 3, 4, 5]);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_single_level_rejected() {
        let args = LadderArgs {
            levels: vec![3],
            ..Default::default()
        };
        assert!(build_config(&args, None).is_err());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let args = LadderArgs {
            levels: vec![1, 9],
            ..Default::default()
        };
        assert!(build_config(&args, None).is_err());
    }
}
