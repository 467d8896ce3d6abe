//! Match play - multiple games between two AI configurations
//!
//! Level 2 - Phase-level implementation

use morris_core::{Difficulty, Player, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::MatchConfig;
use crate::game_runner::{play_game_with_seeds, GameOutcome};

/// Seat-relative record of one game in a match
#[derive(Clone, Debug, Serialize)]
pub struct MatchGame {
    /// 1-based game number
    pub game_number: usize,
    /// Whether seat A (`player_one` config) moved first
    pub a_moved_first: bool,
    pub outcome: GameOutcome,
}

impl MatchGame {
    /// Whether seat A won this game
    pub fn a_won(&self) -> bool {
        self.outcome.winner == Some(self.seat_a_player())
    }

    /// Whether seat B won this game
    pub fn b_won(&self) -> bool {
        self.outcome.winner == Some(self.seat_a_player().opponent())
    }

    fn seat_a_player(&self) -> Player {
        if self.a_moved_first {
            Player::One
        } else {
            Player::Two
        }
    }
}

/// Result of a match (multiple games)
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    /// Difficulty of seat A
    pub a_level: u8,
    /// Difficulty of seat B
    pub b_level: u8,
    pub a_wins: u32,
    pub b_wins: u32,
    /// Wins by whichever side moved first
    pub first_mover_wins: u32,
    /// Games stopped by the turn cap
    pub draws: u32,
    /// Average game length in turns
    pub avg_turns: f32,
    /// Total games played
    pub games_played: u32,
    /// Individual games
    pub games: Vec<MatchGame>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty(a_level: u8, b_level: u8) -> Self {
        Self {
            a_level,
            b_level,
            a_wins: 0,
            b_wins: 0,
            first_mover_wins: 0,
            draws: 0,
            avg_turns: 0.0,
            games_played: 0,
            games: Vec::new(),
        }
    }

    /// Win rate for seat A
    pub fn a_win_rate(&self) -> f32 {
        rate(self.a_wins, self.games_played)
    }

    /// Win rate for seat B
    pub fn b_win_rate(&self) -> f32 {
        rate(self.b_wins, self.games_played)
    }

    /// Get draw rate
    pub fn draw_rate(&self) -> f32 {
        rate(self.draws, self.games_played)
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_a(&self) -> f32 {
        self.a_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_b(&self) -> f32 {
        self.b_wins as f32 + 0.5 * self.draws as f32
    }
}

fn rate(count: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32
    }
}

/// Play a match (Level 2 phase)
///
/// Seats alternate who moves first each game. Seeds depend only on the game
/// index, so parallel and sequential runs give the same games.
pub fn play_match(config: &MatchConfig) -> Result<MatchResult> {
    let a = Difficulty::new(config.player_one.difficulty)?;
    let b = Difficulty::new(config.player_two.difficulty)?;

    if config.games == 0 {
        return Ok(MatchResult::empty(a.level(), b.level()));
    }

    let game_configs = prepare_game_configs(config.games);
    let games = if config.parallel {
        execute_games_parallel(a, b, config, &game_configs)?
    } else {
        execute_games(a, b, config, &game_configs)?
    };

    Ok(aggregate_results(a.level(), b.level(), games))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Copy, Debug)]
struct GameConfig {
    /// Whether seat A moves first this game
    a_first: bool,
    /// Game index (for seeding)
    game_index: usize,
}

/// Prepare game configurations for a match
fn prepare_game_configs(games: usize) -> Vec<GameConfig> {
    (0..games)
        .map(|i| GameConfig {
            a_first: i % 2 == 0, // Alternate seats
            game_index: i,
        })
        .collect()
}

/// Execute games sequentially
fn execute_games(
    a: Difficulty,
    b: Difficulty,
    config: &MatchConfig,
    game_configs: &[GameConfig],
) -> Result<Vec<MatchGame>> {
    game_configs
        .iter()
        .map(|gc| play_single_game(a, b, config, gc))
        .collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(
    a: Difficulty,
    b: Difficulty,
    config: &MatchConfig,
    game_configs: &[GameConfig],
) -> Result<Vec<MatchGame>> {
    game_configs
        .par_iter()
        .map(|gc| play_single_game(a, b, config, gc))
        .collect()
}

fn play_single_game(
    a: Difficulty,
    b: Difficulty,
    config: &MatchConfig,
    gc: &GameConfig,
) -> Result<MatchGame> {
    let (a_seed, b_seed) = seat_seeds(config, gc.game_index);
    let (one, two, seeds) = if gc.a_first {
        (a, b, [a_seed, b_seed])
    } else {
        (b, a, [b_seed, a_seed])
    };
    let outcome = play_game_with_seeds(one, two, config.max_turns, seeds)?;

    tracing::debug!(
        game = gc.game_index + 1,
        winner = ?outcome.winner,
        turns = outcome.turns,
        "game complete"
    );

    Ok(MatchGame {
        game_number: gc.game_index + 1,
        a_moved_first: gc.a_first,
        outcome,
    })
}

/// Seeds for seats A and B in game `game_index`.
///
/// Game `i` draws from `seed + 2i` and `seed + 2i + 1`, so no stream is
/// shared between seats or games. A seat's own seed overrides the derived one.
fn seat_seeds(config: &MatchConfig, game_index: usize) -> (u64, u64) {
    let offset = game_index as u64;
    let seed = config
        .seed
        .unwrap_or(42)
        .wrapping_add(offset.wrapping_mul(2));

    let a_seed = config.player_one.seed.map_or(seed, |s| s.wrapping_add(offset));
    let b_seed = config
        .player_two
        .seed
        .map_or(seed.wrapping_add(1), |s| s.wrapping_add(offset));
    (a_seed, b_seed)
}

/// Aggregate game results into match result
fn aggregate_results(a_level: u8, b_level: u8, games: Vec<MatchGame>) -> MatchResult {
    let a_wins = games.iter().filter(|g| g.a_won()).count() as u32;
    let b_wins = games.iter().filter(|g| g.b_won()).count() as u32;
    let draws = games.iter().filter(|g| g.outcome.is_draw()).count() as u32;
    let first_mover_wins = games
        .iter()
        .filter(|g| g.outcome.winner == Some(Player::One))
        .count() as u32;

    let total_turns: u32 = games.iter().map(|g| g.outcome.turns).sum();
    let games_played = games.len() as u32;
    let avg_turns = if games_played > 0 {
        total_turns as f32 / games_played as f32
    } else {
        0.0
    };

    MatchResult {
        a_level,
        b_level,
        a_wins,
        b_wins,
        first_mover_wins,
        draws,
        avg_turns,
        games_played,
        games,
    }
}
