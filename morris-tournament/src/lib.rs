//! Morris Tournament - headless AI-vs-AI play
//!
//! This crate provides match infrastructure:
//! - Single games run to a result or a turn cap
//! - Matches between two difficulty levels with seat alternation
//! - A round-robin ladder across levels
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_ladder (orchestration)
//! - Level 2: play_match (phases)
//! - Level 3: play_game_seeded (steps)
//! - Level 4: configuration

mod config;
mod game_runner;
mod match_play;
mod tournament;

pub use config::{AiConfig, LadderConfig, MatchConfig};
pub use game_runner::{
    play_game_seeded, play_game_with_seeds, EndReason, GameOutcome, GameRunner, TurnRecord,
};
pub use match_play::{play_match, MatchGame, MatchResult};
pub use tournament::{run_ladder, LadderResult, Standing};
