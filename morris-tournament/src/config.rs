//! Configuration types for match play
//!
//! Level 4 - Utilities and configuration

use std::path::Path;

use anyhow::{Context, Result};
use morris_core::Difficulty;
use serde::{Deserialize, Serialize};

/// AI configuration for one seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Difficulty level, 1 to 5
    pub difficulty: u8,
    /// Random seed for reproducibility (None = derived from the match seed)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            difficulty: 3,
            seed: None,
        }
    }
}

impl AiConfig {
    /// Create config for a difficulty level
    pub fn level(difficulty: u8) -> Self {
        Self {
            difficulty,
            ..Default::default()
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validated difficulty
    pub fn difficulty(&self) -> Result<Difficulty> {
        Difficulty::new(self.difficulty).context("invalid AI configuration")
    }
}

/// Match configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// AI in the first seat (moves first in even-numbered games)
    pub player_one: AiConfig,
    /// AI in the second seat
    pub player_two: AiConfig,
    /// Number of games (seats alternate each game)
    pub games: usize,
    /// Turns after which a game is scored a draw
    pub max_turns: u32,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Base seed; game `i` uses `seed + i`
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_one: AiConfig::default(),
            player_two: AiConfig::default(),
            games: 10,
            max_turns: 400,
            parallel: true,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Match between two difficulty levels
    pub fn between(one: u8, two: u8) -> Self {
        Self {
            player_one: AiConfig::level(one),
            player_two: AiConfig::level(two),
            ..Default::default()
        }
    }

    /// Set number of games
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    /// Set base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match config: {}", path.display()))?;
        let config: MatchConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse match config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject difficulties outside 1..=5
    pub fn validate(&self) -> Result<()> {
        self.player_one.difficulty().context("player_one")?;
        self.player_two.difficulty().context("player_two")?;
        Ok(())
    }
}

/// Round-robin configuration across difficulty levels
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    /// Participating levels
    pub levels: Vec<u8>,
    /// Games per pairing (should be even for seat alternation)
    pub games_per_pair: usize,
    /// Turns after which a game is scored a draw
    pub max_turns: u32,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Base seed
    pub seed: Option<u64>,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            levels: Difficulty::all().map(Difficulty::level).collect(),
            games_per_pair: 10,
            max_turns: 400,
            parallel: true,
            seed: None,
        }
    }
}

impl LadderConfig {
    /// Reject difficulties outside 1..=5
    pub fn validate(&self) -> Result<()> {
        for &level in &self.levels {
            Difficulty::new(level).context("ladder level")?;
        }
        Ok(())
    }

    /// Match configuration for one pairing
    pub fn pairing(&self, one: u8, two: u8) -> MatchConfig {
        MatchConfig {
            player_one: AiConfig::level(one),
            player_two: AiConfig::level(two),
            games: self.games_per_pair,
            max_turns: self.max_turns,
            parallel: self.parallel,
            seed: self.seed,
        }
    }
}
