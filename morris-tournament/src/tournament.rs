//! Difficulty ladder - round robin between AI levels
//!
//! Level 1 - Orchestration and Level 2 - Phases

use morris_core::Result;
use serde::Serialize;

use crate::config::LadderConfig;
use crate::match_play::{play_match, MatchResult};

/// Standing of one difficulty level
#[derive(Clone, Debug, Serialize)]
pub struct Standing {
    pub level: u8,
    /// Total score (wins + 0.5 * draws)
    pub score: f32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
}

impl Standing {
    fn new(level: u8) -> Self {
        Self {
            level,
            score: 0.0,
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
        }
    }

    /// Win rate
    pub fn win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f32 / self.games_played as f32
        }
    }

    /// Normalized score (0.0 to 1.0)
    pub fn normalized_score(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.score / self.games_played as f32
        }
    }
}

/// Result of a ladder run
#[derive(Clone, Debug, Serialize)]
pub struct LadderResult {
    /// Final standings sorted by score (descending)
    pub standings: Vec<Standing>,
    /// Every pairing played
    pub matches: Vec<MatchResult>,
}

impl LadderResult {
    /// Top standing
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// Get standing for a level
    pub fn standing_for(&self, level: u8) -> Option<&Standing> {
        self.standings.iter().find(|s| s.level == level)
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run the ladder: every level plays every other level once
pub fn run_ladder(config: &LadderConfig) -> Result<LadderResult> {
    let pairings = generate_round_robin_pairings(&config.levels);
    let mut matches = Vec::with_capacity(pairings.len());

    for (a, b) in pairings {
        tracing::info!(a, b, games = config.games_per_pair, "ladder pairing");
        matches.push(play_match(&config.pairing(a, b))?);
    }

    let standings = compute_standings(&config.levels, &matches);
    Ok(LadderResult { standings, matches })
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// All unordered pairs of distinct levels
fn generate_round_robin_pairings(levels: &[u8]) -> Vec<(u8, u8)> {
    let mut pairings = Vec::new();
    for (i, &a) in levels.iter().enumerate() {
        for &b in &levels[i + 1..] {
            pairings.push((a, b));
        }
    }
    pairings
}

/// Sum match results per level and sort by score
fn compute_standings(levels: &[u8], matches: &[MatchResult]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = levels.iter().map(|&l| Standing::new(l)).collect();

    for result in matches {
        let sides = [
            (result.a_level, result.a_wins, result.b_wins),
            (result.b_level, result.b_wins, result.a_wins),
        ];
        for (level, wins, losses) in sides {
            if let Some(s) = standings.iter_mut().find(|s| s.level == level) {
                s.wins += wins;
                s.losses += losses;
                s.draws += result.draws;
                s.games_played += result.games_played;
                s.score += wins as f32 + 0.5 * result.draws as f32;
            }
        }
    }

    standings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    standings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_pairings() {
        let pairings = generate_round_robin_pairings(&[1, 2, 3, 4]);
        assert_eq!(pairings.len(), 6);
        assert!(pairings.contains(&(1, 4)));
        assert!(!pairings.iter().any(|(a, b)| a == b));
    }

    #[test]
    fn test_compute_standings() {
        let mut m = MatchResult::empty(1, 3);
        m.a_wins = 1;
        m.b_wins = 7;
        m.draws = 2;
        m.games_played = 10;

        let standings = compute_standings(&[1, 3], &[m]);
        assert_eq!(standings[0].level, 3);
        assert_eq!(standings[0].score, 8.0);
        assert_eq!(standings[1].score, 2.0);
        assert_eq!(standings[1].losses, 7);
        assert_eq!(standings[0].games_played, 10);
    }

    #[test]
    fn test_small_ladder() {
        let config = LadderConfig {
            levels: vec![1, 3],
            games_per_pair: 2,
            max_turns: 100,
            parallel: false,
            seed: Some(1),
        };
        let result = run_ladder(&config).unwrap();
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.standings.len(), 2);
        let total: u32 = result.standings.iter().map(|s| s.games_played).sum();
        assert_eq!(total, 4);
        assert!(result.standing_for(3).is_some());
    }
}
