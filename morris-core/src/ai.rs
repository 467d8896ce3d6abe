//! Difficulty-tiered AI
//!
//! Every tier is a single-ply scorer over the enumerated legal moves; the
//! strongest tier adds a look at the opponent's first few replies. Tiers are
//! rows of [`STRATEGIES`] rather than branches, so each rule set can be
//! checked on its own.

use std::fmt;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Position};
use crate::error::{MorrisError, Result};
use crate::eval::{board_value, position_value};
use crate::game::{GameState, Move, Phase, Player};
use crate::rules;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Completing an own mill
pub const MILL_SCORE: i32 = 100;

/// Occupying the point an opponent needs for a mill
pub const BLOCK_SCORE: i32 = 50;

/// Weight on the target point when placing
pub const PLACE_POSITION_WEIGHT: i32 = 5;

/// Weights on target and vacated point when sliding
pub const MOVE_TARGET_WEIGHT: i32 = 3;
pub const MOVE_SOURCE_WEIGHT: i32 = 2;

/// Weight on the target point when flying
pub const FLIGHT_TARGET_WEIGHT: i32 = 2;

/// Opponent replies examined by the threat check
pub const THREAT_SAMPLE: usize = 5;

/// Charged for each examined reply that completes an opponent mill
pub const THREAT_PENALTY: i32 = 30;

/// Removal weights: formed mills broken, point value, mobility taken away
pub const REMOVAL_MILL_SCORE: i32 = 50;
pub const REMOVAL_POSITION_WEIGHT: i32 = 3;
pub const REMOVAL_MOBILITY_WEIGHT: i32 = 2;

// ============================================================================
// DIFFICULTY
// ============================================================================

/// AI strength, 1 (random) to 5
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(MorrisError::InvalidDifficulty(level))
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Rule set for this level
    pub fn strategy(self) -> &'static Strategy {
        &STRATEGIES[usize::from(self.0 - Self::MIN)]
    }

    /// All levels, weakest first
    pub fn all() -> impl Iterator<Item = Difficulty> {
        (Self::MIN..=Self::MAX).map(Difficulty)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = MorrisError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.0)
    }
}

/// How candidates are picked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Uniform over legal candidates
    Random,
    /// First mill, else first block, else random
    Greedy,
    /// Highest weighted score, first wins ties
    Scored,
}

/// How the piece to take after a mill is picked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalPolicy {
    Random,
    /// Mills broken and point value
    Scored,
    /// As `Scored`, plus the opponent mobility the removal takes away
    ScoredWithMobility,
}

/// Rules one difficulty level plays by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strategy {
    pub selection: Selection,
    /// Add the board value after the candidate is committed
    pub lookahead: bool,
    /// Charge sliding moves for opponent replies that complete a mill
    pub threat_check: bool,
    pub removal: RemovalPolicy,
}

/// Strategy table, indexed by `level - 1`
pub const STRATEGIES: [Strategy; 5] = [
    Strategy {
        selection: Selection::Random,
        lookahead: false,
        threat_check: false,
        removal: RemovalPolicy::Random,
    },
    Strategy {
        selection: Selection::Greedy,
        lookahead: false,
        threat_check: false,
        removal: RemovalPolicy::Scored,
    },
    Strategy {
        selection: Selection::Scored,
        lookahead: false,
        threat_check: false,
        removal: RemovalPolicy::Scored,
    },
    Strategy {
        selection: Selection::Scored,
        lookahead: true,
        threat_check: false,
        removal: RemovalPolicy::ScoredWithMobility,
    },
    Strategy {
        selection: Selection::Scored,
        lookahead: true,
        threat_check: true,
        removal: RemovalPolicy::ScoredWithMobility,
    },
];

// ============================================================================
// AI PLAYER
// ============================================================================

/// AI opponent bound to one side of the board
#[derive(Clone, Debug)]
pub struct MorrisAI {
    difficulty: Difficulty,
    player: Player,
    rng: ChaCha8Rng,
}

impl MorrisAI {
    pub fn new(difficulty: Difficulty, player: Player) -> Self {
        Self {
            difficulty,
            player,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: Difficulty, player: Player, seed: u64) -> Self {
        Self {
            difficulty,
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn player(&self) -> Player {
        self.player
    }

    fn strategy(&self) -> &'static Strategy {
        self.difficulty.strategy()
    }

    /// Move for the side this AI plays, in its current phase.
    ///
    /// `None` when it is not this AI's turn, a removal is owed, or there is no
    /// legal move.
    pub fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        if state.current_player() != self.player || state.pending_removal().is_some() {
            return None;
        }

        let board = state.board();
        let phase = state.phase(self.player);
        let choice = match phase {
            Phase::Placing => self.choose_placement(board).map(Move::Place),
            Phase::Moving => self.choose_relocation(board),
            Phase::Flying => self.choose_flight(board),
        };

        tracing::debug!(
            player = ?self.player,
            difficulty = self.difficulty.level(),
            ?phase,
            ?choice,
            "ai move"
        );
        choice
    }

    /// Piece to take for the removal this AI owes
    pub fn choose_removal_for(&mut self, state: &GameState) -> Option<Position> {
        if state.pending_removal() != Some(self.player) {
            return None;
        }
        self.choose_removal(state.board())
    }

    // ========================================================================
    // PLACING
    // ========================================================================

    pub fn choose_placement(&mut self, board: &Board) -> Option<Position> {
        let candidates = rules::valid_placements(board);
        let me = self.player;
        let strategy = *self.strategy();

        let picked = match strategy.selection {
            Selection::Random => None,
            Selection::Greedy => candidates
                .iter()
                .copied()
                .find(|&pos| rules::completes_mill(board, pos, me))
                .or_else(|| {
                    candidates
                        .iter()
                        .copied()
                        .find(|&pos| rules::completes_mill(board, pos, me.opponent()))
                }),
            Selection::Scored => {
                let mut scratch = *board;
                let best = best_by(&candidates, |pos| {
                    score_placement(&mut scratch, me, &strategy, pos)
                });
                debug_assert_eq!(scratch, *board);
                best
            }
        };

        picked.or_else(|| candidates.choose(&mut self.rng).copied())
    }

    // ========================================================================
    // MOVING
    // ========================================================================

    pub fn choose_relocation(&mut self, board: &Board) -> Option<Move> {
        let candidates = rules::valid_relocations(board, self.player);
        let me = self.player;
        let strategy = *self.strategy();
        let mut scratch = *board;

        let picked = match strategy.selection {
            Selection::Random => None,
            Selection::Greedy => {
                let forms = |scratch: &mut Board, mv: Move, who: Player| {
                    let Move::Relocate { from, to } = mv else {
                        return false;
                    };
                    let mut trial = scratch.speculate();
                    trial.relocate(from, to);
                    if who == me {
                        rules::forms_mill(&trial, to, me)
                    } else {
                        rules::completes_mill(&trial, to, who)
                    }
                };
                candidates
                    .iter()
                    .copied()
                    .find(|&mv| forms(&mut scratch, mv, me))
                    .or_else(|| {
                        candidates
                            .iter()
                            .copied()
                            .find(|&mv| forms(&mut scratch, mv, me.opponent()))
                    })
            }
            Selection::Scored => best_by(&candidates, |mv| {
                score_relocation(&mut scratch, me, &strategy, mv)
            }),
        };
        debug_assert_eq!(scratch, *board);

        picked.or_else(|| candidates.choose(&mut self.rng).copied())
    }

    // ========================================================================
    // FLYING
    // ========================================================================

    pub fn choose_flight(&mut self, board: &Board) -> Option<Move> {
        let candidates = rules::valid_flights(board, self.player);
        let me = self.player;
        let strategy = *self.strategy();

        let picked = match strategy.selection {
            Selection::Random => None,
            Selection::Greedy | Selection::Scored => {
                let mut scratch = *board;
                let best = best_by(&candidates, |mv| score_flight(&mut scratch, me, &strategy, mv));
                debug_assert_eq!(scratch, *board);
                best
            }
        };

        picked.or_else(|| candidates.choose(&mut self.rng).copied())
    }

    // ========================================================================
    // REMOVAL
    // ========================================================================

    /// Opponent piece to take. Only pieces the removal rule allows are considered.
    pub fn choose_removal(&mut self, board: &Board) -> Option<Position> {
        let candidates = rules::removable_pieces(board, self.player.opponent()).ok()?;
        let me = self.player;
        let strategy = *self.strategy();

        let picked = match strategy.removal {
            RemovalPolicy::Random => None,
            RemovalPolicy::Scored | RemovalPolicy::ScoredWithMobility => {
                let mut scratch = *board;
                let best = best_by(&candidates, |pos| score_removal(&mut scratch, me, &strategy, pos));
                debug_assert_eq!(scratch, *board);
                best
            }
        };

        let choice = picked.or_else(|| candidates.choose(&mut self.rng).copied());
        tracing::debug!(player = ?me, difficulty = self.difficulty.level(), ?choice, "ai removal");
        choice
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// Highest-scoring candidate; the earliest wins ties
fn best_by<T: Copy + fmt::Debug>(candidates: &[T], mut score: impl FnMut(T) -> i32) -> Option<T> {
    let mut best: Option<(T, i32)> = None;
    for &candidate in candidates {
        let s = score(candidate);
        tracing::trace!(?candidate, score = s, "candidate");
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((candidate, s));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn score_placement(board: &mut Board, me: Player, strategy: &Strategy, pos: Position) -> i32 {
    let mut score = 0;
    if rules::completes_mill(board, pos, me) {
        score += MILL_SCORE;
    }
    if rules::completes_mill(board, pos, me.opponent()) {
        score += BLOCK_SCORE;
    }
    score += PLACE_POSITION_WEIGHT * position_value(board, pos, me);

    if strategy.lookahead {
        let mut trial = board.speculate();
        trial.set(pos, Some(me));
        score += board_value(&trial, me);
    }
    score
}

fn score_relocation(
    board: &mut Board,
    me: Player,
    strategy: &Strategy,
    mv: Move,
) -> i32 {
    let Move::Relocate { from, to } = mv else {
        return i32::MIN;
    };
    let mut trial = board.speculate();
    trial.relocate(from, to);

    let mut score = 0;
    if rules::forms_mill(&trial, to, me) {
        score += MILL_SCORE;
    }
    if rules::completes_mill(&trial, to, me.opponent()) {
        score += BLOCK_SCORE;
    }
    score += MOVE_TARGET_WEIGHT * position_value(&trial, to, me);
    score -= MOVE_SOURCE_WEIGHT * position_value(&trial, from, me);

    if strategy.lookahead {
        score += board_value(&trial, me);
    }
    if strategy.threat_check {
        score -= threat_penalty(&mut trial, me.opponent());
    }
    score
}

fn score_flight(board: &mut Board, me: Player, strategy: &Strategy, mv: Move) -> i32 {
    let Move::Relocate { from, to } = mv else {
        return i32::MIN;
    };
    let mut trial = board.speculate();
    trial.relocate(from, to);

    let mut score = 0;
    if rules::forms_mill(&trial, to, me) {
        score += MILL_SCORE;
    }
    score += FLIGHT_TARGET_WEIGHT * position_value(&trial, to, me);

    if strategy.lookahead {
        score += board_value(&trial, me);
    }
    score
}

/// Penalty for the first [`THREAT_SAMPLE`] opponent slides that complete a mill.
///
/// Only sliding replies are examined, even when the opponent is down to three
/// pieces.
pub fn threat_penalty(board: &mut Board, opponent: Player) -> i32 {
    let replies = rules::valid_relocations(board, opponent);
    let mut penalty = 0;
    for reply in replies.into_iter().take(THREAT_SAMPLE) {
        let Move::Relocate { from, to } = reply else {
            continue;
        };
        let mut trial = board.speculate();
        trial.relocate(from, to);
        if rules::forms_mill(&trial, to, opponent) {
            penalty += THREAT_PENALTY;
        }
    }
    penalty
}

fn score_removal(board: &mut Board, me: Player, strategy: &Strategy, pos: Position) -> i32 {
    let opponent = me.opponent();
    let broken = rules::mills_broken_by_removing(board, pos, opponent) as i32;
    let mut score = REMOVAL_MILL_SCORE * broken;
    score += REMOVAL_POSITION_WEIGHT * position_value(board, pos, me);

    if strategy.removal == RemovalPolicy::ScoredWithMobility {
        let with_piece = rules::mobility(board, opponent) as i32;
        let mut trial = board.speculate();
        trial.set(pos, None);
        let without_piece = rules::mobility(&trial, opponent) as i32;
        score += REMOVAL_MOBILITY_WEIGHT * (with_piece - without_piece);
    }
    score
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::NUM_POSITIONS;
    use Player::{One, Two};

    fn ai(level: u8, player: Player) -> MorrisAI {
        MorrisAI::with_seed(Difficulty::new(level).unwrap(), player, 7)
    }

    fn board(one: &[Position], two: &[Position]) -> Board {
        let mut pieces: Vec<(Position, Player)> = one.iter().map(|&p| (p, One)).collect();
        pieces.extend(two.iter().map(|&p| (p, Two)));
        Board::from_pieces(&pieces)
    }

    #[test]
    fn test_difficulty_bounds() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(6).is_err());
        assert_eq!(Difficulty::try_from(3u8).map(Difficulty::level), Ok(3));
        assert_eq!(Difficulty::all().count(), 5);
    }

    #[test]
    fn test_strategy_table() {
        let level = |l: u8| *Difficulty::new(l).unwrap().strategy();
        assert_eq!(level(1).selection, Selection::Random);
        assert_eq!(level(2).selection, Selection::Greedy);
        assert_eq!(level(3).selection, Selection::Scored);
        assert!(!level(3).lookahead);
        assert!(level(4).lookahead && !level(4).threat_check);
        assert!(level(5).lookahead && level(5).threat_check);
        assert_eq!(level(4).removal, RemovalPolicy::ScoredWithMobility);
    }

    #[test]
    fn test_single_placement_is_taken() {
        // Fill everything except point 5
        let pieces: Vec<(Position, Player)> = (0..NUM_POSITIONS)
            .filter(|&p| p != 5)
            .map(|p| (p, if p % 2 == 0 { One } else { Two }))
            .collect();
        let board = Board::from_pieces(&pieces);
        for seed in 0..10 {
            let mut ai = MorrisAI::with_seed(Difficulty::new(1).unwrap(), Two, seed);
            assert_eq!(ai.choose_placement(&board), Some(5));
        }
    }

    #[test]
    fn test_greedy_placement_completes_then_blocks() {
        let mut greedy = ai(2, One);
        assert_eq!(greedy.choose_placement(&board(&[0, 1], &[3, 4])), Some(2));
        assert_eq!(greedy.choose_placement(&board(&[0], &[3, 4])), Some(5));
    }

    #[test]
    fn test_scored_placement_prefers_mill() {
        for level in 3..=5 {
            let mut player = ai(level, One);
            assert_eq!(
                player.choose_placement(&board(&[0, 1], &[3, 4])),
                Some(2),
                "level {level}"
            );
        }
    }

    #[test]
    fn test_scored_placement_blocks() {
        let mut player = ai(3, Two);
        assert_eq!(player.choose_placement(&board(&[12, 13], &[0])), Some(14));
    }

    #[test]
    fn test_relocation_forms_mill() {
        let position = board(&[0, 1, 14, 20], &[9, 10, 13, 23]);
        for level in 2..=5 {
            let mut player = ai(level, One);
            assert_eq!(
                player.choose_relocation(&position),
                Some(Move::Relocate { from: 14, to: 2 }),
                "level {level}"
            );
        }
    }

    #[test]
    fn test_random_relocation_is_legal() {
        let position = board(&[0, 1, 14, 20], &[9, 10, 13, 23]);
        let legal = rules::valid_relocations(&position, One);
        let mut player = ai(1, One);
        for _ in 0..20 {
            let mv = player.choose_relocation(&position).unwrap();
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn test_threat_penalty() {
        // Two can slide 13 -> 5 to complete [3, 4, 5]
        let mut position = board(&[], &[3, 4, 13]);
        let before = position;
        assert_eq!(threat_penalty(&mut position, Two), THREAT_PENALTY);
        assert_eq!(position, before);
        assert_eq!(threat_penalty(&mut board(&[], &[3, 4, 20]), Two), 0);
    }

    #[test]
    fn test_threat_penalty_counts_slides_at_three_pieces() {
        // Two is down to three pieces but can still slide 13 -> 5 into [3, 4, 5]
        let mut position = board(&[0, 9, 21, 22], &[3, 4, 13]);
        assert_eq!(threat_penalty(&mut position, Two), THREAT_PENALTY);
    }

    #[test]
    fn test_lookahead_changes_placement() {
        // 9, 12, 14 and 16 tie on the plain score; placing on 9 fills
        // [9, 10, 11] and costs 10 its potential, 16 opens two fresh lines
        let position = board(&[10, 13], &[11]);
        assert_eq!(ai(3, One).choose_placement(&position), Some(9));
        for level in 4..=5 {
            assert_eq!(
                ai(level, One).choose_placement(&position),
                Some(16),
                "level {level}"
            );
        }
    }

    #[test]
    fn test_mobility_changes_removal() {
        // Neither piece is milled and both score zero without mobility.
        // Taking 4 removes two slides from Two, taking 3 removes none.
        let position = board(&[], &[3, 4]);
        for level in 2..=3 {
            assert_eq!(ai(level, One).choose_removal(&position), Some(3), "level {level}");
        }
        for level in 4..=5 {
            assert_eq!(ai(level, One).choose_removal(&position), Some(4), "level {level}");
        }
    }

    #[test]
    fn test_flight_forms_mill() {
        let position = board(&[0, 1, 20], &[9, 10, 13, 23]);
        for level in 2..=5 {
            let mut player = ai(level, One);
            assert_eq!(
                player.choose_flight(&position),
                Some(Move::Relocate { from: 20, to: 2 }),
                "level {level}"
            );
        }
    }

    #[test]
    fn test_removal_breaks_most_mills() {
        // Every Two piece is milled, 0 sits in two mills
        let position = board(&[], &[0, 1, 2, 9, 21]);
        for level in 2..=5 {
            let mut player = ai(level, One);
            assert_eq!(player.choose_removal(&position), Some(0), "level {level}");
        }
    }

    #[test]
    fn test_removal_respects_rule() {
        let position = board(&[5], &[0, 1, 2, 7]);
        for level in 1..=5 {
            let mut player = ai(level, One);
            assert_eq!(player.choose_removal(&position), Some(7), "level {level}");
        }
    }

    #[test]
    fn test_removal_with_empty_opponent() {
        let mut player = ai(3, One);
        assert_eq!(player.choose_removal(&board(&[0], &[])), None);
    }

    #[test]
    fn test_choose_move_by_phase() {
        let state = GameState::from_position(board(&[0, 1, 20], &[9, 10, 13, 23]), [9, 9], One);
        let mut player = ai(3, One);
        assert_eq!(
            player.choose_move(&state),
            Some(Move::Relocate { from: 20, to: 2 })
        );

        // Not Two's turn
        let mut other = ai(3, Two);
        assert_eq!(other.choose_move(&state), None);
    }

    #[test]
    fn test_choose_move_blocked() {
        let state = GameState::from_position(
            board(&[0, 2, 9, 3], &[1, 10, 21, 14, 4]),
            [9, 9],
            One,
        );
        let mut player = ai(5, One);
        assert_eq!(player.choose_move(&state), None);
    }

    #[test]
    fn test_seeded_ai_is_deterministic() {
        let position = Board::new();
        let mut a = ai(1, One);
        let mut b = ai(1, One);
        for _ in 0..10 {
            assert_eq!(a.choose_placement(&position), b.choose_placement(&position));
        }
    }
}
