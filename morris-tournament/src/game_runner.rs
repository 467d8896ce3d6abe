//! Game runner - executes single AI-vs-AI games
//!
//! Level 3 - Step-level implementation

use morris_core::{Difficulty, GameState, MorrisAI, MorrisError, Move, Player, Position, Result};
use serde::Serialize;

/// Why a game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EndReason {
    /// Loser was left with fewer than three pieces
    OpponentReduced,
    /// Loser had no legal move on their turn
    OpponentBlocked,
    /// Turn cap reached, scored as a draw
    TurnLimit,
}

/// One completed turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub player: Player,
    pub mv: Move,
    /// Opponent piece taken after a mill
    pub removed: Option<Position>,
}

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    /// Winner (None for draw)
    pub winner: Option<Player>,
    pub reason: EndReason,
    /// Number of turns played
    pub turns: u32,
    /// Move history
    pub moves: Vec<TurnRecord>,
}

impl GameOutcome {
    /// Check if the game is a draw (turn cap reached)
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// Mills formed during the game
    pub fn mills(&self) -> usize {
        self.moves.iter().filter(|t| t.removed.is_some()).count()
    }
}

/// Game runner that plays games between two difficulty levels
#[derive(Clone, Debug)]
pub struct GameRunner {
    /// Turns after which a game is a draw
    max_turns: u32,
    /// Random seed counter
    seed_counter: u64,
}

impl GameRunner {
    /// Create a new game runner
    pub fn new(max_turns: u32, seed: Option<u64>) -> Self {
        Self {
            max_turns,
            seed_counter: seed.unwrap_or(42),
        }
    }

    /// Play a single game, `one` moving first
    pub fn play_game(&mut self, one: Difficulty, two: Difficulty) -> Result<GameOutcome> {
        let seed = self.next_seed();
        play_game_seeded(one, two, self.max_turns, seed)
    }

    /// Get next seed and increment counter
    fn next_seed(&mut self) -> u64 {
        let seed = self.seed_counter;
        self.seed_counter = self.seed_counter.wrapping_add(1);
        seed
    }

    /// Reset seed counter
    pub fn reset_seed(&mut self, seed: u64) {
        self.seed_counter = seed;
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }
}

/// Play one game to completion or the turn cap.
///
/// Each turn: check for a winner, let the side to move choose, apply it, and
/// on a mill let the same side choose and take a piece.
pub fn play_game_seeded(
    one: Difficulty,
    two: Difficulty,
    max_turns: u32,
    seed: u64,
) -> Result<GameOutcome> {
    play_game_with_seeds(one, two, max_turns, [seed, seed.wrapping_add(1)])
}

/// Play one game with an explicit seed per seat
pub fn play_game_with_seeds(
    one: Difficulty,
    two: Difficulty,
    max_turns: u32,
    seeds: [u64; 2],
) -> Result<GameOutcome> {
    let mut state = GameState::new();
    let mut ais = [
        MorrisAI::with_seed(one, Player::One, seeds[0]),
        MorrisAI::with_seed(two, Player::Two, seeds[1]),
    ];
    let mut moves = Vec::new();

    let (winner, reason) = loop {
        if let Some(winner) = state.winner() {
            let reason = if state.board().count(winner.opponent()) < 3 {
                EndReason::OpponentReduced
            } else {
                EndReason::OpponentBlocked
            };
            break (Some(winner), reason);
        }
        if state.turn() >= max_turns {
            tracing::warn!(turns = state.turn(), "turn limit reached, scoring a draw");
            break (None, EndReason::TurnLimit);
        }

        let player = state.current_player();
        let ai = &mut ais[player as usize];
        let mv = ai
            .choose_move(&state)
            .ok_or(MorrisError::NoLegalMoves(player))?;

        let removed = if state.apply_move(mv, player)? {
            let target = ai
                .choose_removal_for(&state)
                .ok_or(MorrisError::NothingToRemove(player.opponent()))?;
            state.remove_piece(target)?;
            Some(target)
        } else {
            None
        };

        moves.push(TurnRecord { player, mv, removed });
    };

    tracing::debug!(?winner, ?reason, turns = state.turn(), "game finished");

    Ok(GameOutcome {
        winner,
        reason,
        turns: state.turn(),
        moves,
    })
}
