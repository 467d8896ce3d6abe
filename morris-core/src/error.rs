//! Error taxonomy for rule violations

use crate::board::Position;
use crate::game::{Phase, Player};

/// Reasons a request against the rules engine is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MorrisError {
    /// Off the board, or not an acceptable target for this request
    #[error("invalid position {0}")]
    InvalidPosition(Position),

    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Position, to: Position },

    #[error("{0:?} has no legal moves")]
    NoLegalMoves(Player),

    #[error("{0:?} has no pieces to remove")]
    NothingToRemove(Player),

    #[error("it is not {0:?}'s turn")]
    OutOfTurn(Player),

    #[error("{player:?} cannot do that during the {phase:?} phase")]
    WrongPhase { player: Player, phase: Phase },

    #[error("a piece must be removed before the next move")]
    RemovalPending,

    #[error("no mill was formed, nothing may be removed")]
    NoRemovalPending,

    #[error("the game is over")]
    GameOver,

    #[error("difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),
}

pub type Result<T> = std::result::Result<T, MorrisError>;
