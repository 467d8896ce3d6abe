//! Move generation, mill detection and the removal rule
//!
//! Every function here is a pure query over a [`Board`]. Enumeration order is
//! ascending by source point, then by destination in adjacency (or ascending)
//! order; the AI relies on it for tie-breaking.

use crate::board::{self, mills_through, Board, Position, NUM_POSITIONS};
use crate::error::{MorrisError, Result};
use crate::game::{Move, Phase, Player};

/// Pieces each player brings to the game
pub const PIECES_PER_PLAYER: u8 = 9;

/// Piece count at which a player starts flying (and below which they lose)
pub const FLYING_THRESHOLD: usize = 3;

// ============================================================================
// MOVE GENERATION
// ============================================================================

/// All empty points
pub fn valid_placements(board: &Board) -> Vec<Position> {
    board.empty_positions().collect()
}

/// Slides along a line to an empty neighbour
pub fn valid_relocations(board: &Board, player: Player) -> Vec<Move> {
    let mut moves = Vec::new();
    for from in board.positions_of(player) {
        for &to in board::neighbors(from) {
            if board.is_empty(to) {
                moves.push(Move::Relocate { from, to });
            }
        }
    }
    moves
}

/// Every own piece to every empty point
pub fn valid_flights(board: &Board, player: Player) -> Vec<Move> {
    let empty: Vec<Position> = board.empty_positions().collect();
    board
        .positions_of(player)
        .flat_map(|from| empty.iter().map(move |&to| Move::Relocate { from, to }))
        .collect()
}

/// Legal moves for `player` in `phase`
pub fn legal_moves(board: &Board, player: Player, phase: Phase) -> Vec<Move> {
    match phase {
        Phase::Placing => board.empty_positions().map(Move::Place).collect(),
        Phase::Moving => valid_relocations(board, player),
        Phase::Flying => valid_flights(board, player),
    }
}

/// Number of sliding moves available to `player`
pub fn mobility(board: &Board, player: Player) -> usize {
    board
        .positions_of(player)
        .map(|from| board::neighbors(from).iter().filter(|&&to| board.is_empty(to)).count())
        .sum()
}

/// Whether `player` has any way to move, flying included
pub fn can_move(board: &Board, player: Player) -> bool {
    if board.count(player) == FLYING_THRESHOLD {
        return board.count_empty() > 0;
    }
    board
        .positions_of(player)
        .any(|from| board::neighbors(from).iter().any(|&to| board.is_empty(to)))
}

// ============================================================================
// MILLS
// ============================================================================

/// True iff some line through `pos` is entirely held by `player` on the current board
pub fn forms_mill(board: &Board, pos: Position, player: Player) -> bool {
    mills_through(pos).any(|mill| mill.iter().all(|&p| board.is_owned_by(p, player)))
}

/// True iff putting a `player` piece on `pos` would complete a line.
/// The current occupant of `pos` is ignored.
pub fn completes_mill(board: &Board, pos: Position, player: Player) -> bool {
    mills_through(pos).any(|mill| {
        mill.iter()
            .filter(|&&p| p != pos)
            .all(|&p| board.is_owned_by(p, player))
    })
}

/// Whether the piece on `pos` currently sits in a formed mill of its owner
pub fn is_in_mill(board: &Board, pos: Position) -> bool {
    board
        .get(pos)
        .is_some_and(|owner| forms_mill(board, pos, owner))
}

/// Formed mills of `player` that include `pos`
pub fn mills_broken_by_removing(board: &Board, pos: Position, player: Player) -> usize {
    mills_through(pos)
        .filter(|mill| {
            mill.iter()
                .filter(|&&p| p != pos)
                .all(|&p| board.is_owned_by(p, player))
        })
        .count()
}

// ============================================================================
// REMOVAL
// ============================================================================

/// Pieces of `opponent` that may be taken after a mill.
///
/// Pieces outside mills first; if every piece is in a mill, all of them.
pub fn removable_pieces(board: &Board, opponent: Player) -> Result<Vec<Position>> {
    let owned: Vec<Position> = board.positions_of(opponent).collect();
    if owned.is_empty() {
        return Err(MorrisError::NothingToRemove(opponent));
    }

    let loose: Vec<Position> = owned
        .iter()
        .copied()
        .filter(|&p| !forms_mill(board, p, opponent))
        .collect();

    Ok(if loose.is_empty() { owned } else { loose })
}

/// Whether `pos` is a legal target for a relocation by `player` in `phase`
pub fn is_legal_relocation(
    board: &Board,
    player: Player,
    phase: Phase,
    from: Position,
    to: Position,
) -> bool {
    if from >= NUM_POSITIONS || to >= NUM_POSITIONS {
        return false;
    }
    if !board.is_owned_by(from, player) || !board.is_empty(to) {
        return false;
    }
    match phase {
        Phase::Placing => false,
        Phase::Moving => board::are_adjacent(from, to),
        Phase::Flying => true,
    }
}
