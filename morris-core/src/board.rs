//! Board topology and occupancy
//!
//! The board is a fixed graph of 24 points. Points are numbered row by row:
//!
//! ```text
//! 0----------1----------2
//! |          |          |
//! |   3------4------5   |
//! |   |      |      |   |
//! |   |  6---7---8  |   |
//! |   |  |       |  |   |
//! 9---10-11      15-16--17
//! |   |  |       |  |   |
//! |   |  18--19--20 |   |
//! |   |      |      |   |
//! |   21-----22-----23  |
//! |          |          |
//! 12---------13---------14
//! ```

use std::ops::{Deref, DerefMut};

use crate::game::Player;

/// A point on the board, in `0..NUM_POSITIONS`
pub type Position = usize;

/// Number of points on the board
pub const NUM_POSITIONS: usize = 24;

/// Number of mill lines
pub const NUM_MILLS: usize = 16;

/// Neighbours of each point. Symmetric: `b` is in `ADJACENCY[a]` iff `a` is in `ADJACENCY[b]`.
pub const ADJACENCY: [&[Position]; NUM_POSITIONS] = [
    &[1, 9],          // 0
    &[0, 2, 4],       // 1
    &[1, 14],         // 2
    &[4, 10],         // 3
    &[1, 3, 5, 7],    // 4
    &[4, 13],         // 5
    &[7, 11],         // 6
    &[4, 6, 8],       // 7
    &[7, 12],         // 8
    &[0, 10, 21],     // 9
    &[3, 9, 11, 18],  // 10
    &[6, 10, 15],     // 11
    &[8, 13, 17],     // 12
    &[5, 12, 14, 20], // 13
    &[2, 13, 23],     // 14
    &[11, 16],        // 15
    &[15, 17, 19],    // 16
    &[12, 16],        // 17
    &[10, 19],        // 18
    &[16, 18, 20, 22], // 19
    &[13, 19],        // 20
    &[9, 22],         // 21
    &[19, 21, 23],    // 22
    &[14, 22],        // 23
];

/// The three-in-a-row lines
pub const MILLS: [[Position; 3]; NUM_MILLS] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [9, 10, 11],
    [12, 13, 14],
    [15, 16, 17],
    [18, 19, 20],
    [21, 22, 23],
    // Left columns
    [0, 9, 21],
    [3, 10, 18],
    [6, 11, 15],
    // Middle columns
    [1, 4, 7],
    [16, 19, 22],
    // Right columns
    [8, 12, 17],
    [5, 13, 20],
    [2, 14, 23],
];

/// Ring-joint points favoured by the evaluator
pub const CENTER_POSITIONS: [Position; 8] = [9, 10, 11, 12, 13, 14, 15, 16];

/// Corner points favoured by the evaluator
pub const CORNER_POSITIONS: [Position; 8] = [0, 2, 6, 8, 16, 18, 22, 23];

/// Whether `pos` names a point on the board
#[inline]
pub fn is_valid(pos: Position) -> bool {
    pos < NUM_POSITIONS
}

/// Neighbours of `pos` (empty for an off-board index)
#[inline]
pub fn neighbors(pos: Position) -> &'static [Position] {
    ADJACENCY.get(pos).copied().unwrap_or(&[])
}

/// Whether `a` and `b` are joined by a line segment
#[inline]
pub fn are_adjacent(a: Position, b: Position) -> bool {
    neighbors(a).contains(&b)
}

/// Mill lines passing through `pos`
pub fn mills_through(pos: Position) -> impl Iterator<Item = &'static [Position; 3]> {
    MILLS.iter().filter(move |mill| mill.contains(&pos))
}

// ============================================================================
// BOARD
// ============================================================================

/// Occupancy of every point. Holds no rules; callers validate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Player>; NUM_POSITIONS],
}

impl Board {
    /// Empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from `(position, player)` pairs. Off-board positions are ignored.
    pub fn from_pieces(pieces: &[(Position, Player)]) -> Self {
        let mut board = Self::new();
        for &(pos, player) in pieces {
            if is_valid(pos) {
                board.set(pos, Some(player));
            }
        }
        board
    }

    /// Occupant of `pos`. Off-board positions read as empty.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Player> {
        self.cells.get(pos).copied().flatten()
    }

    /// Set the occupant of `pos`. Off-board positions are ignored.
    #[inline]
    pub fn set(&mut self, pos: Position, occupant: Option<Player>) {
        if let Some(cell) = self.cells.get_mut(pos) {
            *cell = occupant;
        }
    }

    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        is_valid(pos) && self.cells[pos].is_none()
    }

    #[inline]
    pub fn is_owned_by(&self, pos: Position, player: Player) -> bool {
        self.get(pos) == Some(player)
    }

    /// Number of points held by `player`
    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }

    /// Number of empty points
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Empty points in ascending order
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..NUM_POSITIONS).filter(move |&p| self.cells[p].is_none())
    }

    /// Points held by `player` in ascending order
    pub fn positions_of(&self, player: Player) -> impl Iterator<Item = Position> + '_ {
        (0..NUM_POSITIONS).filter(move |&p| self.cells[p] == Some(player))
    }

    /// Move whatever sits on `from` to `to`, leaving `from` empty
    pub fn relocate(&mut self, from: Position, to: Position) {
        let piece = self.get(from);
        self.set(from, None);
        self.set(to, piece);
    }

    /// Start a hypothetical edit. The board is restored when the guard drops.
    pub fn speculate(&mut self) -> Speculation<'_> {
        let saved = *self;
        Speculation { board: self, saved }
    }
}

/// Scoped hypothetical on a [`Board`]
///
/// Dereferences to the board being edited. On drop the board goes back to the
/// contents it had when the guard was created, whichever way the evaluation
/// exits. Guards nest.
#[derive(Debug)]
pub struct Speculation<'a> {
    board: &'a mut Board,
    saved: Board,
}

impl Deref for Speculation<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Speculation<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        *self.board = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_symmetric() {
        for a in 0..NUM_POSITIONS {
            for &b in neighbors(a) {
                assert!(neighbors(b).contains(&a), "{a} -> {b} has no way back");
            }
        }
    }

    #[test]
    fn test_every_point_has_two_mills() {
        for pos in 0..NUM_POSITIONS {
            assert_eq!(mills_through(pos).count(), 2, "point {pos}");
        }
    }

    #[test]
    fn test_counts() {
        let board = Board::from_pieces(&[(0, Player::One), (5, Player::One), (7, Player::Two)]);
        assert_eq!(board.count(Player::One), 2);
        assert_eq!(board.count(Player::Two), 1);
        assert_eq!(board.count_empty(), 21);
    }

    #[test]
    fn test_off_board_access() {
        let mut board = Board::new();
        board.set(24, Some(Player::One));
        assert_eq!(board.get(24), None);
        assert!(!board.is_empty(24));
        assert!(neighbors(99).is_empty());
    }

    #[test]
    fn test_relocate() {
        let mut board = Board::from_pieces(&[(4, Player::Two)]);
        board.relocate(4, 7);
        assert_eq!(board.get(4), None);
        assert_eq!(board.get(7), Some(Player::Two));
    }

    #[test]
    fn test_speculation_restores() {
        let mut board = Board::from_pieces(&[(0, Player::One)]);
        let before = board;
        {
            let mut trial = board.speculate();
            trial.set(0, None);
            trial.set(1, Some(Player::Two));
            {
                let mut inner = trial.speculate();
                inner.set(2, Some(Player::One));
                assert_eq!(inner.count(Player::One), 1);
            }
            assert_eq!(trial.get(2), None);
            assert_eq!(trial.get(1), Some(Player::Two));
        }
        assert_eq!(board, before);
    }
}
