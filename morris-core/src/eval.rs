//! Static position evaluation

use crate::board::{mills_through, Board, Position, CENTER_POSITIONS, CORNER_POSITIONS};
use crate::game::Player;

/// Bonus for a ring-joint point
pub const CENTER_BONUS: i32 = 2;

/// Bonus for a corner point
pub const CORNER_BONUS: i32 = 1;

/// Weight of each piece of material difference
pub const MATERIAL_WEIGHT: i32 = 10;

/// Value of point `pos` to `player`.
///
/// Centre and corner bonuses, plus one for every line through `pos` that still
/// has an empty point and already holds a `player` piece.
pub fn position_value(board: &Board, pos: Position, player: Player) -> i32 {
    let mut score = 0;

    if CENTER_POSITIONS.contains(&pos) {
        score += CENTER_BONUS;
    }
    if CORNER_POSITIONS.contains(&pos) {
        score += CORNER_BONUS;
    }

    let potential = mills_through(pos)
        .filter(|mill| {
            let empty = mill.iter().any(|&p| board.get(p).is_none());
            let own = mill.iter().any(|&p| board.is_owned_by(p, player));
            empty && own
        })
        .count();

    score + potential as i32
}

/// Material plus positional value of the whole board, from `player`'s side
pub fn board_value(board: &Board, player: Player) -> i32 {
    let own = board.count(player) as i32;
    let theirs = board.count(player.opponent()) as i32;

    let positional: i32 = board
        .positions_of(player)
        .map(|pos| position_value(board, pos, player))
        .sum();

    MATERIAL_WEIGHT * (own - theirs) + positional
}
