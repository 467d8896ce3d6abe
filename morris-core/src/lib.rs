//! Morris Core - rules engine and AI for Nine Men's Morris
//!
//! This crate provides the core game logic:
//! - Board topology (24 points, adjacency, 16 mill lines) and occupancy
//! - Move generation for placing, moving and flying
//! - Mill detection and the removal rule
//! - Phase and turn state machine
//! - Static position evaluation
//! - Difficulty-tiered AI (levels 1 to 5)

pub mod board;
pub mod error;
pub mod game;
pub mod rules;
pub mod eval;
pub mod ai;

// Re-exports for convenient access
pub use board::{Board, Position, Speculation, ADJACENCY, MILLS, NUM_POSITIONS};
pub use error::{MorrisError, Result};
pub use game::{GameState, Move, Phase, Player, PlayerState};
pub use rules::{
    can_move, forms_mill, legal_moves, removable_pieces, valid_flights, valid_placements,
    valid_relocations, PIECES_PER_PLAYER,
};
pub use eval::{board_value, position_value};
pub use ai::{Difficulty, MorrisAI, Strategy};
