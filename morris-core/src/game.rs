//! Game state, phases and turn order

use serde::Serialize;

use crate::board::{self, Board, Position};
use crate::error::{MorrisError, Result};
use crate::rules::{self, FLYING_THRESHOLD, PIECES_PER_PLAYER};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player identity. `One` moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Phase of play for one player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Placing,
    Moving,
    Flying,
}

/// A single action on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Move {
    Place(Position),
    Relocate { from: Position, to: Position },
}

impl Move {
    /// Point the moved or placed piece ends up on
    pub fn target(self) -> Position {
        match self {
            Move::Place(pos) => pos,
            Move::Relocate { to, .. } => to,
        }
    }
}

/// Per-player piece bookkeeping
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerState {
    /// Pieces put on the board so far, capped at 9
    pub pieces_placed: u8,
    /// Pieces currently on the board
    pub pieces_on_board: u8,
}

impl PlayerState {
    pub fn pieces_in_hand(&self) -> u8 {
        PIECES_PER_PLAYER - self.pieces_placed
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Complete game position: board, counters, side to move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    players: [PlayerState; 2],
    current_player: Player,
    /// Set after a mill until the owed piece is taken
    pending_removal: Option<Player>,
    /// Completed turns
    turn: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty board, `Player::One` to place
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            players: [PlayerState::default(); 2],
            current_player: Player::One,
            pending_removal: None,
            turn: 0,
        }
    }

    /// Resume from an arbitrary board. Placement counters are taken as given;
    /// on-board counts are read from the board.
    pub fn from_position(board: Board, placed: [u8; 2], to_move: Player) -> Self {
        let mut players = [PlayerState::default(); 2];
        for player in [Player::One, Player::Two] {
            let state = &mut players[player.index()];
            state.pieces_placed = placed[player.index()].min(PIECES_PER_PLAYER);
            state.pieces_on_board = board.count(player) as u8;
        }
        Self {
            board,
            players,
            current_player: to_move,
            pending_removal: None,
            turn: 0,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn player_state(&self, player: Player) -> PlayerState {
        self.players[player.index()]
    }

    /// Completed turns so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Player who owes a removal, if a mill was just formed
    pub fn pending_removal(&self) -> Option<Player> {
        self.pending_removal
    }

    /// Whether either player still has pieces in hand
    pub fn is_placing_stage(&self) -> bool {
        self.players.iter().any(|p| p.pieces_placed < PIECES_PER_PLAYER)
    }

    /// Phase for `player`, derived from the counters
    pub fn phase(&self, player: Player) -> Phase {
        if self.is_placing_stage() {
            Phase::Placing
        } else if self.board.count(player) == FLYING_THRESHOLD {
            Phase::Flying
        } else {
            Phase::Moving
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.phase(self.current_player)
    }

    /// Legal moves for the side to move (empty while a removal is owed or after the game ends)
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.pending_removal.is_some() || self.winner().is_some() {
            return Vec::new();
        }
        rules::legal_moves(&self.board, self.current_player, self.current_phase())
    }

    /// Winner, if the game has ended.
    ///
    /// Only decided once placing is over: a player reduced below three
    /// pieces loses, and so does the side to move when it has no move.
    pub fn winner(&self) -> Option<Player> {
        if self.is_placing_stage() || self.pending_removal.is_some() {
            return None;
        }
        for player in [self.current_player, self.current_player.opponent()] {
            if self.board.count(player) < FLYING_THRESHOLD {
                return Some(player.opponent());
            }
        }
        if !rules::can_move(&self.board, self.current_player) {
            return Some(self.current_player.opponent());
        }
        None
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    // ========================================================================
    // APPLY
    // ========================================================================

    /// Put a piece from hand on `pos`. Returns whether a removal is now owed.
    pub fn apply_placement(&mut self, pos: Position, player: Player) -> Result<bool> {
        self.check_can_act(player)?;
        let phase = self.phase(player);
        if phase != Phase::Placing || self.player_state(player).pieces_placed >= PIECES_PER_PLAYER {
            return Err(MorrisError::WrongPhase { player, phase });
        }
        if !board::is_valid(pos) || !self.board.is_empty(pos) {
            return Err(MorrisError::InvalidPosition(pos));
        }

        self.board.set(pos, Some(player));
        let state = &mut self.players[player.index()];
        state.pieces_placed += 1;
        state.pieces_on_board += 1;

        Ok(self.finish_move(pos, player))
    }

    /// Slide or fly a piece. Returns whether a removal is now owed.
    pub fn apply_relocation(&mut self, from: Position, to: Position, player: Player) -> Result<bool> {
        self.check_can_act(player)?;
        let phase = self.phase(player);
        if phase == Phase::Placing {
            return Err(MorrisError::WrongPhase { player, phase });
        }
        if !board::is_valid(from) || !self.board.is_owned_by(from, player) {
            return Err(MorrisError::InvalidPosition(from));
        }
        if !board::is_valid(to) || !self.board.is_empty(to) {
            return Err(MorrisError::InvalidPosition(to));
        }
        if !rules::is_legal_relocation(&self.board, player, phase, from, to) {
            return Err(MorrisError::IllegalMove { from, to });
        }

        self.board.relocate(from, to);
        Ok(self.finish_move(to, player))
    }

    /// Apply either kind of move
    pub fn apply_move(&mut self, mv: Move, player: Player) -> Result<bool> {
        match mv {
            Move::Place(pos) => self.apply_placement(pos, player),
            Move::Relocate { from, to } => self.apply_relocation(from, to, player),
        }
    }

    /// Pieces that may be taken for the owed removal
    pub fn resolve_mill(&self) -> Result<Vec<Position>> {
        let player = self.pending_removal.ok_or(MorrisError::NoRemovalPending)?;
        rules::removable_pieces(&self.board, player.opponent())
    }

    /// Take an opponent piece after a mill, then pass the turn
    pub fn remove_piece(&mut self, pos: Position) -> Result<()> {
        let player = self.pending_removal.ok_or(MorrisError::NoRemovalPending)?;
        let opponent = player.opponent();
        let removable = rules::removable_pieces(&self.board, opponent)?;
        if !removable.contains(&pos) {
            return Err(MorrisError::InvalidPosition(pos));
        }

        self.board.set(pos, None);
        let state = &mut self.players[opponent.index()];
        state.pieces_on_board = state.pieces_on_board.saturating_sub(1);
        tracing::debug!(?player, pos, "piece removed");

        self.pending_removal = None;
        self.end_turn();
        Ok(())
    }

    fn check_can_act(&self, player: Player) -> Result<()> {
        if self.pending_removal.is_some() {
            return Err(MorrisError::RemovalPending);
        }
        if self.winner().is_some() {
            return Err(MorrisError::GameOver);
        }
        if player != self.current_player {
            return Err(MorrisError::OutOfTurn(player));
        }
        Ok(())
    }

    /// Either owe a removal or pass the turn
    fn finish_move(&mut self, target: Position, player: Player) -> bool {
        if !rules::forms_mill(&self.board, target, player) {
            self.end_turn();
            return false;
        }

        tracing::debug!(?player, target, "mill formed");
        if self.board.count(player.opponent()) == 0 {
            tracing::debug!(?player, "mill formed but opponent has nothing to remove");
            self.end_turn();
            return false;
        }

        self.pending_removal = Some(player);
        true
    }

    fn end_turn(&mut self) {
        self.current_player = self.current_player.opponent();
        self.turn += 1;
    }
}

// ============================================================================
// TESTS
// ============================================================================
