//! Integration tests for the Morris engine and match runner
//!
//! Tests the full stack: rules, game state machine, AI levels and match play

use morris_core::{
    board::are_adjacent, removable_pieces, Board, Difficulty, GameState, MorrisAI, MorrisError,
    Move, Phase, Player, PIECES_PER_PLAYER,
};
use morris_tournament::{play_game_seeded, play_match, run_ladder, LadderConfig, MatchConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn level(l: u8) -> Difficulty {
    Difficulty::new(l).unwrap()
}

/// Pieces on board plus pieces captured must equal pieces placed
fn check_invariants(state: &GameState, captured: [u8; 2]) {
    for (i, player) in [Player::One, Player::Two].into_iter().enumerate() {
        let ps = state.player_state(player);
        assert!(ps.pieces_placed <= PIECES_PER_PLAYER);
        assert_eq!(ps.pieces_on_board as usize, state.board().count(player));
        assert_eq!(ps.pieces_on_board + captured[i], ps.pieces_placed);
    }
}

/// Drive one game by hand through GameState and MorrisAI, checking every turn
fn play_checked(one: Difficulty, two: Difficulty, seed: u64, max_turns: u32) -> GameState {
    let mut state = GameState::new();
    let mut ais = [
        MorrisAI::with_seed(one, Player::One, seed),
        MorrisAI::with_seed(two, Player::Two, seed + 1),
    ];
    let mut captured = [0u8; 2];

    while !state.is_over() && state.turn() < max_turns {
        let player = state.current_player();
        let legal = state.legal_moves();
        let ai = &mut ais[player as usize];
        let before = *state.board();

        let mv = ai.choose_move(&state).expect("side to move has a move");
        assert_eq!(*state.board(), before, "choosing must not touch the board");
        assert!(legal.contains(&mv), "{:?} not legal for {:?}", mv, player);
        if let Move::Relocate { from, to } = mv {
            if state.phase(player) == Phase::Moving {
                assert!(are_adjacent(from, to));
            }
        }

        if state.apply_move(mv, player).unwrap() {
            let allowed = removable_pieces(state.board(), player.opponent()).unwrap();
            let target = ai.choose_removal_for(&state).expect("mill owes a removal");
            assert!(allowed.contains(&target));
            state.remove_piece(target).unwrap();
            captured[player.opponent() as usize] += 1;
        }

        check_invariants(&state, captured);
        assert_ne!(state.current_player(), player);
    }
    state
}

// ============================================================================
// FULL GAMES
// ============================================================================

#[test]
fn test_full_games_keep_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..6 {
        let one = level(rng.gen_range(1..=5));
        let two = level(rng.gen_range(1..=5));
        let seed = rng.gen::<u32>() as u64;
        play_checked(one, two, seed, 300);
    }
}

#[test]
fn test_finished_game_has_reduced_or_blocked_loser() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..10 {
        let state = play_checked(level(5), level(1), rng.gen::<u32>() as u64, 400);
        if let Some(winner) = state.winner() {
            let loser = winner.opponent();
            let reduced = state.board().count(loser) < 3;
            let blocked = state.current_player() == loser && state.legal_moves().is_empty();
            assert!(reduced || blocked);
            assert!(!state.is_placing_stage());
        }
    }
}

#[test]
fn test_placing_lasts_eighteen_turns_without_win() {
    let state = play_checked(level(2), level(2), 99, 18);
    assert_eq!(state.turn(), 18);
    assert!(!state.is_placing_stage());
    assert_eq!(state.player_state(Player::One).pieces_placed, 9);
    assert_eq!(state.player_state(Player::Two).pieces_placed, 9);
}

#[test]
fn test_runner_matches_manual_replay() {
    let outcome = play_game_seeded(level(3), level(4), 200, 31).unwrap();

    let mut state = GameState::new();
    for record in &outcome.moves {
        assert_eq!(record.player, state.current_player());
        let formed = state.apply_move(record.mv, record.player).unwrap();
        assert_eq!(formed, record.removed.is_some());
        if let Some(pos) = record.removed {
            state.remove_piece(pos).unwrap();
        }
    }
    assert_eq!(state.turn(), outcome.turns);
    assert_eq!(state.winner(), outcome.winner);
}

// ============================================================================
// STATE MACHINE ERRORS
// ============================================================================

#[test]
fn test_out_of_turn_rejected() {
    let mut state = GameState::new();
    assert_eq!(
        state.apply_placement(0, Player::Two),
        Err(MorrisError::OutOfTurn(Player::Two))
    );
}

#[test]
fn test_pending_removal_blocks_moves() {
    let board = Board::from_pieces(&[
        (0, Player::One),
        (1, Player::One),
        (10, Player::Two),
        (11, Player::Two),
    ]);
    let mut state = GameState::from_position(board, [2, 2], Player::One);

    assert!(state.apply_placement(2, Player::One).unwrap());
    assert_eq!(state.pending_removal(), Some(Player::One));
    assert!(state.legal_moves().is_empty());
    assert_eq!(
        state.apply_placement(5, Player::One),
        Err(MorrisError::RemovalPending)
    );

    state.remove_piece(10).unwrap();
    assert_eq!(state.current_player(), Player::Two);
    assert_eq!(state.player_state(Player::Two).pieces_on_board, 1);
}

// ============================================================================
// MATCH PLAY
// ============================================================================

#[test]
fn test_match_is_reproducible() {
    let config = MatchConfig::between(1, 5).with_games(4).with_seed(12);
    let first = play_match(&config).unwrap();
    let second = play_match(&config).unwrap();

    assert_eq!(first.a_wins, second.a_wins);
    assert_eq!(first.b_wins, second.b_wins);
    assert_eq!(first.avg_turns, second.avg_turns);
}

#[test]
fn test_ladder_standings_sorted() {
    let config = LadderConfig {
        levels: vec![1, 2, 5],
        games_per_pair: 2,
        max_turns: 150,
        parallel: true,
        seed: Some(3),
    };
    let result = run_ladder(&config).unwrap();

    assert_eq!(result.matches.len(), 3);
    for pair in result.standings.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    let total_score: f32 = result.standings.iter().map(|s| s.score).sum();
    assert_eq!(total_score, 6.0);
}
