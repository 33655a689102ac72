//! Integration tests for NEUTRALTOE
//!
//! Tests the full stack: rule engine, AI, and game sessions

use neutraltoe_core::{
    apply_move, detect_winner, is_legal_move, self_play, Board, Cell, EngineConfig, EngineError,
    Game, GameState, MinimaxAI, Players, Side, Violation, BLOCK_SCORE, BOARD_SIZE, LINES,
    WIN_SCORE,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

/// Boards covering every mix of empty, X and O cells at each position
fn sample_boards() -> Vec<Board> {
    let cells = [Cell::Empty, Cell::X, Cell::O];
    (0..27u32)
        .map(|n| {
            let mut out = [Cell::Empty; BOARD_SIZE];
            for (i, slot) in out.iter_mut().enumerate() {
                // Vary each cell with a different base-3 digit stride
                *slot = cells[((n / 3u32.pow((i % 3) as u32)) as usize + i) % 3];
            }
            Board::from_cells(out)
        })
        .collect()
}

// ============================================================================
// RULE ENGINE
// ============================================================================

#[test]
fn test_legality_matches_cell_ownership() {
    for b in sample_boards() {
        for side in [Side::X, Side::O] {
            for last in [None, Some(0), Some(4)] {
                for pos in 0..BOARD_SIZE {
                    let cell = b.cells()[pos];
                    let expected = last != Some(pos)
                        && (cell == Cell::Empty || cell == side.opponent().mark());
                    assert_eq!(is_legal_move(&b, side, last, pos), expected);
                }
            }
        }
    }
}

#[test]
fn test_transition_correctness() {
    for b in sample_boards() {
        for side in [Side::X, Side::O] {
            for pos in 0..BOARD_SIZE {
                let cell = b.cells()[pos];
                match apply_move(&b, side, pos) {
                    Ok(t) if cell == Cell::Empty => assert_eq!(t.board.get(pos), Some(side.mark())),
                    Ok(t) => {
                        assert_eq!(cell, side.opponent().mark());
                        assert_eq!(t.board.get(pos), Some(Cell::Empty));
                    }
                    Err(e) => {
                        assert_eq!(cell, side.mark());
                        assert_eq!(e, EngineError::IllegalMove { position: pos, violation: Violation::OwnMark });
                    }
                }
            }
        }
    }
}

#[test]
fn test_each_line_wins_with_noise_elsewhere() {
    for line in LINES {
        for side in [Side::X, Side::O] {
            // Opponent marks scattered off the line cannot form a line of their own
            let mut cells = [Cell::Empty; BOARD_SIZE];
            for idx in line {
                cells[idx] = side.mark();
            }
            let off_line: Vec<usize> = (0..BOARD_SIZE).filter(|i| !line.contains(i)).collect();
            cells[off_line[0]] = side.opponent().mark();
            cells[off_line[off_line.len() - 1]] = side.opponent().mark();
            assert_eq!(detect_winner(&Board::from_cells(cells)), Some(side));
        }
    }
}

// ============================================================================
// END-TO-END
// ============================================================================

#[test]
fn test_opening_scenario() {
    let start = GameState::new();
    assert_eq!(start.board, Board::new());
    assert_eq!(start.active, Side::X);
    assert_eq!(start.last_move, None);

    let (s1, _) = start.play(4).unwrap();
    assert_eq!(s1.board.get(4), Some(Cell::X));
    assert_eq!(s1.active, Side::O);
    assert_eq!(s1.last_move, Some(4));

    let (s2, _) = s1.play(0).unwrap();
    assert_eq!(s2.board.get(0), Some(Cell::O));
    assert_eq!(s2.active, Side::X);
    assert_eq!(s2.last_move, Some(0));

    assert_eq!(
        s2.play(0),
        Err(EngineError::IllegalMove { position: 0, violation: Violation::LastMoveLocked })
    );
    assert_eq!(
        s2.play(4),
        Err(EngineError::IllegalMove { position: 4, violation: Violation::OwnMark })
    );

    let (s3, record) = s2.play(8).unwrap();
    assert_eq!(s3.board.get(8), Some(Cell::X));
    assert_eq!(s3.active, Side::O);
    assert_eq!(record.prior, Cell::Empty);
    assert_eq!(record.posterior, Cell::X);
}

#[test]
fn test_neutralization_breaks_a_line() {
    let mut game = Game::new(Players::new("Ada", "Bob"));
    // X takes 1 and 0, O clears 1, X cannot retake 1 right away
    for pos in [1, 4, 0, 1] {
        game.play(pos).unwrap();
    }
    assert_eq!(game.state().board.get(1), Some(Cell::Empty));
    assert!(!game.state().is_legal(1));
    game.play(2).unwrap();
    assert_eq!(game.state().winner, None);
}

// ============================================================================
// SEARCH ENGINE
// ============================================================================

#[test]
fn test_ai_completes_own_line() {
    // O . O / X X . / . . X, X just played 8
    let b = board("O.OXX...X");
    let mut ai = MinimaxAI::with_rng(Side::O, ChaCha8Rng::seed_from_u64(0));
    let choice = ai.best_move(&b, Some(8)).unwrap();
    assert_eq!(choice.position, 1);
    assert_eq!(choice.score, WIN_SCORE);
}

#[test]
fn test_ai_blocks_human_line() {
    let b = board("X.X...O..");
    let mut ai = MinimaxAI::with_rng(Side::O, ChaCha8Rng::seed_from_u64(0));
    let choice = ai.best_move(&b, Some(2)).unwrap();
    assert_eq!(choice.position, 1);
    assert_eq!(choice.score, BLOCK_SCORE);
}

#[test]
fn test_ai_never_plays_locked_or_own_cell() {
    let mut ai = MinimaxAI::with_seed(Side::O, 9);
    ai.depth = 3;
    let b = board("O...X....");
    for _ in 0..5 {
        let choice = ai.best_move(&b, Some(4)).unwrap();
        assert_ne!(choice.position, 4);
        assert_ne!(choice.position, 0);
        assert!(is_legal_move(&b, Side::O, Some(4), choice.position));
    }
}

#[test]
fn test_ai_as_x() {
    // X completes the middle column rather than blocking the bottom row
    let b = board(".X..X.O.O");
    let mut ai = MinimaxAI::with_seed(Side::X, 1);
    let choice = ai.best_move(&b, Some(8)).unwrap();
    assert_eq!(choice.position, 7);
    assert!(choice.decisive);
}

#[test]
fn test_config_drives_engine() {
    let config = EngineConfig {
        depth: 2,
        pool_size: 1,
        ..EngineConfig::default()
    }
    .with_seed(3);
    let ai = MinimaxAI::from_config(&config, Side::O);
    assert_eq!(ai.depth, 2);
    assert_eq!(ai.top_candidates(&Board::new(), None).len(), 1);
}

#[test]
fn test_self_play_outcome_is_consistent() {
    let mut x_ai = MinimaxAI::with_seed(Side::X, 21);
    let mut o_ai = MinimaxAI::with_seed(Side::O, 22);
    x_ai.depth = 3;
    o_ai.depth = 3;

    let outcome = self_play(&mut x_ai, &mut o_ai, 20).unwrap();
    assert_eq!(outcome.history.len(), outcome.plies);

    // Replaying the history reproduces the result
    let mut state = GameState::new();
    for record in &outcome.history {
        assert_eq!(record.side, state.active);
        let (next, replayed) = state.play(record.position).unwrap();
        assert_eq!(&replayed, record);
        state = next;
    }
    assert_eq!(state.winner, outcome.winner);
}
