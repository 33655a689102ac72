//! Game state, legality and state transitions

use crate::board::{Board, Cell, Side, BOARD_SIZE, LINES};
use crate::error::{EngineError, Violation};
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Result of applying one move to a board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub board: Board,
    pub prior: Cell,
    pub posterior: Cell,
}

/// One accepted move, enough to rebuild the history view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub side: Side,
    pub position: usize,
    pub prior: Cell,
    pub posterior: Cell,
}

// ============================================================================
// RULES
// ============================================================================

/// Why `side` may not play `position`, or `None` when the move is legal
pub fn check_move(
    board: &Board,
    side: Side,
    last_move: Option<usize>,
    position: usize,
) -> Option<Violation> {
    let cell = match board.get(position) {
        Some(c) => c,
        None => return Some(Violation::OutOfRange),
    };

    if last_move == Some(position) {
        return Some(Violation::LastMoveLocked);
    }

    match cell {
        Cell::Empty => None,
        Cell::Unset => Some(Violation::Unset),
        c if c == side.mark() => Some(Violation::OwnMark),
        _ => None,
    }
}

/// A side may write to empty cells or to cells held by the other side,
/// never to its own cells or to the cell played last.
pub fn is_legal_move(board: &Board, side: Side, last_move: Option<usize>, position: usize) -> bool {
    check_move(board, side, last_move, position).is_none()
}

/// Cell value after `side` plays on `cell`: empty cells take the mark,
/// opposing marks are cleared.
pub fn next_cell(cell: Cell, side: Side) -> Cell {
    match cell {
        Cell::Empty => side.mark(),
        _ => Cell::Empty,
    }
}

/// Apply a move to a copy of the board.
///
/// The last-move lock is not known here; callers holding a `GameState`
/// go through [`GameState::play`], which checks it.
pub fn apply_move(board: &Board, side: Side, position: usize) -> Result<Transition, EngineError> {
    if let Some(violation) = check_move(board, side, None, position) {
        return Err(EngineError::illegal(position, violation));
    }

    let prior = board.cells()[position];
    let posterior = next_cell(prior, side);

    Ok(Transition {
        board: board.with_cell(position, posterior),
        prior,
        posterior,
    })
}

/// First line fully held by one side, in scan order
pub fn detect_winner(board: &Board) -> Option<Side> {
    let cells = board.cells();
    LINES.iter().find_map(|&[a, b, c]| {
        let side = cells[a].side()?;
        (cells[b] == cells[a] && cells[c] == cells[a]).then_some(side)
    })
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Immutable game snapshot; every accepted move yields a new one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub active: Side,
    pub winner: Option<Side>,
    pub last_move: Option<usize>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty board, X to move
    pub const fn new() -> Self {
        Self {
            board: Board::new(),
            active: Side::X,
            winner: None,
            last_move: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn is_legal(&self, position: usize) -> bool {
        is_legal_move(&self.board, self.active, self.last_move, position)
    }

    /// All positions the active side may play
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_over() {
            return vec![];
        }
        (0..BOARD_SIZE).filter(|&p| self.is_legal(p)).collect()
    }

    /// Play `position` for the active side
    pub fn play(&self, position: usize) -> Result<(GameState, MoveRecord), EngineError> {
        if self.is_over() {
            return Err(EngineError::GameAlreadyDecided);
        }

        if let Some(violation) = check_move(&self.board, self.active, self.last_move, position) {
            return Err(EngineError::illegal(position, violation));
        }

        let transition = apply_move(&self.board, self.active, position)?;

        let next = GameState {
            board: transition.board,
            active: self.active.opponent(),
            winner: detect_winner(&transition.board),
            last_move: Some(position),
        };

        let record = MoveRecord {
            side: self.active,
            position,
            prior: transition.prior,
            posterior: transition.posterior,
        };

        Ok((next, record))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_legality_symmetry() {
        let b = board("XO.......");
        for side in [Side::X, Side::O] {
            for pos in 0..BOARD_SIZE {
                let cell = b.cells()[pos];
                let expected = cell == Cell::Empty || cell == side.opponent().mark();
                assert_eq!(is_legal_move(&b, side, None, pos), expected, "{side} at {pos}");
            }
        }
    }

    #[test]
    fn test_last_move_lock() {
        let b = board("XO.......");
        for pos in 0..BOARD_SIZE {
            assert!(!is_legal_move(&b, Side::X, Some(pos), pos));
            assert!(!is_legal_move(&b, Side::O, Some(pos), pos));
        }
        assert_eq!(check_move(&b, Side::X, Some(1), 1), Some(Violation::LastMoveLocked));
    }

    #[test]
    fn test_out_of_range_and_unset() {
        let b = Board::unset();
        assert_eq!(check_move(&b, Side::X, None, 9), Some(Violation::OutOfRange));
        assert_eq!(check_move(&b, Side::X, None, 0), Some(Violation::Unset));
    }

    #[test]
    fn test_transition_fills_empty_cell() {
        let t = apply_move(&Board::new(), Side::O, 3).unwrap();
        assert_eq!(t.board.get(3), Some(Cell::O));
        assert_eq!(t.prior, Cell::Empty);
        assert_eq!(t.posterior, Cell::O);
    }

    #[test]
    fn test_transition_neutralizes_opponent() {
        let b = board("X........");
        let t = apply_move(&b, Side::O, 0).unwrap();
        assert_eq!(t.board.get(0), Some(Cell::Empty));
        assert_eq!(t.prior, Cell::X);
        assert_eq!(t.posterior, Cell::Empty);
        // Input board untouched
        assert_eq!(b.get(0), Some(Cell::X));
    }

    #[test]
    fn test_own_mark_rejected() {
        let b = board("X........");
        assert_eq!(
            apply_move(&b, Side::X, 0),
            Err(EngineError::illegal(0, Violation::OwnMark))
        );
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            for side in [Side::X, Side::O] {
                let mut b = Board::new();
                for idx in line {
                    b.set(idx, side.mark());
                }
                assert_eq!(detect_winner(&b), Some(side), "line {:?}", line);
            }
        }
    }

    #[test]
    fn test_no_winner_without_full_line() {
        assert_eq!(detect_winner(&Board::new()), None);
        assert_eq!(detect_winner(&board("XXO.OX...")), None);
        assert_eq!(detect_winner(&board("XX.OO.X.O")), None);
        assert_eq!(detect_winner(&Board::unset()), None);
    }

    #[test]
    fn test_play_updates_state() {
        let state = GameState::new();
        let (next, record) = state.play(4).unwrap();
        assert_eq!(next.board.get(4), Some(Cell::X));
        assert_eq!(next.active, Side::O);
        assert_eq!(next.last_move, Some(4));
        assert_eq!(next.winner, None);
        assert_eq!(record.side, Side::X);
        assert_eq!(record.prior, Cell::Empty);
        assert_eq!(record.posterior, Cell::X);
        // Prior snapshot untouched
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_play_detects_win() {
        let state = GameState {
            board: board("XX.OO...."),
            active: Side::X,
            winner: None,
            last_move: Some(4),
        };
        let (next, _) = state.play(2).unwrap();
        assert_eq!(next.winner, Some(Side::X));
        assert!(next.is_over());
        assert!(next.legal_moves().is_empty());
        assert_eq!(next.play(5), Err(EngineError::GameAlreadyDecided));
    }

    #[test]
    fn test_legal_moves_excludes_lock_and_own() {
        let state = GameState {
            board: board("XO......."),
            active: Side::X,
            winner: None,
            last_move: Some(2),
        };
        assert_eq!(state.legal_moves(), vec![1, 3, 4, 5, 6, 7, 8]);
    }
}
