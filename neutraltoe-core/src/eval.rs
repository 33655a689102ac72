//! Static evaluation of a candidate move

use crate::board::{lines_through, Board, Cell, Side, CENTER, CORNERS};
use serde::{Deserialize, Serialize};

/// Score of an immediate win. Blocks and neutralizations sit just below it.
pub const WIN_SCORE: i32 = 1000;

/// Score of a move that fills the last empty cell of an opponent's
/// two-in-a-line
pub const BLOCK_SCORE: i32 = WIN_SCORE - 1;

/// Score of a move that clears an opponent mark from a two-in-a-line
pub const NEUTRALIZE_SCORE: i32 = WIN_SCORE - 2;

/// Tunable weights for the non-decisive part of the evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Own two in a line with one empty
    pub own_two: i32,
    /// Opponent two in a line with one empty
    pub opponent_two: i32,
    /// Own one in a line with two empty
    pub own_one: i32,
    /// Opponent one in a line with two empty
    pub opponent_one: i32,
    /// Per line through a cell currently held by the opponent
    pub neutralize: i32,
    pub center: i32,
    pub corner: i32,
    pub edge: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            own_two: 15,
            opponent_two: 14,
            own_one: 5,
            opponent_one: 4,
            neutralize: 3,
            center: 5,
            corner: 3,
            edge: 1,
        }
    }
}

impl Heuristics {
    /// Largest score the weighted sum can reach. Must stay below
    /// `NEUTRALIZE_SCORE` so the sentinel ordering holds.
    pub fn max_tactical(&self) -> i32 {
        let line = self
            .own_two
            .max(self.opponent_two)
            .max(self.own_one)
            .max(self.opponent_one);
        let positional = self.center.max(self.corner).max(self.edge);
        // The center lies on four lines, more than any other cell
        4 * (line + self.neutralize) + positional
    }

    /// Weights are non-negative and cannot reach the sentinel range
    pub fn is_valid(&self) -> bool {
        let weights = [
            self.own_two,
            self.opponent_two,
            self.own_one,
            self.opponent_one,
            self.neutralize,
            self.center,
            self.corner,
            self.edge,
        ];
        weights.iter().all(|&w| w >= 0) && self.max_tactical() < NEUTRALIZE_SCORE
    }

    fn positional(&self, position: usize) -> i32 {
        if position == CENTER {
            self.center
        } else if CORNERS.contains(&position) {
            self.corner
        } else {
            self.edge
        }
    }
}

/// Base ordering score of a cell: center 3, corners 2, edges 1
pub fn positional_base(position: usize) -> i32 {
    if position == CENTER {
        3
    } else if CORNERS.contains(&position) {
        2
    } else {
        1
    }
}

/// Score `side` playing at `position`, from `side`'s point of view.
///
/// Lines are judged as if `side`'s mark were written at `position`, even
/// when the real transition would clear an opposing mark instead.
pub fn evaluate(board: &Board, position: usize, side: Side, heuristics: &Heuristics) -> i32 {
    let current = match board.get(position) {
        Some(c) => c,
        None => return 0,
    };
    let opponent = side.opponent().mark();
    let placed = board.with_cell(position, side.mark());

    if placed.has_line(side) {
        return WIN_SCORE;
    }

    // Forced responses to an opponent two-in-a-line
    for line in lines_through(position) {
        let opponent_count = count_in_line(board, line, opponent);
        if opponent_count == 2 {
            if current == Cell::Empty {
                return BLOCK_SCORE;
            }
            if current == opponent {
                return NEUTRALIZE_SCORE;
            }
        }
    }

    let mut score = 0;
    for line in lines_through(position) {
        let own = count_in_line(&placed, line, side.mark());
        let opp = count_in_line(&placed, line, opponent);
        let empty = count_in_line(&placed, line, Cell::Empty);

        if own == 2 && empty == 1 {
            score += heuristics.own_two;
        } else if opp == 2 && empty == 1 {
            score += heuristics.opponent_two;
        } else if own == 1 && empty == 2 {
            score += heuristics.own_one;
        } else if opp == 1 && empty == 2 {
            score += heuristics.opponent_one;
        }

        if current == opponent {
            score += heuristics.neutralize;
        }
    }

    score + heuristics.positional(position)
}

fn count_in_line(board: &Board, line: &[usize; 3], cell: Cell) -> usize {
    line.iter().filter(|&&idx| board.cells()[idx] == cell).count()
}
