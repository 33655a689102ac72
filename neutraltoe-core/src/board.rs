//! 3x3 board geometry and cell contents

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of cells on the board
pub const BOARD_SIZE: usize = 9;

/// Center cell index
pub const CENTER: usize = 4;

/// Corner cell indices
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Winning lines in scan order: rows, columns, diagonals
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Side to move. X always opens the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    X = 0,
    O = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    /// Cell value holding this side's mark
    pub fn mark(self) -> Cell {
        match self {
            Side::X => Cell::X,
            Side::O => Cell::O,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::X => write!(f, "X"),
            Side::O => write!(f, "O"),
        }
    }
}

impl FromStr for Side {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Side::X),
            "o" | "O" => Ok(Side::O),
            other => Err(BoardParseError::UnknownSide(other.to_string())),
        }
    }
}

/// Content of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
    /// Only seen before a game starts
    Unset,
}

impl Cell {
    /// Owning side, if the cell holds a mark
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::X => Some(Side::X),
            Cell::O => Some(Side::O),
            Cell::Empty | Cell::Unset => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
            Cell::Unset => '?',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' | '|' | '-' | '_' => Some(Cell::Empty),
            'x' | 'X' => Some(Cell::X),
            'o' | 'O' => Some(Cell::O),
            '?' => Some(Cell::Unset),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Errors from parsing a textual board
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardParseError {
    #[error("expected 9 cells, got {got} in '{input}'")]
    WrongLength { got: usize, input: String },

    #[error("invalid cell character '{character}' in '{input}'")]
    InvalidCharacter { character: char, input: String },

    #[error("unknown side '{0}' (expected 'x' or 'o')")]
    UnknownSide(String),
}

/// Row-major 3x3 board (copy to mutate)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Fresh board, every cell empty
    pub const fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    /// Board before a game has been set up
    pub const fn unset() -> Self {
        Self {
            cells: [Cell::Unset; BOARD_SIZE],
        }
    }

    pub const fn from_cells(cells: [Cell; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// Cell at position, `None` when off the board
    pub fn get(&self, position: usize) -> Option<Cell> {
        self.cells.get(position).copied()
    }

    pub(crate) fn set(&mut self, position: usize, cell: Cell) {
        self.cells[position] = cell;
    }

    /// Copy of this board with `cell` written at `position`
    pub fn with_cell(&self, position: usize, cell: Cell) -> Self {
        let mut board = *self;
        board.set(position, cell);
        board
    }

    /// Number of cells holding the given value
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Does `side` own all three cells of some line
    pub fn has_line(&self, side: Side) -> bool {
        let mark = side.mark();
        LINES
            .iter()
            .any(|line| line.iter().all(|&idx| self.cells[idx] == mark))
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();

        if symbols.len() != BOARD_SIZE {
            return Err(BoardParseError::WrongLength {
                got: symbols.len(),
                input: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; BOARD_SIZE];
        for (slot, &c) in cells.iter_mut().zip(&symbols) {
            *slot = Cell::from_symbol(c).ok_or_else(|| BoardParseError::InvalidCharacter {
                character: c,
                input: s.to_string(),
            })?;
        }

        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let r = &self.cells[row * 3..row * 3 + 3];
            writeln!(f, "{} {} {}", r[0], r[1], r[2])?;
        }
        Ok(())
    }
}

/// Lines passing through a position
pub fn lines_through(position: usize) -> impl Iterator<Item = &'static [usize; 3]> {
    LINES.iter().filter(move |line| line.contains(&position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board() {
        let board: Board = "XO. / .X. / ..O".parse().unwrap();
        assert_eq!(board.get(0), Some(Cell::X));
        assert_eq!(board.get(1), Some(Cell::O));
        assert_eq!(board.get(2), Some(Cell::Empty));
        assert_eq!(board.get(8), Some(Cell::O));
        assert_eq!(board.get(9), None);
    }

    #[test]
    fn test_parse_accepts_pipe_for_empty() {
        let board: Board = "|||||||||".parse().unwrap();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "XO".parse::<Board>(),
            Err(BoardParseError::WrongLength { got: 2, .. })
        ));
        assert!(matches!(
            "XOZ......".parse::<Board>(),
            Err(BoardParseError::InvalidCharacter { character: 'Z', .. })
        ));
    }

    #[test]
    fn test_cell_counts_cover_board() {
        let board: Board = "XO.OX..O.".parse().unwrap();
        let total = board.count(Cell::X) + board.count(Cell::O) + board.count(Cell::Empty);
        assert_eq!(total, BOARD_SIZE);
    }

    #[test]
    fn test_lines_through() {
        assert_eq!(lines_through(CENTER).count(), 4);
        assert_eq!(lines_through(0).count(), 3);
        assert_eq!(lines_through(1).count(), 2);
    }

    #[test]
    fn test_display_roundtrip() {
        let board: Board = "XO.OX..O.".parse().unwrap();
        let shown = board.to_string();
        assert_eq!(shown, "X O .\nO X .\n. O .\n");
        assert_eq!(shown.parse::<Board>().unwrap(), board);
    }
}
