//! Grid Primitives
//!
//! The board is a fixed 5x5 grid addressed row-major by a single index in `[0, 24]`.
//! `CellIndex` is the only way a cell enters game logic, so every index
//! seen by the engines has already been range-checked.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Width and height of the board.
pub const GRID_SIZE: u8 = 5;

/// Total number of cells on the board.
pub const CELL_COUNT: u8 = GRID_SIZE * GRID_SIZE;

/// Row letters used in cell labels (row 0 = 'A').
const ROW_LETTERS: [char; GRID_SIZE as usize] = ['A', 'B', 'C', 'D', 'E'];

/// Errors raised when constructing or parsing a cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// Index outside `[0, 24]`.
    #[error("cell index {0} is outside the board (0-24)")]
    OutOfRange(i64),

    /// Label that does not match `{A-E}{1-5}`.
    #[error("invalid cell label {0:?}")]
    InvalidLabel(String),
}

/// A validated cell on the 5x5 board.
///
/// Ordering follows the index, so sorted cells are in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CellIndex(u8);

impl CellIndex {
    /// First cell (A1).
    pub const MIN: CellIndex = CellIndex(0);

    /// Last cell (E5).
    pub const MAX: CellIndex = CellIndex(CELL_COUNT - 1);

    /// Validate a raw integer as a cell index.
    pub fn new(raw: i64) -> Result<Self, CellError> {
        if (0..CELL_COUNT as i64).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(CellError::OutOfRange(raw))
        }
    }

    /// Build a cell from its row and column.
    pub fn from_row_col(row: u8, col: u8) -> Result<Self, CellError> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(CellError::OutOfRange(row as i64 * GRID_SIZE as i64 + col as i64));
        }
        Ok(Self(row * GRID_SIZE + col))
    }

    /// Raw index in `[0, 24]`.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Row (0-4).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / GRID_SIZE
    }

    /// Column (0-4).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % GRID_SIZE
    }

    /// Human label, e.g. `A1` for cell 0 and `E5` for cell 24.
    pub fn label(self) -> String {
        self.to_string()
    }

    /// Parse a label such as `c4` or `C4` (case-insensitive).
    pub fn parse_label(label: &str) -> Result<Self, CellError> {
        let invalid = || CellError::InvalidLabel(label.to_string());

        let mut chars = label.chars();
        let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let letter = letter.to_ascii_uppercase();
        let row = ROW_LETTERS
            .iter()
            .position(|&c| c == letter)
            .ok_or_else(invalid)? as u8;

        let col = match digit.to_digit(10) {
            Some(d @ 1..=5) => d as u8 - 1,
            _ => return Err(invalid()),
        };

        Self::from_row_col(row, col).map_err(|_| invalid())
    }

    /// Iterate every cell on the board in ascending order.
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..CELL_COUNT).map(CellIndex)
    }
}

impl TryFrom<u8> for CellIndex {
    type Error = CellError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw as i64)
    }
}

impl From<CellIndex> for u8 {
    fn from(cell: CellIndex) -> u8 {
        cell.0
    }
}

impl FromStr for CellIndex {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s)
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ROW_LETTERS[self.row() as usize], self.col() + 1)
    }
}
