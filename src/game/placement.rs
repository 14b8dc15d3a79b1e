//! Placement Engine
//!
//! Validates and enumerates ship placements on the 5x5 grid.
//! A placement is a straight, contiguous, ascending run of cells.

use std::fmt;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::grid::{CellIndex, CellError, GRID_SIZE};

// =============================================================================
// SHIP SIZE / ORIENTATION
// =============================================================================

/// Number of cells a ship occupies. Fixed per game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
#[derive(Default)]
pub enum ShipSize {
    /// Single cell
    One = 1,
    /// Two cells
    #[default]
    Two = 2,
    /// Three cells
    Three = 3,
}

impl ShipSize {
    /// Number of cells.
    #[inline]
    pub const fn cells(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for ShipSize {
    type Error = PlacementError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ShipSize::One),
            2 => Ok(ShipSize::Two),
            3 => Ok(ShipSize::Three),
            other => Err(PlacementError::InvalidShipSize(other)),
        }
    }
}

impl From<ShipSize> for u8 {
    fn from(size: ShipSize) -> u8 {
        size as u8
    }
}

/// Orientation derived from a placement's cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Size-1 ship
    Single,
    /// Same row, ascending by 1
    Horizontal,
    /// Same column, ascending by 5
    Vertical,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Rejection of a placement or cell label supplied by a player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Wrong number of cells for the ship.
    #[error("expected {expected} cells, got {got}")]
    WrongLength {
        /// Ship size
        expected: usize,
        /// Cells supplied
        got: usize,
    },

    /// Bad cell index or label.
    #[error(transparent)]
    Cell(#[from] CellError),

    /// Same cell listed twice.
    #[error("cell {0} listed more than once")]
    DuplicateCell(CellIndex),

    /// Cells are not a straight contiguous run.
    #[error("cells must form a contiguous horizontal or vertical line")]
    NotContiguous,

    /// Ship size outside 1-3.
    #[error("ship size {0} is not supported (1-3)")]
    InvalidShipSize(u8),

    /// Every cell of the current position has been hit.
    #[error("ship has no unhit cells left to move")]
    NoUnhitCells,
}

// =============================================================================
// PLACEMENT
// =============================================================================

/// A validated ship placement: sorted, unique, contiguous cells.
///
/// Serialized as its cell list; deserializing re-runs validation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<CellIndex>", into = "Vec<CellIndex>")]
pub struct Placement {
    cells: Vec<CellIndex>,
    orientation: Orientation,
}

impl Placement {
    /// Sorted cells.
    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    /// Derived orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a validated placement.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Does this placement occupy `cell`?
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Validate already-typed cells (see [`validate_placement`]).
    pub fn from_cells(cells: &[CellIndex], ship_size: ShipSize) -> Result<Self, PlacementError> {
        if cells.len() != ship_size.cells() {
            return Err(PlacementError::WrongLength {
                expected: ship_size.cells(),
                got: cells.len(),
            });
        }

        let mut sorted = cells.to_vec();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(PlacementError::DuplicateCell(pair[0]));
        }

        let orientation = orientation_of(&sorted)?;
        Ok(Self { cells: sorted, orientation })
    }
}

impl TryFrom<Vec<CellIndex>> for Placement {
    type Error = PlacementError;

    fn try_from(cells: Vec<CellIndex>) -> Result<Self, Self::Error> {
        let size = u8::try_from(cells.len())
            .map_err(|_| PlacementError::InvalidShipSize(u8::MAX))
            .and_then(ShipSize::try_from)?;
        Self::from_cells(&cells, size)
    }
}

impl From<Placement> for Vec<CellIndex> {
    fn from(placement: Placement) -> Vec<CellIndex> {
        placement.cells
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.cells.iter().map(|c| c.label()).collect();
        write!(f, "{}", labels.join("-"))
    }
}

/// Classify sorted, unique cells as a straight run.
fn orientation_of(sorted: &[CellIndex]) -> Result<Orientation, PlacementError> {
    if sorted.len() == 1 {
        return Ok(Orientation::Single);
    }

    let first = sorted[0];
    let horizontal = sorted
        .windows(2)
        .all(|w| w[1].index() == w[0].index() + 1 && w[1].row() == first.row());
    if horizontal {
        return Ok(Orientation::Horizontal);
    }

    let vertical = sorted
        .windows(2)
        .all(|w| w[1].index() == w[0].index() + GRID_SIZE);
    if vertical {
        return Ok(Orientation::Vertical);
    }

    Err(PlacementError::NotContiguous)
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Validate raw cell indices as a placement of `ship_size`.
///
/// Checks length, range, uniqueness and straightness (in that order) and
/// returns the cells sorted with their derived orientation.
pub fn validate_placement(cells: &[i64], ship_size: ShipSize) -> Result<Placement, PlacementError> {
    if cells.len() != ship_size.cells() {
        return Err(PlacementError::WrongLength {
            expected: ship_size.cells(),
            got: cells.len(),
        });
    }

    let typed = cells
        .iter()
        .map(|&raw| CellIndex::new(raw))
        .collect::<Result<Vec<_>, _>>()?;

    Placement::from_cells(&typed, ship_size)
}

/// Label for a cell, e.g. `A1`.
pub fn cell_label(cell: CellIndex) -> String {
    cell.label()
}

/// Parse a cell label (case-insensitive).
pub fn parse_cell_label(label: &str) -> Result<CellIndex, PlacementError> {
    Ok(CellIndex::parse_label(label)?)
}

/// Every placement of `ship_size` that starts from `from`.
///
/// Tries extending right, left, down and up, drops runs that leave the
/// board, and returns each distinct sorted run once.
pub fn valid_placements(from: CellIndex, ship_size: ShipSize) -> Vec<Vec<CellIndex>> {
    let len = ship_size.cells() as i64;
    let (row, col) = (from.row() as i64, from.col() as i64);
    let directions: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

    let mut results: Vec<Vec<CellIndex>> = Vec::new();
    for (dr, dc) in directions {
        let end_row = row + dr * (len - 1);
        let end_col = col + dc * (len - 1);
        if !(0..GRID_SIZE as i64).contains(&end_row) || !(0..GRID_SIZE as i64).contains(&end_col) {
            continue;
        }

        let mut run: Vec<CellIndex> = (0..len)
            .filter_map(|i| {
                CellIndex::from_row_col((row + dr * i) as u8, (col + dc * i) as u8).ok()
            })
            .collect();
        run.sort_unstable();

        if !results.contains(&run) {
            results.push(run);
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(raw: &[u8]) -> Vec<CellIndex> {
        raw.iter().map(|&c| CellIndex::new(c as i64).unwrap()).collect()
    }

    #[test]
    fn test_horizontal_sorted() {
        let placement = validate_placement(&[1, 0], ShipSize::Two).unwrap();
        assert_eq!(placement.cells(), cells(&[0, 1]).as_slice());
        assert_eq!(placement.orientation(), Orientation::Horizontal);
    }

    #[test]
    fn test_vertical() {
        let placement = validate_placement(&[17, 7, 12], ShipSize::Three).unwrap();
        assert_eq!(placement.cells(), cells(&[7, 12, 17]).as_slice());
        assert_eq!(placement.orientation(), Orientation::Vertical);
    }

    #[test]
    fn test_single() {
        let placement = validate_placement(&[24], ShipSize::One).unwrap();
        assert_eq!(placement.orientation(), Orientation::Single);
    }

    #[test]
    fn test_rejects_row_wrap() {
        assert_eq!(
            validate_placement(&[4, 5], ShipSize::Two),
            Err(PlacementError::NotContiguous)
        );
        assert_eq!(
            validate_placement(&[3, 4, 5], ShipSize::Three),
            Err(PlacementError::NotContiguous)
        );
    }

    #[test]
    fn test_rejects_bad_shapes() {
        // diagonal
        assert!(validate_placement(&[0, 6], ShipSize::Two).is_err());
        // gap
        assert!(validate_placement(&[0, 2], ShipSize::Two).is_err());
        // L-shape
        assert!(validate_placement(&[0, 1, 6], ShipSize::Three).is_err());
        // vertical gap
        assert!(validate_placement(&[0, 10], ShipSize::Two).is_err());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            validate_placement(&[0], ShipSize::Two),
            Err(PlacementError::WrongLength { expected: 2, got: 1 })
        );
        assert_eq!(
            validate_placement(&[24, 25], ShipSize::Two),
            Err(PlacementError::Cell(CellError::OutOfRange(25)))
        );
        assert_eq!(
            validate_placement(&[-1], ShipSize::One),
            Err(PlacementError::Cell(CellError::OutOfRange(-1)))
        );
        assert_eq!(
            validate_placement(&[3, 3], ShipSize::Two),
            Err(PlacementError::DuplicateCell(CellIndex::new(3).unwrap()))
        );
    }

    #[test]
    fn test_label_helpers() {
        assert_eq!(cell_label(CellIndex::new(0).unwrap()), "A1");
        assert_eq!(cell_label(CellIndex::new(24).unwrap()), "E5");
        assert_eq!(parse_cell_label("b2").unwrap().index(), 6);
        assert!(matches!(parse_cell_label("F1"), Err(PlacementError::Cell(_))));
    }

    #[test]
    fn test_placement_serde_revalidates() {
        let placement = validate_placement(&[11, 6], ShipSize::Two).unwrap();
        let json = serde_json::to_string(&placement).unwrap();
        assert_eq!(json, "[6,11]");
        assert_eq!(serde_json::from_str::<Placement>(&json).unwrap(), placement);
        assert!(serde_json::from_str::<Placement>("[4,5]").is_err());
        assert!(serde_json::from_str::<Placement>("[]").is_err());
    }

    #[test]
    fn test_ship_size_conversion() {
        assert_eq!(ShipSize::try_from(3).unwrap(), ShipSize::Three);
        assert_eq!(ShipSize::try_from(4), Err(PlacementError::InvalidShipSize(4)));
    }

    #[test]
    fn test_valid_placements_size_one() {
        let from = CellIndex::new(12).unwrap();
        assert_eq!(valid_placements(from, ShipSize::One), vec![vec![from]]);
    }

    #[test]
    fn test_valid_placements_center() {
        let from = CellIndex::new(12).unwrap();
        let mut found = valid_placements(from, ShipSize::Three);
        found.sort();
        let mut expected = vec![
            cells(&[12, 13, 14]),
            cells(&[10, 11, 12]),
            cells(&[12, 17, 22]),
            cells(&[2, 7, 12]),
        ];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_valid_placements_corner() {
        let from = CellIndex::new(0).unwrap();
        let mut found = valid_placements(from, ShipSize::Two);
        found.sort();
        assert_eq!(found, vec![cells(&[0, 1]), cells(&[0, 5])]);
    }

    #[test]
    fn test_valid_placements_all_validate() {
        for from in CellIndex::all() {
            for size in [ShipSize::One, ShipSize::Two, ShipSize::Three] {
                for run in valid_placements(from, size) {
                    assert!(run.contains(&from));
                    assert!(Placement::from_cells(&run, size).is_ok());
                }
            }
        }
    }
}
