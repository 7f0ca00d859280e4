//! Hexagon-shaped board of axial cells
//!
//! The key set is fixed at construction: every coordinate within `radius` of
//! the origin. Only occupancy changes afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::hex::{Axis, HexCoord};
use super::piece::PieceColor;

/// Occupancy of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceColor),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn color(&self) -> Option<PieceColor> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(*color),
        }
    }
}

/// The hex board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    radius: i32,
    cells: BTreeMap<HexCoord, Cell>,
}

impl Board {
    /// Create a board with every cell within `radius` empty
    pub fn new(radius: i32) -> Self {
        let radius = radius.max(0);
        let mut cells = BTreeMap::new();
        for q in -radius..=radius {
            for r in -radius..=radius {
                let hex = HexCoord::new(q, r);
                if hex.distance_from_origin() <= radius {
                    cells.insert(hex, Cell::Empty);
                }
            }
        }
        Self { radius, cells }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Total number of cells: 3N(N+1) + 1
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.values().filter(|c| !c.is_empty()).count()
    }

    pub fn is_in_bounds(&self, hex: HexCoord) -> bool {
        self.cells.contains_key(&hex)
    }

    /// False for out-of-bounds coordinates
    pub fn is_empty(&self, hex: HexCoord) -> bool {
        matches!(self.cells.get(&hex), Some(Cell::Empty))
    }

    pub fn get(&self, hex: HexCoord) -> Option<Cell> {
        self.cells.get(&hex).copied()
    }

    /// Fill a cell. Returns false (and changes nothing) when out of bounds.
    pub fn occupy(&mut self, hex: HexCoord, color: PieceColor) -> bool {
        match self.cells.get_mut(&hex) {
            Some(cell) => {
                *cell = Cell::Filled(color);
                true
            }
            None => false,
        }
    }

    /// Empty a cell. Returns false when out of bounds.
    pub fn clear(&mut self, hex: HexCoord) -> bool {
        match self.cells.get_mut(&hex) {
            Some(cell) => {
                *cell = Cell::Empty;
                true
            }
            None => false,
        }
    }

    /// Empty every cell (level-up). Radius and key set are unchanged.
    pub fn reset(&mut self) {
        for cell in self.cells.values_mut() {
            *cell = Cell::Empty;
        }
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (HexCoord, Cell)> + '_ {
        self.cells.iter().map(|(hex, cell)| (*hex, *cell))
    }

    /// Every in-bounds coordinate whose `axis` component equals `value`.
    /// Empty when `value` lies outside [-radius, radius].
    pub fn axis_line(&self, axis: Axis, value: i32) -> Vec<HexCoord> {
        let n = self.radius;
        if value.abs() > n {
            return Vec::new();
        }
        // The free component ranges so that the dependent one stays in bounds
        let lo = (-n).max(-n - value);
        let hi = n.min(n - value);
        (lo..=hi)
            .map(|t| match axis {
                Axis::Q => HexCoord::new(value, t),
                Axis::R => HexCoord::new(t, value),
                Axis::S => HexCoord::new(t, -t - value),
            })
            .collect()
    }

    pub fn is_line_full(&self, axis: Axis, value: i32) -> bool {
        let line = self.axis_line(axis, value);
        !line.is_empty() && line.iter().all(|hex| !self.is_empty(*hex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_cell_counts() {
        assert_eq!(Board::new(0).cell_count(), 1);
        assert_eq!(Board::new(1).cell_count(), 7);
        assert_eq!(Board::new(2).cell_count(), 19);
        assert_eq!(Board::new(4).cell_count(), 61);
    }

    #[test]
    fn test_bounds() {
        let board = Board::new(2);
        assert!(board.is_in_bounds(HexCoord::new(2, -2)));
        assert!(board.is_in_bounds(HexCoord::new(-2, 0)));
        assert!(!board.is_in_bounds(HexCoord::new(2, 1)));
        assert!(!board.is_in_bounds(HexCoord::new(3, 0)));
        assert!(!board.is_empty(HexCoord::new(3, 0)));
    }

    #[test]
    fn test_occupy_and_clear() {
        let mut board = Board::new(2);
        let hex = HexCoord::new(1, 0);
        assert!(board.is_empty(hex));
        assert!(board.occupy(hex, PieceColor::Blue));
        assert!(!board.is_empty(hex));
        assert_eq!(board.get(hex), Some(Cell::Filled(PieceColor::Blue)));
        assert_eq!(board.occupied_count(), 1);

        assert!(board.clear(hex));
        assert!(board.is_empty(hex));

        // Out of bounds never grows the key set
        assert!(!board.occupy(HexCoord::new(5, 5), PieceColor::Red));
        assert_eq!(board.cell_count(), 19);
    }

    #[test]
    fn test_reset_keeps_keys() {
        let mut board = Board::new(3);
        for (hex, _) in board.clone().cells() {
            board.occupy(hex, PieceColor::Green);
        }
        assert_eq!(board.occupied_count(), board.cell_count());
        board.reset();
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board, Board::new(3));
    }

    #[test]
    fn test_axis_line_lengths() {
        let board = Board::new(3);
        for axis in Axis::ALL {
            for value in -3..=3 {
                let line = board.axis_line(axis, value);
                assert_eq!(line.len(), (7 - value.abs()) as usize, "{:?}={}", axis, value);
                for hex in &line {
                    assert!(board.is_in_bounds(*hex));
                    assert_eq!(axis.value_of(*hex), value);
                }
            }
            assert!(board.axis_line(axis, 4).is_empty());
        }
    }

    #[test]
    fn test_axis_lines_partition_board() {
        // Each axis' lines cover every cell exactly once
        let board = Board::new(2);
        for axis in Axis::ALL {
            let total: usize = (-2..=2).map(|v| board.axis_line(axis, v).len()).sum();
            assert_eq!(total, board.cell_count());
        }
    }

    #[test]
    fn test_is_line_full() {
        let mut board = Board::new(2);
        for hex in board.axis_line(Axis::R, 1) {
            board.occupy(hex, PieceColor::Red);
        }
        assert!(board.is_line_full(Axis::R, 1));
        assert!(!board.is_line_full(Axis::R, 0));
        assert!(!board.is_line_full(Axis::Q, 0));
    }
}
