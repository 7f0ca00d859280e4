//! Three-axis line clearing
//!
//! A line is every board cell sharing one value of q, r or s. All full lines
//! found in one pass are cleared together; a cell on two full lines is
//! cleared (and scored) once.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::hex::{Axis, HexCoord};

/// One full line: the axis and its fixed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisLine {
    pub axis: Axis,
    pub value: i32,
}

impl fmt::Display for AxisLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.axis.as_str(), self.value)
    }
}

/// Result of a line-clear pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClear {
    pub lines: Vec<AxisLine>,
    /// Union of cells over all full lines
    pub cells: BTreeSet<HexCoord>,
}

impl LineClear {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One point per distinct cleared cell
    pub fn points(&self) -> u32 {
        self.cells.len() as u32
    }
}

/// Find every full line without touching the board
pub fn find_full_lines(board: &Board) -> LineClear {
    let n = board.radius();
    let mut result = LineClear::default();
    for axis in Axis::ALL {
        for value in -n..=n {
            let line = board.axis_line(axis, value);
            if !line.is_empty() && line.iter().all(|hex| !board.is_empty(*hex)) {
                result.lines.push(AxisLine { axis, value });
                result.cells.extend(line);
            }
        }
    }
    result
}

/// Clear every full line and report what was removed
pub fn clear_lines(board: &mut Board) -> LineClear {
    let result = find_full_lines(board);
    for hex in &result.cells {
        board.clear(*hex);
    }
    if !result.is_empty() {
        let lines: Vec<String> = result.lines.iter().map(ToString::to_string).collect();
        log::debug!(
            "Cleared {} line(s) [{}], {} cell(s)",
            result.lines.len(),
            lines.join(", "),
            result.cells.len()
        );
    }
    result
}
