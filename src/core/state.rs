//! Grid State
//!
//! Position of the agent on a finite grid, (row, col) convention with
//! row 0 at the top.

use serde::{Deserialize, Serialize};

/// A cell on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridState {
    /// Row index (0 = top)
    pub row: usize,
    /// Column index (0 = left)
    pub col: usize,
}

impl GridState {
    /// Create a new grid state
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for GridState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
