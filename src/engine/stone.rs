//! Core domain types for the stone pyramid.

use serde::{Deserialize, Serialize};

/// Orientation of a placed stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Spans one row at double column width.
    Horizontal,
    /// Spans one column at double row height.
    Vertical,
}

/// A stone placed in the pyramid.
///
/// `row` is derived at insertion time from the number of stones already in
/// the column; rows within a column are consecutive from zero in insertion
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stone {
    /// Column index, `0..columns`.
    pub column: usize,
    /// Row within the column, assigned at insertion.
    pub row: usize,
    /// Horizontal or vertical.
    pub orientation: Orientation,
}

impl Stone {
    /// Creates a stone at the given cell.
    pub fn new(column: usize, row: usize, orientation: Orientation) -> Self {
        Self {
            column,
            row,
            orientation,
        }
    }
}
