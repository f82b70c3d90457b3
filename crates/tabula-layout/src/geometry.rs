//! Grid rectangles.

use std::fmt;

/// A rectangle in grid space, half-open on the upper bounds.
///
/// Covers rows `row1..row2` and columns `col1..col2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TableRectangle {
    /// First row.
    pub row1: usize,
    /// First column.
    pub col1: usize,
    /// One past the last row.
    pub row2: usize,
    /// One past the last column.
    pub col2: usize,
}

impl TableRectangle {
    /// A rectangle from its bounds.
    #[must_use]
    pub const fn new(row1: usize, col1: usize, row2: usize, col2: usize) -> Self {
        TableRectangle {
            row1,
            col1,
            row2,
            col2,
        }
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn row_span(&self) -> usize {
        self.row2.saturating_sub(self.row1)
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn column_span(&self) -> usize {
        self.col2.saturating_sub(self.col1)
    }

    /// Returns true if the rectangle covers no cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.row_span() == 0 || self.column_span() == 0
    }

    /// Returns true if the cell lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, row: usize, column: usize) -> bool {
        row >= self.row1 && row < self.row2 && column >= self.col1 && column < self.col2
    }

    /// Iterate over all `(row, column)` cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (col1, col2) = (self.col1, self.col2);
        (self.row1..self.row2).flat_map(move |row| (col1..col2).map(move |column| (row, column)))
    }
}

impl fmt::Display for TableRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows {}..{}, columns {}..{}",
            self.row1, self.row2, self.col1, self.col2
        )
    }
}
