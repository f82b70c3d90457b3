//! Lazily growing cell storage.

use crate::marker::CellMarker;

/// Row-major grid of optional markers.
///
/// Rows are allocated on first write and only as wide as the rightmost
/// cell written so far; retired rows give their storage back.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    rows: Vec<Vec<Option<CellMarker>>>,
    column_count: usize,
}

impl CellGrid {
    /// An empty grid.
    #[must_use]
    pub fn new() -> Self {
        CellGrid::default()
    }

    /// One past the last row written.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// One past the last column written.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.column_count
    }

    /// Marker at a cell; `None` for undefined cells, including those
    /// outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<&CellMarker> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    /// Store a marker, growing the grid as needed.
    pub fn set(&mut self, row: usize, column: usize, marker: CellMarker) {
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if column >= cells.len() {
            cells.resize(column + 1, None);
        }
        cells[column] = Some(marker);
        self.column_count = self.column_count.max(column + 1);
    }

    /// Drop every marker of a row and release its storage.
    pub fn clear_row(&mut self, row: usize) {
        if let Some(cells) = self.rows.get_mut(row) {
            *cells = Vec::new();
        }
    }

    /// Replace every marker of a row with its retired placeholder.
    pub fn finish_row(&mut self, row: usize) {
        if let Some(cells) = self.rows.get_mut(row) {
            for cell in cells.iter_mut().flatten() {
                if !matches!(cell, CellMarker::Finished { .. }) {
                    *cell = cell.finished();
                }
            }
        }
    }

    /// Re-index the grid after the sheet layout split some of its tracks.
    ///
    /// New cell `(r, c)` takes over the marker of old cell
    /// `(rows[r], columns[c])`; tracks mapped to `None` start out undefined.
    pub fn remap(&mut self, rows: &[Option<usize>], columns: &[Option<usize>]) {
        let old = std::mem::take(&mut self.rows);
        let old_columns = self.column_count;

        let row_end = rows
            .iter()
            .rposition(|row| row.is_some_and(|row| row < old.len()))
            .map_or(0, |row| row + 1);
        self.column_count = columns
            .iter()
            .rposition(|column| column.is_some_and(|column| column < old_columns))
            .map_or(0, |column| column + 1);

        self.rows = rows[..row_end]
            .iter()
            .map(|row| {
                let Some(source) = row.and_then(|row| old.get(row)) else {
                    return Vec::new();
                };
                if source.is_empty() {
                    return Vec::new();
                }
                let mut cells: Vec<Option<CellMarker>> = columns[..self.column_count]
                    .iter()
                    .map(|column| column.and_then(|column| source.get(column).cloned().flatten()))
                    .collect();
                while cells.last().is_some_and(Option::is_none) {
                    let _ = cells.pop();
                }
                cells
            })
            .collect();
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.column_count = 0;
    }
}
