//! Sheet layouts.
//!
//! A sheet layout collects the horizontal and vertical edges of the boxes
//! registered with it. Every distinct edge becomes a column or row break, and
//! any rectangle in sheet coordinates can then be mapped onto the grid cells
//! it covers.

use tabula_style::Coord;

use crate::geometry::TableRectangle;
use crate::render_box::RenderBox;

/// Break-collecting grid geometry consumed by the table producers.
///
/// Pass 1 grows the layout through [`SheetLayout::add`]; pass 2 only reads
/// it through [`SheetLayout::table_bounds`].
pub trait SheetLayout {
    /// Register a box whose sheet position is its own position shifted down
    /// by `vertical_offset`. Returns true if new breaks were added.
    fn add(&mut self, node: &RenderBox, vertical_offset: Coord) -> bool;

    /// Register replaced content (images, drawables, shapes). Returns true
    /// if new breaks were added.
    fn add_renderable_content(&mut self, node: &RenderBox, vertical_offset: Coord) -> bool;

    /// Grid cells covered by a rectangle in sheet coordinates.
    fn table_bounds(&self, x: Coord, y: Coord, width: Coord, height: Coord) -> TableRectangle;

    /// Number of rows between the collected breaks.
    fn row_count(&self) -> usize;

    /// Number of columns between the collected breaks.
    fn column_count(&self) -> usize;

    /// Position of the last column break.
    fn max_width(&self) -> Coord;

    /// Position of the last row break.
    fn max_height(&self) -> Coord;

    /// Row break positions, ascending.
    fn row_breaks(&self) -> &[Coord];

    /// Column break positions, ascending.
    fn column_breaks(&self) -> &[Coord];

    /// Called once a physical page has been fully processed.
    fn page_completed(&mut self);
}

/// A [`SheetLayout`] storing sorted break positions.
///
/// In strict mode every registered box contributes its edges. Otherwise
/// container boxes that paint neither a background nor a border are
/// ignored, which keeps the grid free of rows and columns that only mirror
/// invisible structure.
#[derive(Debug, Clone)]
pub struct BreakSheetLayout {
    strict: bool,
    column_breaks: Vec<Coord>,
    row_breaks: Vec<Coord>,
    page_breaks: Vec<usize>,
}

impl BreakSheetLayout {
    /// An empty layout.
    #[must_use]
    pub fn new(strict: bool) -> Self {
        BreakSheetLayout {
            strict,
            column_breaks: Vec::new(),
            row_breaks: Vec::new(),
            page_breaks: Vec::new(),
        }
    }

    /// Returns true if every box contributes breaks.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Row count recorded at each completed page.
    #[must_use]
    pub fn page_breaks(&self) -> &[usize] {
        &self.page_breaks
    }

    /// Forget all breaks, for recomputing a layout from scratch or starting
    /// the next page. The page history is kept.
    pub fn clear(&mut self) {
        self.column_breaks.clear();
        self.row_breaks.clear();
    }

    fn register(&mut self, x: Coord, y: Coord, width: Coord, height: Coord) -> bool {
        let width = width.max(0);
        let height = height.max(0);
        let mut changed = insert_break(&mut self.column_breaks, x);
        changed |= insert_break(&mut self.column_breaks, x + width);
        changed |= insert_break(&mut self.row_breaks, y);
        changed |= insert_break(&mut self.row_breaks, y + height);
        changed
    }
}

impl Default for BreakSheetLayout {
    fn default() -> Self {
        Self::new(false)
    }
}

fn insert_break(breaks: &mut Vec<Coord>, position: Coord) -> bool {
    match breaks.binary_search(&position) {
        Ok(_) => false,
        Err(index) => {
            breaks.insert(index, position);
            true
        }
    }
}

/// For every track between `new` breaks, the track between `old` breaks
/// that contains it.
///
/// Breaks are only ever added while a page is processed, so each old track
/// is split into one or more consecutive new tracks. New tracks outside the
/// old extent map to `None`.
#[must_use]
pub fn track_map(old: &[Coord], new: &[Coord]) -> Vec<Option<usize>> {
    new.windows(2)
        .map(|track| {
            let next = old.partition_point(|&b| b <= track[0]);
            (next > 0 && next < old.len()).then(|| next - 1)
        })
        .collect()
}

/// Cells `first..last` covered by `start..end`, clamped to the cells that
/// exist. An empty extent still covers the cell it starts in.
fn span(breaks: &[Coord], start: Coord, end: Coord) -> (usize, usize) {
    let cells = breaks.len().saturating_sub(1);
    if cells == 0 {
        return (0, 0);
    }
    let first = breaks
        .partition_point(|&b| b <= start)
        .saturating_sub(1)
        .min(cells - 1);
    let last = breaks.partition_point(|&b| b < end).clamp(first + 1, cells);
    (first, last)
}

impl SheetLayout for BreakSheetLayout {
    fn add(&mut self, node: &RenderBox, vertical_offset: Coord) -> bool {
        if !self.strict && node.kind.is_container() && !node.is_decorated() {
            return false;
        }
        self.register(node.x, node.y + vertical_offset, node.width, node.height)
    }

    fn add_renderable_content(&mut self, node: &RenderBox, vertical_offset: Coord) -> bool {
        self.register(node.x, node.y + vertical_offset, node.width, node.height)
    }

    fn table_bounds(&self, x: Coord, y: Coord, width: Coord, height: Coord) -> TableRectangle {
        let (col1, col2) = span(&self.column_breaks, x, x + width.max(0));
        let (row1, row2) = span(&self.row_breaks, y, y + height.max(0));
        TableRectangle::new(row1, col1, row2, col2)
    }

    fn row_count(&self) -> usize {
        self.row_breaks.len().saturating_sub(1)
    }

    fn column_count(&self) -> usize {
        self.column_breaks.len().saturating_sub(1)
    }

    fn max_width(&self) -> Coord {
        self.column_breaks.last().copied().unwrap_or(0)
    }

    fn max_height(&self) -> Coord {
        self.row_breaks.last().copied().unwrap_or(0)
    }

    fn row_breaks(&self) -> &[Coord] {
        &self.row_breaks
    }

    fn column_breaks(&self) -> &[Coord] {
        &self.column_breaks
    }

    fn page_completed(&mut self) {
        let rows = self.row_count();
        self.page_breaks.push(rows);
        log::debug!(
            "sheet layout: page completed with {rows} rows, {} columns",
            self.column_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_clamps_to_existing_cells() {
        let breaks = [0, 10, 20, 30];
        assert_eq!(span(&breaks, 10, 20), (1, 2));
        assert_eq!(span(&breaks, 0, 30), (0, 3));
        assert_eq!(span(&breaks, 10, 10), (1, 2));
        assert_eq!(span(&breaks, -5, 5), (0, 1));
        assert_eq!(span(&breaks, 25, 90), (2, 3));
        assert_eq!(span(&breaks, 40, 50), (2, 3));
        assert_eq!(span(&[7], 0, 10), (0, 0));
        assert_eq!(span(&[], 0, 10), (0, 0));
    }

    #[test]
    fn test_track_map_follows_split_tracks() {
        // Column 0..600 split at 300, a new column appended at 600..700.
        assert_eq!(
            track_map(&[0, 600], &[0, 300, 600, 700]),
            vec![Some(0), Some(0), None]
        );
        assert_eq!(
            track_map(&[0, 10, 20], &[-5, 0, 5, 10, 20]),
            vec![None, Some(0), Some(0), Some(1)]
        );
        assert_eq!(track_map(&[], &[0, 10]), vec![None]);
        assert!(track_map(&[0, 10], &[]).is_empty());
    }

    #[test]
    fn test_insert_break_reports_changes() {
        let mut breaks = vec![0, 20];
        assert!(insert_break(&mut breaks, 10));
        assert!(!insert_break(&mut breaks, 10));
        assert_eq!(breaks, vec![0, 10, 20]);
    }
}
