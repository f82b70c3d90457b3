//! Pass 2: fill the cell grid.
//!
//! The content producer walks the same areas as the layout producer and
//! maps every visible box onto the grid cells its rectangle covers. Boxes
//! without content paint background markers in painter's order (deeper
//! boxes on top); content boxes claim their cells exclusively. Rows whose
//! cells are all finished can be retired to keep memory bounded while a
//! large page is streamed in slices.

use std::collections::HashMap;

use tabula_common::OutputFeatures;
use tabula_layout::{
    BoxId, BoxTree, PageArea, PageBox, RenderBox, SheetLayout, TableRectangle, track_map,
};
use tabula_style::Coord;

use crate::classify::{ContentClassifier, ExtraContentPolicy, NoExtraContent};
use crate::frame::AreaFrame;
use crate::grid::CellGrid;
use crate::grid_dump;
use crate::marker::{CellMarker, SectionType};

/// Walk decision for a visited box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Visit the box's children.
    Descend,
    /// Leave the subtree alone.
    Skip,
}

/// State of a grid row as seen by retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    /// Every cell is defined and finished.
    Finished { has_content: bool },
    /// Some cell is undefined or still being laid out.
    Pending,
}

/// Pass 2 of the table export, and the grid handed to output writers.
pub struct TableContentProducer {
    features: OutputFeatures,
    policy: Box<dyn ExtraContentPolicy>,
    classifier: ContentClassifier,
    grid: CellGrid,
    /// Walk decision of every box that is done for this page.
    finished: HashMap<BoxId, Traversal>,
    header_processed: bool,
    final_compute: bool,
    finished_rows: usize,
    filled_rows: usize,
    sheet_rows: usize,
    sheet_columns: usize,
    sheet_name: Option<String>,
    conflicts: usize,
    /// Breaks the grid indices currently refer to.
    row_breaks: Vec<Coord>,
    column_breaks: Vec<Coord>,
}

impl TableContentProducer {
    /// A producer without extra content rules.
    #[must_use]
    pub fn new(features: OutputFeatures) -> Self {
        Self::with_policy(features, Box::new(NoExtraContent))
    }

    /// A producer asking `policy` about boxes the box model treats as
    /// background.
    #[must_use]
    pub fn with_policy(features: OutputFeatures, policy: Box<dyn ExtraContentPolicy>) -> Self {
        TableContentProducer {
            features,
            policy,
            classifier: ContentClassifier::new(),
            grid: CellGrid::new(),
            finished: HashMap::new(),
            header_processed: false,
            final_compute: false,
            finished_rows: 0,
            filled_rows: 0,
            sheet_rows: 0,
            sheet_columns: 0,
            sheet_name: None,
            conflicts: 0,
            row_breaks: Vec::new(),
            column_breaks: Vec::new(),
        }
    }

    /// Fill the grid from the page's boxes.
    ///
    /// Iterative calls cover the header (once per page) and the body; the
    /// final call also covers the footers and marks every row as filled.
    pub fn compute(&mut self, page: &PageBox, sheet: &dyn SheetLayout, iterative: bool) {
        // STEP 1: Move what is already painted onto the current breaks.
        self.follow_breaks(sheet);
        self.sheet_rows = self.sheet_rows.max(sheet.row_count());
        self.sheet_columns = self.sheet_columns.max(sheet.column_count());

        // STEP 2: Watermark and header, once per page.
        if !self.header_processed {
            if self.features.watermark_section {
                self.process_area(page, sheet, PageArea::Watermark);
            }
            self.process_area(page, sheet, PageArea::Header);
            self.header_processed = true;
        }

        // STEP 3: The normal flow.
        self.process_area(page, sheet, PageArea::Body);

        // STEP 4: Footers, then every row counts as filled.
        if iterative {
            let _ = self.update_filled_rows(page.tree());
        } else {
            self.process_area(page, sheet, PageArea::RepeatFooter);
            self.process_area(page, sheet, PageArea::Footer);
            self.final_compute = true;
            self.filled_rows = self.row_count();
        }

        if self.features.debug_report_layout {
            log::debug!(
                "table content (iterative: {iterative}):\n{}",
                grid_dump::render(self)
            );
        }
    }

    /// Visit one box, writing its markers.
    ///
    /// A box that is already finished returns the decision recorded when it
    /// finished, without touching the grid.
    pub fn visit(
        &mut self,
        page: &PageBox,
        sheet: &dyn SheetLayout,
        area: PageArea,
        id: BoxId,
        depth: usize,
    ) -> Traversal {
        let frame = AreaFrame::new(page, area, self.features.unaligned_pagebands);
        self.visit_in_frame(page, sheet, &frame, id, depth)
    }

    /// Retire leading rows whose cells are all finished.
    ///
    /// Rows are only retired up to the last row holding content; a
    /// decorative tail stays in the grid because later boxes still compare
    /// against its background markers. Returns the number of rows retired.
    pub fn clear_finished_boxes(&mut self, tree: &BoxTree) -> usize {
        let columns = self.column_count();
        let rows = self.grid.row_count();

        let mut retire_end = self.finished_rows;
        for row in self.finished_rows..rows {
            match self.row_state(tree, row, columns) {
                RowState::Finished { has_content: true } => retire_end = row + 1,
                RowState::Finished { has_content: false } => {}
                RowState::Pending => break,
            }
        }

        let retired = retire_end - self.finished_rows;
        if retired > 0 {
            let verbose = self.features.verbose_cell_markers
                && rows.saturating_mul(columns) < self.features.verbose_cell_marker_threshold;
            for row in self.finished_rows..retire_end {
                if verbose {
                    self.grid.finish_row(row);
                } else {
                    self.grid.clear_row(row);
                }
            }
            log::debug!(
                "table content: retired rows {}..{retire_end}",
                self.finished_rows
            );
            self.finished_rows = retire_end;
        }

        self.filled_rows = if self.final_compute {
            self.row_count()
        } else {
            self.first_undefined_row(columns)
        };
        retired
    }

    /// Count the leading rows that are fully defined and finished.
    pub fn update_filled_rows(&mut self, tree: &BoxTree) -> usize {
        let columns = self.column_count();
        let mut row = self.finished_rows;
        while row < self.grid.row_count()
            && matches!(self.row_state(tree, row, columns), RowState::Finished { .. })
        {
            row += 1;
        }
        self.filled_rows = row;
        row
    }

    /// Start over for the next page.
    pub fn page_completed(&mut self) {
        self.grid.clear();
        self.finished.clear();
        self.header_processed = false;
        self.final_compute = false;
        self.finished_rows = 0;
        self.filled_rows = 0;
        self.sheet_rows = 0;
        self.sheet_columns = 0;
        self.sheet_name = None;
        self.row_breaks.clear();
        self.column_breaks.clear();
    }

    // ---- Writer interface ----

    /// The marker at a cell.
    #[must_use]
    pub fn marker(&self, row: usize, column: usize) -> Option<&CellMarker> {
        self.grid.get(row, column)
    }

    /// The content box at a cell.
    #[must_use]
    pub fn content(&self, row: usize, column: usize) -> Option<BoxId> {
        match self.grid.get(row, column)? {
            CellMarker::Content { node, .. } => Some(*node),
            _ => None,
        }
    }

    /// The background box at a cell.
    #[must_use]
    pub fn background(&self, row: usize, column: usize) -> Option<BoxId> {
        match self.grid.get(row, column)? {
            CellMarker::Background { node, .. } => Some(*node),
            _ => None,
        }
    }

    /// Section of a cell; [`SectionType::Invalid`] for undefined cells.
    #[must_use]
    pub fn section_type(&self, row: usize, column: usize) -> SectionType {
        self.grid
            .get(row, column)
            .map_or(SectionType::Invalid, CellMarker::section)
    }

    /// Offset mapping the content box's own position to sheet coordinates.
    #[must_use]
    pub fn content_offset(&self, row: usize, column: usize) -> Option<Coord> {
        match self.grid.get(row, column)? {
            CellMarker::Content { content_offset, .. } => Some(*content_offset),
            _ => None,
        }
    }

    /// Number of rows, at least as many as the sheet layout declared.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.grid.row_count().max(self.sheet_rows)
    }

    /// Number of columns, at least as many as the sheet layout declared.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.grid.column_count().max(self.sheet_columns)
    }

    /// Rows ready for an incremental writer.
    #[must_use]
    pub const fn filled_rows(&self) -> usize {
        self.filled_rows
    }

    /// Rows already retired from the grid.
    #[must_use]
    pub const fn finished_rows(&self) -> usize {
        self.finished_rows
    }

    /// The first sheet name found on the page.
    #[must_use]
    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    /// Content boxes that could not be placed, over the producer's lifetime.
    #[must_use]
    pub const fn conflicts(&self) -> usize {
        self.conflicts
    }

    /// Returns true if the box is done for this page.
    #[must_use]
    pub fn is_finished(&self, id: BoxId) -> bool {
        self.finished.contains_key(&id)
    }

    // ---- Traversal ----

    /// Re-index the grid when the sheet layout gained breaks since the last
    /// pass. A new break splits a row or column that may already hold
    /// markers of finished boxes; those boxes are not visited again, so
    /// their markers are copied into every track the old one was split
    /// into.
    fn follow_breaks(&mut self, sheet: &dyn SheetLayout) {
        let rows = sheet.row_breaks();
        let columns = sheet.column_breaks();
        if rows == self.row_breaks.as_slice() && columns == self.column_breaks.as_slice() {
            return;
        }

        if self.grid.row_count() > 0 {
            let row_map = track_map(&self.row_breaks, rows);
            let column_map = track_map(&self.column_breaks, columns);
            self.grid.remap(&row_map, &column_map);
            if self.finished_rows > 0 {
                let last_retired = self.finished_rows - 1;
                self.finished_rows = row_map
                    .iter()
                    .rposition(|&row| row == Some(last_retired))
                    .map_or(0, |row| row + 1);
            }
            self.filled_rows = self.finished_rows;
            log::debug!(
                "table content: grid moved onto {} rows, {} columns, {} retired",
                row_map.len(),
                column_map.len(),
                self.finished_rows
            );
        }
        self.row_breaks = rows.to_vec();
        self.column_breaks = columns.to_vec();
    }

    fn process_area(&mut self, page: &PageBox, sheet: &dyn SheetLayout, area: PageArea) {
        let frame = AreaFrame::new(page, area, self.features.unaligned_pagebands);
        self.walk(page, sheet, &frame, page.area(area), 0);
    }

    fn walk(
        &mut self,
        page: &PageBox,
        sheet: &dyn SheetLayout,
        frame: &AreaFrame,
        id: BoxId,
        depth: usize,
    ) {
        if self.visit_in_frame(page, sheet, frame, id, depth) == Traversal::Skip {
            return;
        }
        let tree = page.tree();
        if tree[id].kind.is_container() {
            for &child in tree.children(id) {
                self.walk(page, sheet, frame, child, depth + 1);
            }
        }
    }

    fn visit_in_frame(
        &mut self,
        page: &PageBox,
        sheet: &dyn SheetLayout,
        frame: &AreaFrame,
        id: BoxId,
        depth: usize,
    ) -> Traversal {
        // STEP 1: Already finished boxes are not processed again.
        if let Some(&decision) = self.finished.get(&id) {
            return decision;
        }

        // STEP 2: Invisible boxes are skipped with their subtree.
        let tree = page.tree();
        let node = &tree[id];
        if !frame.is_visible(page, node) {
            return Traversal::Skip;
        }

        if self.sheet_name.is_none() {
            self.sheet_name = node.sheet_name().map(str::to_string);
        }

        // STEP 3: Classify.
        let content =
            self.classifier
                .is_content(tree, id, &self.features, self.policy.as_ref());
        let rect = sheet.table_bounds(node.x, node.y + frame.delta, node.width, node.height);

        if content {
            self.place_content(node, id, rect, frame)
        } else {
            self.place_background(node, id, rect, frame, depth)
        }
    }

    // STEP 4: Background boxes paint every replaceable cell in rows that
    // are not retired yet.
    fn place_background(
        &mut self,
        node: &RenderBox,
        id: BoxId,
        rect: TableRectangle,
        frame: &AreaFrame,
        depth: usize,
    ) -> Traversal {
        if !node.is_finished_by_layout() {
            return Traversal::Descend;
        }
        let _ = self.finished.insert(id, Traversal::Descend);
        // An empty box has no area to paint.
        if node.width <= 0 || node.height <= 0 {
            return Traversal::Descend;
        }
        let first_row = rect.row1.max(self.finished_rows);
        for row in first_row..rect.row2 {
            for column in rect.col1..rect.col2 {
                let replaceable = self
                    .grid
                    .get(row, column)
                    .is_none_or(|marker| marker.yields_to_background(depth));
                if replaceable {
                    self.grid
                        .set(row, column, CellMarker::background(id, frame.section, depth));
                }
            }
        }
        Traversal::Descend
    }

    // STEP 5: Content boxes need their whole rectangle to themselves.
    fn place_content(
        &mut self,
        node: &RenderBox,
        id: BoxId,
        rect: TableRectangle,
        frame: &AreaFrame,
    ) -> Traversal {
        if !node.is_finished_by_layout() {
            return Traversal::Skip;
        }
        let _ = self.finished.insert(id, Traversal::Skip);
        if rect.is_empty() {
            return Traversal::Skip;
        }

        let occupied = rect.row1 < self.finished_rows
            || rect
                .cells()
                .any(|(row, column)| self.grid.get(row, column).is_some_and(CellMarker::is_content));
        if occupied {
            self.conflicts += 1;
            if self.features.report_cell_conflicts {
                log::warn!(
                    "cell conflict: {} {id} at {rect} overlaps content that is already placed",
                    node.kind
                );
            }
            return Traversal::Skip;
        }

        for (row, column) in rect.cells() {
            self.grid.set(
                row,
                column,
                CellMarker::content(id, frame.delta, frame.section),
            );
        }
        Traversal::Skip
    }

    // ---- Rows ----

    fn row_state(&self, tree: &BoxTree, row: usize, columns: usize) -> RowState {
        if columns == 0 {
            return RowState::Pending;
        }
        let mut has_content = false;
        for column in 0..columns {
            match self.grid.get(row, column) {
                Some(marker) if marker.is_finished(tree) => has_content |= marker.is_content(),
                _ => return RowState::Pending,
            }
        }
        RowState::Finished { has_content }
    }

    fn first_undefined_row(&self, columns: usize) -> usize {
        (self.finished_rows..self.grid.row_count())
            .find(|&row| (0..columns).any(|column| self.grid.get(row, column).is_none()))
            .unwrap_or_else(|| self.grid.row_count().max(self.finished_rows))
    }
}

impl std::fmt::Debug for TableContentProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableContentProducer")
            .field("rows", &self.row_count())
            .field("columns", &self.column_count())
            .field("finished_rows", &self.finished_rows)
            .field("filled_rows", &self.filled_rows)
            .field("sheet_name", &self.sheet_name)
            .field("conflicts", &self.conflicts)
            .finish_non_exhaustive()
    }
}
