//! Pass 1: discover row and column breaks.
//!
//! The layout producer walks the page areas in document order and hands
//! every finished, visible box to the [`SheetLayout`]. Boxes are registered
//! at most once per page, so the producer can be called again for every
//! streaming slice of a page without duplicating work.

use std::collections::HashSet;

use tabula_common::OutputFeatures;
use tabula_layout::{BoxId, BoxKind, PageArea, PageBox, SheetLayout};

use crate::frame::AreaFrame;

/// Pass 1 of the table export.
#[derive(Debug)]
pub struct TableLayoutProducer {
    watermark_section: bool,
    unaligned: bool,
    header_processed: bool,
    /// Boxes already handed to the sheet layout on this page.
    registered: HashSet<BoxId>,
}

impl TableLayoutProducer {
    /// A producer configured from the output features.
    #[must_use]
    pub fn new(features: &OutputFeatures) -> Self {
        TableLayoutProducer {
            watermark_section: features.watermark_section,
            unaligned: features.unaligned_pagebands,
            header_processed: false,
            registered: HashSet::new(),
        }
    }

    /// Register the page's boxes with `sheet`.
    ///
    /// Iterative calls cover the header (once per page) and the body;
    /// the final call for a page also covers the repeat footer and footer.
    /// Returns true if the sheet layout gained breaks.
    pub fn update(&mut self, page: &PageBox, sheet: &mut dyn SheetLayout, iterative: bool) -> bool {
        let mut changed = false;

        // STEP 1: Watermark and header, once per page.
        if !self.header_processed {
            if self.watermark_section {
                changed |= self.process_area(page, sheet, PageArea::Watermark);
            }
            changed |= self.process_area(page, sheet, PageArea::Header);
            self.header_processed = true;
        }

        // STEP 2: The normal flow.
        changed |= self.process_area(page, sheet, PageArea::Body);

        // STEP 3: Footers only once the page is complete.
        if !iterative {
            changed |= self.process_area(page, sheet, PageArea::RepeatFooter);
            changed |= self.process_area(page, sheet, PageArea::Footer);
        }

        log::trace!(
            "table layout: {} boxes registered, {} rows, {} columns (iterative: {iterative})",
            self.registered.len(),
            sheet.row_count(),
            sheet.column_count()
        );
        changed
    }

    /// Start over for the next page.
    pub fn page_completed(&mut self) {
        self.header_processed = false;
        self.registered.clear();
    }

    /// Returns true once the header of the current page was registered.
    #[must_use]
    pub const fn is_header_processed(&self) -> bool {
        self.header_processed
    }

    /// Returns true if the box was registered on the current page.
    #[must_use]
    pub fn is_registered(&self, id: BoxId) -> bool {
        self.registered.contains(&id)
    }

    fn process_area(&mut self, page: &PageBox, sheet: &mut dyn SheetLayout, area: PageArea) -> bool {
        let frame = AreaFrame::new(page, area, self.unaligned);
        self.visit(page, sheet, &frame, page.area(area))
    }

    fn visit(
        &mut self,
        page: &PageBox,
        sheet: &mut dyn SheetLayout,
        frame: &AreaFrame,
        id: BoxId,
    ) -> bool {
        let tree = page.tree();
        let node = &tree[id];
        let mut changed = false;

        // Boxes outside the window are not registered, but their children
        // may still reach into it.
        if frame.is_visible(page, node)
            && node.is_finished_by_layout()
            && !self.registered.contains(&id)
        {
            changed = match node.kind {
                BoxKind::Replaced(_) => sheet.add_renderable_content(node, frame.delta),
                _ => sheet.add(node, frame.delta),
            };
            let _ = self.registered.insert(id);
        }

        match node.kind {
            BoxKind::Block | BoxKind::Canvas | BoxKind::Row | BoxKind::Inline => {
                for &child in tree.children(id) {
                    changed |= self.visit(page, sheet, frame, child);
                }
            }
            BoxKind::Paragraph | BoxKind::Text | BoxKind::Replaced(_) => {}
        }
        changed
    }
}
