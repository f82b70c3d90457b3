//! Page-processing driver.

use tabula_common::OutputFeatures;
use tabula_layout::{BreakSheetLayout, PageBox, SheetLayout};

use crate::classify::ExtraContentPolicy;
use crate::content_producer::TableContentProducer;
use crate::layout_producer::TableLayoutProducer;

/// Runs both passes against one sheet layout, page after page.
///
/// A page is processed either in one go with [`TableProcessor::finish_page`]
/// or streamed: any number of [`TableProcessor::process_slice`] calls while
/// the layouter commits more of the body, then `finish_page`. After the
/// writer consumed the grid, [`TableProcessor::page_completed`] prepares
/// the next page.
#[derive(Debug)]
pub struct TableProcessor {
    sheet: BreakSheetLayout,
    layout: TableLayoutProducer,
    content: TableContentProducer,
    pages: usize,
}

impl TableProcessor {
    /// A processor configured from the output features.
    #[must_use]
    pub fn new(features: &OutputFeatures) -> Self {
        TableProcessor {
            sheet: BreakSheetLayout::new(features.strict_layout),
            layout: TableLayoutProducer::new(features),
            content: TableContentProducer::new(features.clone()),
            pages: 0,
        }
    }

    /// A processor whose content producer consults `policy`.
    #[must_use]
    pub fn with_policy(features: &OutputFeatures, policy: Box<dyn ExtraContentPolicy>) -> Self {
        TableProcessor {
            content: TableContentProducer::with_policy(features.clone(), policy),
            ..Self::new(features)
        }
    }

    /// Process what the layouter committed so far. Returns the number of
    /// rows retired.
    pub fn process_slice(&mut self, page: &PageBox) -> usize {
        self.run(page, true)
    }

    /// Process the rest of the page, footers included. Returns the number
    /// of rows retired.
    pub fn finish_page(&mut self, page: &PageBox) -> usize {
        self.run(page, false)
    }

    /// Close the current page and reset the per-page state.
    pub fn page_completed(&mut self) {
        self.sheet.page_completed();
        self.layout.page_completed();
        self.content.page_completed();
        self.sheet.clear();
        self.pages += 1;
    }

    /// The grid of the current page.
    #[must_use]
    pub const fn content(&self) -> &TableContentProducer {
        &self.content
    }

    /// The break geometry of the current page.
    #[must_use]
    pub const fn sheet(&self) -> &BreakSheetLayout {
        &self.sheet
    }

    /// The layout pass.
    #[must_use]
    pub const fn layout(&self) -> &TableLayoutProducer {
        &self.layout
    }

    /// Pages completed so far.
    #[must_use]
    pub const fn pages(&self) -> usize {
        self.pages
    }

    fn run(&mut self, page: &PageBox, iterative: bool) -> usize {
        let changed = self.layout.update(page, &mut self.sheet, iterative);
        if changed {
            log::trace!(
                "sheet layout now {} x {}",
                self.sheet.row_count(),
                self.sheet.column_count()
            );
        }
        self.content.compute(page, &self.sheet, iterative);
        self.content.clear_finished_boxes(page.tree())
    }
}
