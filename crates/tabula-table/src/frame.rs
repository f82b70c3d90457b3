//! Placement of page areas in sheet coordinates.
//!
//! In aligned mode the layouter already stacked the areas in one frame, so
//! the page offset is subtracted uniformly. In unaligned mode every area is
//! zero-based and the areas are stacked here: header, then the body window,
//! then the repeat footer, then the footer.

use tabula_layout::{PageArea, PageBox, RenderBox};
use tabula_style::Coord;

use crate::marker::SectionType;

/// Where one page area lands in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AreaFrame {
    pub(crate) area: PageArea,
    pub(crate) section: SectionType,
    /// Added to a box's own `y` to get its sheet position.
    pub(crate) delta: Coord,
}

impl AreaFrame {
    pub(crate) fn new(page: &PageBox, area: PageArea, unaligned: bool) -> Self {
        let delta = if unaligned {
            let header = page.area_height(PageArea::Header);
            match area {
                PageArea::Watermark | PageArea::Header => 0,
                PageArea::Body => header - page.page_offset(),
                PageArea::RepeatFooter => header + page.window_height(),
                PageArea::Footer => {
                    header + page.window_height() + page.area_height(PageArea::RepeatFooter)
                }
            }
        } else {
            -page.page_offset()
        };
        AreaFrame {
            area,
            section: SectionType::for_area(area),
            delta,
        }
    }

    /// Only the body is windowed; the other areas belong to the page as a
    /// whole.
    pub(crate) const fn is_visible(&self, page: &PageBox, node: &RenderBox) -> bool {
        match self.area {
            PageArea::Body => page.intersects_window(node.y, node.height),
            _ => true,
        }
    }
}
