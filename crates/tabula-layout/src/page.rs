//! Logical page.
//!
//! A logical page groups the laid-out boxes into five areas. The body area
//! holds the normal flow of the whole report; `page_offset..page_end` is the
//! window of the flow that belongs to the current physical page. The other
//! areas are laid out per page.

use std::sync::Arc;

use strum_macros::{Display, EnumIter};
use tabula_style::{ChangeTracker, Coord, InstanceId, StyleSheet, derive_box_definition};

use crate::render_box::{BoxId, BoxKind, RenderBox};
use crate::tree::BoxTree;

/// The areas of a logical page, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum PageArea {
    /// Printed behind everything else on every page.
    Watermark,
    /// Page header.
    Header,
    /// The normal flow.
    Body,
    /// Footer repeated at the bottom of every page.
    RepeatFooter,
    /// Page footer.
    Footer,
}

impl PageArea {
    /// Every area, in processing order.
    pub const ALL: [PageArea; 5] = [
        PageArea::Watermark,
        PageArea::Header,
        PageArea::Body,
        PageArea::RepeatFooter,
        PageArea::Footer,
    ];

    const fn index(self) -> usize {
        match self {
            PageArea::Watermark => 0,
            PageArea::Header => 1,
            PageArea::Body => 2,
            PageArea::RepeatFooter => 3,
            PageArea::Footer => 4,
        }
    }
}

/// A logical page: the box tree plus its area roots and page window.
#[derive(Debug, Clone)]
pub struct PageBox {
    tree: BoxTree,
    areas: [BoxId; 5],
    width: Coord,
    page_offset: Coord,
    page_end: Coord,
}

impl PageBox {
    /// A page of the given width whose body window is
    /// `page_offset..page_end`. Each area starts out as an empty, committed
    /// block spanning the page width.
    ///
    /// # Panics
    ///
    /// Panics if `page_end < page_offset`.
    #[must_use]
    pub fn new(width: Coord, page_offset: Coord, page_end: Coord) -> Self {
        assert!(
            page_end >= page_offset,
            "page window ends before it starts ({page_offset}..{page_end})"
        );
        let mut tree = BoxTree::new();
        let areas = PageArea::ALL.map(|area| {
            let style = Arc::new(StyleSheet::new(format!("page-area/{area}")));
            let definition = Arc::new(derive_box_definition(&style));
            let instance = InstanceId(u64::MAX - area.index() as u64);
            tree.alloc(
                RenderBox::new(BoxKind::Block, instance, style, ChangeTracker(0), definition)
                    .with_bounds(0, 0, width, 0),
            )
        });
        PageBox {
            tree,
            areas,
            width,
            page_offset,
            page_end,
        }
    }

    /// The box tree.
    #[must_use]
    pub const fn tree(&self) -> &BoxTree {
        &self.tree
    }

    /// The box tree, for the layouter to update.
    pub const fn tree_mut(&mut self) -> &mut BoxTree {
        &mut self.tree
    }

    /// Root box of an area.
    #[must_use]
    pub const fn area(&self, area: PageArea) -> BoxId {
        self.areas[area.index()]
    }

    /// Height of an area's root box.
    #[must_use]
    pub fn area_height(&self, area: PageArea) -> Coord {
        self.tree[self.area(area)].height
    }

    /// Set the vertical extent of an area's root box.
    pub fn set_area_bounds(&mut self, area: PageArea, y: Coord, height: Coord) {
        let root = self.area(area);
        let node = &mut self.tree[root];
        node.y = y;
        node.height = height;
    }

    /// Add a box below `parent`.
    pub fn add_box(&mut self, parent: BoxId, node: RenderBox) -> BoxId {
        self.tree.add_child(parent, node)
    }

    /// Page width.
    #[must_use]
    pub const fn width(&self) -> Coord {
        self.width
    }

    /// Start of the body window.
    #[must_use]
    pub const fn page_offset(&self) -> Coord {
        self.page_offset
    }

    /// End of the body window.
    #[must_use]
    pub const fn page_end(&self) -> Coord {
        self.page_end
    }

    /// Height of the body window.
    #[must_use]
    pub const fn window_height(&self) -> Coord {
        self.page_end - self.page_offset
    }

    /// Move the body window, as the driver does when advancing to the next
    /// physical page.
    ///
    /// # Panics
    ///
    /// Panics if `page_end < page_offset`.
    pub fn set_window(&mut self, page_offset: Coord, page_end: Coord) {
        assert!(
            page_end >= page_offset,
            "page window ends before it starts ({page_offset}..{page_end})"
        );
        self.page_offset = page_offset;
        self.page_end = page_end;
    }

    /// Returns true if a body box spanning `y..y + height` is at least
    /// partially inside the window. Zero-height boxes are visible when their
    /// position lies inside the window.
    #[must_use]
    pub const fn intersects_window(&self, y: Coord, height: Coord) -> bool {
        if height <= 0 {
            y >= self.page_offset && y < self.page_end
        } else {
            y < self.page_end && y + height > self.page_offset
        }
    }
}
