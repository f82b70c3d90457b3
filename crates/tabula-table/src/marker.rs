//! Cell markers.
//!
//! Every cell of the output grid holds at most one [`CellMarker`]. Markers
//! are only ever created by the content producer, so all variants are
//! `#[non_exhaustive]`: writers match on them but cannot build their own.

use std::fmt;

use strum_macros::{Display, EnumIter};
use tabula_layout::{BoxId, BoxTree, PageArea};
use tabula_style::Coord;

/// Page region a marker originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SectionType {
    /// Not assigned yet.
    #[default]
    Invalid,
    /// Page header (and watermark).
    Header,
    /// The normal flow.
    NormalFlow,
    /// Footer repeated on every page.
    RepeatFooter,
    /// Page footer.
    Footer,
}

impl SectionType {
    /// Section tag of boxes placed through the given page area.
    #[must_use]
    pub const fn for_area(area: PageArea) -> Self {
        match area {
            PageArea::Watermark | PageArea::Header => SectionType::Header,
            PageArea::Body => SectionType::NormalFlow,
            PageArea::RepeatFooter => SectionType::RepeatFooter,
            PageArea::Footer => SectionType::Footer,
        }
    }

    /// One-letter tag used in grid dumps.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            SectionType::Invalid => '?',
            SectionType::Header => 'H',
            SectionType::NormalFlow => 'N',
            SectionType::RepeatFooter => 'R',
            SectionType::Footer => 'F',
        }
    }
}

/// Value stored in one grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellMarker {
    /// Decorative region painted by a box that carries no content.
    #[non_exhaustive]
    Background {
        /// Box that painted the region.
        node: BoxId,
        /// Originating section.
        section: SectionType,
        /// Nesting depth below the area root; deeper boxes paint on top.
        depth: usize,
    },
    /// Actual content.
    #[non_exhaustive]
    Content {
        /// Box holding the content.
        node: BoxId,
        /// Offset that maps the box's own vertical position to sheet
        /// coordinates.
        content_offset: Coord,
        /// Originating section.
        section: SectionType,
    },
    /// Diagnostic stand-in for a marker whose row has been retired.
    #[non_exhaustive]
    Finished {
        /// Text form of the retired marker.
        snapshot: String,
        /// Section of the retired marker.
        section: SectionType,
    },
}

impl CellMarker {
    pub(crate) const fn background(node: BoxId, section: SectionType, depth: usize) -> Self {
        CellMarker::Background {
            node,
            section,
            depth,
        }
    }

    pub(crate) const fn content(node: BoxId, content_offset: Coord, section: SectionType) -> Self {
        CellMarker::Content {
            node,
            content_offset,
            section,
        }
    }

    pub(crate) fn finished(&self) -> Self {
        CellMarker::Finished {
            snapshot: self.to_string(),
            section: self.section(),
        }
    }

    /// Originating section.
    #[must_use]
    pub const fn section(&self) -> SectionType {
        match self {
            CellMarker::Background { section, .. }
            | CellMarker::Content { section, .. }
            | CellMarker::Finished { section, .. } => *section,
        }
    }

    /// Box behind the marker; `None` for retired placeholders.
    #[must_use]
    pub const fn node(&self) -> Option<BoxId> {
        match self {
            CellMarker::Background { node, .. } | CellMarker::Content { node, .. } => Some(*node),
            CellMarker::Finished { .. } => None,
        }
    }

    /// Returns true for content markers.
    #[must_use]
    pub const fn is_content(&self) -> bool {
        matches!(self, CellMarker::Content { .. })
    }

    /// Returns true if a background marker at `depth` may take this cell.
    ///
    /// Content and retired markers are never replaced. Backgrounds give way
    /// to backgrounds nested at least as deep, and always give way when they
    /// carry no section.
    #[must_use]
    pub const fn yields_to_background(&self, depth: usize) -> bool {
        match self {
            CellMarker::Background {
                section,
                depth: current,
                ..
            } => matches!(section, SectionType::Invalid) || *current <= depth,
            CellMarker::Content { .. } | CellMarker::Finished { .. } => false,
        }
    }

    /// Returns true once the layouter is done with the box behind the
    /// marker. Retired placeholders are always finished.
    ///
    /// # Panics
    ///
    /// Panics if the marker refers to a box outside `tree`.
    #[must_use]
    pub fn is_finished(&self, tree: &BoxTree) -> bool {
        self.node()
            .is_none_or(|node| tree[node].is_finished_by_layout())
    }
}

impl fmt::Display for CellMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellMarker::Background {
                node,
                section,
                depth,
            } => write!(f, "background({node}, {section}, depth {depth})"),
            CellMarker::Content {
                node,
                content_offset,
                section,
            } => write!(f, "content({node}, {section}, offset {content_offset})"),
            CellMarker::Finished { snapshot, .. } => write!(f, "finished[{snapshot}]"),
        }
    }
}
