//! JSON description of a laid-out page.
//!
//! The driver has no layouter of its own, so pages arrive already
//! positioned:
//!
//! ```json
//! {
//!   "width": 600, "page_end": 800,
//!   "header": { "height": 20, "boxes": [ { "kind": "text", "x": 0, "y": 0, "width": 600, "height": 20 } ] },
//!   "body":   { "y": 20, "height": 760, "boxes": [ ... ] }
//! }
//! ```
//!
//! Style entries use the kebab-case key names (`background-color`,
//! `sheet-name`, ...) with the same textual values the style parser accepts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tabula_layout::{BoxId, BoxKind, PageArea, PageBox, RenderBox, UnknownBoxKind};
use tabula_style::{
    BoxDefinitionFactory, ChangeTracker, Coord, InstanceId, StyleKey, StyleSheet, ValueError,
};
use thiserror::Error;

/// Errors produced while loading a page description.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The text is not a valid page document.
    #[error("invalid page document: {0}")]
    Json(#[from] serde_json::Error),
    /// A box names a kind the layout model does not know.
    #[error(transparent)]
    BoxKind(#[from] UnknownBoxKind),
    /// A style entry names an unknown key.
    #[error("unknown style key '{0}'")]
    UnknownStyleKey(String),
    /// A style value does not parse for its key.
    #[error("style '{key}': {source}")]
    InvalidStyleValue {
        /// Offending key.
        key: StyleKey,
        /// Parse failure.
        source: ValueError,
    },
}

/// One page with its five areas.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageDocument {
    /// Page width.
    pub width: Coord,
    /// Start of the body window.
    #[serde(default)]
    pub page_offset: Coord,
    /// End of the body window.
    pub page_end: Coord,
    /// Watermark area.
    #[serde(default)]
    pub watermark: AreaDocument,
    /// Page header.
    #[serde(default)]
    pub header: AreaDocument,
    /// Normal flow.
    #[serde(default)]
    pub body: AreaDocument,
    /// Footer repeated on every page.
    #[serde(default)]
    pub repeat_footer: AreaDocument,
    /// Page footer.
    #[serde(default)]
    pub footer: AreaDocument,
}

/// Bounds and top-level boxes of one page area.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaDocument {
    /// Vertical position of the area.
    #[serde(default)]
    pub y: Coord,
    /// Height of the area.
    #[serde(default)]
    pub height: Coord,
    /// Boxes placed in the area.
    #[serde(default)]
    pub boxes: Vec<BoxDocument>,
}

/// A positioned box and its children.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxDocument {
    /// Box kind, as accepted by [`BoxKind`]'s parser.
    pub kind: String,
    /// Left edge.
    #[serde(default)]
    pub x: Coord,
    /// Top edge.
    #[serde(default)]
    pub y: Coord,
    /// Width.
    #[serde(default)]
    pub width: Coord,
    /// Height.
    #[serde(default)]
    pub height: Coord,
    /// Style kind; defaults to `element/<kind>`.
    #[serde(default)]
    pub style_kind: Option<String>,
    /// Style entries by kebab-case key.
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    /// Text content.
    #[serde(default)]
    pub text: String,
    /// Whether the layouter has committed the box.
    #[serde(default = "committed_by_default")]
    pub committed: bool,
    /// Whether the box may still grow.
    #[serde(default)]
    pub open: bool,
    /// Child boxes.
    #[serde(default)]
    pub children: Vec<BoxDocument>,
}

const fn committed_by_default() -> bool {
    true
}

impl PageDocument {
    /// Read a page description from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] or [`DocumentError::Json`].
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse a page description.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] if the text is malformed.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    fn area(&self, area: PageArea) -> &AreaDocument {
        match area {
            PageArea::Watermark => &self.watermark,
            PageArea::Header => &self.header,
            PageArea::Body => &self.body,
            PageArea::RepeatFooter => &self.repeat_footer,
            PageArea::Footer => &self.footer,
        }
    }

    /// Build the box tree, deriving box definitions through `factory`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown box kinds, unknown style keys and style
    /// values that do not parse.
    pub fn build(&self, factory: &mut BoxDefinitionFactory) -> Result<PageBox, DocumentError> {
        let mut page = PageBox::new(self.width, self.page_offset, self.page_end);
        let mut builder = Builder {
            factory,
            next_instance: 0,
        };
        for area in PageArea::ALL {
            let source = self.area(area);
            page.set_area_bounds(area, source.y, source.height);
            let root = page.area(area);
            for node in &source.boxes {
                let _ = builder.add(&mut page, root, node)?;
            }
        }
        Ok(page)
    }
}

struct Builder<'a> {
    factory: &'a mut BoxDefinitionFactory,
    next_instance: u64,
}

impl Builder<'_> {
    fn add(
        &mut self,
        page: &mut PageBox,
        parent: BoxId,
        node: &BoxDocument,
    ) -> Result<BoxId, DocumentError> {
        let kind: BoxKind = node.kind.parse()?;
        let style_kind = node
            .style_kind
            .clone()
            .unwrap_or_else(|| format!("element/{kind}"));
        let mut style = StyleSheet::new(style_kind);
        for (name, text) in &node.style {
            let key: StyleKey = name
                .parse()
                .map_err(|_| DocumentError::UnknownStyleKey(name.clone()))?;
            let value = key
                .parse_value(text)
                .map_err(|source| DocumentError::InvalidStyleValue { key, source })?;
            style.set(key, value);
        }

        let instance = InstanceId(self.next_instance);
        self.next_instance += 1;
        let tracker = ChangeTracker(0);
        let definition = self.factory.create_box_definition(instance, &style, tracker);
        let id = page.add_box(
            parent,
            RenderBox::new(kind, instance, Arc::new(style), tracker, definition)
                .with_bounds(node.x, node.y, node.width, node.height)
                .with_text(node.text.clone())
                .with_state(node.committed, node.open),
        );
        for child in &node.children {
            let _ = self.add(page, id, child)?;
        }
        Ok(id)
    }
}
