//! Box kinds and per-box state.
//!
//! A [`RenderBox`] is what the upstream layout pass hands over: a kind, a
//! position and size in the coordinate frame of its page area, the resolved
//! style together with its [`ChangeTracker`], the derived [`BoxDefinition`]
//! and two progress flags. `committed` means the layouter will not move the
//! box again; `open` means the box may still receive children.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use strum_macros::{Display, EnumIter, EnumString};
use tabula_style::{
    BoxDefinition, ChangeTracker, Color, Coord, InstanceId, StyleKey, StyleSheet,
};
use thiserror::Error;

/// A type-safe index into a [`crate::BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub usize);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box{}", self.0)
    }
}

/// Geometric primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
    Other,
}

/// Content that is rendered by an external painter rather than laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacedKind {
    /// A raster image.
    Image,
    /// Vector content drawn by a callback (charts, barcodes).
    Drawable,
    /// A geometric shape.
    Shape(ShapeKind),
}

/// Structural kind of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxKind {
    /// Block-level container, stacks its children vertically.
    Block,
    /// Absolutely positioned container.
    Canvas,
    /// Horizontal container (children side by side).
    Row,
    /// Inline container inside a paragraph.
    Inline,
    /// Paragraph; its line boxes and inline children are never visited on
    /// their own.
    Paragraph,
    /// A run of text.
    Text,
    /// Replaced content.
    Replaced(ReplacedKind),
}

impl BoxKind {
    /// Returns true for the kinds that only group other boxes.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            BoxKind::Block | BoxKind::Canvas | BoxKind::Row | BoxKind::Inline
        )
    }
}

/// Error returned when parsing an unknown box kind name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown box kind '{0}'")]
pub struct UnknownBoxKind(pub String);

impl FromStr for BoxKind {
    type Err = UnknownBoxKind;

    /// Parses `block`, `canvas`, `row`, `inline`, `paragraph`, `text`,
    /// `image`, `drawable` and `shape:<line|rectangle|ellipse|other>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let kind = match name.as_str() {
            "block" => BoxKind::Block,
            "canvas" => BoxKind::Canvas,
            "row" => BoxKind::Row,
            "inline" => BoxKind::Inline,
            "paragraph" => BoxKind::Paragraph,
            "text" => BoxKind::Text,
            "image" => BoxKind::Replaced(ReplacedKind::Image),
            "drawable" => BoxKind::Replaced(ReplacedKind::Drawable),
            other => {
                let shape = other
                    .strip_prefix("shape:")
                    .and_then(|shape| shape.parse::<ShapeKind>().ok())
                    .ok_or_else(|| UnknownBoxKind(s.to_string()))?;
                BoxKind::Replaced(ReplacedKind::Shape(shape))
            }
        };
        Ok(kind)
    }
}

impl fmt::Display for BoxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxKind::Block => f.write_str("block"),
            BoxKind::Canvas => f.write_str("canvas"),
            BoxKind::Row => f.write_str("row"),
            BoxKind::Inline => f.write_str("inline"),
            BoxKind::Paragraph => f.write_str("paragraph"),
            BoxKind::Text => f.write_str("text"),
            BoxKind::Replaced(ReplacedKind::Image) => f.write_str("image"),
            BoxKind::Replaced(ReplacedKind::Drawable) => f.write_str("drawable"),
            BoxKind::Replaced(ReplacedKind::Shape(shape)) => write!(f, "shape:{shape}"),
        }
    }
}

/// A positioned, sized box produced by the upstream layout pass.
#[derive(Debug, Clone)]
pub struct RenderBox {
    /// Structural kind.
    pub kind: BoxKind,
    /// Report element this box was generated for.
    pub instance: InstanceId,
    /// Left edge, in the coordinate frame of the page area.
    pub x: Coord,
    /// Top edge, in the coordinate frame of the page area.
    pub y: Coord,
    /// Width.
    pub width: Coord,
    /// Height.
    pub height: Coord,
    /// Resolved style.
    pub style: Arc<StyleSheet>,
    /// Version of `style` at the time the box was laid out.
    pub change_tracker: ChangeTracker,
    /// Geometric contribution derived from `style`.
    pub definition: Arc<BoxDefinition>,
    /// The layouter will not move this box again.
    pub committed: bool,
    /// The box may still receive children.
    pub open: bool,
    /// Text carried by text boxes; empty otherwise.
    pub text: String,
    /// Parent box, if attached.
    pub parent: Option<BoxId>,
    /// Children in document order.
    pub children: Vec<BoxId>,
}

impl RenderBox {
    /// A committed, closed, zero-sized box.
    #[must_use]
    pub fn new(
        kind: BoxKind,
        instance: InstanceId,
        style: Arc<StyleSheet>,
        change_tracker: ChangeTracker,
        definition: Arc<BoxDefinition>,
    ) -> Self {
        RenderBox {
            kind,
            instance,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            style,
            change_tracker,
            definition,
            committed: true,
            open: false,
            text: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder form setting position and size.
    #[must_use]
    pub fn with_bounds(mut self, x: Coord, y: Coord, width: Coord, height: Coord) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Builder form setting the text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder form setting the progress flags.
    #[must_use]
    pub fn with_state(mut self, committed: bool, open: bool) -> Self {
        self.committed = committed;
        self.open = open;
        self
    }

    /// Returns true once the layouter is done with this box.
    #[must_use]
    pub const fn is_finished_by_layout(&self) -> bool {
        self.committed && !self.open
    }

    /// The visible background colour, if any.
    #[must_use]
    pub fn background_color(&self) -> Option<Color> {
        self.style
            .color(StyleKey::BackgroundColor)
            .filter(|color| !color.is_transparent())
    }

    /// Returns true if the box paints a background or a border.
    #[must_use]
    pub fn is_decorated(&self) -> bool {
        self.background_color().is_some() || !self.definition.border().is_empty()
    }

    /// Sheet name requested by the box's style.
    #[must_use]
    pub fn sheet_name(&self) -> Option<&str> {
        self.style.text(StyleKey::SheetName)
    }

    /// Bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> Coord {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use tabula_style::derive_box_definition;

    #[test]
    fn test_box_kind_names_round_trip() {
        let mut kinds = vec![
            BoxKind::Block,
            BoxKind::Canvas,
            BoxKind::Row,
            BoxKind::Inline,
            BoxKind::Paragraph,
            BoxKind::Text,
            BoxKind::Replaced(ReplacedKind::Image),
            BoxKind::Replaced(ReplacedKind::Drawable),
        ];
        kinds.extend(ShapeKind::iter().map(|shape| BoxKind::Replaced(ReplacedKind::Shape(shape))));
        for kind in kinds {
            assert_eq!(kind.to_string().parse::<BoxKind>(), Ok(kind));
        }
        assert_eq!(
            "SHAPE:Ellipse".parse::<BoxKind>(),
            Ok(BoxKind::Replaced(ReplacedKind::Shape(ShapeKind::Ellipse)))
        );
        assert!("shape:star".parse::<BoxKind>().is_err());
        assert!("table".parse::<BoxKind>().is_err());
    }

    #[test]
    fn test_decoration() {
        let plain = Arc::new(StyleSheet::new("band"));
        let definition = Arc::new(derive_box_definition(&plain));
        let node = RenderBox::new(
            BoxKind::Block,
            InstanceId(1),
            Arc::clone(&plain),
            ChangeTracker(0),
            Arc::clone(&definition),
        );
        assert!(!node.is_decorated());

        let painted = Arc::new(
            StyleSheet::new("band").with(StyleKey::BackgroundColor, Color { r: 255, g: 0, b: 0, a: 255 }),
        );
        let node = RenderBox::new(
            BoxKind::Block,
            InstanceId(2),
            painted,
            ChangeTracker(0),
            definition,
        );
        assert!(node.is_decorated());
        assert!(node.is_finished_by_layout());
    }
}
