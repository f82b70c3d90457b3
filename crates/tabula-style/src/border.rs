//! Border edges, corners and the shared empty border.
//!
//! Most report elements carry no border at all. Derivation therefore hands
//! out one process-wide empty [`Border`] instead of allocating a fresh one
//! per element, and compares against it with [`Arc::ptr_eq`].

use std::sync::{Arc, LazyLock};

use crate::units::Coord;
use crate::values::{BorderStyle, Color};

static EMPTY_BORDER: LazyLock<Arc<Border>> = LazyLock::new(|| {
    Arc::new(Border {
        top: BorderEdge::EMPTY,
        left: BorderEdge::EMPTY,
        bottom: BorderEdge::EMPTY,
        right: BorderEdge::EMPTY,
        split: BorderEdge::EMPTY,
        top_left: BorderCorner::EMPTY,
        top_right: BorderCorner::EMPTY,
        bottom_left: BorderCorner::EMPTY,
        bottom_right: BorderCorner::EMPTY,
    })
});

/// One side of a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    /// Line style.
    pub style: BorderStyle,
    /// Line colour.
    pub color: Color,
    /// Line width in internal units.
    pub width: Coord,
}

impl BorderEdge {
    /// The edge that draws nothing.
    pub const EMPTY: Self = BorderEdge {
        style: BorderStyle::None,
        color: Color::BLACK,
        width: 0,
    };

    /// Build an edge, or [`BorderEdge::EMPTY`] unless the style draws
    /// something, a colour is given and the width is strictly positive.
    #[must_use]
    pub fn new(style: BorderStyle, color: Option<Color>, width: Coord) -> Self {
        match color {
            Some(color) if !style.is_none() && width > 0 => BorderEdge {
                style,
                color,
                width,
            },
            _ => BorderEdge::EMPTY,
        }
    }

    /// Returns true if this edge draws nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.style.is_none() || self.width <= 0
    }

    /// The width this edge contributes to the box, zero when empty.
    #[must_use]
    pub const fn effective_width(&self) -> Coord {
        if self.is_empty() { 0 } else { self.width }
    }
}

/// A rounded corner, described by its two radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderCorner {
    /// Horizontal radius in internal units.
    pub width: Coord,
    /// Vertical radius in internal units.
    pub height: Coord,
}

impl BorderCorner {
    /// A square corner.
    pub const EMPTY: Self = BorderCorner {
        width: 0,
        height: 0,
    };

    /// Build a corner, or [`BorderCorner::EMPTY`] if either radius is not
    /// strictly positive.
    #[must_use]
    pub const fn new(width: Coord, height: Coord) -> Self {
        if width <= 0 || height <= 0 {
            BorderCorner::EMPTY
        } else {
            BorderCorner { width, height }
        }
    }

    /// Returns true for a square corner.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// The border of a box: four edges, the edge drawn where the box is broken
/// across a page or column, and four corners.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Border {
    /// Top edge.
    pub top: BorderEdge,
    /// Left edge.
    pub left: BorderEdge,
    /// Bottom edge.
    pub bottom: BorderEdge,
    /// Right edge.
    pub right: BorderEdge,
    /// Edge drawn along a page or column break.
    pub split: BorderEdge,
    /// Top-left corner.
    pub top_left: BorderCorner,
    /// Top-right corner.
    pub top_right: BorderCorner,
    /// Bottom-left corner.
    pub bottom_left: BorderCorner,
    /// Bottom-right corner.
    pub bottom_right: BorderCorner,
}

impl Border {
    /// The shared empty border.
    #[must_use]
    pub fn empty() -> Arc<Border> {
        Arc::clone(&EMPTY_BORDER)
    }

    /// Returns true if no edge draws anything. Corners are ignored; they
    /// only shape edges that exist.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.top.is_empty()
            && self.left.is_empty()
            && self.bottom.is_empty()
            && self.right.is_empty()
            && self.split.is_empty()
    }

    /// Wrap in an [`Arc`], reusing the shared empty border when no edge
    /// draws anything.
    #[must_use]
    pub fn into_shared(self) -> Arc<Border> {
        if self.is_empty() {
            Border::empty()
        } else {
            Arc::new(self)
        }
    }

    /// Split into a top and a bottom part.
    ///
    /// The top part loses its bottom edge and bottom corners, the bottom
    /// part loses its top edge and top corners. Both keep the break edge so
    /// writers can draw it along the cut.
    #[must_use]
    pub fn split_vertically(&self) -> (Border, Border) {
        let first = Border {
            bottom: BorderEdge::EMPTY,
            bottom_left: BorderCorner::EMPTY,
            bottom_right: BorderCorner::EMPTY,
            ..self.clone()
        };
        let second = Border {
            top: BorderEdge::EMPTY,
            top_left: BorderCorner::EMPTY,
            top_right: BorderCorner::EMPTY,
            ..self.clone()
        };
        (first, second)
    }

    /// Split into a left and a right part.
    ///
    /// The left part loses its right edge and right corners, the right part
    /// loses its left edge and left corners.
    #[must_use]
    pub fn split_horizontally(&self) -> (Border, Border) {
        let first = Border {
            right: BorderEdge::EMPTY,
            top_right: BorderCorner::EMPTY,
            bottom_right: BorderCorner::EMPTY,
            ..self.clone()
        };
        let second = Border {
            left: BorderEdge::EMPTY,
            top_left: BorderCorner::EMPTY,
            bottom_left: BorderCorner::EMPTY,
            ..self.clone()
        };
        (first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: Coord) -> BorderEdge {
        BorderEdge::new(BorderStyle::Solid, Some(Color::BLACK), width)
    }

    #[test]
    fn test_edge_requires_style_color_and_width() {
        assert!(!solid(1000).is_empty());
        assert_eq!(solid(0), BorderEdge::EMPTY);
        assert_eq!(
            BorderEdge::new(BorderStyle::None, Some(Color::BLACK), 1000),
            BorderEdge::EMPTY
        );
        assert_eq!(BorderEdge::new(BorderStyle::Solid, None, 1000), BorderEdge::EMPTY);
    }

    #[test]
    fn test_corner_requires_both_radii() {
        assert_eq!(BorderCorner::new(0, 5), BorderCorner::EMPTY);
        assert_eq!(BorderCorner::new(5, -1), BorderCorner::EMPTY);
        assert!(!BorderCorner::new(5, 5).is_empty());
    }

    #[test]
    fn test_empty_border_is_shared() {
        let a = Border::empty();
        let b = (*Border::empty()).clone().into_shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_vertical_split_clears_inner_edges() {
        let border = Border {
            top: solid(1000),
            bottom: solid(2000),
            top_left: BorderCorner::new(3000, 3000),
            bottom_right: BorderCorner::new(3000, 3000),
            ..(*Border::empty()).clone()
        };
        let (top, bottom) = border.split_vertically();
        assert_eq!(top.top, solid(1000));
        assert!(top.bottom.is_empty());
        assert!(top.bottom_right.is_empty());
        assert!(bottom.top.is_empty());
        assert!(bottom.top_left.is_empty());
        assert_eq!(bottom.bottom, solid(2000));
    }
}
