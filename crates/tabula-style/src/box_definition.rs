//! Immutable geometric box definitions.
//!
//! A [`BoxDefinition`] is the part of an element's geometry that does not
//! depend on its content: paddings, border, margins, the min/max/preferred
//! sizes and the fixed-position offset. Definitions are built through the
//! [`crate::BoxDefinitionFactory`] and locked before anyone else sees them.
//!
//! ```text
//! ┌──────────────────────────── margin ───────────────────────────┐
//! │   ┌──────────────────────── border ───────────────────────┐   │
//! │   │   ┌──────────────────── padding ──────────────────┐   │   │
//! │   │   │                    content                    │   │   │
//! │   │   └───────────────────────────────────────────────┘   │   │
//! │   └───────────────────────────────────────────────────────┘   │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use crate::border::Border;
use crate::units::Coord;
use crate::values::RenderLength;

/// The axis along which a box definition is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Split into a left and a right part (multi-column flow).
    Horizontal,
    /// Split into a top and a bottom part (page or row break).
    Vertical,
}

/// The geometric contribution of an element, independent of its content.
///
/// All setters panic once the definition is locked. Locking happens inside
/// the factory and inside [`BoxDefinition::split`]; callers that build
/// definitions by hand must call [`BoxDefinition::lock`] themselves before
/// sharing them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoxDefinition {
    padding_top: Coord,
    padding_left: Coord,
    padding_bottom: Coord,
    padding_right: Coord,

    border: Arc<Border>,

    preferred_width: RenderLength,
    preferred_height: RenderLength,
    min_width: RenderLength,
    min_height: RenderLength,
    max_width: RenderLength,
    max_height: RenderLength,

    margin_top: Coord,
    margin_left: Coord,
    margin_bottom: Coord,
    margin_right: Coord,

    fixed_position: RenderLength,
    size_specifies_border_box: bool,

    locked: bool,
}

impl Default for BoxDefinition {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! accessors {
    ($($(#[$doc:meta])* $field:ident, $setter:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $field(&self) -> $ty {
                self.$field
            }

            #[doc = concat!("Set `", stringify!($field), "`.")]
            ///
            /// # Panics
            ///
            /// Panics if the definition is locked.
            pub fn $setter(&mut self, value: $ty) {
                self.assert_unlocked();
                self.$field = value;
            }
        )*
    };
}

impl BoxDefinition {
    /// An unlocked definition with zero edges, no border and automatic
    /// sizes.
    #[must_use]
    pub fn new() -> Self {
        BoxDefinition {
            padding_top: 0,
            padding_left: 0,
            padding_bottom: 0,
            padding_right: 0,
            border: Border::empty(),
            preferred_width: RenderLength::Auto,
            preferred_height: RenderLength::Auto,
            min_width: RenderLength::ZERO,
            min_height: RenderLength::ZERO,
            max_width: RenderLength::Auto,
            max_height: RenderLength::Auto,
            margin_top: 0,
            margin_left: 0,
            margin_bottom: 0,
            margin_right: 0,
            fixed_position: RenderLength::Auto,
            size_specifies_border_box: false,
            locked: false,
        }
    }

    accessors! {
        /// Top padding.
        padding_top, set_padding_top: Coord;
        /// Left padding.
        padding_left, set_padding_left: Coord;
        /// Bottom padding.
        padding_bottom, set_padding_bottom: Coord;
        /// Right padding.
        padding_right, set_padding_right: Coord;
        /// Preferred width.
        preferred_width, set_preferred_width: RenderLength;
        /// Preferred height.
        preferred_height, set_preferred_height: RenderLength;
        /// Minimum width.
        min_width, set_min_width: RenderLength;
        /// Minimum height.
        min_height, set_min_height: RenderLength;
        /// Maximum width.
        max_width, set_max_width: RenderLength;
        /// Maximum height.
        max_height, set_max_height: RenderLength;
        /// Top margin.
        margin_top, set_margin_top: Coord;
        /// Left margin.
        margin_left, set_margin_left: Coord;
        /// Bottom margin.
        margin_bottom, set_margin_bottom: Coord;
        /// Right margin.
        margin_right, set_margin_right: Coord;
        /// Vertical offset of a fixed-position element.
        fixed_position, set_fixed_position: RenderLength;
        /// Whether preferred/min/max sizes include padding and border.
        size_specifies_border_box, set_size_specifies_border_box: bool;
    }

    /// The border.
    #[must_use]
    pub fn border(&self) -> &Arc<Border> {
        &self.border
    }

    /// Set the border.
    ///
    /// # Panics
    ///
    /// Panics if the definition is locked.
    pub fn set_border(&mut self, border: Arc<Border>) {
        self.assert_unlocked();
        self.border = border;
    }

    /// Make the definition immutable.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Returns true once [`BoxDefinition::lock`] has been called.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    fn assert_unlocked(&self) {
        assert!(!self.locked, "box definition is locked and cannot be modified");
    }

    /// Returns true if no padding is set.
    #[must_use]
    pub const fn is_empty_padding(&self) -> bool {
        self.padding_top == 0
            && self.padding_left == 0
            && self.padding_bottom == 0
            && self.padding_right == 0
    }

    /// Padding plus border width on the leading side (left or top).
    #[must_use]
    pub fn leading_insets(&self, axis: Axis) -> Coord {
        match axis {
            Axis::Horizontal => self.padding_left + self.border.left.effective_width(),
            Axis::Vertical => self.padding_top + self.border.top.effective_width(),
        }
    }

    /// Padding plus border width on the trailing side (right or bottom).
    #[must_use]
    pub fn trailing_insets(&self, axis: Axis) -> Coord {
        match axis {
            Axis::Horizontal => self.padding_right + self.border.right.effective_width(),
            Axis::Vertical => self.padding_bottom + self.border.bottom.effective_width(),
        }
    }

    /// Split the definition in two along `axis`.
    ///
    /// Splitting along [`Axis::Vertical`] yields a top part keeping the top
    /// margin, padding, border edge and corners, and a bottom part keeping
    /// the bottom ones; the edges along the cut are zero on both parts.
    /// [`Axis::Horizontal`] does the same for left and right. Sizes and the
    /// fixed position are copied unchanged. Both parts are locked.
    #[must_use]
    pub fn split(&self, axis: Axis) -> (BoxDefinition, BoxDefinition) {
        let mut first = BoxDefinition {
            locked: false,
            ..self.clone()
        };
        let mut second = first.clone();

        match axis {
            Axis::Vertical => {
                let (top, bottom) = self.border.split_vertically();
                first.margin_bottom = 0;
                first.padding_bottom = 0;
                first.border = top.into_shared();
                second.margin_top = 0;
                second.padding_top = 0;
                second.border = bottom.into_shared();
            }
            Axis::Horizontal => {
                let (left, right) = self.border.split_horizontally();
                first.margin_right = 0;
                first.padding_right = 0;
                first.border = left.into_shared();
                second.margin_left = 0;
                second.padding_left = 0;
                second.border = right.into_shared();
            }
        }

        first.lock();
        second.lock();
        (first, second)
    }
}
