//! Resolved style lookup.
//!
//! A [`StyleSheet`] is the cascade's output for one element: a flat map from
//! [`StyleKey`] to [`StyleValue`] plus the style's kind (the fully qualified
//! name of the style class it came from). Style sheets are shared by
//! reference and never mutated in place while the engine holds them; a host
//! that restyles an element hands over a new sheet together with the next
//! [`ChangeTracker`] value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::values::{BorderStyle, BoxSizing, Color, RenderLength, StyleValue, ValueError};

/// Monotonically increasing version stamp of a style sheet.
///
/// Derived data (box definitions, content classification) records the
/// tracker it was computed from and is recomputed whenever the tracker
/// handed over with the style differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ChangeTracker(pub u64);

impl ChangeTracker {
    /// The stamp following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        ChangeTracker(self.0 + 1)
    }
}

impl fmt::Display for ChangeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// The value type a [`StyleKey`] expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// [`StyleValue::Length`]
    Length,
    /// [`StyleValue::Color`]
    Color,
    /// [`StyleValue::BorderStyle`]
    BorderStyle,
    /// [`StyleValue::BoxSizing`]
    BoxSizing,
    /// [`StyleValue::Text`]
    Text,
}

/// Style properties read by the engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum StyleKey {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    BoxSizing,
    FixedPosition,

    PaddingTop,
    PaddingLeft,
    PaddingBottom,
    PaddingRight,

    MarginTop,
    MarginLeft,
    MarginBottom,
    MarginRight,

    BorderTopStyle,
    BorderTopColor,
    BorderTopWidth,
    BorderLeftStyle,
    BorderLeftColor,
    BorderLeftWidth,
    BorderBottomStyle,
    BorderBottomColor,
    BorderBottomWidth,
    BorderRightStyle,
    BorderRightColor,
    BorderRightWidth,
    BorderBreakStyle,
    BorderBreakColor,
    BorderBreakWidth,

    BorderTopLeftRadiusWidth,
    BorderTopLeftRadiusHeight,
    BorderTopRightRadiusWidth,
    BorderTopRightRadiusHeight,
    BorderBottomLeftRadiusWidth,
    BorderBottomLeftRadiusHeight,
    BorderBottomRightRadiusWidth,
    BorderBottomRightRadiusHeight,

    BackgroundColor,
    SheetName,
    Href,
    Anchor,
}

impl StyleKey {
    /// The value type this key expects.
    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        match self {
            StyleKey::BorderTopStyle
            | StyleKey::BorderLeftStyle
            | StyleKey::BorderBottomStyle
            | StyleKey::BorderRightStyle
            | StyleKey::BorderBreakStyle => ValueKind::BorderStyle,
            StyleKey::BorderTopColor
            | StyleKey::BorderLeftColor
            | StyleKey::BorderBottomColor
            | StyleKey::BorderRightColor
            | StyleKey::BorderBreakColor
            | StyleKey::BackgroundColor => ValueKind::Color,
            StyleKey::BoxSizing => ValueKind::BoxSizing,
            StyleKey::SheetName | StyleKey::Href | StyleKey::Anchor => ValueKind::Text,
            _ => ValueKind::Length,
        }
    }

    /// Parse a textual value according to this key's value kind.
    ///
    /// # Errors
    ///
    /// Returns the [`ValueError`] of the expected kind if the text does not
    /// parse.
    pub fn parse_value(self, text: &str) -> Result<StyleValue, ValueError> {
        Ok(match self.value_kind() {
            ValueKind::Length => StyleValue::Length(RenderLength::parse(text)?),
            ValueKind::Color => StyleValue::Color(Color::from_hex(text)?),
            ValueKind::BorderStyle => StyleValue::BorderStyle(
                text.parse()
                    .map_err(|_| ValueError::BorderStyle(text.to_string()))?,
            ),
            ValueKind::BoxSizing => StyleValue::BoxSizing(
                text.parse()
                    .map_err(|_| ValueError::BoxSizing(text.to_string()))?,
            ),
            ValueKind::Text => StyleValue::Text(text.to_string()),
        })
    }
}

/// Resolved style values of one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleSheet {
    /// Fully qualified kind of the style (e.g. `band`, `element/text`),
    /// shared with the cache keys derived from it.
    kind: Arc<str>,
    values: HashMap<StyleKey, StyleValue>,
}

impl StyleSheet {
    /// An empty style sheet of the given kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        StyleSheet {
            kind: Arc::from(kind.into()),
            values: HashMap::new(),
        }
    }

    /// Builder form of [`StyleSheet::set`].
    #[must_use]
    pub fn with(mut self, key: StyleKey, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, key: StyleKey, value: impl Into<StyleValue>) {
        let _ = self.values.insert(key, value.into());
    }

    /// Remove a value.
    pub fn remove(&mut self, key: StyleKey) {
        let _ = self.values.remove(&key);
    }

    /// The style's fully qualified kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The style's kind as a shared string.
    #[must_use]
    pub const fn shared_kind(&self) -> &Arc<str> {
        &self.kind
    }

    /// Raw lookup.
    #[must_use]
    pub fn get(&self, key: StyleKey) -> Option<&StyleValue> {
        self.values.get(&key)
    }

    /// Number of values set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no value is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A length value, if the key holds one.
    #[must_use]
    pub fn length(&self, key: StyleKey) -> Option<RenderLength> {
        match self.values.get(&key)? {
            StyleValue::Length(length) => Some(*length),
            _ => None,
        }
    }

    /// A colour value, if the key holds one.
    #[must_use]
    pub fn color(&self, key: StyleKey) -> Option<Color> {
        match self.values.get(&key)? {
            StyleValue::Color(color) => Some(*color),
            _ => None,
        }
    }

    /// A border style, defaulting to [`BorderStyle::None`].
    #[must_use]
    pub fn border_style(&self, key: StyleKey) -> BorderStyle {
        match self.values.get(&key) {
            Some(StyleValue::BorderStyle(style)) => *style,
            _ => BorderStyle::None,
        }
    }

    /// The box-sizing mode, defaulting to [`BoxSizing::ContentBox`].
    #[must_use]
    pub fn box_sizing(&self) -> BoxSizing {
        match self.values.get(&StyleKey::BoxSizing) {
            Some(StyleValue::BoxSizing(sizing)) => *sizing,
            _ => BoxSizing::ContentBox,
        }
    }

    /// A text value, if the key holds a non-empty one.
    #[must_use]
    pub fn text(&self, key: StyleKey) -> Option<&str> {
        match self.values.get(&key)? {
            StyleValue::Text(text) if !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}
