//! Typed style values.
//!
//! The cascade hands over already-resolved values. Hosts that only have
//! text (configuration files, the CLI page format) parse them here; the
//! accepted syntax is a small subset of CSS: `12pt`, `12` (points), `50%`,
//! `auto`, `#rrggbb`, border style keywords.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::units::{Coord, from_points};

/// Errors produced when parsing a textual style value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The text is not a length, percentage or `auto`.
    #[error("invalid length '{0}'")]
    Length(String),
    /// The text is not a hex colour.
    #[error("invalid color '{0}'")]
    Color(String),
    /// The text is not a known border style keyword.
    #[error("invalid border style '{0}'")]
    BorderStyle(String),
    /// The text is not a known box-sizing keyword.
    #[error("invalid box sizing '{0}'")]
    BoxSizing(String),
}

/// A length as it appears in a box definition.
///
/// Percentages are stored in thousandths of a percent so the type stays
/// integral and hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderLength {
    /// Sized by content or by the containing context.
    #[default]
    Auto,
    /// Not specified at all (distinct from `Auto` for min/max sizes).
    Empty,
    /// An absolute length in internal units.
    Fixed(Coord),
    /// A percentage of the parent extent, in thousandths of a percent.
    Percent(Coord),
}

impl RenderLength {
    /// A zero fixed length.
    pub const ZERO: Self = RenderLength::Fixed(0);

    /// Resolve against a parent extent. `Auto` and `Empty` resolve to zero.
    #[must_use]
    pub const fn resolve(self, parent: Coord) -> Coord {
        match self {
            RenderLength::Fixed(value) => value,
            RenderLength::Percent(thousandths) => parent * thousandths / 100_000,
            RenderLength::Auto | RenderLength::Empty => 0,
        }
    }

    /// Returns true for `Auto`.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, RenderLength::Auto)
    }

    /// Parse `auto`, `none`, `<n>pt`, `<n>` (points) or `<n>%`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Length`] if the text matches none of these.
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        let text = text.trim();
        match text.to_ascii_lowercase().as_str() {
            "auto" => return Ok(RenderLength::Auto),
            "none" | "" => return Ok(RenderLength::Empty),
            _ => {}
        }
        let invalid = || ValueError::Length(text.to_string());
        if let Some(number) = text.strip_suffix('%') {
            let percent: f64 = number.trim().parse().map_err(|_| invalid())?;
            return Ok(RenderLength::Percent(from_points(percent)));
        }
        let number = text.strip_suffix("pt").unwrap_or(text);
        let points: f64 = number.trim().parse().map_err(|_| invalid())?;
        if !points.is_finite() {
            return Err(invalid());
        }
        Ok(RenderLength::Fixed(from_points(points)))
    }
}

/// sRGB colour represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
    /// Alpha channel (0-255, 255 = fully opaque)
    pub a: u8,
}

impl Color {
    /// Black (#000000)
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };

    /// White (#ffffff)
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Color`] for any other form.
    pub fn from_hex(text: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::Color(text.to_string());
        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        let short = |index: usize| {
            u8::from_str_radix(&hex[index..=index].repeat(2), 16).map_err(|_| invalid())
        };
        match hex.len() {
            3 => Ok(Color {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: 255,
            }),
            6 => Ok(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: 255,
            }),
            8 => Ok(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: channel(6..8)?,
            }),
            _ => Err(invalid()),
        }
    }

    /// Returns true if the colour paints nothing.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Border line styles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    /// No border.
    #[default]
    None,
    /// Like `None`, but wins border conflicts.
    Hidden,
    /// A series of dots.
    Dotted,
    /// A series of short dashes.
    Dashed,
    /// A single solid line.
    Solid,
    /// Two parallel lines.
    Double,
    /// Alternating dots and dashes.
    DotDash,
    /// Two dots then a dash.
    DotDotDash,
    /// A wavy line.
    Wave,
    /// Carved into the page.
    Groove,
    /// Coming out of the page.
    Ridge,
    /// Embedded box look.
    Inset,
    /// Embossed box look.
    Outset,
}

impl BorderStyle {
    /// Returns true for the styles that draw nothing.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, BorderStyle::None | BorderStyle::Hidden)
    }
}

/// Which edge the preferred/min/max sizes measure to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum BoxSizing {
    /// Sizes exclude padding and border.
    #[default]
    ContentBox,
    /// Sizes include padding and border.
    BorderBox,
}

/// A resolved style value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleValue {
    /// A length, percentage or `auto`.
    Length(RenderLength),
    /// A colour.
    Color(Color),
    /// A border line style.
    BorderStyle(BorderStyle),
    /// A box-sizing keyword.
    BoxSizing(BoxSizing),
    /// Free text (sheet names, link targets).
    Text(String),
}

impl From<RenderLength> for StyleValue {
    fn from(value: RenderLength) -> Self {
        StyleValue::Length(value)
    }
}

impl From<Color> for StyleValue {
    fn from(value: Color) -> Self {
        StyleValue::Color(value)
    }
}

impl From<BorderStyle> for StyleValue {
    fn from(value: BorderStyle) -> Self {
        StyleValue::BorderStyle(value)
    }
}

impl From<BoxSizing> for StyleValue {
    fn from(value: BoxSizing) -> Self {
        StyleValue::BoxSizing(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}
