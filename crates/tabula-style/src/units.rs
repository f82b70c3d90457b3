//! Sub-point coordinate units.
//!
//! All geometry in the engine is integral. One typographic point is
//! [`UNITS_PER_POINT`] internal units, which keeps rounding stable when the
//! same edge is reached through different sums of box sizes.

/// An internal coordinate or extent, in sub-point units.
pub type Coord = i64;

/// Internal units per typographic point.
pub const UNITS_PER_POINT: Coord = 1000;

/// Convert points to internal units, rounding to the nearest unit.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn from_points(points: f64) -> Coord {
    (points * UNITS_PER_POINT as f64).round() as Coord
}

/// Convert internal units to points.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_points(value: Coord) -> f64 {
    value as f64 / UNITS_PER_POINT as f64
}
