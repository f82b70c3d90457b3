//! Resolved styles and box definitions for the Tabula engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Units** - integer sub-point coordinates shared by every component
//! - **Style values** - lengths, colours and border styles, parsed from text
//! - **Style sheets** - the resolved key/value lookup handed over by the
//!   cascade, versioned by an explicit change tracker
//! - **Box definitions** - the immutable geometric contribution of an element
//!   (padding, border, margins, min/max/preferred sizes), splittable along an
//!   axis for flow breaks
//! - **Box definition cache** - a bounded, least-frequently-used cache keyed
//!   by element identity and style kind, invalidated by the change tracker
//!
//! # Not Implemented
//!
//! - The style cascade itself (inheritance, selectors)
//! - Font and text properties

/// Bounded least-frequently-used map.
pub mod cache;
/// Border edges, corners and the shared empty border.
pub mod border;
/// Immutable geometric box definitions.
pub mod box_definition;
/// Style-to-box-definition derivation with caching.
pub mod factory;
/// Resolved style lookup and change tracking.
pub mod sheet;
/// Sub-point coordinate units.
pub mod units;
/// Typed style values.
pub mod values;

// Re-exports for convenience
pub use border::{Border, BorderCorner, BorderEdge};
pub use box_definition::{Axis, BoxDefinition};
pub use cache::LfuCache;
pub use factory::{BoxDefinitionFactory, CacheStats, InstanceId, derive_box_definition};
pub use sheet::{ChangeTracker, StyleKey, StyleSheet, ValueKind};
pub use units::Coord;
pub use values::{BorderStyle, BoxSizing, Color, RenderLength, StyleValue, ValueError};
