//! Positioned box tree and sheet layouts for the Tabula engine.
//!
//! The upstream box-layout pass produces a tree of positioned, sized boxes
//! for each logical page. This crate holds that tree in an arena
//! ([`BoxTree`]), groups it into page areas ([`PageBox`]) and defines the
//! [`SheetLayout`] seam through which the table producers turn box edges
//! into row and column breaks.
//!
//! # Module Structure
//!
//! - [`render_box`] - Box kinds and per-box state
//! - [`tree`] - Arena holding the boxes of one logical page
//! - [`page`] - Logical page with its watermark, header, body and footer areas
//! - [`geometry`] - Grid rectangles
//! - [`sheet_layout`] - The sheet layout trait and a break-collecting
//!   implementation

pub mod geometry;
pub mod page;
pub mod render_box;
pub mod sheet_layout;
pub mod tree;

// Re-exports for convenience
pub use geometry::TableRectangle;
pub use page::{PageArea, PageBox};
pub use render_box::{BoxId, BoxKind, RenderBox, ReplacedKind, ShapeKind, UnknownBoxKind};
pub use sheet_layout::{BreakSheetLayout, SheetLayout, track_map};
pub use tree::BoxTree;
