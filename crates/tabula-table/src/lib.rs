//! Table layout and content flattening for the Tabula engine.
//!
//! Turns the positioned box tree of a logical page into a grid of cells for
//! tabular output formats. The work is split in two passes over the tree:
//!
//! 1. [`TableLayoutProducer`] registers every finished box with a
//!    [`tabula_layout::SheetLayout`], which turns box edges into row and
//!    column breaks.
//! 2. [`TableContentProducer`] maps every box onto the cells its rectangle
//!    covers, writing [`CellMarker`]s: backgrounds in painter's order,
//!    content exclusively, conflicts logged.
//!
//! Both passes can run repeatedly over a page that is still being laid out
//! (streaming export); fully finished rows are then retired from the grid.
//! [`TableProcessor`] drives both passes for a page.

pub mod classify;
pub mod content_producer;
mod frame;
pub mod grid;
pub mod grid_dump;
pub mod layout_producer;
pub mod marker;
pub mod processor;

// Re-exports for convenience
pub use classify::{ContentClassifier, ExtraContentPolicy, LinkTargetsAsContent, NoExtraContent};
pub use content_producer::{TableContentProducer, Traversal};
pub use grid::CellGrid;
pub use layout_producer::TableLayoutProducer;
pub use marker::{CellMarker, SectionType};
pub use processor::TableProcessor;
