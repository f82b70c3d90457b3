//! Common utilities for the Tabula engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Diagnostics** - deduplicated warnings routed through the `log` facade
//! - **Output Features** - the boolean/numeric toggles an output processor
//!   hands to the table producers

pub mod diagnostics;
pub mod features;

pub use features::{ConfigError, OutputFeatures};
