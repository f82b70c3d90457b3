//! Output-feature toggles.
//!
//! Every output processor (spreadsheet, HTML, PDF table writers) hands the
//! table producers a set of feature flags that tune how boxes are mapped
//! onto the grid. The flags are plain data: hosts build them in code, load
//! them from JSON, or override single keys with `key=value` pairs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default capacity of the box definition cache.
pub const DEFAULT_BOX_DEFINITION_CACHE_SIZE: usize = 5000;

/// Default cell count below which verbose cell markers are kept.
pub const DEFAULT_VERBOSE_CELL_MARKER_THRESHOLD: usize = 10_000;

/// Errors produced while reading output-feature configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for [`OutputFeatures`].
    #[error("invalid feature document: {0}")]
    Json(#[from] serde_json::Error),
    /// A `key=value` override named a feature that does not exist.
    #[error("unknown output feature '{0}'")]
    UnknownFeature(String),
    /// A `key=value` override was not of that form.
    #[error("malformed feature override '{0}', expected key=value")]
    MalformedOverride(String),
    /// The value of an override could not be parsed for its feature.
    #[error("invalid value '{value}' for feature '{key}'")]
    InvalidValue {
        /// Feature name.
        key: String,
        /// Rejected value.
        value: String,
    },
}

/// Feature toggles recognised by the table producers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputFeatures {
    /// Process the watermark area as part of the header pass.
    pub watermark_section: bool,
    /// Header, body and footer use independent zero-based coordinates and
    /// must be stacked by the producers.
    pub unaligned_pagebands: bool,
    /// Rectangles and ellipses count as content instead of background.
    pub shapes_as_content: bool,
    /// Ellipses are always background, regardless of `shapes_as_content`.
    pub ellipse_as_background: bool,
    /// Every box edge becomes a row/column break, decorated or not.
    pub strict_layout: bool,
    /// Retired rows keep a string snapshot of their markers.
    pub verbose_cell_markers: bool,
    /// Grid size (rows * columns) below which verbose markers are kept.
    pub verbose_cell_marker_threshold: usize,
    /// Dump the grid at debug level after every compute.
    pub debug_report_layout: bool,
    /// Log cell conflicts between overlapping content boxes.
    pub report_cell_conflicts: bool,
    /// Capacity of the per-session box definition cache.
    pub box_definition_cache_size: usize,
}

impl Default for OutputFeatures {
    fn default() -> Self {
        OutputFeatures {
            watermark_section: false,
            unaligned_pagebands: false,
            shapes_as_content: false,
            ellipse_as_background: false,
            strict_layout: false,
            verbose_cell_markers: false,
            verbose_cell_marker_threshold: DEFAULT_VERBOSE_CELL_MARKER_THRESHOLD,
            debug_report_layout: false,
            report_cell_conflicts: false,
            box_definition_cache_size: DEFAULT_BOX_DEFINITION_CACHE_SIZE,
        }
    }
}

impl OutputFeatures {
    /// Parse a (possibly partial) JSON feature document.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed or names
    /// an unknown feature.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `key=value` overrides on top of the current settings.
    ///
    /// Boolean features also accept a bare `key` meaning `key=true`. The
    /// overrides apply as a whole: on error the settings are unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys, malformed pairs or values that do
    /// not parse for the named feature.
    pub fn apply_overrides<'a, I>(&mut self, pairs: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut updated = self.clone();
        for pair in pairs {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None if !pair.trim().is_empty() => (pair.trim(), "true"),
                None => return Err(ConfigError::MalformedOverride(pair.to_string())),
            };
            updated.set(key, value)?;
        }
        *self = updated;
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let flag = match key {
            "watermark_section" => &mut self.watermark_section,
            "unaligned_pagebands" => &mut self.unaligned_pagebands,
            "shapes_as_content" => &mut self.shapes_as_content,
            "ellipse_as_background" => &mut self.ellipse_as_background,
            "strict_layout" => &mut self.strict_layout,
            "verbose_cell_markers" => &mut self.verbose_cell_markers,
            "debug_report_layout" => &mut self.debug_report_layout,
            "report_cell_conflicts" => &mut self.report_cell_conflicts,
            "verbose_cell_marker_threshold" => {
                self.verbose_cell_marker_threshold = parse_count(key, value)?;
                return Ok(());
            }
            "box_definition_cache_size" => {
                self.box_definition_cache_size = parse_count(key, value)?;
                return Ok(());
            }
            _ => return Err(ConfigError::UnknownFeature(key.to_string())),
        };
        *flag = value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
