//! Style-to-box-definition derivation.
//!
//! Deriving a [`BoxDefinition`] reads some forty style values. Report
//! elements are laid out again on every page and every incremental update,
//! so the factory keeps the last definition per element and only rederives
//! when the style's [`ChangeTracker`] moved on.

use std::fmt;
use std::sync::Arc;

use crate::border::{Border, BorderCorner, BorderEdge};
use crate::box_definition::BoxDefinition;
use crate::cache::LfuCache;
use crate::sheet::{ChangeTracker, StyleKey, StyleSheet};
use crate::units::Coord;
use crate::values::{BoxSizing, RenderLength};

/// Identity of a report element instance.
///
/// Several boxes may share one instance (an element broken across pages);
/// they share the cached box definition as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    instance: InstanceId,
    style_kind: Arc<str>,
}

#[derive(Debug)]
struct CacheEntry {
    change_tracker: ChangeTracker,
    definition: Arc<BoxDefinition>,
}

/// Counters describing how well the cache performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups with no entry for the element.
    pub misses: u64,
    /// Lookups whose entry was stale and got rederived.
    pub invalidations: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
}

/// Derives box definitions from style sheets and caches them per element.
///
/// The factory is owned by one report-processing session and is not
/// internally synchronised; share it across threads only behind a lock.
#[derive(Debug)]
pub struct BoxDefinitionFactory {
    cache: LfuCache<CacheKey, CacheEntry>,
    stats: CacheStats,
}

impl BoxDefinitionFactory {
    /// A factory whose cache holds at most `capacity` elements.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        BoxDefinitionFactory {
            cache: LfuCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Cache performance counters.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached elements.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Forget all cached definitions.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// The box definition for `instance` styled by `style` at version
    /// `change_tracker`.
    ///
    /// Returns the cached definition if one was derived from the same style
    /// kind at the same tracker value, otherwise derives, caches and returns
    /// a fresh one.
    pub fn create_box_definition(
        &mut self,
        instance: InstanceId,
        style: &StyleSheet,
        change_tracker: ChangeTracker,
    ) -> Arc<BoxDefinition> {
        let key = CacheKey {
            instance,
            style_kind: Arc::clone(style.shared_kind()),
        };

        match self.cache.get(&key) {
            Some(entry) if entry.change_tracker == change_tracker => {
                self.stats.hits += 1;
                return Arc::clone(&entry.definition);
            }
            Some(_) => self.stats.invalidations += 1,
            None => self.stats.misses += 1,
        }

        let definition = Arc::new(derive_box_definition(style));
        log::trace!(
            "derived box definition for {instance} ({}) at {change_tracker}",
            style.kind()
        );
        let evicted = self.cache.insert(
            key,
            CacheEntry {
                change_tracker,
                definition: Arc::clone(&definition),
            },
        );
        if evicted.is_some() {
            self.stats.evictions += 1;
        }
        definition
    }
}

/// Derive a locked box definition from a style sheet, bypassing any cache.
#[must_use]
pub fn derive_box_definition(style: &StyleSheet) -> BoxDefinition {
    let mut definition = BoxDefinition::new();

    // STEP 1: Sizes. Anything that is not an explicit length is automatic.
    let size = |key: StyleKey, fallback: RenderLength| style.length(key).unwrap_or(fallback);
    definition.set_preferred_width(size(StyleKey::Width, RenderLength::Auto));
    definition.set_preferred_height(size(StyleKey::Height, RenderLength::Auto));
    definition.set_min_width(size(StyleKey::MinWidth, RenderLength::ZERO));
    definition.set_min_height(size(StyleKey::MinHeight, RenderLength::ZERO));
    definition.set_max_width(size(StyleKey::MaxWidth, RenderLength::Auto));
    definition.set_max_height(size(StyleKey::MaxHeight, RenderLength::Auto));
    definition.set_fixed_position(size(StyleKey::FixedPosition, RenderLength::Auto));
    definition.set_size_specifies_border_box(style.box_sizing() == BoxSizing::BorderBox);

    // STEP 2: Paddings, never negative.
    let padding = |key: StyleKey| fixed(style, key).max(0);
    definition.set_padding_top(padding(StyleKey::PaddingTop));
    definition.set_padding_left(padding(StyleKey::PaddingLeft));
    definition.set_padding_bottom(padding(StyleKey::PaddingBottom));
    definition.set_padding_right(padding(StyleKey::PaddingRight));

    // STEP 3: Margins. Negative margins are legal.
    definition.set_margin_top(fixed(style, StyleKey::MarginTop));
    definition.set_margin_left(fixed(style, StyleKey::MarginLeft));
    definition.set_margin_bottom(fixed(style, StyleKey::MarginBottom));
    definition.set_margin_right(fixed(style, StyleKey::MarginRight));

    // STEP 4: Border.
    definition.set_border(derive_border(style));

    definition.lock();
    definition
}

/// A fixed length in internal units; relative or missing values give zero.
fn fixed(style: &StyleSheet, key: StyleKey) -> Coord {
    match style.length(key) {
        Some(RenderLength::Fixed(value)) => value,
        Some(RenderLength::Percent(_)) => {
            tabula_common::diagnostics::warn_once(
                "style",
                &format!("percentage values are not supported for {key}, using 0"),
            );
            0
        }
        _ => 0,
    }
}

fn edge(
    style: &StyleSheet,
    style_key: StyleKey,
    color_key: StyleKey,
    width_key: StyleKey,
) -> BorderEdge {
    BorderEdge::new(
        style.border_style(style_key),
        style.color(color_key),
        fixed(style, width_key),
    )
}

fn corner(style: &StyleSheet, width_key: StyleKey, height_key: StyleKey) -> BorderCorner {
    BorderCorner::new(fixed(style, width_key), fixed(style, height_key))
}

fn derive_border(style: &StyleSheet) -> Arc<Border> {
    let top = edge(
        style,
        StyleKey::BorderTopStyle,
        StyleKey::BorderTopColor,
        StyleKey::BorderTopWidth,
    );
    let left = edge(
        style,
        StyleKey::BorderLeftStyle,
        StyleKey::BorderLeftColor,
        StyleKey::BorderLeftWidth,
    );
    let bottom = edge(
        style,
        StyleKey::BorderBottomStyle,
        StyleKey::BorderBottomColor,
        StyleKey::BorderBottomWidth,
    );
    let right = edge(
        style,
        StyleKey::BorderRightStyle,
        StyleKey::BorderRightColor,
        StyleKey::BorderRightWidth,
    );
    let split = edge(
        style,
        StyleKey::BorderBreakStyle,
        StyleKey::BorderBreakColor,
        StyleKey::BorderBreakWidth,
    );

    // The common case: no border at all. Corners are not even read.
    if top.is_empty()
        && left.is_empty()
        && bottom.is_empty()
        && right.is_empty()
        && split.is_empty()
    {
        return Border::empty();
    }

    Arc::new(Border {
        top,
        left,
        bottom,
        right,
        split,
        top_left: corner(
            style,
            StyleKey::BorderTopLeftRadiusWidth,
            StyleKey::BorderTopLeftRadiusHeight,
        ),
        top_right: corner(
            style,
            StyleKey::BorderTopRightRadiusWidth,
            StyleKey::BorderTopRightRadiusHeight,
        ),
        bottom_left: corner(
            style,
            StyleKey::BorderBottomLeftRadiusWidth,
            StyleKey::BorderBottomLeftRadiusHeight,
        ),
        bottom_right: corner(
            style,
            StyleKey::BorderBottomRightRadiusWidth,
            StyleKey::BorderBottomRightRadiusHeight,
        ),
    })
}
