//! Content versus background classification.
//!
//! A box is *content* when an output writer has to emit something for it
//! (text, an image, a shape it can draw). Everything else only contributes
//! background: colours, borders, cell structure.

use std::collections::HashMap;

use tabula_common::OutputFeatures;
use tabula_layout::{BoxId, BoxKind, BoxTree, RenderBox, ReplacedKind, ShapeKind};
use tabula_style::{ChangeTracker, InstanceId, StyleKey};

/// Output-format hook marking additional boxes as content.
pub trait ExtraContentPolicy {
    /// Returns true if the writer needs a content cell for `node` even
    /// though the box model alone would treat it as background.
    fn is_extra_content(&self, node: &RenderBox) -> bool;
}

/// The default policy: no extra content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtraContent;

impl ExtraContentPolicy for NoExtraContent {
    fn is_extra_content(&self, _node: &RenderBox) -> bool {
        false
    }
}

/// Treats link sources and anchors as content, so that hyperlinked
/// containers get a cell of their own in HTML output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkTargetsAsContent;

impl ExtraContentPolicy for LinkTargetsAsContent {
    fn is_extra_content(&self, node: &RenderBox) -> bool {
        node.style.text(StyleKey::Href).is_some() || node.style.text(StyleKey::Anchor).is_some()
    }
}

/// Content predicate based on the box model and output features.
#[must_use]
pub fn is_content_kind(tree: &BoxTree, id: BoxId, features: &OutputFeatures) -> bool {
    match tree[id].kind {
        BoxKind::Text => true,
        BoxKind::Paragraph => !tree.children(id).is_empty(),
        BoxKind::Replaced(ReplacedKind::Image | ReplacedKind::Drawable) => true,
        BoxKind::Replaced(ReplacedKind::Shape(shape)) => match shape {
            ShapeKind::Line | ShapeKind::Other => true,
            ShapeKind::Ellipse if features.ellipse_as_background => false,
            ShapeKind::Rectangle | ShapeKind::Ellipse => features.shapes_as_content,
        },
        BoxKind::Block | BoxKind::Canvas | BoxKind::Row | BoxKind::Inline => false,
    }
}

#[derive(Debug, Clone, Copy)]
struct Classification {
    instance: InstanceId,
    change_tracker: ChangeTracker,
    content: bool,
}

/// Caches classifications per box, revalidated against the style's change
/// tracker.
#[derive(Debug, Default)]
pub struct ContentClassifier {
    entries: HashMap<BoxId, Classification>,
    recomputed: u64,
}

impl ContentClassifier {
    /// An empty classifier.
    #[must_use]
    pub fn new() -> Self {
        ContentClassifier::default()
    }

    /// Classify a box, reusing the previous answer while the box's style is
    /// unchanged.
    pub fn is_content(
        &mut self,
        tree: &BoxTree,
        id: BoxId,
        features: &OutputFeatures,
        policy: &dyn ExtraContentPolicy,
    ) -> bool {
        let node = &tree[id];
        let cached = self.entries.get(&id).filter(|entry| {
            entry.instance == node.instance && entry.change_tracker == node.change_tracker
        });
        if let Some(entry) = cached {
            return entry.content;
        }

        let content = is_content_kind(tree, id, features) || policy.is_extra_content(node);
        self.recomputed += 1;
        let _ = self.entries.insert(
            id,
            Classification {
                instance: node.instance,
                change_tracker: node.change_tracker,
                content,
            },
        );
        content
    }

    /// Number of classifications that were computed rather than reused.
    #[must_use]
    pub const fn recomputed(&self) -> u64 {
        self.recomputed
    }
}
