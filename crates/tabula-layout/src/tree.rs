//! Arena holding the boxes of one logical page.
//!
//! All boxes live in a contiguous vector and refer to each other through
//! [`BoxId`] indices, so the producers can walk the tree while keeping
//! their own bookkeeping in side tables keyed by the same ids.

use std::ops::{Index, IndexMut};

use crate::render_box::{BoxId, RenderBox};

/// Arena-based box tree.
#[derive(Debug, Clone, Default)]
pub struct BoxTree {
    nodes: Vec<RenderBox>,
}

impl BoxTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        BoxTree { nodes: Vec::new() }
    }

    /// Number of boxes allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no box was allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a box by its id.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&RenderBox> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a box by its id.
    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut RenderBox> {
        self.nodes.get_mut(id.0)
    }

    /// Allocate a box and return its id. The box is not attached yet.
    pub fn alloc(&mut self, node: RenderBox) -> BoxId {
        let id = BoxId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either id is not part of this tree, or if `child` already
    /// has a parent.
    pub fn append_child(&mut self, parent: BoxId, child: BoxId) {
        assert!(
            self[child].parent.is_none(),
            "{child} is already attached to a parent"
        );
        self[parent].children.push(child);
        self[child].parent = Some(parent);
    }

    /// Allocate `node` and append it to `parent` in one step.
    pub fn add_child(&mut self, parent: BoxId, node: RenderBox) -> BoxId {
        let id = self.alloc(node);
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a box.
    #[must_use]
    pub fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Get all children of a box.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Iterate over all ancestors of a box, from parent to root.
    pub fn ancestors(&self, id: BoxId) -> impl Iterator<Item = BoxId> + '_ {
        std::iter::successors(self.parent(id), |&current| self.parent(current))
    }

    /// The subtree rooted at `root`, in document (pre-)order.
    #[must_use]
    pub fn descendants(&self, root: BoxId) -> Vec<BoxId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Set the progress flags of a whole subtree.
    pub fn set_subtree_state(&mut self, root: BoxId, committed: bool, open: bool) {
        for id in self.descendants(root) {
            let node = &mut self[id];
            node.committed = committed;
            node.open = open;
        }
    }
}

impl Index<BoxId> for BoxTree {
    type Output = RenderBox;

    fn index(&self, id: BoxId) -> &RenderBox {
        &self.nodes[id.0]
    }
}

impl IndexMut<BoxId> for BoxTree {
    fn index_mut(&mut self, id: BoxId) -> &mut RenderBox {
        &mut self.nodes[id.0]
    }
}
