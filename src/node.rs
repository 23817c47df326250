use serde_json::{Map, Value};

/// Stable identity of a [`Node`] within one tree instance.
///
/// Allocated from a monotonic counter when the node is created and never
/// changed or reused afterwards. The reconciler matches rows across passes
/// by this key, so a node keeps its identity through any number of
/// collapse/expand cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

/// Glyph variant in front of a row.
///
/// A pure function of the node's current [`Children`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Children currently visible.
    Open,
    /// Children currently stashed away.
    Closed,
    /// No children at all. Rows with this icon carry no toggle affordance.
    Leaf,
}

/// Child list of a [`Node`].
///
/// Exactly one variant applies at any time. Toggling moves the child
/// vector between `Expanded` and `Collapsed` verbatim, so the subtree
/// (including its descendants' own expand/collapse states) survives
/// unchanged. `Leaf` is decided once at construction time and is final.
#[derive(Debug, Clone, PartialEq)]
pub enum Children {
    Leaf,
    Expanded(Vec<Node>),
    Collapsed(Vec<Node>),
}

/// One entity in the hierarchy (e.g. a file or folder).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) identifier: NodeId,
    pub(crate) label: String,
    pub(crate) payload: Map<String, Value>,
    pub(crate) depth: usize,
    pub(crate) children: Children,
}

impl Node {
    #[must_use]
    pub const fn identifier(&self) -> NodeId {
        self.identifier
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Caller-supplied fields other than `children`.
    #[must_use]
    pub const fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Distance from the root (root = 0). Fixed once the node is created.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub const fn icon(&self) -> Icon {
        match self.children {
            Children::Leaf => Icon::Leaf,
            Children::Expanded(_) => Icon::Open,
            Children::Collapsed(_) => Icon::Closed,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.children, Children::Leaf)
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        matches!(self.children, Children::Expanded(_))
    }

    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        matches!(self.children, Children::Collapsed(_))
    }

    /// All direct children, regardless of the current expand/collapse state.
    #[must_use]
    pub fn child_nodes(&self) -> &[Self] {
        match &self.children {
            Children::Leaf => &[],
            Children::Expanded(children) | Children::Collapsed(children) => children,
        }
    }

    /// Direct children only while they are visible.
    #[must_use]
    pub fn expanded_children(&self) -> Option<&[Self]> {
        match &self.children {
            Children::Expanded(children) => Some(children),
            Children::Leaf | Children::Collapsed(_) => None,
        }
    }

    /// Tooltip text of this node, looked up in the payload by field name.
    #[must_use]
    pub fn tooltip(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(Value::as_str)
    }

    /// Flip this node between `Expanded` and `Collapsed`.
    ///
    /// Only this node's own child list moves; descendants keep their state.
    /// Returns `false` for a `Leaf`, which stays a `Leaf`.
    pub(crate) fn toggle(&mut self) -> bool {
        match std::mem::replace(&mut self.children, Children::Leaf) {
            Children::Leaf => false,
            Children::Expanded(children) => {
                self.children = Children::Collapsed(children);
                true
            }
            Children::Collapsed(children) => {
                self.children = Children::Expanded(children);
                true
            }
        }
    }

    pub(crate) fn find(&self, identifier: NodeId) -> Option<&Self> {
        if self.identifier == identifier {
            return Some(self);
        }
        self.child_nodes()
            .iter()
            .find_map(|child| child.find(identifier))
    }

    pub(crate) fn find_mut(&mut self, identifier: NodeId) -> Option<&mut Self> {
        if self.identifier == identifier {
            return Some(self);
        }
        match &mut self.children {
            Children::Leaf => None,
            Children::Expanded(children) | Children::Collapsed(children) => children
                .iter_mut()
                .find_map(|child| child.find_mut(identifier)),
        }
    }
}

#[cfg(test)]
fn example_branch() -> Node {
    let leaf = |identifier: u64, label: &str| Node {
        identifier: NodeId(identifier),
        label: label.to_owned(),
        payload: Map::new(),
        depth: 2,
        children: Children::Leaf,
    };
    let inner = Node {
        identifier: NodeId(2),
        label: "inner".to_owned(),
        payload: Map::new(),
        depth: 1,
        children: Children::Collapsed(vec![leaf(3, "hidden")]),
    };
    Node {
        identifier: NodeId(1),
        label: "branch".to_owned(),
        payload: Map::new(),
        depth: 0,
        children: Children::Expanded(vec![inner, leaf(4, "visible")]),
    }
}

#[test]
fn icon_follows_children_variant() {
    let mut node = example_branch();
    assert_eq!(node.icon(), Icon::Open);
    assert!(node.toggle());
    assert_eq!(node.icon(), Icon::Closed);
    assert!(node.toggle());
    assert_eq!(node.icon(), Icon::Open);
}

#[test]
fn toggle_leaf_does_nothing() {
    let mut node = example_branch();
    let leaf = node.find_mut(NodeId(4)).unwrap();
    assert!(!leaf.toggle());
    assert!(leaf.is_leaf());
    assert_eq!(leaf.icon(), Icon::Leaf);
}

#[test]
fn toggle_is_shallow() {
    let mut node = example_branch();
    let before = node.child_nodes().to_vec();
    assert!(node.toggle());
    assert!(node.is_collapsed());
    // The stashed children are moved verbatim, inner stays collapsed.
    assert_eq!(node.child_nodes(), &before[..]);
    assert!(node.child_nodes()[0].is_collapsed());
}

#[test]
fn toggle_round_trip_restores_subtree() {
    let mut node = example_branch();
    let before = node.clone();
    assert!(node.toggle());
    assert!(node.toggle());
    assert_eq!(node, before);
}
