use serde_json::{Map, Value};

use crate::error::Error;
use crate::node::{Children, Node, NodeId};

/// The hierarchy, owned as one explicit tree.
///
/// Built once from a nested document. Nodes are never destroyed afterwards:
/// collapsing only moves a subtree out of the visible set, so re-expanding
/// is instant and lossless.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
}

impl Tree {
    /// Build the full node set from a nested `{name, children, ...}` document.
    ///
    /// Every node with a non-empty `children` array starts expanded. An
    /// empty, absent or malformed `children` field makes the node a leaf,
    /// decided here once so later passes never re-inspect raw data. A
    /// missing `name` becomes an empty label rather than failing the load.
    ///
    /// # Errors
    ///
    /// Errors when the document root is not an object.
    pub fn from_document(document: &Value) -> Result<Self, Error> {
        let Value::Object(object) = document else {
            return Err(Error::UnexpectedShape);
        };
        let mut next_identifier = 0;
        let root = build(object, 0, &mut next_identifier);
        Ok(Self { root })
    }

    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Look a node up by its stable identity.
    #[must_use]
    pub fn get(&self, identifier: NodeId) -> Option<&Node> {
        self.root.find(identifier)
    }

    /// Total number of nodes, visible or not.
    #[must_use]
    pub fn total_nodes(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node.child_nodes().iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// Toggle the expand/collapse state of exactly one node.
    ///
    /// Returns `false` when the identifier is unknown or names a leaf.
    pub(crate) fn toggle(&mut self, identifier: NodeId) -> bool {
        self.root
            .find_mut(identifier)
            .is_some_and(Node::toggle)
    }
}

fn build(object: &Map<String, Value>, depth: usize, next_identifier: &mut u64) -> Node {
    // Identity is allocated before descending, so identifiers follow
    // pre-order creation order.
    let identifier = NodeId(*next_identifier);
    *next_identifier += 1;

    let label = object
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let payload = object
        .iter()
        .filter(|(key, _)| key.as_str() != "children")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let children = match object.get("children") {
        Some(Value::Array(entries)) if !entries.is_empty() => {
            let children = entries
                .iter()
                .filter_map(Value::as_object)
                .map(|child| build(child, depth + 1, next_identifier))
                .collect::<Vec<_>>();
            if children.is_empty() {
                Children::Leaf
            } else {
                Children::Expanded(children)
            }
        }
        // Empty, absent or not a sequence: a leaf, not an empty branch.
        _ => Children::Leaf,
    };

    Node {
        identifier,
        label,
        payload,
        depth,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_tree() -> Tree {
        let document = serde_json::json!({
            "name": "root",
            "children": [
                {"name": "a"},
                {"name": "b", "children": [{"name": "c"}]},
            ],
        });
        Tree::from_document(&document).unwrap()
    }

    #[test]
    fn identifiers_follow_pre_order() {
        let tree = scenario_tree();
        assert_eq!(tree.root().identifier(), NodeId(0));
        let children = tree.root().child_nodes();
        assert_eq!(children[0].identifier(), NodeId(1));
        assert_eq!(children[1].identifier(), NodeId(2));
        assert_eq!(children[1].child_nodes()[0].identifier(), NodeId(3));
    }

    #[test]
    fn depth_is_distance_from_root() {
        let tree = scenario_tree();
        assert_eq!(tree.root().depth(), 0);
        assert_eq!(tree.root().child_nodes()[0].depth(), 1);
        assert_eq!(tree.root().child_nodes()[1].child_nodes()[0].depth(), 2);
    }

    #[test]
    fn everything_starts_expanded() {
        let tree = scenario_tree();
        assert!(tree.root().is_expanded());
        assert!(tree.root().child_nodes()[1].is_expanded());
    }

    #[test]
    fn missing_name_becomes_empty_label() {
        let document = serde_json::json!({"size": 42});
        let tree = Tree::from_document(&document).unwrap();
        assert_eq!(tree.root().label(), "");
        assert_eq!(tree.root().payload().get("size"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn empty_child_list_is_a_leaf() {
        let document = serde_json::json!({"name": "root", "children": []});
        let tree = Tree::from_document(&document).unwrap();
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn malformed_children_value_is_a_leaf() {
        let document = serde_json::json!({"name": "root", "children": "oops"});
        let tree = Tree::from_document(&document).unwrap();
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn non_object_document_errors() {
        let document = serde_json::json!(["not", "a", "tree"]);
        assert!(matches!(
            Tree::from_document(&document),
            Err(Error::UnexpectedShape)
        ));
    }

    #[test]
    fn payload_keeps_extra_fields_but_not_children() {
        let document = serde_json::json!({
            "name": "root",
            "size": 7,
            "children": [{"name": "a"}],
        });
        let tree = Tree::from_document(&document).unwrap();
        assert!(tree.root().payload().contains_key("name"));
        assert!(tree.root().payload().contains_key("size"));
        assert!(!tree.root().payload().contains_key("children"));
    }

    #[test]
    fn toggle_only_touches_the_named_node() {
        let mut tree = scenario_tree();
        let before_a = tree.get(NodeId(1)).unwrap().clone();
        let before_c = tree.get(NodeId(3)).unwrap().clone();
        assert!(tree.toggle(NodeId(2)));
        assert!(tree.get(NodeId(2)).unwrap().is_collapsed());
        assert_eq!(tree.get(NodeId(1)).unwrap(), &before_a);
        assert_eq!(tree.get(NodeId(3)).unwrap(), &before_c);
        assert!(tree.root().is_expanded());
    }

    #[test]
    fn collapse_expand_round_trip_is_lossless() {
        let mut tree = scenario_tree();
        let before = tree.clone();
        assert!(tree.toggle(NodeId(2)));
        // The hidden node is still alive and reachable under its identity.
        assert_eq!(tree.get(NodeId(3)).unwrap().label(), "c");
        assert!(tree.toggle(NodeId(2)));
        assert_eq!(tree, before);
    }

    #[test]
    fn toggle_unknown_or_leaf_is_rejected() {
        let mut tree = scenario_tree();
        assert!(!tree.toggle(NodeId(1)));
        assert!(!tree.toggle(NodeId(99)));
    }

    #[test]
    fn total_nodes_counts_hidden_subtrees() {
        let mut tree = scenario_tree();
        assert_eq!(tree.total_nodes(), 4);
        tree.toggle(NodeId(2));
        assert_eq!(tree.total_nodes(), 4);
    }
}
