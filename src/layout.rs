use crate::config::DiagramConfig;
use crate::node::{Icon, Node, NodeId};
use crate::tree::Tree;

/// A point in diagram space, measured in terminal cells.
///
/// Kept as `f64` so in-flight transitions interpolate smoothly; drawing
/// rounds to whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            x: (to.x - self.x).mul_add(t, self.x),
            y: (to.y - self.y).mul_add(t, self.y),
        }
    }
}

/// Row assignment of one visible node for one layout pass.
///
/// Carries everything downstream passes need (parent for connector keying,
/// resolved label, icon and tooltip), so the reconciler and the renderer
/// never reach back into mutable tree state.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub identifier: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub row: usize,
    pub position: Position,
    pub icon: Icon,
    pub label: String,
    pub tooltip: Option<String>,
}

/// Assign a row and a position to exactly the currently visible nodes.
///
/// Pre-order walk descending only into expanded children; collapsed
/// subtrees are skipped entirely and get no placement this pass. The root
/// is row 0. Horizontal position is depth × indent unit, vertical position
/// is row × row height.
#[must_use]
pub fn layout(tree: &Tree, config: &DiagramConfig) -> Vec<Placement> {
    let mut result = Vec::new();
    place(tree.root(), None, config, &mut result);
    result
}

#[allow(clippy::cast_precision_loss)]
fn place(node: &Node, parent: Option<NodeId>, config: &DiagramConfig, out: &mut Vec<Placement>) {
    let row = out.len();
    let position = Position {
        x: node.depth() as f64 * f64::from(config.indent_unit),
        y: row as f64 * f64::from(config.row_height),
    };
    out.push(Placement {
        identifier: node.identifier(),
        parent,
        depth: node.depth(),
        row,
        position,
        icon: node.icon(),
        label: node.label().to_owned(),
        tooltip: config
            .tooltip_field
            .as_deref()
            .and_then(|field| node.tooltip(field))
            .map(str::to_owned),
    });
    if let Some(children) = node.expanded_children() {
        for child in children {
            place(child, Some(node.identifier()), config, out);
        }
    }
}
