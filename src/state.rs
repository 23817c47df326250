use std::time::Duration;

use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::animate::{Scene, Transition};
use crate::config::DiagramConfig;
use crate::error::Error;
use crate::layout::{layout, Placement, Position};
use crate::node::{Icon, NodeId};
use crate::reconcile::reconcile;
use crate::source::TreeSource;
use crate::tree::Tree;

/// Keeps the tree, the committed scene and the in-flight transition of a
/// [`Diagram`](crate::Diagram).
///
/// All model mutation happens synchronously inside the calls below before
/// anything is laid out or drawn; the transition is presentation only and
/// a new pass supersedes an unfinished one.
///
/// # Example
///
/// ```
/// # use tui_tree_diagram::{DiagramConfig, DiagramState};
/// let mut state = DiagramState::new(DiagramConfig::new());
/// state.load(r#"{"name": "root", "children": [{"name": "a"}]}"#)?;
/// assert_eq!(state.visible_len(), 2);
/// # Ok::<(), tui_tree_diagram::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagramState {
    config: DiagramConfig,
    tree: Option<Tree>,
    committed: Vec<Placement>,
    transition: Option<Transition>,
    hovered: Option<NodeId>,
}

impl DiagramState {
    #[must_use]
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            config,
            tree: None,
            committed: Vec::new(),
            transition: None,
            hovered: None,
        }
    }

    /// Obtain a document from the data-loading collaborator, build the
    /// hierarchy from it and run the first layout/reconcile pass with the
    /// root as pivot, entering from the origin.
    ///
    /// # Errors
    ///
    /// Propagates the collaborator's error unchanged. Nothing is replaced
    /// and no partial tree is rendered in that case; there is no retry.
    pub fn load<S: TreeSource + ?Sized>(&mut self, source: &S) -> Result<(), Error> {
        let document = source.fetch()?;
        let tree = Tree::from_document(&document)?;
        debug!(nodes = tree.total_nodes(), "loaded tree");
        let root = tree.root().identifier();
        self.tree = Some(tree);
        self.committed.clear();
        self.transition = None;
        self.hovered = None;
        self.refresh(root, Position::ORIGIN);
        Ok(())
    }

    /// Toggle a node between expanded and collapsed and start a transition
    /// anchored at it.
    ///
    /// Returns `false` (and changes nothing) for leaves and unknown
    /// identifiers; leaves expose no toggle operation.
    pub fn toggle(&mut self, identifier: NodeId) -> bool {
        let pivot_previous = self
            .committed_position(identifier)
            .unwrap_or(Position::ORIGIN);
        let Some(tree) = &mut self.tree else {
            return false;
        };
        if !tree.toggle(identifier) {
            return false;
        }
        debug!(?identifier, "toggled node");
        self.refresh(identifier, pivot_previous);
        true
    }

    /// Toggle the node on the given visible row, for mouse clicks.
    ///
    /// Leaf rows carry no toggle affordance, so clicking them does nothing.
    pub fn toggle_at(&mut self, row: usize) -> bool {
        let Some(placement) = self
            .committed
            .iter()
            .find(|placement| placement.row == row)
        else {
            return false;
        };
        if placement.icon == Icon::Leaf {
            return false;
        }
        let identifier = placement.identifier;
        self.toggle(identifier)
    }

    /// Track the hovered row for tooltip presentation.
    ///
    /// Ignored entirely unless a tooltip field was configured. Returns
    /// `true` when the hovered node changed.
    pub fn hover_at(&mut self, row: Option<usize>) -> bool {
        if self.config.tooltip_field.is_none() {
            return false;
        }
        let hovered = row.and_then(|row| {
            self.committed
                .iter()
                .find(|placement| placement.row == row)
                .map(|placement| placement.identifier)
        });
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    /// Advance the in-flight transition.
    ///
    /// Returns `true` while a redraw is still needed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(transition) = &mut self.transition else {
            return false;
        };
        if transition.tick(delta) {
            self.transition = None;
        }
        true
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// The draw-ready scene for the current frame.
    #[must_use]
    pub fn scene(&self) -> Scene {
        self.transition
            .as_ref()
            .map_or_else(|| Scene::settled(&self.committed), Transition::sample)
    }

    /// Number of currently visible rows.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.committed.len()
    }

    /// Height the diagram asks its host for, never below the configured
    /// minimum.
    #[must_use]
    pub fn required_height(&self) -> u16 {
        let rows = u16::try_from(self.committed.len()).unwrap_or(u16::MAX);
        rows.saturating_mul(self.config.row_height)
            .max(self.config.minimum_height)
    }

    /// Width the diagram asks its host for: the widest settled row,
    /// assuming the default two-cell icon glyphs.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn required_width(&self) -> u16 {
        self.committed
            .iter()
            .map(|placement| {
                let indent = placement.position.x.round() as usize;
                indent + 2 + placement.label.width()
            })
            .max()
            .map_or(0, |width| u16::try_from(width).unwrap_or(u16::MAX))
    }

    #[must_use]
    pub const fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    #[must_use]
    pub const fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    fn committed_position(&self, identifier: NodeId) -> Option<Position> {
        self.committed
            .iter()
            .find(|placement| placement.identifier == identifier)
            .map(|placement| placement.position)
    }

    /// One layout + reconcile pass. The committed scene is replaced in a
    /// single step at the end, never interleaved with the reads above, so
    /// the next pass starts from consistent previous positions.
    fn refresh(&mut self, pivot: NodeId, pivot_previous: Position) {
        let Some(tree) = &self.tree else {
            return;
        };
        let next = layout(tree, &self.config);
        let pivot_current = next
            .iter()
            .find(|placement| placement.identifier == pivot)
            .map_or(Position::ORIGIN, |placement| placement.position);
        let pass = reconcile(&self.committed, &next, pivot_previous, pivot_current);
        self.transition = Some(Transition::new(pass, &self.config.animation));
        self.committed = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "name": "root",
        "children": [
            {"name": "a", "note": "first leaf"},
            {"name": "b", "children": [{"name": "c"}]}
        ]
    }"#;

    fn loaded(config: DiagramConfig) -> DiagramState {
        let mut state = DiagramState::new(config);
        state.load(DOCUMENT).unwrap();
        state
    }

    #[test]
    fn load_runs_the_initial_pass_with_the_root_as_pivot() {
        let state = loaded(DiagramConfig::new());
        assert_eq!(state.visible_len(), 4);
        assert!(state.is_animating());
        // Before any time passes every row sits at the origin, invisible.
        let scene = state.scene();
        for node in &scene.nodes {
            assert_eq!(node.position, Position::ORIGIN);
            assert!(node.opacity.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn load_failure_leaves_no_partial_tree() {
        let mut state = DiagramState::new(DiagramConfig::new());
        assert!(state.load("not json").is_err());
        assert!(state.tree().is_none());
        assert_eq!(state.visible_len(), 0);
    }

    #[test]
    fn tick_settles_the_transition() {
        let mut state = loaded(DiagramConfig::new());
        assert!(state.tick(Duration::from_secs(1)));
        assert!(!state.is_animating());
        // One last redraw was requested above; afterwards it goes quiet.
        assert!(!state.tick(Duration::from_millis(16)));
        let scene = state.scene();
        assert!((scene.nodes[0].opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn toggle_collapses_and_restores_identity() {
        let mut state = loaded(DiagramConfig::new());
        state.tick(Duration::from_secs(1));
        let b = state.tree().unwrap().root().child_nodes()[1].identifier();
        let c_before = state.tree().unwrap().root().child_nodes()[1].child_nodes()[0].identifier();

        assert!(state.toggle(b));
        assert_eq!(state.visible_len(), 3);
        state.tick(Duration::from_secs(1));

        assert!(state.toggle(b));
        assert_eq!(state.visible_len(), 4);
        let c_after = state.tree().unwrap().root().child_nodes()[1].child_nodes()[0].identifier();
        assert_eq!(c_before, c_after);
    }

    #[test]
    fn toggle_at_ignores_leaf_rows() {
        let mut state = loaded(DiagramConfig::new());
        state.tick(Duration::from_secs(1));
        assert!(!state.toggle_at(1));
        assert_eq!(state.visible_len(), 4);
        assert!(state.toggle_at(2));
        assert_eq!(state.visible_len(), 3);
    }

    #[test]
    fn toggle_at_unknown_row_is_rejected() {
        let mut state = loaded(DiagramConfig::new());
        assert!(!state.toggle_at(17));
    }

    #[test]
    fn empty_child_list_never_becomes_toggleable() {
        let mut state = DiagramState::new(DiagramConfig::new());
        state
            .load(r#"{"name": "root", "children": [{"name": "empty", "children": []}]}"#)
            .unwrap();
        state.tick(Duration::from_secs(1));
        // Repeated passes never promote the normalized leaf.
        for _ in 0..3 {
            assert!(!state.toggle_at(1));
            let scene = state.scene();
            assert_eq!(scene.nodes[1].icon, Icon::Leaf);
        }
    }

    #[test]
    fn hover_is_a_no_op_without_a_tooltip_field() {
        let mut state = loaded(DiagramConfig::new());
        state.tick(Duration::from_secs(1));
        assert!(!state.hover_at(Some(1)));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn hover_tracks_rows_when_tooltips_are_enabled() {
        let mut state = loaded(DiagramConfig::new().tooltip_field("note"));
        state.tick(Duration::from_secs(1));
        assert!(state.hover_at(Some(1)));
        assert_eq!(state.hovered(), state.tree().map(|tree| tree.root().child_nodes()[0].identifier()));
        assert!(!state.hover_at(Some(1)));
        assert!(state.hover_at(None));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn required_width_spans_the_widest_row() {
        let mut state = loaded(DiagramConfig::new());
        state.tick(Duration::from_secs(1));
        // "  └─" indent of c is 4 cells, plus icon and one-character label.
        assert_eq!(state.required_width(), 7);
        assert_eq!(DiagramState::new(DiagramConfig::new()).required_width(), 0);
    }

    #[test]
    fn required_height_honors_the_minimum() {
        let mut state = loaded(DiagramConfig::new().minimum_height(10));
        assert_eq!(state.required_height(), 10);
        let b = state.tree().unwrap().root().child_nodes()[1].identifier();
        state.toggle(b);
        assert_eq!(state.required_height(), 10);

        let state = loaded(DiagramConfig::new().row_height(3));
        assert_eq!(state.required_height(), 12);
    }

    #[test]
    fn interrupting_a_transition_restarts_from_committed_targets() {
        let mut state = loaded(DiagramConfig::new());
        state.tick(Duration::from_secs(1));
        let b = state.tree().unwrap().root().child_nodes()[1].identifier();

        // Collapse and immediately re-expand while the first transition is
        // still in flight: the second pass recomputes targets from the
        // committed scene, so c enters again from b's committed position.
        assert!(state.toggle(b));
        assert!(state.toggle(b));
        assert!(state.is_animating());
        state.tick(Duration::from_secs(1));
        let scene = state.scene();
        assert_eq!(scene.nodes.len(), 4);
        for node in &scene.nodes {
            assert!((node.opacity - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn exit_rows_survive_only_inside_the_transition() {
        let mut state = loaded(DiagramConfig::new());
        state.tick(Duration::from_secs(1));
        let b = state.tree().unwrap().root().child_nodes()[1].identifier();
        state.toggle(b);

        // Mid-flight the exiting row is still part of the drawn scene.
        state.tick(Duration::from_millis(100));
        assert_eq!(state.scene().nodes.len(), 4);
        let exit_visible = state.scene();
        let c = exit_visible.nodes.iter().find(|node| node.label == "c").unwrap();
        assert!(c.opacity < 1.0);

        // Settled, the row is gone from the scene but not from the tree.
        state.tick(Duration::from_secs(1));
        assert_eq!(state.scene().nodes.len(), 3);
        assert_eq!(state.tree().unwrap().total_nodes(), 4);
    }
}
