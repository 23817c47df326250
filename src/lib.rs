#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]

/*!
Animated collapsible tree diagram widget.

A tree (e.g. a file/folder hierarchy) is rendered as one row per visible
node with an icon, a label and connector lines back to its parent.
Toggling a branch row collapses or expands its subtree; the
[`DiagramState`] reconciles the old and new visible sets by stable node
identity and animates every row from where it was to where it belongs,
anchored at the toggled node.

The hierarchy is loaded once from a nested document via a [`TreeSource`].
Collapsed subtrees stay alive inside the [`Tree`], so re-expanding is
instant and lossless.
*/

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, StatefulWidget, Widget};

mod animate;
mod config;
mod error;
mod layout;
mod node;
mod reconcile;
mod source;
mod state;
mod tree;

pub use crate::animate::{AnimationConfig, DrawLink, DrawNode, Easing, Scene};
pub use crate::config::DiagramConfig;
pub use crate::error::Error;
pub use crate::layout::{layout, Placement, Position};
pub use crate::node::{Children, Icon, Node, NodeId};
pub use crate::reconcile::{reconcile, LinkTween, NodeTween, Pass, Phase};
pub use crate::source::TreeSource;
pub use crate::state::DiagramState;
pub use crate::tree::Tree;

/// Elements below this opacity are not drawn at all.
const VISIBLE_OPACITY: f64 = 0.05;
/// Elements below this opacity are drawn dimmed while fading.
const FULL_OPACITY: f64 = 0.7;

/// The diagram widget.
///
/// Visual configuration only; geometry, animation and behavior are
/// configured on [`DiagramConfig`] and live in the [`DiagramState`].
///
/// # Example
///
/// ```
/// # use tui_tree_diagram::{Diagram, DiagramConfig, DiagramState};
/// # use ratatui::backend::TestBackend;
/// # use ratatui::Terminal;
/// # use ratatui::widgets::Block;
/// # let mut terminal = Terminal::new(TestBackend::new(32, 32)).unwrap();
/// let mut state = DiagramState::new(DiagramConfig::new());
/// state.load(r#"{"name": "root", "children": [{"name": "a"}]}"#)?;
///
/// terminal.draw(|frame| {
///     let widget = Diagram::new().block(Block::bordered().title("Tree Diagram"));
///     frame.render_stateful_widget(widget, frame.size(), &mut state);
/// })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Diagram<'a> {
    block: Option<Block<'a>>,
    /// Style used as a base style for the widget
    style: Style,
    /// Style of the connector lines
    link_style: Style,
    /// Style patched over the hovered row
    highlight_style: Style,
    /// Style of the tooltip text behind the hovered label
    tooltip_style: Style,

    /// Symbol in front of a node whose children are currently visible
    open_symbol: &'a str,
    /// Symbol in front of a node whose children are currently stashed away
    closed_symbol: &'a str,
    /// Symbol in front of a node without children
    leaf_symbol: &'a str,
}

impl Default for Diagram<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Diagram<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            block: None,
            style: Style::new(),
            link_style: Style::new(),
            highlight_style: Style::new(),
            tooltip_style: Style::new(),
            open_symbol: "\u{25bc} ",   // Arrow down
            closed_symbol: "\u{25b6} ", // Arrow to right
            leaf_symbol: "\u{2022} ",   // Bullet
        }
    }

    #[allow(clippy::missing_const_for_fn)]
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn link_style(mut self, style: Style) -> Self {
        self.link_style = style;
        self
    }

    #[must_use]
    pub const fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    #[must_use]
    pub const fn tooltip_style(mut self, style: Style) -> Self {
        self.tooltip_style = style;
        self
    }

    #[must_use]
    pub const fn open_symbol(mut self, symbol: &'a str) -> Self {
        self.open_symbol = symbol;
        self
    }

    #[must_use]
    pub const fn closed_symbol(mut self, symbol: &'a str) -> Self {
        self.closed_symbol = symbol;
        self
    }

    #[must_use]
    pub const fn leaf_symbol(mut self, symbol: &'a str) -> Self {
        self.leaf_symbol = symbol;
        self
    }
}

impl StatefulWidget for Diagram<'_> {
    type State = DiagramState;

    fn render(self, full_area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        buf.set_style(full_area, self.style);

        // Get the inner area inside a possible block, otherwise use the full area
        let area = self.block.map_or(full_area, |block| {
            let inner_area = block.inner(full_area);
            block.render(full_area, buf);
            inner_area
        });

        if area.width < 1 || area.height < 1 {
            return;
        }

        let scene = state.scene();

        // Trunks first, then corners and arms: a corner cell can then see
        // whether a longer sibling connector passes through it.
        for link in &scene.links {
            if link.opacity >= VISIBLE_OPACITY {
                render_link_trunk(area, buf, link, fade(self.link_style, link.opacity));
            }
        }
        for link in &scene.links {
            if link.opacity >= VISIBLE_OPACITY {
                render_link_arm(area, buf, link, fade(self.link_style, link.opacity));
            }
        }

        for node in &scene.nodes {
            if node.opacity < VISIBLE_OPACITY {
                continue;
            }
            let Some((x, y)) = cell_of(area, node.position) else {
                continue;
            };
            let style = fade(self.style, node.opacity);
            let symbol = match node.icon {
                Icon::Open => self.open_symbol,
                Icon::Closed => self.closed_symbol,
                Icon::Leaf => self.leaf_symbol,
            };
            let max_symbol = area.right().saturating_sub(x);
            let (after_icon_x, _) = buf.set_stringn(x, y, symbol, max_symbol as usize, style);
            let max_label = area.right().saturating_sub(after_icon_x);
            let (after_label_x, _) =
                buf.set_stringn(after_icon_x, y, &node.label, max_label as usize, style);

            if state.hovered() == Some(node.identifier) {
                let row_area = Rect {
                    x: area.x,
                    y,
                    width: area.width,
                    height: 1,
                };
                buf.set_style(row_area, self.highlight_style);
                if let Some(tooltip) = &node.tooltip {
                    let tooltip_x = after_label_x.saturating_add(2);
                    if tooltip_x < area.right() {
                        let max_tooltip = area.right() - tooltip_x;
                        buf.set_stringn(
                            tooltip_x,
                            y,
                            tooltip,
                            max_tooltip as usize,
                            self.tooltip_style,
                        );
                    }
                }
            }
        }
    }
}

fn fade(style: Style, opacity: f64) -> Style {
    if opacity < FULL_OPACITY {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

/// Round a diagram position to a buffer cell, or `None` when it falls
/// outside the drawable area.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_of(area: Rect, position: Position) -> Option<(u16, u16)> {
    let x = position.x.round();
    let y = position.y.round();
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let x = area.x.saturating_add(x as u16);
    let y = area.y.saturating_add(y as u16);
    (x < area.right() && y < area.bottom()).then_some((x, y))
}

fn render_link_trunk(area: Rect, buf: &mut Buffer, link: &DrawLink, style: Style) {
    let (x, parent_y) = raw_cell(area, link.parent);
    let (_, child_y) = raw_cell(area, link.child);
    for y in parent_y.saturating_add(1)..child_y {
        if in_area(area, x, y) {
            buf.get_mut(x, y).set_symbol("\u{2502}").set_style(style);
        }
    }
}

fn render_link_arm(area: Rect, buf: &mut Buffer, link: &DrawLink, style: Style) {
    let (parent_x, parent_y) = raw_cell(area, link.parent);
    let (child_x, child_y) = raw_cell(area, link.child);
    if child_y <= parent_y {
        // Still collapsed onto the pivot's row, nothing to draw yet.
        return;
    }
    if in_area(area, parent_x, child_y) {
        // A trunk continuing to a later sibling turns the corner into a tee.
        let corner = if buf.get(parent_x, child_y).symbol() == "\u{2502}" {
            "\u{251c}"
        } else {
            "\u{2514}"
        };
        buf.get_mut(parent_x, child_y)
            .set_symbol(corner)
            .set_style(style);
    }
    for x in parent_x.saturating_add(1)..child_x {
        if in_area(area, x, child_y) {
            buf.get_mut(x, child_y).set_symbol("\u{2500}").set_style(style);
        }
    }
}

/// Round a diagram position to its buffer cell, clipped nowhere: callers
/// bounds-check each drawn cell with [`in_area`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn raw_cell(area: Rect, position: Position) -> (u16, u16) {
    (
        area.x.saturating_add(position.x.round() as u16),
        area.y.saturating_add(position.y.round() as u16),
    )
}

const fn in_area(area: Rect, x: u16, y: u16) -> bool {
    x < area.x.saturating_add(area.width) && y < area.y.saturating_add(area.height)
}
