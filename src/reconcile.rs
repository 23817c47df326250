use std::collections::{HashMap, HashSet};

use crate::layout::{Placement, Position};
use crate::node::{Icon, NodeId};

/// Which of the three sets an element belongs to for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Visible now, not previously rendered.
    Enter,
    /// Visible in both scenes.
    Update,
    /// Previously rendered, no longer visible.
    Exit,
}

/// Movement of one row between two committed scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTween {
    pub identifier: NodeId,
    pub phase: Phase,
    pub label: String,
    pub tooltip: Option<String>,
    pub icon: Icon,
    pub from: Position,
    pub to: Position,
    pub fade_from: f64,
    pub fade_to: f64,
}

/// Movement of one connector, keyed by its (parent, child) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTween {
    pub parent: NodeId,
    pub child: NodeId,
    pub phase: Phase,
    pub parent_from: Position,
    pub parent_to: Position,
    pub child_from: Position,
    pub child_to: Position,
    pub fade_from: f64,
    pub fade_to: f64,
}

/// All tweens of one reconcile pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pass {
    pub nodes: Vec<NodeTween>,
    pub links: Vec<LinkTween>,
}

/// Partition rows and connectors between the previously committed scene
/// and the freshly laid out one, anchored at the pivot.
///
/// Entering elements spawn at the pivot's previous position and fade in,
/// so new rows slide out from the point of interaction. Persisting ones
/// slide from their stored previous position. Exiting ones collapse onto
/// the pivot's current position and fade out; they leave the rendered
/// scene only, never the tree.
///
/// The caller commits `next` as the new scene in a single step after this
/// returns, so the following pass reads consistent previous positions.
#[must_use]
pub fn reconcile(
    previous: &[Placement],
    next: &[Placement],
    pivot_previous: Position,
    pivot_current: Position,
) -> Pass {
    let previous_positions = previous
        .iter()
        .map(|placement| (placement.identifier, placement.position))
        .collect::<HashMap<_, _>>();
    let next_identifiers = next
        .iter()
        .map(|placement| placement.identifier)
        .collect::<HashSet<_>>();

    let mut nodes = Vec::with_capacity(next.len());
    for placement in next {
        let (phase, from, fade_from) = previous_positions
            .get(&placement.identifier)
            .copied()
            .map_or((Phase::Enter, pivot_previous, 0.0), |stored| {
                (Phase::Update, stored, 1.0)
            });
        nodes.push(NodeTween {
            identifier: placement.identifier,
            phase,
            label: placement.label.clone(),
            tooltip: placement.tooltip.clone(),
            icon: placement.icon,
            from,
            to: placement.position,
            fade_from,
            fade_to: 1.0,
        });
    }
    for placement in previous {
        if next_identifiers.contains(&placement.identifier) {
            continue;
        }
        nodes.push(NodeTween {
            identifier: placement.identifier,
            phase: Phase::Exit,
            label: placement.label.clone(),
            tooltip: placement.tooltip.clone(),
            icon: placement.icon,
            from: placement.position,
            to: pivot_current,
            fade_from: 1.0,
            fade_to: 0.0,
        });
    }

    let previous_links = links_of(previous);
    let next_links = links_of(next);
    let previous_endpoints = previous_links
        .iter()
        .map(|link| ((link.parent, link.child), (link.parent_position, link.child_position)))
        .collect::<HashMap<_, _>>();
    let next_keys = next_links
        .iter()
        .map(|link| (link.parent, link.child))
        .collect::<HashSet<_>>();

    let mut links = Vec::with_capacity(next_links.len());
    for link in &next_links {
        let tween = previous_endpoints.get(&(link.parent, link.child)).map_or(
            // Entering connectors start collapsed to a point at the pivot.
            LinkTween {
                parent: link.parent,
                child: link.child,
                phase: Phase::Enter,
                parent_from: pivot_previous,
                parent_to: link.parent_position,
                child_from: pivot_previous,
                child_to: link.child_position,
                fade_from: 0.0,
                fade_to: 1.0,
            },
            |&(parent_from, child_from)| LinkTween {
                parent: link.parent,
                child: link.child,
                phase: Phase::Update,
                parent_from,
                parent_to: link.parent_position,
                child_from,
                child_to: link.child_position,
                fade_from: 1.0,
                fade_to: 1.0,
            },
        );
        links.push(tween);
    }
    for link in &previous_links {
        if next_keys.contains(&(link.parent, link.child)) {
            continue;
        }
        links.push(LinkTween {
            parent: link.parent,
            child: link.child,
            phase: Phase::Exit,
            parent_from: link.parent_position,
            parent_to: pivot_current,
            child_from: link.child_position,
            child_to: pivot_current,
            fade_from: 1.0,
            fade_to: 0.0,
        });
    }

    Pass { nodes, links }
}

struct SceneLink {
    parent: NodeId,
    child: NodeId,
    parent_position: Position,
    child_position: Position,
}

fn links_of(placements: &[Placement]) -> Vec<SceneLink> {
    let positions = placements
        .iter()
        .map(|placement| (placement.identifier, placement.position))
        .collect::<HashMap<_, _>>();
    placements
        .iter()
        .filter_map(|placement| {
            let parent = placement.parent?;
            let parent_position = positions.get(&parent).copied()?;
            Some(SceneLink {
                parent,
                child: placement.identifier,
                parent_position,
                child_position: placement.position,
            })
        })
        .collect()
}
