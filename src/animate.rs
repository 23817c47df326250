use std::collections::HashMap;
use std::time::Duration;

use crate::layout::{Placement, Position};
use crate::node::{Icon, NodeId};
use crate::reconcile::Pass;

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply to a progress value. Input is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

/// How one reconcile pass is presented over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    pub(crate) duration: Duration,
    pub(crate) easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(250),
            easing: Easing::EaseInOut,
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero disables animation; every pass then settles immediately.
    #[must_use]
    pub const fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub const fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// One row of the draw-ready scene.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawNode {
    pub identifier: NodeId,
    pub label: String,
    pub tooltip: Option<String>,
    pub icon: Icon,
    pub position: Position,
    pub opacity: f64,
}

/// One connector of the draw-ready scene, running from the parent's icon
/// column down to the child's row and across to the child's label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawLink {
    pub parent: Position,
    pub child: Position,
    pub opacity: f64,
}

/// Everything the widget draws for one frame. Connectors come first so
/// node rows overdraw them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub links: Vec<DrawLink>,
    pub nodes: Vec<DrawNode>,
}

impl Scene {
    /// Scene of a settled (non-animating) committed pass.
    pub(crate) fn settled(placements: &[Placement]) -> Self {
        let positions = placements
            .iter()
            .map(|placement| (placement.identifier, placement.position))
            .collect::<HashMap<_, _>>();
        let links = placements
            .iter()
            .filter_map(|placement| {
                let parent = positions.get(&placement.parent?).copied()?;
                Some(DrawLink {
                    parent,
                    child: placement.position,
                    opacity: 1.0,
                })
            })
            .collect();
        let nodes = placements
            .iter()
            .map(|placement| DrawNode {
                identifier: placement.identifier,
                label: placement.label.clone(),
                tooltip: placement.tooltip.clone(),
                icon: placement.icon,
                position: placement.position,
                opacity: 1.0,
            })
            .collect();
        Self { links, nodes }
    }
}

/// An in-flight presentation of one reconcile pass.
///
/// Presentation only: the model was already mutated synchronously before
/// this was created, and a newer pass simply replaces an unfinished one
/// with freshly computed targets.
#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pass: Pass,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
}

impl Transition {
    pub(crate) const fn new(pass: Pass, config: &AnimationConfig) -> Self {
        Self {
            pass,
            duration: config.duration,
            easing: config.easing,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `delta`. Returns `true` once the transition is finished.
    pub(crate) fn tick(&mut self, delta: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(delta);
        self.is_finished()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated scene at the current eased progress.
    pub(crate) fn sample(&self) -> Scene {
        let t = self.easing.apply(self.progress());
        let links = self
            .pass
            .links
            .iter()
            .map(|tween| DrawLink {
                parent: tween.parent_from.lerp(tween.parent_to, t),
                child: tween.child_from.lerp(tween.child_to, t),
                opacity: lerp(tween.fade_from, tween.fade_to, t),
            })
            .collect();
        let nodes = self
            .pass
            .nodes
            .iter()
            .map(|tween| DrawNode {
                identifier: tween.identifier,
                label: tween.label.clone(),
                tooltip: tween.tooltip.clone(),
                icon: tween.icon,
                position: tween.from.lerp(tween.to, t),
                opacity: lerp(tween.fade_from, tween.fade_to, t),
            })
            .collect();
        Scene { links, nodes }
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    (to - from).mul_add(t, from)
}
