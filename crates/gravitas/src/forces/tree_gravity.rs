//! Tree-based gravity using the Barnes-Hut algorithm (O(N log N))

use nalgebra::Vector2;
use tracing::trace;

use crate::arena::{BodyArena, BodyHandle};
use crate::barnes_hut::BarnesHutTree;
use crate::forces::ForceModel;
use crate::physics::BoundingBox;

/// Barnes-Hut gravity.
///
/// Rebuilds a [`BarnesHutTree`] over the world every call, then queries it
/// once per body.
///
/// # Approximation threshold
///
/// A node of width `w` at distance `d` is collapsed to its center of mass
/// when `w² / d² < approximation²`:
/// - `0.0`: exact (same as [`DirectGravity`](super::DirectGravity))
/// - `0.5`: accurate, moderately fast
/// - `1.0` and up: coarse, fastest
pub struct TreeGravity {
    tree: BarnesHutTree,
}

impl TreeGravity {
    pub fn new(bounds: BoundingBox, approximation: f64, gravity: f64) -> Self {
        Self {
            tree: BarnesHutTree::new(bounds, approximation, gravity),
        }
    }

    /// Tree built by the last force computation
    pub fn tree(&self) -> &BarnesHutTree {
        &self.tree
    }
}

impl ForceModel for TreeGravity {
    fn compute_forces(&mut self, bodies: &BodyArena) -> Vec<(BodyHandle, Vector2<f64>)> {
        self.tree.update(bodies);
        trace!(nodes = self.tree.node_count(), "rebuilt barnes-hut tree");

        bodies
            .iter()
            .map(|(handle, body)| (handle, self.tree.force_applied_to(body.position, body.mass())))
            .collect()
    }

    fn name(&self) -> &'static str {
        "barnes-hut"
    }
}
