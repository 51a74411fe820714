//! Spatial partitioning for collision detection and point queries
//!
//! Every structure tracks [`BodyHandle`]s and resolves them through the
//! [`BodyArena`] on each call. The universe notifies the active structure of
//! every insertion, removal and arena relocation, and calls
//! [`SpatialPartitioning::update`] once per tick after bodies have moved.
//!
//! | structure      | collisions                       | point query          |
//! |----------------|----------------------------------|----------------------|
//! | [`QuadTree`]   | node + descendant pairs          | descend by bounds    |
//! | [`Grid`]       | within each cell only            | neighbouring cells   |
//! | [`LineSweep`]  | x-axis sweep over an active set  | scan by left edge    |
//! | [`BruteForce`] | all pairs                        | linear scan          |

use nalgebra::Point2;
use tracing::debug;

use crate::arena::{BodyArena, BodyHandle};
use crate::config::PartitioningConfig;
use crate::physics::BoundingBox;

pub mod brute_force;
pub mod grid;
pub mod line_sweep;
pub mod quadtree;

#[cfg(test)]
mod grid_test;

pub use brute_force::BruteForce;
pub use grid::Grid;
pub use line_sweep::LineSweep;
pub use quadtree::QuadTree;

/// Two overlapping bodies, heavier first.
///
/// Equal masses are ordered by id: the lower [`BodyId`](crate::body::BodyId)
/// counts as the bigger body, so resolution is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub bigger: BodyHandle,
    pub smaller: BodyHandle,
}

impl Collision {
    /// Orders the pair by current mass, then id
    pub fn between(a: BodyHandle, b: BodyHandle, bodies: &BodyArena) -> Self {
        let (body_a, body_b) = (bodies.body(a), bodies.body(b));

        let a_wins = match body_a.mass().partial_cmp(&body_b.mass()) {
            Some(std::cmp::Ordering::Greater) => true,
            Some(std::cmp::Ordering::Less) => false,
            _ => body_a.id < body_b.id,
        };

        if a_wins {
            Collision { bigger: a, smaller: b }
        } else {
            Collision { bigger: b, smaller: a }
        }
    }

    /// Order-independent identity of the pair
    pub fn key(&self) -> (BodyHandle, BodyHandle) {
        if self.bigger <= self.smaller {
            (self.bigger, self.smaller)
        } else {
            (self.smaller, self.bigger)
        }
    }
}

/// Runs one pairwise test and records it in the check counter
pub(crate) fn check_pair(
    a: BodyHandle,
    b: BodyHandle,
    bodies: &BodyArena,
    checks: &mut u64,
    out: &mut Vec<Collision>,
) {
    *checks += 1;
    if bodies.body(a).collides_with(bodies.body(b)) {
        out.push(Collision::between(a, b, bodies));
    }
}

/// A structure that accelerates collision detection and point queries.
///
/// # Contract
///
/// - A handle is added at most once and removed only while tracked;
///   violating either panics.
/// - After [`update`](Self::update), [`get_collisions`](Self::get_collisions)
///   reports exactly the overlapping pairs the structure can see, each once.
pub trait SpatialPartitioning: Send {
    /// Starts tracking a live body
    fn add_body(&mut self, handle: BodyHandle, bodies: &BodyArena);

    /// Stops tracking a body.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not tracked.
    fn rem_body(&mut self, handle: BodyHandle, bodies: &BodyArena);

    /// Re-keys a tracked handle after the arena relocated its body
    fn notify_move(&mut self, from: BodyHandle, to: BodyHandle);

    /// Resyncs with positions and radii after bodies moved or grew
    fn update(&mut self, bodies: &BodyArena);

    /// First body, in structural order, whose circle contains `point`
    fn find_body(&self, point: Point2<f64>, bodies: &BodyArena) -> Option<BodyHandle>;

    /// Every overlapping pair, each reported once. Resets the check counter.
    fn get_collisions(&mut self, bodies: &BodyArena) -> Vec<Collision>;

    /// Pairwise tests performed by the last `get_collisions`
    fn collision_checks(&self) -> u64;

    /// Rectangles for debug drawing
    fn representation(&self) -> Vec<BoundingBox>;

    /// Number of tracked bodies
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn name(&self) -> &'static str;
}

/// Builds the structure selected by the configuration
pub fn build_partitioning(config: &PartitioningConfig, bounds: BoundingBox) -> Box<dyn SpatialPartitioning> {
    let partitioning: Box<dyn SpatialPartitioning> = match *config {
        PartitioningConfig::QuadTree {
            max_bodies_per_node,
            max_depth,
        } => Box::new(QuadTree::new(bounds, max_bodies_per_node, max_depth)),
        PartitioningConfig::Grid { cell_size } => Box::new(Grid::new(bounds, cell_size)),
        PartitioningConfig::LineSweep => Box::new(LineSweep::new()),
        PartitioningConfig::BruteForce => Box::new(BruteForce::new()),
    };

    debug!(name = partitioning.name(), "built spatial partitioning");
    partitioning
}
