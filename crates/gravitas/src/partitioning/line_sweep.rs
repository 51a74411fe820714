//! Sweep-and-prune along the x axis.
//!
//! Bodies are kept in two orders: by left edge (entry events) and by right
//! edge (leave events). Inserts and removals keep both sorted; `update`
//! re-sorts after everything moved. The sweep only prunes on x, so bodies
//! that overlap in x but sit far apart in y still cost a check each.

use nalgebra::Point2;

use crate::arena::{BodyArena, BodyHandle};
use crate::partitioning::{check_pair, Collision, SpatialPartitioning};
use crate::physics::BoundingBox;

#[derive(Debug, Default)]
pub struct LineSweep {
    by_left: Vec<BodyHandle>,
    by_right: Vec<BodyHandle>,
    collision_checks: u64,
}

fn left_edge(handle: BodyHandle, bodies: &BodyArena) -> f64 {
    let body = bodies.body(handle);
    body.position.x - body.radius()
}

fn right_edge(handle: BodyHandle, bodies: &BodyArena) -> f64 {
    let body = bodies.body(handle);
    body.position.x + body.radius()
}

fn remove_handle(list: &mut Vec<BodyHandle>, handle: BodyHandle) -> bool {
    match list.iter().position(|&h| h == handle) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

impl LineSweep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracked handles in entry order
    pub fn entry_order(&self) -> &[BodyHandle] {
        &self.by_left
    }

    /// Tracked handles in leave order
    pub fn leave_order(&self) -> &[BodyHandle] {
        &self.by_right
    }
}

impl SpatialPartitioning for LineSweep {
    fn add_body(&mut self, handle: BodyHandle, bodies: &BodyArena) {
        assert!(!self.by_left.contains(&handle), "body {handle:?} added twice");

        let left = left_edge(handle, bodies);
        let at = self.by_left.partition_point(|&h| left_edge(h, bodies) <= left);
        self.by_left.insert(at, handle);

        let right = right_edge(handle, bodies);
        let at = self.by_right.partition_point(|&h| right_edge(h, bodies) <= right);
        self.by_right.insert(at, handle);
    }

    fn rem_body(&mut self, handle: BodyHandle, _bodies: &BodyArena) {
        let removed = remove_handle(&mut self.by_left, handle);
        assert!(removed, "removing untracked body {handle:?}");
        remove_handle(&mut self.by_right, handle);
    }

    fn notify_move(&mut self, from: BodyHandle, to: BodyHandle) {
        let mut found = false;
        for slot in self.by_left.iter_mut().chain(self.by_right.iter_mut()) {
            if *slot == from {
                *slot = to;
                found = true;
            }
        }
        assert!(found, "moving untracked body {from:?}");
    }

    fn update(&mut self, bodies: &BodyArena) {
        self.by_left
            .sort_by(|&a, &b| left_edge(a, bodies).total_cmp(&left_edge(b, bodies)));
        self.by_right
            .sort_by(|&a, &b| right_edge(a, bodies).total_cmp(&right_edge(b, bodies)));
    }

    fn find_body(&self, point: Point2<f64>, bodies: &BodyArena) -> Option<BodyHandle> {
        self.by_left
            .iter()
            .copied()
            .take_while(|&h| left_edge(h, bodies) <= point.x)
            .find(|&h| bodies.body(h).contains_point(point))
    }

    /// Sweeps entry events left to right, retiring every active body whose
    /// right edge does not pass the entering left edge
    fn get_collisions(&mut self, bodies: &BodyArena) -> Vec<Collision> {
        let mut checks = 0;
        let mut collisions = Vec::new();
        let mut active: Vec<BodyHandle> = Vec::new();
        let mut leave = 0;

        for &entering in &self.by_left {
            let left = left_edge(entering, bodies);

            while leave < self.by_right.len() && right_edge(self.by_right[leave], bodies) <= left {
                let leaving = self.by_right[leave];
                active.retain(|&h| h != leaving);
                leave += 1;
            }

            for &other in &active {
                check_pair(other, entering, bodies, &mut checks, &mut collisions);
            }
            active.push(entering);
        }

        self.collision_checks = checks;
        collisions
    }

    fn collision_checks(&self) -> u64 {
        self.collision_checks
    }

    fn representation(&self) -> Vec<BoundingBox> {
        Vec::new()
    }

    fn len(&self) -> usize {
        self.by_left.len()
    }

    fn name(&self) -> &'static str {
        "line-sweep"
    }
}
