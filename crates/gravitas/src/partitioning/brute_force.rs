//! All-pairs baseline. Slow, but it sees everything, so the other
//! structures are tested against it.

use nalgebra::Point2;

use crate::arena::{BodyArena, BodyHandle};
use crate::partitioning::{check_pair, Collision, SpatialPartitioning};
use crate::physics::BoundingBox;

#[derive(Debug, Default)]
pub struct BruteForce {
    /// Insertion order
    bodies: Vec<BodyHandle>,
    collision_checks: u64,
}

impl BruteForce {
    pub fn new() -> Self {
        Self::default()
    }

    fn position_of(&self, handle: BodyHandle) -> Option<usize> {
        self.bodies.iter().position(|&h| h == handle)
    }
}

impl SpatialPartitioning for BruteForce {
    fn add_body(&mut self, handle: BodyHandle, _bodies: &BodyArena) {
        assert!(self.position_of(handle).is_none(), "body {handle:?} added twice");
        self.bodies.push(handle);
    }

    fn rem_body(&mut self, handle: BodyHandle, _bodies: &BodyArena) {
        let Some(index) = self.position_of(handle) else {
            panic!("removing untracked body {handle:?}");
        };
        self.bodies.remove(index);
    }

    fn notify_move(&mut self, from: BodyHandle, to: BodyHandle) {
        let Some(index) = self.position_of(from) else {
            panic!("moving untracked body {from:?}");
        };
        self.bodies[index] = to;
    }

    fn update(&mut self, _bodies: &BodyArena) {}

    fn find_body(&self, point: Point2<f64>, bodies: &BodyArena) -> Option<BodyHandle> {
        self.bodies
            .iter()
            .copied()
            .find(|&h| bodies.body(h).contains_point(point))
    }

    fn get_collisions(&mut self, bodies: &BodyArena) -> Vec<Collision> {
        let mut checks = 0;
        let mut collisions = Vec::new();

        for (i, &a) in self.bodies.iter().enumerate() {
            for &b in &self.bodies[i + 1..] {
                check_pair(a, b, bodies, &mut checks, &mut collisions);
            }
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
        self.bodies.len()
    }

    fn name(&self) -> &'static str {
        "brute-force"
    }
}
