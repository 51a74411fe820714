//! Direct N-body gravity (O(N²) implementation)

use nalgebra::{Point2, Vector2};
use rayon::prelude::*;

use crate::arena::{BodyArena, BodyHandle};
use crate::forces::ForceModel;
use crate::physics;

/// Exact pairwise gravity.
///
/// Sums the pull of every other body on each body. With `parallel` set the
/// per-body sums are spread over the rayon pool; all of them finish before
/// any accumulator is touched, so results only differ from the sequential
/// run by float summation order.
///
/// # Examples
///
/// ```
/// use gravitas::arena::BodyArena;
/// use gravitas::body::{Body, BodyId};
/// use gravitas::forces::{DirectGravity, ForceModel};
/// use nalgebra::{Point2, Vector2};
///
/// let mut arena = BodyArena::new();
/// arena.insert(Body::new(BodyId(0), Point2::new(0.0, 0.0), Vector2::zeros(), 100.0));
/// arena.insert(Body::new(BodyId(1), Point2::new(500.0, 0.0), Vector2::zeros(), 100.0));
///
/// let forces = DirectGravity::new(1.0).compute_forces(&arena);
/// assert!((forces[0].1.x - 0.04).abs() < 1e-12);
/// assert!((forces[1].1.x + 0.04).abs() < 1e-12);
/// ```
pub struct DirectGravity {
    /// Gravitational constant
    pub gravity: f64,
    /// Compute per-body sums on the rayon pool
    pub parallel: bool,
}

impl DirectGravity {
    pub fn new(gravity: f64) -> Self {
        Self {
            gravity,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Dense copy of what the force loop needs
fn snapshot(bodies: &BodyArena) -> Vec<(BodyHandle, Point2<f64>, f64)> {
    bodies
        .iter()
        .map(|(handle, body)| (handle, body.position, body.mass()))
        .collect()
}

fn force_on(g: f64, at: Point2<f64>, mass: f64, others: &[(BodyHandle, Point2<f64>, f64)]) -> Vector2<f64> {
    // Coincident masses (including the body itself) contribute zero
    others.iter().fold(Vector2::zeros(), |acc, (_, position, other_mass)| {
        acc + physics::gravity_between(g, at, mass, *position, *other_mass)
    })
}

impl ForceModel for DirectGravity {
    fn compute_forces(&mut self, bodies: &BodyArena) -> Vec<(BodyHandle, Vector2<f64>)> {
        let snapshot = snapshot(bodies);
        let g = self.gravity;

        if self.parallel {
            snapshot
                .par_iter()
                .map(|(handle, position, mass)| (*handle, force_on(g, *position, *mass, &snapshot)))
                .collect()
        } else {
            snapshot
                .iter()
                .map(|(handle, position, mass)| (*handle, force_on(g, *position, *mass, &snapshot)))
                .collect()
        }
    }

    fn potential_energy(&self, bodies: &BodyArena) -> f64 {
        let snapshot = snapshot(bodies);
        let mut energy = 0.0;

        for (i, (_, pi, mi)) in snapshot.iter().enumerate() {
            for (_, pj, mj) in &snapshot[i + 1..] {
                let r = physics::distance(*pi, *pj);
                if r > 0.0 {
                    energy -= self.gravity * mi * mj / r;
                }
            }
        }

        energy
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}
