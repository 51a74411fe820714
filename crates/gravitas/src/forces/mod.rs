//! Gravity models
//!
//! A [`ForceModel`] reads every live body in the arena and adds the force it
//! feels to that body's accumulator. Nothing moves until the universe
//! integrates.

use nalgebra::Vector2;

use crate::arena::{BodyArena, BodyHandle};
use crate::config::{GravityConfig, UniverseConfig};

pub mod gravity;
pub mod tree_gravity;

#[cfg(test)]
mod tree_gravity_test;

pub use gravity::DirectGravity;
pub use tree_gravity::TreeGravity;

/// A source of force on bodies
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
/// let a = arena.insert(Body::new(BodyId(0), Point2::new(0.0, 0.0), Vector2::zeros(), 100.0));
/// arena.insert(Body::new(BodyId(1), Point2::new(10.0, 0.0), Vector2::zeros(), 100.0));
///
/// let mut gravity = DirectGravity::new(1.0);
/// gravity.apply_forces(&mut arena);
///
/// assert!(arena.body(a).force().x > 0.0);
/// ```
pub trait ForceModel: Send + Sync {
    /// Force felt by every live body, in arena order
    fn compute_forces(&mut self, bodies: &BodyArena) -> Vec<(BodyHandle, Vector2<f64>)>;

    /// Adds the computed forces to each body's accumulator
    fn apply_forces(&mut self, bodies: &mut BodyArena) {
        for (handle, force) in self.compute_forces(bodies) {
            if let Some(body) = bodies.get_mut(handle) {
                body.apply_force(force);
            }
        }
    }

    /// Total potential energy of the system (diagnostics only)
    fn potential_energy(&self, _bodies: &BodyArena) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str;
}

/// Builds the force model selected by the configuration
pub fn build_force_model(config: &UniverseConfig) -> Box<dyn ForceModel> {
    match config.gravity {
        GravityConfig::Exact { parallel } => {
            Box::new(DirectGravity::new(config.gravity_constant).with_parallel(parallel))
        }
        GravityConfig::BarnesHut { approximation } => Box::new(TreeGravity::new(
            config.bounds(),
            approximation,
            config.gravity_constant,
        )),
    }
}
