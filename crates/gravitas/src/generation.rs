//! Procedural body placement.
//!
//! Pure functions of an RNG and the [`GenerationConfig`]; the universe owns
//! the seeded `ChaChaRng` and decides what to do with each [`BodySeed`].
//!
//! Satellites start at periapsis. For a parent of mass `M` and radius
//! `R`, a satellite of mass `m` and radius `r` is placed at
//!
//! ```text
//! d = separation * (R + r)
//! ```
//!
//! from the parent's center at the given angle, moving perpendicular to the
//! radius vector with the periapsis speed of an orbit of eccentricity `e`:
//!
//! ```text
//! v = sqrt(G * (M + m) * (1 + e) / d)
//! ```
//!
//! plus the parent's own velocity.

use std::f64::consts::TAU;

use nalgebra::{Point2, Vector2};
use rand::Rng;

use crate::body::{radius_for_mass, Body};
use crate::config::GenerationConfig;
use crate::physics::BoundingBox;

/// Initial state of a body that does not exist yet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySeed {
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub mass: f64,
}

/// A free body anywhere in `bounds` with a small random drift
pub fn random_body<R: Rng + ?Sized>(rng: &mut R, config: &GenerationConfig, bounds: &BoundingBox) -> BodySeed {
    BodySeed {
        position: random_point(rng, bounds),
        velocity: random_velocity(rng, config.initial_speed),
        mass: config.body_mass.sample(rng),
    }
}

/// A system's central body, kept away from the world edges
pub fn random_star<R: Rng + ?Sized>(rng: &mut R, config: &GenerationConfig, bounds: &BoundingBox) -> BodySeed {
    let inset = BoundingBox::new(
        Point2::new(bounds.min.x + bounds.width() * 0.2, bounds.min.y + bounds.height() * 0.2),
        Point2::new(bounds.max.x - bounds.width() * 0.2, bounds.max.y - bounds.height() * 0.2),
    );

    BodySeed {
        position: random_point(rng, &inset),
        velocity: Vector2::zeros(),
        mass: config.star_mass.sample(rng),
    }
}

/// A satellite of `parent` with mass, separation, eccentricity and angle
/// drawn from the configured ranges
pub fn random_satellite<R: Rng + ?Sized>(
    rng: &mut R,
    parent: &Body,
    config: &GenerationConfig,
    gravity: f64,
) -> BodySeed {
    let mass = config.satellite_mass.sample(rng);
    let separation = config.satellite_separation.sample(rng);
    let eccentricity = config.eccentricity.sample(rng);
    let angle = rng.gen_range(0.0..TAU);

    satellite(parent, mass, eccentricity, separation, angle, gravity)
}

/// Places a satellite of `parent` at periapsis.
///
/// # Arguments
///
/// * `parent` - Body being orbited
/// * `mass` - Satellite mass
/// * `eccentricity` - Orbit eccentricity, `0` for circular
/// * `separation` - Periapsis distance in units of the combined radii
/// * `angle` - Direction from the parent to the satellite, in radians
/// * `gravity` - Gravitational constant
///
/// # Examples
///
/// ```
/// use gravitas::body::{Body, BodyId};
/// use gravitas::generation::satellite;
/// use nalgebra::{Point2, Vector2};
///
/// let star = Body::new(BodyId(0), Point2::new(0.0, 0.0), Vector2::zeros(), 20_000.0);
/// let seed = satellite(&star, 100.0, 0.0, 10.0, 0.0, 1.0);
///
/// // Radii 114 + 10, ten times over
/// assert!((seed.position.x - 1240.0).abs() < 1e-9);
/// // Circular speed, moving counter-clockwise
/// assert!((seed.velocity.y - (20_100.0f64 / 1240.0).sqrt()).abs() < 1e-9);
/// ```
pub fn satellite(
    parent: &Body,
    mass: f64,
    eccentricity: f64,
    separation: f64,
    angle: f64,
    gravity: f64,
) -> BodySeed {
    let distance = separation * (parent.radius() + radius_for_mass(mass));
    let direction = Vector2::new(angle.cos(), angle.sin());
    let tangent = Vector2::new(-direction.y, direction.x);

    let speed = if distance > 0.0 {
        (gravity * (parent.mass() + mass) * (1.0 + eccentricity) / distance).sqrt()
    } else {
        0.0
    };

    BodySeed {
        position: parent.position + direction * distance,
        velocity: parent.velocity + tangent * speed,
        mass,
    }
}

fn random_point<R: Rng + ?Sized>(rng: &mut R, bounds: &BoundingBox) -> Point2<f64> {
    Point2::new(
        sample_between(rng, bounds.min.x, bounds.max.x),
        sample_between(rng, bounds.min.y, bounds.max.y),
    )
}

fn random_velocity<R: Rng + ?Sized>(rng: &mut R, speed: f64) -> Vector2<f64> {
    Vector2::new(
        sample_between(rng, -speed, speed),
        sample_between(rng, -speed, speed),
    )
}

fn sample_between<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        low
    }
}
