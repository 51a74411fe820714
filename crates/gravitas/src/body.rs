use nalgebra::{Point2, Vector2};

use crate::physics::{self, BoundingBox};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Size tier of a body, derived from its mass.
///
/// The tier only drives radius scaling and color; gravity treats every body
/// as a plain point mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyType {
    Asteroid,
    Planet,
    Sun,
    BlackHole,
}

/// Ordered threshold table: (minimum mass, type, density)
const TYPE_THRESHOLDS: [(f64, BodyType, f64); 4] = [
    (1_000_000.0, BodyType::BlackHole, 100_000.0),
    (10_000.0, BodyType::Sun, 2_000.0),
    (100.0, BodyType::Planet, 100.0),
    (1.0, BodyType::Asteroid, 10.0),
];

impl BodyType {
    /// Tier for a given mass
    pub fn from_mass(mass: f64) -> Self {
        TYPE_THRESHOLDS
            .iter()
            .find(|(min_mass, _, _)| mass >= *min_mass)
            .map(|(_, body_type, _)| *body_type)
            .unwrap_or(BodyType::Asteroid)
    }

    /// Mass per unit of radius inside this tier's band
    pub fn density(self) -> f64 {
        TYPE_THRESHOLDS
            .iter()
            .find(|(_, body_type, _)| *body_type == self)
            .map(|(_, _, density)| *density)
            .unwrap_or(1.0)
    }

    /// RGB color used by renderers
    pub fn color(self) -> [u8; 3] {
        match self {
            BodyType::Asteroid => [150, 150, 150],
            BodyType::Planet => [70, 130, 230],
            BodyType::Sun => [255, 210, 60],
            BodyType::BlackHole => [60, 20, 80],
        }
    }
}

/// A point mass in the simulation.
///
/// Radius and type are derived from mass and are only ever updated through
/// [`Body::set_mass`], so they cannot drift out of sync.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub id: BodyId,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    force: Vector2<f64>,
    mass: f64,
    radius: f64,
    body_type: BodyType,
}

impl Body {
    /// Creates a body, clamping mass to at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use gravitas::body::{Body, BodyId, BodyType};
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let body = Body::new(BodyId(0), Point2::new(0.0, 0.0), Vector2::zeros(), 0.25);
    /// assert_eq!(body.mass(), 1.0);
    /// assert_eq!(body.radius(), 1.0);
    /// assert_eq!(body.body_type(), BodyType::Asteroid);
    /// ```
    pub fn new(id: BodyId, position: Point2<f64>, velocity: Vector2<f64>, mass: f64) -> Self {
        let mut body = Body {
            id,
            position,
            velocity,
            force: Vector2::zeros(),
            mass: 1.0,
            radius: 1.0,
            body_type: BodyType::Asteroid,
        };
        body.set_mass(mass);
        body
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn color(&self) -> [u8; 3] {
        self.body_type.color()
    }

    /// Force accumulated since the last integration step
    pub fn force(&self) -> Vector2<f64> {
        self.force
    }

    pub fn set_position(&mut self, position: Point2<f64>) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector2<f64>) {
        self.velocity = velocity;
    }

    /// Sets mass (floor 1) and recomputes type and radius
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass.max(1.0);
        self.body_type = BodyType::from_mass(self.mass);
        self.radius = radius_for_mass(self.mass);
    }

    /// Adds to the force accumulator; nothing moves until [`Body::integrate`]
    pub fn apply_force(&mut self, force: Vector2<f64>) {
        self.force += force;
    }

    /// Explicit Euler-like step followed by wraparound into `bounds`.
    ///
    /// ```
    /// use gravitas::body::{Body, BodyId};
    /// use gravitas::physics::BoundingBox;
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let bounds = BoundingBox::square(0.0, 0.0, 100.0);
    /// let mut body = Body::new(BodyId(0), Point2::new(99.0, 50.0), Vector2::new(3.0, 0.0), 10.0);
    /// body.integrate(&bounds);
    ///
    /// // 102 wraps around to 2 on the opposite side
    /// assert!((body.position.x - 2.0).abs() < 1e-12);
    /// ```
    pub fn integrate(&mut self, bounds: &BoundingBox) {
        self.velocity += self.force / self.mass;
        self.position += self.velocity;
        self.force = Vector2::zeros();
        self.position = wrap_into(self.position, bounds);
    }

    /// Two bodies collide when their centers are closer than the sum of radii
    pub fn collides_with(&self, other: &Body) -> bool {
        let reach = self.radius + other.radius;
        physics::distance_squared(self.position, other.position) < reach * reach
    }

    pub fn contains_point(&self, point: Point2<f64>) -> bool {
        physics::point_in_circle(point, self.position, self.radius)
    }

    /// Merges `other` into this body, conserving momentum and mass.
    ///
    /// The caller is responsible for discarding `other` afterwards.
    ///
    /// ```
    /// use gravitas::body::{Body, BodyId};
    /// use nalgebra::{Point2, Vector2};
    ///
    /// let mut a = Body::new(BodyId(0), Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0), 30.0);
    /// let b = Body::new(BodyId(1), Point2::new(1.0, 0.0), Vector2::new(-1.0, 0.0), 10.0);
    /// let p_before = a.momentum() + b.momentum();
    ///
    /// a.absorb(&b);
    ///
    /// assert_eq!(a.mass(), 40.0);
    /// assert!((a.momentum() - p_before).magnitude() < 1e-12);
    /// ```
    pub fn absorb(&mut self, other: &Body) {
        let total_mass = self.mass + other.mass;
        self.velocity = (self.momentum() + other.momentum()) / total_mass;
        self.set_mass(total_mass);
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        physics::distance(self.position, other.position)
    }

    /// Axis-aligned box around the body's circle
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around_circle(self.position, self.radius)
    }
}

/// Radius a body of this mass would have (mass floor applied).
///
/// Piecewise linear in mass: the part of the mass inside each tier's band
/// adds `1 / density` of radius per unit, so radius is continuous across the
/// thresholds and never shrinks as mass grows.
///
/// ```
/// use gravitas::body::radius_for_mass;
///
/// assert_eq!(radius_for_mass(50.0), 5.0);
/// assert_eq!(radius_for_mass(100.0), 10.0);
/// assert!(radius_for_mass(10_000.0) > radius_for_mass(9_999.0));
/// ```
pub fn radius_for_mass(mass: f64) -> f64 {
    let mut remaining = mass.max(1.0);
    let mut radius = 0.0;
    for (index, &(min_mass, _, density)) in TYPE_THRESHOLDS.iter().enumerate() {
        // The lightest tier reaches down to zero
        let floor = if index + 1 == TYPE_THRESHOLDS.len() { 0.0 } else { min_mass };
        if remaining > floor {
            radius += (remaining - floor) / density;
            remaining = floor;
        }
    }
    radius.max(1.0)
}

/// Wraps a point into `bounds`: overshoot past one edge re-enters from the
/// opposite edge by the same amount.
pub fn wrap_into(point: Point2<f64>, bounds: &BoundingBox) -> Point2<f64> {
    Point2::new(
        wrap_axis(point.x, bounds.min.x, bounds.width()),
        wrap_axis(point.y, bounds.min.y, bounds.height()),
    )
}

fn wrap_axis(value: f64, min: f64, extent: f64) -> f64 {
    if extent <= 0.0 || (value >= min && value <= min + extent) {
        return value;
    }
    min + (value - min).rem_euclid(extent)
}
