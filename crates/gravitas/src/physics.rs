//! Stateless geometry and force primitives.
//!
//! Everything here is a pure function of its inputs so the gravity solvers and
//! the partitioning structures can share one definition of "distance",
//! "contains" and "overlaps".
//!
//! # Examples
//!
//! ```rust
//! use nalgebra::Point2;
//! use gravitas::physics::{distance, gravitational_force};
//!
//! let a = Point2::new(0.0, 0.0);
//! let b = Point2::new(3.0, 4.0);
//! assert_eq!(distance(a, b), 5.0);
//!
//! // G = 1, two unit masses five units apart
//! let f = gravitational_force(1.0, 1.0, 1.0, 25.0);
//! assert!((f - 0.04).abs() < 1e-12);
//! ```

use nalgebra::{Point2, Vector2};

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Point2<f64>, b: Point2<f64>) -> f64 {
    (b - a).magnitude()
}

/// Squared distance between two points (no square root)
#[inline]
pub fn distance_squared(a: Point2<f64>, b: Point2<f64>) -> f64 {
    (b - a).magnitude_squared()
}

/// Vector pointing from `from` to `to`
#[inline]
pub fn displacement(from: Point2<f64>, to: Point2<f64>) -> Vector2<f64> {
    to - from
}

/// Whether `point` lies inside or on a circle
#[inline]
pub fn point_in_circle(point: Point2<f64>, center: Point2<f64>, radius: f64) -> bool {
    distance_squared(point, center) <= radius * radius
}

/// Whether `point` lies inside or on a rectangle
#[inline]
pub fn point_in_rect(point: Point2<f64>, rect: &BoundingBox) -> bool {
    rect.contains_point(point)
}

/// Circle vs. axis-aligned box overlap test.
///
/// Clamps the circle center onto the box to get the nearest point, then
/// compares that distance against the radius.
pub fn circle_intersects_rect(center: Point2<f64>, radius: f64, rect: &BoundingBox) -> bool {
    let closest_x = center.x.clamp(rect.min.x, rect.max.x);
    let closest_y = center.y.clamp(rect.min.y, rect.max.y);

    let dx = center.x - closest_x;
    let dy = center.y - closest_y;

    dx * dx + dy * dy <= radius * radius
}

/// Whether a circle lies entirely inside a box (touching the edges counts)
pub fn circle_inside_rect(center: Point2<f64>, radius: f64, rect: &BoundingBox) -> bool {
    center.x - radius >= rect.min.x
        && center.x + radius <= rect.max.x
        && center.y - radius >= rect.min.y
        && center.y + radius <= rect.max.y
}

/// Scalar Newtonian attraction `G * m1 * m2 / d²`.
///
/// Takes the squared distance so callers that already have it skip a sqrt.
/// Coincident masses (`d² == 0`) exert no force.
#[inline]
pub fn gravitational_force(g: f64, m1: f64, m2: f64, dist_sq: f64) -> f64 {
    if dist_sq == 0.0 {
        return 0.0;
    }
    g * m1 * m2 / dist_sq
}

/// Decompose a force magnitude along the line from `from` to `to`.
///
/// The direction comes from `atan2` of the displacement, so the result
/// points toward `to` for a positive magnitude.
pub fn force_vector(from: Point2<f64>, to: Point2<f64>, magnitude: f64) -> Vector2<f64> {
    if magnitude == 0.0 {
        return Vector2::zeros();
    }
    let d = displacement(from, to);
    let angle = d.y.atan2(d.x);
    Vector2::new(magnitude * angle.cos(), magnitude * angle.sin())
}

/// Gravitational pull on a mass at `from` toward a mass at `to`
pub fn gravity_between(g: f64, from: Point2<f64>, m1: f64, to: Point2<f64>, m2: f64) -> Vector2<f64> {
    let magnitude = gravitational_force(g, m1, m2, distance_squared(from, to));
    force_vector(from, to, magnitude)
}

/// First moment of a point mass (`position * mass`), summed for centers of mass
#[inline]
pub fn moment(position: Point2<f64>, mass: f64) -> Vector2<f64> {
    position.coords * mass
}

/// An axis-aligned rectangle in world coordinates.
///
/// Used as the world bounds, as quadtree/grid cell regions and as the debug
/// representation every partitioning structure hands back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (bottom-left)
    pub min: Point2<f64>,
    /// Maximum corner (top-right)
    pub max: Point2<f64>,
}

impl BoundingBox {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// A square with its minimum corner at `(x, y)`
    pub fn square(x: f64, y: f64, size: f64) -> Self {
        Self {
            min: Point2::new(x, y),
            max: Point2::new(x + size, y + size),
        }
    }

    /// Box of a circle
    pub fn around_circle(center: Point2<f64>, radius: f64) -> Self {
        Self {
            min: Point2::new(center.x - radius, center.y - radius),
            max: Point2::new(center.x + radius, center.y + radius),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Determines which quadrant (0-3) a point falls in.
    ///
    /// Quadrant layout:
    /// ```text
    /// +-------+-------+
    /// |   2   |   3   |
    /// +-------+-------+
    /// |   0   |   1   |
    /// +-------+-------+
    /// ```
    pub fn quadrant(&self, point: &Point2<f64>) -> usize {
        let center = self.center();
        let x_bit = (point.x > center.x) as usize;
        let y_bit = (point.y > center.y) as usize;
        x_bit | (y_bit << 1)
    }

    /// Sub-box for the given quadrant (0-3)
    pub fn subdivide(&self, quadrant: usize) -> Self {
        let center = self.center();
        let min = Point2::new(
            if quadrant & 1 != 0 { center.x } else { self.min.x },
            if quadrant & 2 != 0 { center.y } else { self.min.y },
        );
        let max = Point2::new(
            if quadrant & 1 != 0 { self.max.x } else { center.x },
            if quadrant & 2 != 0 { self.max.y } else { center.y },
        );
        BoundingBox { min, max }
    }

    pub fn contains_point(&self, point: Point2<f64>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn contains_circle(&self, center: Point2<f64>, radius: f64) -> bool {
        circle_inside_rect(center, radius, self)
    }

    pub fn intersects_circle(&self, center: Point2<f64>, radius: f64) -> bool {
        circle_intersects_rect(center, radius, self)
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}
