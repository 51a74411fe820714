use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId, BodyType, radius_for_mass, wrap_into};
use crate::physics::BoundingBox;

fn body_at(id: u32, x: f64, y: f64, mass: f64) -> Body {
    Body::new(BodyId(id), Point2::new(x, y), Vector2::zeros(), mass)
}

#[test]
fn test_mass_is_clamped_to_one() {
    let body = body_at(0, 0.0, 0.0, -5.0);

    assert_eq!(body.mass(), 1.0);
    assert_eq!(body.radius(), 1.0);
}

#[test]
fn test_type_thresholds() {
    assert_eq!(BodyType::from_mass(1.0), BodyType::Asteroid);
    assert_eq!(BodyType::from_mass(99.9), BodyType::Asteroid);
    assert_eq!(BodyType::from_mass(100.0), BodyType::Planet);
    assert_eq!(BodyType::from_mass(10_000.0), BodyType::Sun);
    assert_eq!(BodyType::from_mass(5_000_000.0), BodyType::BlackHole);
}

#[test]
fn test_radius_follows_mass() {
    let mut body = body_at(0, 0.0, 0.0, 50.0);
    assert_eq!(body.body_type(), BodyType::Asteroid);
    assert_relative_eq!(body.radius(), 5.0);

    body.set_mass(5_000.0);
    assert_eq!(body.body_type(), BodyType::Planet);
    // 10 from the asteroid band plus 4900 / 100
    assert_relative_eq!(body.radius(), 59.0);

    body.set_mass(200_000.0);
    assert_eq!(body.body_type(), BodyType::Sun);
    assert_relative_eq!(body.radius(), 10.0 + 99.0 + 95.0);
}

#[test]
fn test_radius_never_shrinks_across_thresholds() {
    let mut masses: Vec<f64> = (0..=600).map(|i| 10f64.powf(i as f64 / 100.0)).collect();
    for threshold in [100.0, 10_000.0, 1_000_000.0] {
        masses.extend([threshold - 1.0, threshold - 1e-6, threshold, threshold + 1e-6, threshold + 1.0]);
    }
    masses.sort_by(f64::total_cmp);

    for pair in masses.windows(2) {
        let (lighter, heavier) = (radius_for_mass(pair[0]), radius_for_mass(pair[1]));
        assert!(heavier >= lighter, "r({}) = {lighter} > r({}) = {heavier}", pair[0], pair[1]);
    }

    // No jump at the tier boundaries either
    for threshold in [100.0, 10_000.0, 1_000_000.0] {
        assert_relative_eq!(radius_for_mass(threshold - 1e-6), radius_for_mass(threshold), epsilon = 1e-6);
        assert_ne!(BodyType::from_mass(threshold - 1e-6), BodyType::from_mass(threshold));
    }
}

#[test]
fn test_apply_force_only_accumulates() {
    let mut body = body_at(0, 10.0, 10.0, 2.0);

    body.apply_force(Vector2::new(1.0, 0.0));
    body.apply_force(Vector2::new(1.0, 2.0));

    assert_eq!(body.force(), Vector2::new(2.0, 2.0));
    assert_eq!(body.velocity, Vector2::zeros());
    assert_eq!(body.position, Point2::new(10.0, 10.0));
}

#[test]
fn test_integrate_applies_and_resets_force() {
    let bounds = BoundingBox::square(0.0, 0.0, 1000.0);
    let mut body = body_at(0, 10.0, 10.0, 2.0);
    body.velocity = Vector2::new(1.0, 0.0);
    body.apply_force(Vector2::new(4.0, 2.0));

    body.integrate(&bounds);

    assert_eq!(body.velocity, Vector2::new(3.0, 1.0));
    assert_eq!(body.position, Point2::new(13.0, 11.0));
    assert_eq!(body.force(), Vector2::zeros());
}

#[test]
fn test_wraparound_on_both_edges() {
    let bounds = BoundingBox::square(0.0, 0.0, 100.0);

    let wrapped = wrap_into(Point2::new(-5.0, 130.0), &bounds);
    assert_relative_eq!(wrapped.x, 95.0);
    assert_relative_eq!(wrapped.y, 30.0);

    // Inside points are untouched
    assert_eq!(wrap_into(Point2::new(100.0, 0.0), &bounds), Point2::new(100.0, 0.0));
}

#[test]
fn test_collision_is_symmetric_and_strict() {
    // Radii are 5 each (mass 50 asteroids)
    let a = body_at(0, 0.0, 0.0, 50.0);
    let touching = body_at(1, 10.0, 0.0, 50.0);
    let overlapping = body_at(2, 9.99, 0.0, 50.0);

    assert!(!a.collides_with(&touching));
    assert!(!touching.collides_with(&a));

    assert!(a.collides_with(&overlapping));
    assert!(overlapping.collides_with(&a));
}

#[test]
fn test_absorb_conserves_mass_and_momentum() {
    let mut big = Body::new(BodyId(0), Point2::new(0.0, 0.0), Vector2::new(2.0, 1.0), 80.0);
    let small = Body::new(BodyId(1), Point2::new(1.0, 0.0), Vector2::new(-4.0, 3.0), 20.0);
    let momentum_before = big.momentum() + small.momentum();
    let radius_before = big.radius();

    big.absorb(&small);

    assert_eq!(big.mass(), 100.0);
    assert_relative_eq!(big.momentum().x, momentum_before.x, epsilon = 1e-9);
    assert_relative_eq!(big.momentum().y, momentum_before.y, epsilon = 1e-9);
    assert!(big.radius() >= radius_before);
    assert_eq!(big.body_type(), BodyType::Planet);
}

#[test]
fn test_absorb_within_tier_grows_radius() {
    let mut a = body_at(0, 0.0, 0.0, 300.0);
    let b = body_at(1, 0.0, 0.0, 400.0);
    let before = a.radius();

    a.absorb(&b);

    assert!(a.radius() > before);
    assert_relative_eq!(a.radius(), 16.0);
}

#[test]
fn test_asteroids_merging_into_planet_grow() {
    let mut a = body_at(0, 0.0, 0.0, 50.0);
    let b = body_at(1, 4.0, 0.0, 50.0);
    assert_eq!(a.body_type(), BodyType::Asteroid);
    assert_relative_eq!(a.radius(), 5.0);

    a.absorb(&b);

    assert_eq!(a.body_type(), BodyType::Planet);
    assert!(a.radius() >= b.radius());
    assert_relative_eq!(a.radius(), 10.0);
}

#[test]
fn test_contains_point_and_momentum() {
    let body = Body::new(BodyId(3), Point2::new(5.0, 5.0), Vector2::new(3.0, 4.0), 20.0);

    assert!(body.contains_point(Point2::new(7.0, 5.0)));
    assert!(!body.contains_point(Point2::new(7.1, 5.0)));
    assert_eq!(body.momentum(), Vector2::new(60.0, 80.0));
    assert_eq!(body.kinetic_energy(), 250.0);
}
