use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::arena::BodyArena;
use crate::body::{Body, BodyId};
use crate::forces::{DirectGravity, ForceModel, TreeGravity};
use crate::physics::BoundingBox;

fn scattered_arena(n: u32) -> BodyArena {
    let mut arena = BodyArena::new();
    for i in 0..n {
        let position = Point2::new((i * 53 % 1000) as f64, (i * 211 % 1000) as f64);
        arena.insert(Body::new(BodyId(i), position, Vector2::zeros(), 5.0 + (i % 11) as f64 * 30.0));
    }
    arena
}

#[test]
fn test_two_body_scenario() {
    let mut arena = BodyArena::new();
    let a = arena.insert(Body::new(BodyId(0), Point2::new(0.0, 0.0), Vector2::zeros(), 100.0));
    let b = arena.insert(Body::new(BodyId(1), Point2::new(500.0, 0.0), Vector2::zeros(), 100.0));

    let mut gravity = TreeGravity::new(BoundingBox::square(0.0, 0.0, 1000.0), 0.5, 1.0);
    gravity.apply_forces(&mut arena);

    let expected = 100.0 * 100.0 / 500.0_f64.powi(2);
    assert_relative_eq!(arena.body(a).force().x, expected, max_relative = 1e-12);
    assert_relative_eq!(arena.body(b).force().x, -expected, max_relative = 1e-12);
}

#[test]
fn test_zero_approximation_equals_direct() {
    let arena = scattered_arena(60);
    let bounds = BoundingBox::square(0.0, 0.0, 1000.0);

    let direct = DirectGravity::new(1.0).compute_forces(&arena);
    let tree = TreeGravity::new(bounds, 0.0, 1.0).compute_forces(&arena);

    for ((h1, f1), (h2, f2)) in direct.iter().zip(&tree) {
        assert_eq!(h1, h2);
        assert_relative_eq!(f1.x, f2.x, epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(f1.y, f2.y, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn test_approximation_error_is_small() {
    let arena = scattered_arena(200);
    let bounds = BoundingBox::square(0.0, 0.0, 1000.0);

    let direct = DirectGravity::new(1.0).compute_forces(&arena);
    let tree = TreeGravity::new(bounds, 0.5, 1.0).compute_forces(&arena);

    let total_error: f64 = direct
        .iter()
        .zip(&tree)
        .map(|((_, d), (_, t))| (d - t).magnitude())
        .sum();
    let total_force: f64 = direct.iter().map(|(_, d)| d.magnitude()).sum();

    assert!(total_error / total_force < 0.05);
}

#[test]
fn test_tree_is_rebuilt_each_call() {
    let mut arena = scattered_arena(20);
    let mut gravity = TreeGravity::new(BoundingBox::square(0.0, 0.0, 1000.0), 0.5, 1.0);

    gravity.compute_forces(&arena);
    let mass_before = gravity.tree().total_mass();

    let victim = arena.handles()[0];
    let removed = arena.remove(victim).unwrap();
    gravity.compute_forces(&arena);

    assert_relative_eq!(gravity.tree().total_mass(), mass_before - removed.mass());
}
