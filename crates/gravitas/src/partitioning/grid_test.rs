use nalgebra::{Point2, Vector2};

use crate::arena::{BodyArena, BodyHandle};
use crate::body::{Body, BodyId};
use crate::partitioning::partitioning_test::{populate, world};
use crate::partitioning::{Grid, SpatialPartitioning};
use crate::physics::BoundingBox;

fn add(arena: &mut BodyArena, id: u32, x: f64, y: f64, mass: f64) -> BodyHandle {
    arena.insert(Body::new(BodyId(id), Point2::new(x, y), Vector2::zeros(), mass))
}

#[test]
fn test_dimensions_round_up() {
    assert_eq!(Grid::new(world(), 100.0).dimensions(), (10, 10));
    assert_eq!(Grid::new(world(), 300.0).dimensions(), (4, 4));
    assert_eq!(Grid::new(world(), 5000.0).dimensions(), (1, 1));
}

#[test]
fn test_same_cell_overlap_is_reported() {
    let mut arena = BodyArena::new();
    let a = add(&mut arena, 0, 40.0, 40.0, 50.0);
    let b = add(&mut arena, 1, 48.0, 40.0, 50.0);
    let mut grid = Grid::new(world(), 100.0);
    populate(&mut grid, &arena);

    let collisions = grid.get_collisions(&arena);

    assert_eq!(collisions.len(), 1);
    assert_eq!((collisions[0].bigger, collisions[0].smaller), (a, b));
    assert_eq!(grid.collision_checks(), 1);
}

#[test]
fn test_cross_cell_overlap_is_not_reported() {
    let mut arena = BodyArena::new();
    // Overlapping, but the centers sit either side of x = 100
    add(&mut arena, 0, 97.0, 50.0, 50.0);
    add(&mut arena, 1, 103.0, 50.0, 50.0);
    let mut grid = Grid::new(world(), 100.0);
    populate(&mut grid, &arena);

    assert!(grid.get_collisions(&arena).is_empty());
    assert_eq!(grid.collision_checks(), 0);
}

#[test]
fn test_find_body_reaches_into_neighbouring_cells() {
    let mut arena = BodyArena::new();
    // r = 49, center in cell (1, 1)
    let big = add(&mut arena, 0, 130.0, 150.0, 4000.0);
    let mut grid = Grid::new(world(), 100.0);
    populate(&mut grid, &arena);

    // Inside the circle but in cell (0, 1)
    assert_eq!(grid.find_body(Point2::new(95.0, 150.0), &arena), Some(big));
    assert_eq!(grid.find_body(Point2::new(105.0, 105.0), &arena), None);
}

#[test]
fn test_update_moves_bodies_between_cells() {
    let mut arena = BodyArena::new();
    let a = add(&mut arena, 0, 50.0, 50.0, 50.0);
    let b = add(&mut arena, 1, 550.0, 550.0, 50.0);
    let mut grid = Grid::new(world(), 100.0);
    populate(&mut grid, &arena);
    assert!(grid.get_collisions(&arena).is_empty());

    arena.get_mut(b).unwrap().set_position(Point2::new(55.0, 50.0));
    grid.update(&arena);

    let collisions = grid.get_collisions(&arena);
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].bigger, a);
    assert_eq!(grid.find_body(Point2::new(550.0, 550.0), &arena), None);
}

#[test]
fn test_points_outside_world_clamp_to_edge_cells() {
    let mut arena = BodyArena::new();
    let edge = add(&mut arena, 0, 1000.0, 1000.0, 50.0);
    let mut grid = Grid::new(world(), 100.0);
    populate(&mut grid, &arena);

    assert_eq!(grid.find_body(Point2::new(1003.0, 1000.0), &arena), Some(edge));
    assert_eq!(grid.len(), 1);
}

#[test]
fn test_representation_tiles_the_world() {
    let grid = Grid::new(BoundingBox::square(0.0, 0.0, 250.0), 100.0);

    let cells = grid.representation();

    assert_eq!(cells.len(), 9);
    assert_eq!(cells[0], BoundingBox::square(0.0, 0.0, 100.0));
    // The last column and row are clipped to the world
    assert_eq!(cells[8], BoundingBox::new(Point2::new(200.0, 200.0), Point2::new(250.0, 250.0)));
}
