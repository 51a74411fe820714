//! Uniform grid keyed by body center.
//!
//! Cell lookup is plain coordinate arithmetic. Collisions are only tested
//! between bodies whose centers share a cell: two bodies that overlap across
//! a cell border are not reported. That trade is accepted for speed; pick a
//! cell size well above typical body diameters.

use std::collections::HashMap;

use nalgebra::{Point2, Vector2};

use crate::arena::{BodyArena, BodyHandle};
use crate::partitioning::{check_pair, Collision, SpatialPartitioning};
use crate::physics::BoundingBox;

pub struct Grid {
    bounds: BoundingBox,
    cell_size: f64,
    columns: usize,
    rows: usize,
    /// Row-major, starting at the bottom-left cell
    cells: Vec<Vec<BodyHandle>>,
    locations: HashMap<BodyHandle, usize>,
    /// Largest radius seen since the last rebuild; bounds the point-query
    /// neighbourhood
    max_radius: f64,
    collision_checks: u64,
}

impl Grid {
    pub fn new(bounds: BoundingBox, cell_size: f64) -> Self {
        let columns = ((bounds.width() / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.height() / cell_size).ceil() as usize).max(1);

        Self {
            bounds,
            cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
            locations: HashMap::new(),
            max_radius: 0.0,
            collision_checks: 0,
        }
    }

    /// Grid dimensions as (columns, rows)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Cell column and row for a point, clamped onto the grid
    fn coords(&self, point: Point2<f64>) -> (usize, usize) {
        let axis = |value: f64, min: f64, count: usize| {
            let cell = ((value - min) / self.cell_size).floor();
            if cell <= 0.0 {
                0
            } else {
                (cell as usize).min(count - 1)
            }
        };
        (
            axis(point.x, self.bounds.min.x, self.columns),
            axis(point.y, self.bounds.min.y, self.rows),
        )
    }

    fn cell_of(&self, point: Point2<f64>) -> usize {
        let (column, row) = self.coords(point);
        row * self.columns + column
    }

    fn cell_bounds(&self, index: usize) -> BoundingBox {
        let (column, row) = (index % self.columns, index / self.columns);
        let min = Point2::new(
            self.bounds.min.x + column as f64 * self.cell_size,
            self.bounds.min.y + row as f64 * self.cell_size,
        );
        BoundingBox::new(
            min,
            Point2::new(
                (min.x + self.cell_size).min(self.bounds.max.x),
                (min.y + self.cell_size).min(self.bounds.max.y),
            ),
        )
    }
}

impl SpatialPartitioning for Grid {
    fn add_body(&mut self, handle: BodyHandle, bodies: &BodyArena) {
        assert!(!self.locations.contains_key(&handle), "body {handle:?} added twice");
        let body = bodies.body(handle);
        let cell = self.cell_of(body.position);

        self.cells[cell].push(handle);
        self.locations.insert(handle, cell);
        self.max_radius = self.max_radius.max(body.radius());
    }

    fn rem_body(&mut self, handle: BodyHandle, _bodies: &BodyArena) {
        let Some(cell) = self.locations.remove(&handle) else {
            panic!("removing untracked body {handle:?}");
        };
        let held = &mut self.cells[cell];
        if let Some(index) = held.iter().position(|&h| h == handle) {
            held.remove(index);
        }
    }

    fn notify_move(&mut self, from: BodyHandle, to: BodyHandle) {
        let Some(cell) = self.locations.remove(&from) else {
            panic!("moving untracked body {from:?}");
        };
        if let Some(slot) = self.cells[cell].iter_mut().find(|h| **h == from) {
            *slot = to;
        }
        self.locations.insert(to, cell);
    }

    /// Rebuilds every cell from current positions
    fn update(&mut self, bodies: &BodyArena) {
        let tracked: Vec<BodyHandle> = self.cells.iter_mut().flat_map(std::mem::take).collect();

        self.locations.clear();
        self.max_radius = 0.0;
        for handle in tracked {
            self.add_body(handle, bodies);
        }
    }

    /// Searches every cell within the largest tracked radius of `point`
    fn find_body(&self, point: Point2<f64>, bodies: &BodyArena) -> Option<BodyHandle> {
        let reach = Vector2::new(self.max_radius, self.max_radius);
        let (min_col, min_row) = self.coords(point - reach);
        let (max_col, max_row) = self.coords(point + reach);

        (min_row..=max_row)
            .flat_map(|row| (min_col..=max_col).map(move |column| row * self.columns + column))
            .flat_map(|cell| self.cells[cell].iter().copied())
            .find(|&h| bodies.body(h).contains_point(point))
    }

    fn get_collisions(&mut self, bodies: &BodyArena) -> Vec<Collision> {
        let mut checks = 0;
        let mut collisions = Vec::new();

        for cell in &self.cells {
            for (i, &a) in cell.iter().enumerate() {
                for &b in &cell[i + 1..] {
                    check_pair(a, b, bodies, &mut checks, &mut collisions);
                }
            }
        }

        self.collision_checks = checks;
        collisions
    }

    fn collision_checks(&self) -> u64 {
        self.collision_checks
    }

    fn representation(&self) -> Vec<BoundingBox> {
        (0..self.cells.len()).map(|i| self.cell_bounds(i)).collect()
    }

    fn len(&self) -> usize {
        self.locations.len()
    }

    fn name(&self) -> &'static str {
        "grid"
    }
}
