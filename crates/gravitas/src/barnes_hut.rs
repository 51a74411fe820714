//! Arena-based Barnes-Hut quadtree for approximate gravity.
//!
//! Nodes live contiguously in a `Vec` and reference each other by index. A
//! node is either a leaf holding up to [`LEAF_CAPACITY`] raw point masses, or
//! a parent holding only the aggregate mass and center of mass of its
//! subtree, never both.
//!
//! The tree is rebuilt from scratch every tick ([`BarnesHutTree::update`]).
//! Parents fold each inserted mass into a weighted running average, so the
//! center of mass never needs a rescan of the children.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::Point2;
//! use gravitas::barnes_hut::BarnesHutTree;
//! use gravitas::physics::BoundingBox;
//!
//! let mut tree = BarnesHutTree::new(BoundingBox::square(0.0, 0.0, 1000.0), 0.5, 1.0);
//! tree.insert(Point2::new(100.0, 100.0), 100.0);
//! tree.insert(Point2::new(900.0, 900.0), 100.0);
//!
//! let force = tree.force_applied_to(Point2::new(100.0, 100.0), 100.0);
//! assert!(force.x > 0.0 && force.y > 0.0);
//! ```

use nalgebra::{Point2, Vector2};
use tracing::trace;

use crate::arena::BodyArena;
use crate::physics::{self, BoundingBox};

/// Point masses a leaf holds before it splits
pub const LEAF_CAPACITY: usize = 8;

/// Leaves at this depth never split (guards coincident points)
const MAX_DEPTH: usize = 32;

/// Index into the node arena
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A raw mass sample stored in a leaf
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMass {
    pub position: Point2<f64>,
    pub mass: f64,
}

#[derive(Clone, Debug)]
enum Node {
    Leaf {
        bounds: BoundingBox,
        points: Vec<PointMass>,
    },
    Parent {
        bounds: BoundingBox,
        center_of_mass: Point2<f64>,
        total_mass: f64,
        /// [bottom-left, bottom-right, top-left, top-right]
        children: [NodeId; 4],
    },
}

impl Node {
    fn empty_leaf(bounds: BoundingBox) -> Self {
        Node::Leaf {
            bounds,
            points: Vec::with_capacity(LEAF_CAPACITY + 1),
        }
    }

    fn bounds(&self) -> &BoundingBox {
        match self {
            Node::Leaf { bounds, .. } | Node::Parent { bounds, .. } => bounds,
        }
    }
}

pub struct BarnesHutTree {
    nodes: Vec<Node>,
    root: NodeId,
    bounds: BoundingBox,
    /// Approximation threshold, squared once here so the acceptance test
    /// needs no square root
    threshold_sq: f64,
    gravity: f64,
}

impl BarnesHutTree {
    /// Creates an empty tree over `bounds`.
    ///
    /// # Arguments
    ///
    /// * `bounds` - World region covered by the root
    /// * `approximation` - Node acceptance threshold; `0.0` always descends
    ///   to the leaves and reproduces exact pairwise gravity
    /// * `gravity` - Gravitational constant
    pub fn new(bounds: BoundingBox, approximation: f64, gravity: f64) -> Self {
        Self {
            nodes: vec![Node::empty_leaf(bounds)],
            root: NodeId::new(0),
            bounds,
            threshold_sq: approximation * approximation,
            gravity,
        }
    }

    /// Drops every node and leaves an empty root leaf
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::empty_leaf(self.bounds));
        self.root = NodeId::new(0);
    }

    /// Rebuilds the tree from the current body positions
    pub fn update(&mut self, bodies: &BodyArena) {
        self.clear();
        for (_, body) in bodies.iter() {
            self.insert(body.position, body.mass());
        }
    }

    /// Adds a point mass, splitting the receiving leaf if it overflows
    pub fn insert(&mut self, position: Point2<f64>, mass: f64) {
        self.insert_at(self.root, 0, PointMass { position, mass });
    }

    fn insert_at(&mut self, start: NodeId, start_depth: usize, point: PointMass) {
        let mut node_id = start;
        let mut depth = start_depth;

        loop {
            let overflowing = match &mut self.nodes[node_id.index()] {
                Node::Parent {
                    bounds,
                    center_of_mass,
                    total_mass,
                    children,
                } => {
                    let new_total = *total_mass + point.mass;
                    *center_of_mass = Point2::from(
                        (center_of_mass.coords * *total_mass + physics::moment(point.position, point.mass))
                            / new_total,
                    );
                    *total_mass = new_total;

                    node_id = children[child_slot(bounds, point.position)];
                    depth += 1;
                    continue;
                }
                Node::Leaf { points, .. } => {
                    points.push(point);
                    points.len() > LEAF_CAPACITY && depth < MAX_DEPTH
                }
            };

            if overflowing {
                self.split(node_id, depth);
            }
            return;
        }
    }

    /// Turns an overflowing leaf into a parent with four leaf children
    fn split(&mut self, node_id: NodeId, depth: usize) {
        let (bounds, points) = match &mut self.nodes[node_id.index()] {
            Node::Leaf { bounds, points } => (*bounds, std::mem::take(points)),
            Node::Parent { .. } => return,
        };

        let children: [NodeId; 4] = std::array::from_fn(|q| {
            let id = NodeId::new(self.nodes.len());
            self.nodes.push(Node::empty_leaf(bounds.subdivide(q)));
            id
        });

        let (total_mass, weighted) = points
            .iter()
            .fold((0.0f64, Vector2::zeros()), |(mass, moment), p| {
                (mass + p.mass, moment + physics::moment(p.position, p.mass))
            });

        self.nodes[node_id.index()] = Node::Parent {
            bounds,
            center_of_mass: Point2::from(weighted / total_mass),
            total_mass,
            children,
        };

        for point in points {
            let child = children[child_slot(&bounds, point.position)];
            self.insert_at(child, depth + 1, point);
        }
    }

    /// Approximate gravitational force on a mass at `position`.
    ///
    /// Leaves contribute exact pairwise forces. A parent is collapsed to a
    /// single point mass at its center of mass only when both hold:
    ///
    /// - `width² / distance² < approximation²`, the usual opening test;
    /// - the query point lies outside the node's bounds.
    ///
    /// The second condition is stricter than the plain ratio test. A node
    /// whose center of mass is far away can still hold bodies right next to
    /// `position`, and a body must never feel an aggregate that includes
    /// itself, so such nodes are always opened. Otherwise all four children
    /// are visited. Masses coincident with `position` (including the body
    /// itself) contribute nothing.
    pub fn force_applied_to(&self, position: Point2<f64>, mass: f64) -> Vector2<f64> {
        self.force_recursive(self.root, position, mass)
    }

    fn force_recursive(&self, node_id: NodeId, position: Point2<f64>, mass: f64) -> Vector2<f64> {
        match &self.nodes[node_id.index()] {
            Node::Leaf { points, .. } => points.iter().fold(Vector2::zeros(), |acc, p| {
                acc + physics::gravity_between(self.gravity, position, mass, p.position, p.mass)
            }),

            Node::Parent {
                bounds,
                center_of_mass,
                total_mass,
                children,
            } => {
                let dist_sq = physics::distance_squared(position, *center_of_mass);
                let width = bounds.width();

                let far_enough = dist_sq > 0.0
                    && !bounds.contains_point(position)
                    && width * width / dist_sq < self.threshold_sq;

                if far_enough {
                    physics::gravity_between(self.gravity, position, mass, *center_of_mass, *total_mass)
                } else {
                    children.iter().fold(Vector2::zeros(), |acc, &child| {
                        acc + self.force_recursive(child, position, mass)
                    })
                }
            }
        }
    }

    /// Total mass held by the tree
    pub fn total_mass(&self) -> f64 {
        match &self.nodes[self.root.index()] {
            Node::Leaf { points, .. } => points.iter().map(|p| p.mass).sum(),
            Node::Parent { total_mass, .. } => *total_mass,
        }
    }

    /// Center of mass of everything in the tree, `None` when empty
    pub fn center_of_mass(&self) -> Option<Point2<f64>> {
        match &self.nodes[self.root.index()] {
            Node::Leaf { points, .. } if points.is_empty() => None,
            Node::Leaf { points, .. } => {
                let (mass, weighted) = points.iter().fold((0.0, Vector2::zeros()), |(m, w), p| {
                    (m + p.mass, w + physics::moment(p.position, p.mass))
                });
                Some(Point2::from(weighted / mass))
            }
            Node::Parent { center_of_mass, .. } => Some(*center_of_mass),
        }
    }

    /// Number of nodes in the arena (for diagnostics)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Region of every node, for debug drawing
    pub fn representation(&self) -> Vec<BoundingBox> {
        self.nodes.iter().map(|n| *n.bounds()).collect()
    }
}

/// Child quadrant that should receive `point`.
///
/// A point no child contains (outside the parent, or lost to rounding at
/// extreme depth) still goes somewhere: the comparison-based quadrant. The
/// force approximation tolerates the misplacement.
fn child_slot(bounds: &BoundingBox, point: Point2<f64>) -> usize {
    (0..4)
        .find(|&q| bounds.subdivide(q).contains_point(point))
        .unwrap_or_else(|| {
            trace!(x = point.x, y = point.y, "point outside every child quadrant");
            bounds.quadrant(&point)
        })
}
