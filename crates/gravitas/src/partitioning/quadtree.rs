//! Capacity-bounded region quadtree over body circles.
//!
//! Each body lives in the deepest node whose bounds fully contain its circle.
//! A body straddling a quadrant boundary therefore stays at the parent, so a
//! node can hold more than `capacity` bodies of its own; splitting and
//! merging are driven by `cur_size`, the body count of the whole subtree:
//!
//! - a leaf splits when `cur_size > capacity` and `depth < max_depth`
//! - a parent concatenates (absorbs its whole subtree) when
//!   `cur_size <= capacity`
//!
//! Nodes live in an arena and refer to each other by index; released
//! nodes go on a free list. A side table maps every tracked handle to its
//! node, so removal never searches the tree.

use std::collections::HashMap;

use nalgebra::Point2;
use tracing::trace;

use crate::arena::{BodyArena, BodyHandle};
use crate::body::Body;
use crate::partitioning::{check_pair, Collision, SpatialPartitioning};
use crate::physics::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct QuadNode {
    bounds: BoundingBox,
    depth: usize,
    parent: Option<NodeId>,
    /// Bodies held at this level, in insertion order
    bodies: Vec<BodyHandle>,
    /// [bottom-left, bottom-right, top-left, top-right]
    children: Option<[NodeId; 4]>,
    /// Bodies in this node and every descendant
    cur_size: usize,
}

impl QuadNode {
    fn new(bounds: BoundingBox, depth: usize, parent: Option<NodeId>) -> Self {
        Self {
            bounds,
            depth,
            parent,
            bodies: Vec::new(),
            children: None,
            cur_size: 0,
        }
    }
}

pub struct QuadTree {
    nodes: Vec<QuadNode>,
    free: Vec<NodeId>,
    root: NodeId,
    capacity: usize,
    max_depth: usize,
    locations: HashMap<BodyHandle, NodeId>,
    collision_checks: u64,
}

impl QuadTree {
    /// Creates an empty tree whose root covers `bounds`.
    ///
    /// `capacity` is clamped to at least 1.
    pub fn new(bounds: BoundingBox, capacity: usize, max_depth: usize) -> Self {
        Self {
            nodes: vec![QuadNode::new(bounds, 0, None)],
            free: Vec::new(),
            root: NodeId(0),
            capacity: capacity.max(1),
            max_depth,
            locations: HashMap::new(),
            collision_checks: 0,
        }
    }

    fn node(&self, id: NodeId) -> &QuadNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut QuadNode {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, bounds: BoundingBox, depth: usize, parent: Option<NodeId>) -> NodeId {
        let node = QuadNode::new(bounds, depth, parent);
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.bodies.clear();
        node.children = None;
        node.parent = None;
        node.cur_size = 0;
        self.free.push(id);
    }

    /// Child of `id` that fully contains the body's circle, if any
    fn fitting_child(&self, id: NodeId, body: &Body) -> Option<NodeId> {
        self.node(id)
            .children?
            .into_iter()
            .find(|&child| self.node(child).bounds.contains_circle(body.position, body.radius()))
    }

    fn split_if_needed(&mut self, id: NodeId, bodies: &BodyArena) {
        let node = self.node(id);
        if node.children.is_none() && node.cur_size > self.capacity && node.depth < self.max_depth {
            self.split(id, bodies);
        }
    }

    /// Gives a leaf four children and pushes down every body that fits one
    fn split(&mut self, id: NodeId, bodies: &BodyArena) {
        let (bounds, depth) = (self.node(id).bounds, self.node(id).depth);
        let children: [NodeId; 4] =
            std::array::from_fn(|q| self.alloc(bounds.subdivide(q), depth + 1, Some(id)));
        self.node_mut(id).children = Some(children);

        let held = std::mem::take(&mut self.node_mut(id).bodies);
        let mut kept = Vec::new();
        for handle in held {
            match self.fitting_child(id, bodies.body(handle)) {
                Some(child) => {
                    let node = self.node_mut(child);
                    node.bodies.push(handle);
                    node.cur_size += 1;
                    self.locations.insert(handle, child);
                }
                None => kept.push(handle),
            }
        }
        trace!(depth, kept = kept.len(), "split quadtree node");
        self.node_mut(id).bodies = kept;

        for child in children {
            self.split_if_needed(child, bodies);
        }
    }

    /// Pulls every body of the subtree into `id` and releases its descendants
    fn concatenate(&mut self, id: NodeId) {
        let Some(children) = self.node_mut(id).children.take() else {
            return;
        };

        let mut collected = Vec::new();
        for child in children {
            self.drain_subtree(child, &mut collected);
        }
        trace!(depth = self.node(id).depth, bodies = collected.len(), "concatenated quadtree node");

        for &handle in &collected {
            self.locations.insert(handle, id);
        }
        self.node_mut(id).bodies.extend(collected);
    }

    fn drain_subtree(&mut self, id: NodeId, out: &mut Vec<BodyHandle>) {
        out.append(&mut self.node_mut(id).bodies);
        if let Some(children) = self.node_mut(id).children.take() {
            for child in children {
                self.drain_subtree(child, out);
            }
        }
        self.release(id);
    }

    /// Moves a body to the node that should hold it now.
    ///
    /// Pushes up until a node fully contains the circle (the root always
    /// accepts), then down while a child does.
    fn relocate(&mut self, handle: BodyHandle, from: NodeId, body: &Body) {
        let mut id = from;
        while !self.node(id).bounds.contains_circle(body.position, body.radius()) {
            let Some(parent) = self.node(id).parent else {
                break;
            };
            self.node_mut(id).cur_size -= 1;
            id = parent;
        }

        while let Some(child) = self.fitting_child(id, body) {
            self.node_mut(child).cur_size += 1;
            id = child;
        }

        if id != from {
            let source = &mut self.node_mut(from).bodies;
            if let Some(index) = source.iter().position(|&h| h == handle) {
                source.remove(index);
            }
            self.node_mut(id).bodies.push(handle);
            self.locations.insert(handle, id);
        }
    }

    /// Splits overfull leaves and concatenates underfull parents
    fn rebalance(&mut self, id: NodeId, bodies: &BodyArena) {
        let (children, cur_size) = (self.node(id).children, self.node(id).cur_size);
        match children {
            Some(_) if cur_size <= self.capacity => self.concatenate(id),
            Some(children) => {
                for child in children {
                    self.rebalance(child, bodies);
                }
            }
            None => self.split_if_needed(id, bodies),
        }
    }

    /// Tracked handles with their node, in depth-first structural order
    fn tracked(&self) -> Vec<(BodyHandle, NodeId)> {
        let mut out = Vec::with_capacity(self.locations.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            out.extend(node.bodies.iter().map(|&h| (h, id)));
            if let Some(children) = node.children {
                stack.extend(children.into_iter().rev());
            }
        }
        out
    }

    fn find_in(&self, id: NodeId, point: Point2<f64>, bodies: &BodyArena) -> Option<BodyHandle> {
        let node = self.node(id);
        if let Some(found) = node.bodies.iter().copied().find(|&h| bodies.body(h).contains_point(point)) {
            return Some(found);
        }

        node.children?
            .into_iter()
            .filter(|&child| self.node(child).bounds.contains_point(point))
            .find_map(|child| self.find_in(child, point, bodies))
    }

    fn collide_node(&self, id: NodeId, bodies: &BodyArena, checks: &mut u64, out: &mut Vec<Collision>) {
        let node = self.node(id);

        for (i, &a) in node.bodies.iter().enumerate() {
            for &b in &node.bodies[i + 1..] {
                check_pair(a, b, bodies, checks, out);
            }

            if let Some(children) = node.children {
                let body = bodies.body(a);
                for child in children {
                    self.collide_descendants(a, body, child, bodies, checks, out);
                }
            }
        }

        if let Some(children) = node.children {
            for child in children {
                self.collide_node(child, bodies, checks, out);
            }
        }
    }

    /// Tests `handle` against every body below `id` whose node its circle
    /// touches
    fn collide_descendants(
        &self,
        handle: BodyHandle,
        body: &Body,
        id: NodeId,
        bodies: &BodyArena,
        checks: &mut u64,
        out: &mut Vec<Collision>,
    ) {
        let node = self.node(id);
        if !node.bounds.intersects_circle(body.position, body.radius()) {
            return;
        }

        for &other in &node.bodies {
            check_pair(handle, other, bodies, checks, out);
        }

        if let Some(children) = node.children {
            for child in children {
                self.collide_descendants(handle, body, child, bodies, checks, out);
            }
        }
    }

    /// Live node count
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Deepest live node
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            deepest = deepest.max(node.depth);
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
        deepest
    }

    /// Checks the structural invariants, panicking on the first violation
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self, bodies: &BodyArena) {
        fn walk(tree: &QuadTree, id: NodeId, bodies: &BodyArena, seen: &mut usize) -> usize {
            let node = tree.node(id);
            let mut size = node.bodies.len();
            *seen += node.bodies.len();

            for &handle in &node.bodies {
                assert_eq!(tree.locations.get(&handle), Some(&id), "location map out of sync");
                let body = bodies.body(handle);
                if node.parent.is_some() {
                    assert!(node.bounds.contains_circle(body.position, body.radius()));
                }
                assert!(tree.fitting_child(id, body).is_none(), "body could sit deeper");
            }

            if let Some(children) = node.children {
                assert!(node.cur_size > tree.capacity, "underfull parent");
                for child in children {
                    assert_eq!(tree.node(child).parent, Some(id));
                    size += walk(tree, child, bodies, seen);
                }
            } else {
                assert!(node.cur_size <= tree.capacity || node.depth >= tree.max_depth, "overfull leaf");
            }

            assert_eq!(node.cur_size, size, "cur_size mismatch");
            size
        }

        let mut seen = 0;
        walk(self, self.root, bodies, &mut seen);
        assert_eq!(seen, self.locations.len(), "body reachable more than once or not at all");
    }
}

impl SpatialPartitioning for QuadTree {
    fn add_body(&mut self, handle: BodyHandle, bodies: &BodyArena) {
        assert!(!self.locations.contains_key(&handle), "body {handle:?} added twice");
        let body = bodies.body(handle);

        let mut id = self.root;
        self.node_mut(id).cur_size += 1;
        while let Some(child) = self.fitting_child(id, body) {
            self.node_mut(child).cur_size += 1;
            id = child;
        }

        self.node_mut(id).bodies.push(handle);
        self.locations.insert(handle, id);
        self.split_if_needed(id, bodies);
    }

    fn rem_body(&mut self, handle: BodyHandle, _bodies: &BodyArena) {
        let Some(id) = self.locations.remove(&handle) else {
            panic!("removing untracked body {handle:?}");
        };

        let held = &mut self.node_mut(id).bodies;
        match held.iter().position(|&h| h == handle) {
            Some(index) => {
                held.remove(index);
            }
            None => panic!("quadtree lost track of body {handle:?}"),
        }

        // The highest ancestor that dropped to capacity absorbs everything
        // below it
        let capacity = self.capacity;
        let mut merge_at = None;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node_mut(current);
            node.cur_size -= 1;
            if node.children.is_some() && node.cur_size <= capacity {
                merge_at = Some(current);
            }
            cursor = node.parent;
        }

        if let Some(node) = merge_at {
            self.concatenate(node);
        }
    }

    fn notify_move(&mut self, from: BodyHandle, to: BodyHandle) {
        let Some(id) = self.locations.remove(&from) else {
            panic!("moving untracked body {from:?}");
        };
        if let Some(slot) = self.node_mut(id).bodies.iter_mut().find(|h| **h == from) {
            *slot = to;
        }
        self.locations.insert(to, id);
    }

    fn update(&mut self, bodies: &BodyArena) {
        for (handle, node) in self.tracked() {
            self.relocate(handle, node, bodies.body(handle));
        }
        self.rebalance(self.root, bodies);
    }

    fn find_body(&self, point: Point2<f64>, bodies: &BodyArena) -> Option<BodyHandle> {
        self.find_in(self.root, point, bodies)
    }

    fn get_collisions(&mut self, bodies: &BodyArena) -> Vec<Collision> {
        let mut checks = 0;
        let mut collisions = Vec::new();
        self.collide_node(self.root, bodies, &mut checks, &mut collisions);
        self.collision_checks = checks;
        collisions
    }

    fn collision_checks(&self) -> u64 {
        self.collision_checks
    }

    fn representation(&self) -> Vec<BoundingBox> {
        let mut rects = Vec::with_capacity(self.node_count());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            rects.push(node.bounds);
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
        rects
    }

    fn len(&self) -> usize {
        self.locations.len()
    }

    fn name(&self) -> &'static str {
        "quadtree"
    }
}
