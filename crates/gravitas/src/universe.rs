//! The simulation orchestrator.
//!
//! A [`Universe`] owns the body arena, the active spatial partitioning, the
//! force model and the removal event queue. One call to [`Universe::update`]
//! advances the simulation by one tick:
//!
//! 1. the force model accumulates gravity on every body
//! 2. every body integrates and wraps around the world edges
//! 3. the partitioning resyncs and reports overlapping pairs
//! 4. each pair is resolved: the heavier body absorbs the lighter one, and
//!    the partitioning resyncs with the survivors' new radii
//! 5. every committed absorption is queued as a [`RemovalEvent`]
//! 6. counters advance and the arena is periodically compacted
//!
//! # Examples
//!
//! ```
//! use gravitas::config::{GenerationConfig, UniverseConfig};
//! use gravitas::events::RemovalEvent;
//! use gravitas::universe::Universe;
//! use nalgebra::{Point2, Vector2};
//!
//! let config = UniverseConfig::default().with_generation(GenerationConfig::empty());
//! let mut universe = Universe::new(config).unwrap();
//!
//! let big = universe.add_body(Point2::new(100.0, 100.0), Vector2::zeros(), 50.0).unwrap();
//! let small = universe.add_body(Point2::new(103.0, 100.0), Vector2::zeros(), 20.0).unwrap();
//!
//! universe.update();
//!
//! assert_eq!(universe.body_count(), 1);
//! assert_eq!(universe.body_by_id(big).unwrap().mass(), 70.0);
//! assert_eq!(
//!     universe.drain_events(),
//!     vec![RemovalEvent::Absorbed { removed: small, into: big }]
//! );
//! ```

use std::collections::HashMap;

use nalgebra::{Point2, Vector2};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing::{debug, info, trace, warn};

use crate::arena::{BodyArena, BodyHandle};
use crate::body::{self, Body, BodyId};
use crate::config::UniverseConfig;
use crate::error::ConfigResult;
use crate::events::{EventQueue, RemovalEvent};
use crate::forces::{build_force_model, ForceModel};
use crate::generation::{self, BodySeed};
use crate::partitioning::{build_partitioning, Collision, SpatialPartitioning};
use crate::physics::{self, BoundingBox};

pub struct Universe {
    config: UniverseConfig,
    bounds: BoundingBox,
    bodies: BodyArena,
    ids: HashMap<BodyId, BodyHandle>,
    partitioning: Box<dyn SpatialPartitioning>,
    forces: Box<dyn ForceModel>,
    events: EventQueue,
    rng: ChaChaRng,
    next_id: u32,
    tick: u64,
    collision_checks_last: u64,
    collision_checks_total: u64,
}

impl Universe {
    /// Builds an empty universe from a validated configuration.
    ///
    /// The configured generation is not run; see [`Universe::generate`].
    pub fn new(config: UniverseConfig) -> ConfigResult<Self> {
        config.validate()?;

        let bounds = config.bounds();
        let partitioning = build_partitioning(&config.partitioning, bounds);
        let forces = build_force_model(&config);

        info!(
            world_size = config.world_size,
            capacity = config.body_capacity,
            partitioning = partitioning.name(),
            gravity = forces.name(),
            seed = config.seed,
            "created universe"
        );

        Ok(Self {
            bounds,
            bodies: BodyArena::with_capacity(config.body_capacity),
            ids: HashMap::new(),
            partitioning,
            forces,
            events: EventQueue::new(),
            rng: ChaChaRng::seed_from_u64(config.seed),
            next_id: 0,
            tick: 0,
            collision_checks_last: 0,
            collision_checks_total: 0,
            config,
        })
    }

    /// Builds a universe and fills it with the configured initial bodies
    pub fn generate(config: UniverseConfig) -> ConfigResult<Self> {
        let mut universe = Self::new(config)?;
        universe.populate();
        Ok(universe)
    }

    /// Adds the configured random bodies and star systems.
    ///
    /// Stops quietly once capacity is reached. Returns the number of bodies
    /// actually created.
    pub fn populate(&mut self) -> usize {
        let plan = self.config.generation.clone();
        let before = self.bodies.len();

        for _ in 0..plan.random_bodies {
            let seed = generation::random_body(&mut self.rng, &plan, &self.bounds);
            if self.spawn(seed).is_none() {
                break;
            }
        }

        for _ in 0..plan.systems {
            let star = generation::random_star(&mut self.rng, &plan, &self.bounds);
            let Some(star_id) = self.spawn(star) else {
                break;
            };

            for _ in 0..plan.satellites_per_system {
                let Some(parent) = self.body_by_id(star_id).copied() else {
                    break;
                };
                let seed = generation::random_satellite(
                    &mut self.rng,
                    &parent,
                    &plan,
                    self.config.gravity_constant,
                );
                if self.spawn(seed).is_none() {
                    break;
                }
            }
        }

        let created = self.bodies.len() - before;
        debug!(created, "populated universe");
        created
    }

    /// Adds a body, wrapping its position into the world.
    ///
    /// Returns `None` once the configured capacity is reached.
    pub fn add_body(&mut self, position: Point2<f64>, velocity: Vector2<f64>, mass: f64) -> Option<BodyId> {
        if self.bodies.len() >= self.config.body_capacity {
            warn!(capacity = self.config.body_capacity, "body capacity reached");
            return None;
        }
        let Some(next_id) = self.next_id.checked_add(1) else {
            warn!("body ids exhausted");
            return None;
        };

        let id = BodyId(self.next_id);
        self.next_id = next_id;

        let position = body::wrap_into(position, &self.bounds);
        let handle = self.bodies.insert(Body::new(id, position, velocity, mass));
        self.partitioning.add_body(handle, &self.bodies);
        self.ids.insert(id, handle);

        trace!(id = id.0, mass, "added body");
        Some(id)
    }

    /// Adds a body orbiting `parent`, starting at periapsis.
    ///
    /// `separation` is measured in combined radii; see
    /// [`generation::satellite`]. Returns `None` if the parent does not
    /// exist or capacity is reached.
    pub fn add_satellite(
        &mut self,
        parent: BodyId,
        mass: f64,
        eccentricity: f64,
        separation: f64,
        angle: f64,
    ) -> Option<BodyId> {
        let parent = *self.body_by_id(parent)?;
        let seed = generation::satellite(
            &parent,
            mass,
            eccentricity,
            separation,
            angle,
            self.config.gravity_constant,
        );
        self.spawn(seed)
    }

    /// Deletes a body outright and queues [`RemovalEvent::Destroyed`]
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let handle = self.ids.get(&id).copied()?;
        let removed = self.detach(handle)?;

        self.events.push(RemovalEvent::Destroyed { removed: id });
        debug!(id = id.0, "destroyed body");
        Some(removed)
    }

    /// Advances the simulation by one tick
    pub fn update(&mut self) {
        self.forces.apply_forces(&mut self.bodies);

        for (_, body) in self.bodies.iter_mut() {
            body.integrate(&self.bounds);
        }

        self.partitioning.update(&self.bodies);
        let collisions = self.partitioning.get_collisions(&self.bodies);
        let checks = self.partitioning.collision_checks();

        let absorbed = self.resolve_collisions(&collisions);
        if absorbed > 0 {
            // Survivors grew; point queries must see current radii
            self.partitioning.update(&self.bodies);
        }

        self.tick += 1;
        self.collision_checks_last = checks;
        self.collision_checks_total += checks;

        if self.config.compact_interval > 0 && self.tick % self.config.compact_interval == 0 {
            self.compact();
        }

        trace!(
            tick = self.tick,
            bodies = self.bodies.len(),
            collisions = collisions.len(),
            absorbed,
            checks,
            "tick"
        );
    }

    /// Takes every removal event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<RemovalEvent> {
        self.events.drain()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn body_by_id(&self, id: BodyId) -> Option<&Body> {
        self.ids.get(&id).and_then(|&handle| self.bodies.get(handle))
    }

    /// Current handle of a body; changes when the arena is compacted
    pub fn handle_of(&self, id: BodyId) -> Option<BodyHandle> {
        self.ids.get(&id).copied()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Body whose circle contains `point`, as seen by the partitioning
    pub fn find_body(&self, point: Point2<f64>) -> Option<BodyId> {
        self.partitioning
            .find_body(point, &self.bodies)
            .map(|handle| self.bodies.body(handle).id)
    }

    /// Bodies whose circle touches `rect`, in arena order
    pub fn bodies_in_rect(&self, rect: &BoundingBox) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|(_, body)| physics::circle_intersects_rect(body.position, body.radius(), rect))
            .map(|(_, body)| body.id)
            .collect()
    }

    /// Ticks since creation
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn collision_checks_last_tick(&self) -> u64 {
        self.collision_checks_last
    }

    pub fn collision_checks_total(&self) -> u64 {
        self.collision_checks_total
    }

    pub fn partitioning_representation(&self) -> Vec<BoundingBox> {
        self.partitioning.representation()
    }

    pub fn partitioning_name(&self) -> &'static str {
        self.partitioning.name()
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|(_, body)| body.mass()).sum()
    }

    /// Conserved by absorption; gravity conserves it up to approximation
    /// error
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.bodies
            .iter()
            .map(|(_, body)| body.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(|(_, body)| body.kinetic_energy()).sum()
    }

    /// Potential energy as reported by the active force model
    pub fn potential_energy(&self) -> f64 {
        self.forces.potential_energy(&self.bodies)
    }

    fn spawn(&mut self, seed: BodySeed) -> Option<BodyId> {
        self.add_body(seed.position, seed.velocity, seed.mass)
    }

    /// Removes a body from the partitioning, the arena and the id index, in
    /// that order
    fn detach(&mut self, handle: BodyHandle) -> Option<Body> {
        if !self.bodies.contains(handle) {
            return None;
        }
        self.partitioning.rem_body(handle, &self.bodies);
        let removed = self.bodies.remove(handle)?;
        self.ids.remove(&removed.id);
        Some(removed)
    }

    /// Applies absorptions in order and returns how many committed
    fn resolve_collisions(&mut self, collisions: &[Collision]) -> usize {
        let mut absorbed = 0;

        for collision in collisions {
            // An earlier absorption this pass may have consumed either side
            if !self.bodies.contains(collision.bigger) || !self.bodies.contains(collision.smaller) {
                continue;
            }

            // Masses may have changed since detection
            let Collision { bigger, smaller } =
                Collision::between(collision.bigger, collision.smaller, &self.bodies);

            let Some(removed) = self.detach(smaller) else {
                continue;
            };
            let Some(survivor) = self.bodies.get_mut(bigger) else {
                continue;
            };
            survivor.absorb(&removed);
            let into = survivor.id;

            self.events.push(RemovalEvent::Absorbed {
                removed: removed.id,
                into,
            });
            trace!(removed = removed.id.0, into = into.0, "absorbed body");
            absorbed += 1;
        }

        absorbed
    }

    /// Packs the arena and re-keys every moved handle
    fn compact(&mut self) {
        let moves = self.bodies.compact();
        for &(from, to) in &moves {
            self.partitioning.notify_move(from, to);
            let id = self.bodies.body(to).id;
            self.ids.insert(id, to);
        }

        if !moves.is_empty() {
            debug!(moved = moves.len(), "compacted body arena");
        }
    }
}
