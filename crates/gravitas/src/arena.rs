//! Generational body storage.
//!
//! The arena owns every live [`Body`] and hands out [`BodyHandle`]s that stay
//! valid until the body is removed. Removing a body bumps its slot's
//! generation, so a stale handle resolves to `None` instead of aliasing
//! whatever body later reuses the slot.
//!
//! Partitioning structures store handles and resolve them through the arena
//! on every access; they never hold references into it.
//!
//! # Examples
//!
//! ```rust
//! use gravitas::arena::BodyArena;
//! use gravitas::body::{Body, BodyId};
//! use nalgebra::{Point2, Vector2};
//!
//! let mut arena = BodyArena::new();
//! let handle = arena.insert(Body::new(BodyId(7), Point2::new(1.0, 2.0), Vector2::zeros(), 10.0));
//!
//! assert_eq!(arena.get(handle).map(|b| b.id), Some(BodyId(7)));
//!
//! arena.remove(handle);
//! assert!(arena.get(handle).is_none());
//! ```

use crate::body::{Body, BodyId};

/// Stable reference to a body slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Slot index (dense, reused after removal)
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Slot map of bodies with a free list
#[derive(Debug, Clone, Default)]
pub struct BodyArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BodyArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Stores a body, reusing a freed slot when one is available
    pub fn insert(&mut self, body: Body) -> BodyHandle {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.body.is_none(), "free list points at a live slot");
            slot.body = Some(body);
            return BodyHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            body: Some(body),
        });
        BodyHandle {
            index,
            generation: 0,
        }
    }

    /// Removes a body; stale or already-removed handles return `None`
    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(body)
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_ref())
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_mut())
    }

    /// Resolves a handle that the caller knows to be live.
    ///
    /// # Panics
    ///
    /// Panics on a stale handle. Partitioning structures use this: a stale
    /// handle there means a missed removal notification.
    pub fn body(&self, handle: BodyHandle) -> &Body {
        match self.get(handle) {
            Some(body) => body,
            None => panic!("stale body handle {handle:?}"),
        }
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Linear lookup by id
    pub fn find_by_id(&self, id: BodyId) -> Option<BodyHandle> {
        self.iter().find(|(_, body)| body.id == id).map(|(handle, _)| handle)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live bodies in slot order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.body.as_ref().map(|body| {
                (
                    BodyHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    body,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.body.as_mut().map(|body| {
                (
                    BodyHandle {
                        index: index as u32,
                        generation,
                    },
                    body,
                )
            })
        })
    }

    pub fn handles(&self) -> Vec<BodyHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Moves bodies from the tail into freed slots so live bodies occupy a
    /// dense prefix of the slot vector.
    ///
    /// Returns `(old, new)` for every relocated body. Any structure holding
    /// handles must re-key them (see `SpatialPartitioning::notify_move`).
    pub fn compact(&mut self) -> Vec<(BodyHandle, BodyHandle)> {
        let mut moves = Vec::new();
        let mut holes: Vec<u32> = std::mem::take(&mut self.free);
        holes.sort_unstable();
        let mut holes = holes.into_iter().peekable();

        let mut tail = self.slots.len();
        while let Some(&hole) = holes.peek() {
            // Find the last live slot
            while tail > 0 && self.slots[tail - 1].body.is_none() {
                tail -= 1;
            }
            if tail == 0 || hole as usize >= tail {
                break;
            }
            holes.next();

            let from_index = tail - 1;
            let from = BodyHandle {
                index: from_index as u32,
                generation: self.slots[from_index].generation,
            };
            let body = self.slots[from_index].body.take();
            self.slots[from_index].generation = self.slots[from_index].generation.wrapping_add(1);

            let target = &mut self.slots[hole as usize];
            target.body = body;
            moves.push((
                from,
                BodyHandle {
                    index: hole,
                    generation: target.generation,
                },
            ));
            tail -= 1;
        }

        // Dead tail slots stay allocated: their generations must outlive any
        // stale handle. Reverse order so `insert` reuses the lowest index first.
        self.free = (0..self.slots.len() as u32)
            .rev()
            .filter(|&i| self.slots[i as usize].body.is_none())
            .collect();

        moves
    }

    /// Number of allocated slots, live or free
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
