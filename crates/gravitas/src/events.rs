//! Removal notifications.
//!
//! The universe pushes an event only after a removal has fully committed
//! (the body is gone from both the arena and the partitioning). Callers drain
//! the queue after a tick and feed each event to whatever state is anchored
//! to a body, such as an [`InteractionMode`](crate::interaction::InteractionMode).

use std::collections::VecDeque;

use crate::body::BodyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalEvent {
    /// Merged into a surviving body during collision resolution
    Absorbed { removed: BodyId, into: BodyId },
    /// Deleted outright
    Destroyed { removed: BodyId },
}

impl RemovalEvent {
    pub fn removed(&self) -> BodyId {
        match *self {
            RemovalEvent::Absorbed { removed, .. } | RemovalEvent::Destroyed { removed } => removed,
        }
    }

    /// The body that took over the removed one's mass, if any
    pub fn survivor(&self) -> Option<BodyId> {
        match *self {
            RemovalEvent::Absorbed { into, .. } => Some(into),
            RemovalEvent::Destroyed { .. } => None,
        }
    }
}

/// FIFO of pending removal events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<RemovalEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RemovalEvent) {
        self.events.push_back(event);
    }

    /// Takes every pending event in the order they were raised
    pub fn drain(&mut self) -> Vec<RemovalEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
