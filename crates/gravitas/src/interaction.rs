//! Interaction mode state machine.
//!
//! A front end holds one [`InteractionMode`] value and replaces it with the
//! result of each transition. While a satellite is being set up, the session
//! is anchored to its parent body; removal events retarget or cancel it.
//!
//! ```
//! use gravitas::body::BodyId;
//! use gravitas::events::RemovalEvent;
//! use gravitas::interaction::InteractionMode;
//!
//! let mode = InteractionMode::default().begin_creation(BodyId(3));
//! assert_eq!(mode.anchor(), Some(BodyId(3)));
//!
//! // The parent merged into a bigger body: follow it
//! let mode = mode.on_removal(&RemovalEvent::Absorbed { removed: BodyId(3), into: BodyId(1) });
//! assert_eq!(mode.anchor(), Some(BodyId(1)));
//!
//! // The new parent was deleted: back to the default mode
//! let mode = mode.on_removal(&RemovalEvent::Destroyed { removed: BodyId(1) });
//! assert!(!mode.is_creating());
//! ```

use tracing::debug;

use crate::body::BodyId;
use crate::events::RemovalEvent;
use crate::universe::Universe;

/// Parameters of a satellite that has not been placed yet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreationSession {
    pub parent: BodyId,
    pub mass: f64,
    pub eccentricity: f64,
    /// Periapsis distance in combined radii
    pub separation: f64,
    /// Direction from the parent, in radians
    pub angle: f64,
}

impl CreationSession {
    pub fn new(parent: BodyId) -> Self {
        Self {
            parent,
            mass: 10.0,
            eccentricity: 0.0,
            separation: 5.0,
            angle: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Default,
    Creating(CreationSession),
}

impl InteractionMode {
    /// Starts (or restarts) a creation session around `parent`
    pub fn begin_creation(self, parent: BodyId) -> Self {
        debug!(parent = parent.0, "creation session started");
        InteractionMode::Creating(CreationSession::new(parent))
    }

    pub fn cancel(self) -> Self {
        InteractionMode::Default
    }

    /// Reacts to a committed removal.
    ///
    /// Only the session's own parent matters: an absorbed parent hands the
    /// session to the absorbing body, a destroyed one ends it.
    pub fn on_removal(self, event: &RemovalEvent) -> Self {
        match self {
            InteractionMode::Creating(mut session) if session.parent == event.removed() => {
                match event.survivor() {
                    Some(into) => {
                        debug!(from = session.parent.0, to = into.0, "creation session retargeted");
                        session.parent = into;
                        InteractionMode::Creating(session)
                    }
                    None => {
                        debug!(parent = session.parent.0, "creation session lost its parent");
                        InteractionMode::Default
                    }
                }
            }
            other => other,
        }
    }

    /// Folds a batch of events in order
    pub fn on_removals<'a>(self, events: impl IntoIterator<Item = &'a RemovalEvent>) -> Self {
        events.into_iter().fold(self, |mode, event| mode.on_removal(event))
    }

    /// Body the current session is anchored to
    pub fn anchor(&self) -> Option<BodyId> {
        match self {
            InteractionMode::Creating(session) => Some(session.parent),
            InteractionMode::Default => None,
        }
    }

    pub fn is_creating(&self) -> bool {
        matches!(self, InteractionMode::Creating(_))
    }

    /// Mutable access to the session parameters while creating
    pub fn session_mut(&mut self) -> Option<&mut CreationSession> {
        match self {
            InteractionMode::Creating(session) => Some(session),
            InteractionMode::Default => None,
        }
    }

    /// Places the configured satellite and returns to the default mode.
    ///
    /// If placement fails (missing parent or full universe) the session is
    /// kept so the caller can retry or cancel.
    pub fn commit(self, universe: &mut Universe) -> (Self, Option<BodyId>) {
        let InteractionMode::Creating(session) = self else {
            return (self, None);
        };

        match universe.add_satellite(
            session.parent,
            session.mass,
            session.eccentricity,
            session.separation,
            session.angle,
        ) {
            Some(id) => (InteractionMode::Default, Some(id)),
            None => (self, None),
        }
    }
}
