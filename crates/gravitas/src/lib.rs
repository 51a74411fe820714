//! 2D N-body gravity with absorbing collisions and pluggable spatial
//! partitioning.

pub mod arena;
pub mod barnes_hut;
pub mod body;
pub mod config;
pub mod error;
pub mod events;
pub mod forces;
pub mod generation;
pub mod interaction;
pub mod partitioning;
pub mod physics;
pub mod universe;

#[cfg(test)]
mod arena_test;
#[cfg(test)]
mod body_test;
#[cfg(test)]
mod config_test;
#[cfg(test)]
mod interaction_test;

pub use arena::{BodyArena, BodyHandle};
pub use body::{Body, BodyId, BodyType};
pub use config::UniverseConfig;
pub use error::ConfigError;
pub use events::RemovalEvent;
pub use interaction::InteractionMode;
pub use universe::Universe;
