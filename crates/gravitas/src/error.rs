//! Error types for universe configuration.

use thiserror::Error;

/// Result type alias for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons a [`UniverseConfig`](crate::config::UniverseConfig) is rejected.
///
/// The simulation itself has no recoverable errors: once a universe is built
/// every operation either succeeds or is a contract violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("world size must be positive and finite, got {0}")]
    InvalidWorldSize(f64),

    #[error("body capacity must be at least 1")]
    ZeroBodyCapacity,

    #[error("gravity constant must be finite and non-negative, got {0}")]
    InvalidGravityConstant(f64),

    #[error("approximation threshold must be finite and non-negative, got {0}")]
    InvalidApproximation(f64),

    #[error("quadtree node capacity must be at least 1")]
    ZeroNodeCapacity,

    #[error("grid cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    #[error("invalid {name} range [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    #[error("eccentricity must lie in [0, 1), got range [{min}, {max}]")]
    InvalidEccentricity { min: f64, max: f64 },
}

impl ConfigError {
    /// Create an invalid range error.
    #[must_use]
    pub fn invalid_range(name: &'static str, min: f64, max: f64) -> Self {
        Self::InvalidRange { name, min, max }
    }
}
