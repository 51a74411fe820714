//! Universe configuration
//!
//! Everything here is fixed when the universe is built. Every field has a
//! default, so a config file only needs to name what it changes:
//!
//! ```
//! use gravitas::config::{PartitioningConfig, UniverseConfig};
//!
//! let config: UniverseConfig = serde_json::from_str(
//!     r#"{ "world_size": 2000.0, "partitioning": { "type": "grid", "cell_size": 50.0 } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.partitioning, PartitioningConfig::Grid { cell_size: 50.0 });
//! assert!(config.validate().is_ok());
//! ```

use rand::Rng;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::physics::BoundingBox;

/// Gravity solver selection
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GravityConfig {
    /// Pairwise O(n²), optionally spread over the rayon pool
    Exact {
        #[serde(default)]
        parallel: bool,
    },
    /// Barnes-Hut O(n log n)
    BarnesHut {
        #[serde(default = "default_approximation")]
        approximation: f64,
    },
}

fn default_approximation() -> f64 {
    0.5
}

impl Default for GravityConfig {
    fn default() -> Self {
        GravityConfig::BarnesHut {
            approximation: default_approximation(),
        }
    }
}

/// Spatial partitioning used for collisions and point queries
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartitioningConfig {
    QuadTree {
        #[serde(default = "default_max_bodies_per_node")]
        max_bodies_per_node: usize,
        #[serde(default = "default_max_depth")]
        max_depth: usize,
    },
    Grid {
        #[serde(default = "default_cell_size")]
        cell_size: f64,
    },
    LineSweep,
    BruteForce,
}

fn default_max_bodies_per_node() -> usize {
    8
}

fn default_max_depth() -> usize {
    8
}

fn default_cell_size() -> f64 {
    64.0
}

impl Default for PartitioningConfig {
    fn default() -> Self {
        PartitioningConfig::QuadTree {
            max_bodies_per_node: default_max_bodies_per_node(),
            max_depth: default_max_depth(),
        }
    }
}

/// Closed interval sampled uniformly by the generators
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Uniform sample; a degenerate range returns `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, name: &'static str) -> ConfigResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::invalid_range(name, self.min, self.max));
        }
        Ok(())
    }

    fn check_positive(&self, name: &'static str) -> ConfigResult<()> {
        self.check(name)?;
        if self.min <= 0.0 {
            return Err(ConfigError::invalid_range(name, self.min, self.max));
        }
        Ok(())
    }
}

/// Initial population of a universe
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Free-floating bodies scattered over the world
    pub random_bodies: usize,
    pub body_mass: ValueRange,
    /// Upper bound of each random velocity component
    pub initial_speed: f64,

    /// Star systems: one central body with orbiting satellites
    pub systems: usize,
    pub star_mass: ValueRange,
    pub satellites_per_system: usize,
    pub satellite_mass: ValueRange,
    /// Periapsis distance in units of combined radii
    pub satellite_separation: ValueRange,
    pub eccentricity: ValueRange,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            random_bodies: 200,
            body_mass: ValueRange::new(1.0, 50.0),
            initial_speed: 0.5,
            systems: 2,
            star_mass: ValueRange::new(10_000.0, 50_000.0),
            satellites_per_system: 4,
            satellite_mass: ValueRange::new(1.0, 500.0),
            satellite_separation: ValueRange::new(1.5, 6.0),
            eccentricity: ValueRange::new(0.0, 0.3),
        }
    }
}

impl GenerationConfig {
    /// No initial bodies at all
    pub fn empty() -> Self {
        Self {
            random_bodies: 0,
            systems: 0,
            ..Self::default()
        }
    }
}

/// Top-level configuration, immutable for the life of a universe
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Side length of the square world `[0, world_size]²`
    pub world_size: f64,
    /// Maximum number of live bodies
    pub body_capacity: usize,
    pub gravity_constant: f64,
    pub gravity: GravityConfig,
    pub partitioning: PartitioningConfig,
    pub generation: GenerationConfig,
    pub seed: u64,
    /// Compact the body arena every this many ticks; 0 disables
    pub compact_interval: u64,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            world_size: 4096.0,
            body_capacity: 4096,
            gravity_constant: 1.0,
            gravity: GravityConfig::default(),
            partitioning: PartitioningConfig::default(),
            generation: GenerationConfig::default(),
            seed: 42,
            compact_interval: 64,
        }
    }
}

impl UniverseConfig {
    /// World rectangle
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::square(0.0, 0.0, self.world_size)
    }

    pub fn with_partitioning(mut self, partitioning: PartitioningConfig) -> Self {
        self.partitioning = partitioning;
        self
    }

    pub fn with_gravity(mut self, gravity: GravityConfig) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every field, reporting the first problem found
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            return Err(ConfigError::InvalidWorldSize(self.world_size));
        }
        if self.body_capacity == 0 {
            return Err(ConfigError::ZeroBodyCapacity);
        }
        if !(self.gravity_constant.is_finite() && self.gravity_constant >= 0.0) {
            return Err(ConfigError::InvalidGravityConstant(self.gravity_constant));
        }

        if let GravityConfig::BarnesHut { approximation } = self.gravity {
            if !(approximation.is_finite() && approximation >= 0.0) {
                return Err(ConfigError::InvalidApproximation(approximation));
            }
        }

        match self.partitioning {
            PartitioningConfig::QuadTree {
                max_bodies_per_node, ..
            } if max_bodies_per_node == 0 => return Err(ConfigError::ZeroNodeCapacity),
            PartitioningConfig::Grid { cell_size } if !(cell_size.is_finite() && cell_size > 0.0) => {
                return Err(ConfigError::InvalidCellSize(cell_size))
            }
            _ => {}
        }

        let generation = &self.generation;
        generation.body_mass.check_positive("body mass")?;
        generation.star_mass.check_positive("star mass")?;
        generation.satellite_mass.check_positive("satellite mass")?;
        generation.satellite_separation.check_positive("satellite separation")?;

        let eccentricity = generation.eccentricity;
        eccentricity.check("eccentricity")?;
        if eccentricity.min < 0.0 || eccentricity.max >= 1.0 {
            return Err(ConfigError::InvalidEccentricity {
                min: eccentricity.min,
                max: eccentricity.max,
            });
        }

        if !(generation.initial_speed.is_finite() && generation.initial_speed >= 0.0) {
            return Err(ConfigError::invalid_range(
                "initial speed",
                0.0,
                generation.initial_speed,
            ));
        }

        Ok(())
    }
}
