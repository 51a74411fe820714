use crate::config::{GenerationConfig, GravityConfig, PartitioningConfig, UniverseConfig, ValueRange};
use crate::error::ConfigError;

#[test]
fn test_default_config_is_valid() {
    assert_eq!(UniverseConfig::default().validate(), Ok(()));
}

#[test]
fn test_rejects_bad_world_size() {
    let mut config = UniverseConfig::default();

    config.world_size = 0.0;
    assert_eq!(config.validate(), Err(ConfigError::InvalidWorldSize(0.0)));

    config.world_size = f64::INFINITY;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidWorldSize(_))));
}

#[test]
fn test_rejects_zero_capacity() {
    let config = UniverseConfig {
        body_capacity: 0,
        ..UniverseConfig::default()
    };

    assert_eq!(config.validate(), Err(ConfigError::ZeroBodyCapacity));
}

#[test]
fn test_rejects_negative_approximation() {
    let config = UniverseConfig::default().with_gravity(GravityConfig::BarnesHut { approximation: -0.1 });

    assert_eq!(config.validate(), Err(ConfigError::InvalidApproximation(-0.1)));
}

#[test]
fn test_rejects_bad_partitioning_parameters() {
    let quadtree = UniverseConfig::default().with_partitioning(PartitioningConfig::QuadTree {
        max_bodies_per_node: 0,
        max_depth: 4,
    });
    assert_eq!(quadtree.validate(), Err(ConfigError::ZeroNodeCapacity));

    let grid = UniverseConfig::default().with_partitioning(PartitioningConfig::Grid { cell_size: -5.0 });
    assert_eq!(grid.validate(), Err(ConfigError::InvalidCellSize(-5.0)));
}

#[test]
fn test_rejects_inverted_mass_range() {
    let generation = GenerationConfig {
        body_mass: ValueRange::new(50.0, 10.0),
        ..GenerationConfig::default()
    };
    let config = UniverseConfig::default().with_generation(generation);

    assert_eq!(
        config.validate(),
        Err(ConfigError::invalid_range("body mass", 50.0, 10.0))
    );
}

#[test]
fn test_rejects_non_positive_mass_range() {
    let generation = GenerationConfig {
        star_mass: ValueRange::new(0.0, 10.0),
        ..GenerationConfig::default()
    };
    let config = UniverseConfig::default().with_generation(generation);

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRange { name: "star mass", .. })
    ));
}

#[test]
fn test_rejects_unbound_eccentricity() {
    let generation = GenerationConfig {
        eccentricity: ValueRange::new(0.0, 1.0),
        ..GenerationConfig::default()
    };
    let config = UniverseConfig::default().with_generation(generation);

    assert_eq!(
        config.validate(),
        Err(ConfigError::InvalidEccentricity { min: 0.0, max: 1.0 })
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::InvalidCellSize(-5.0).to_string(),
        "grid cell size must be positive and finite, got -5"
    );
    assert_eq!(
        ConfigError::invalid_range("body mass", 50.0, 10.0).to_string(),
        "invalid body mass range [50, 10]"
    );
}

#[test]
fn test_empty_json_uses_defaults() {
    let config: UniverseConfig = serde_json::from_str("{}").unwrap();

    assert_eq!(config, UniverseConfig::default());
}

#[test]
fn test_parses_tagged_enums() {
    let config: UniverseConfig = serde_json::from_str(
        r#"{
            "gravity": { "type": "exact", "parallel": true },
            "partitioning": { "type": "line_sweep" },
            "generation": { "random_bodies": 10, "systems": 0 },
            "seed": 7
        }"#,
    )
    .unwrap();

    assert_eq!(config.gravity, GravityConfig::Exact { parallel: true });
    assert_eq!(config.partitioning, PartitioningConfig::LineSweep);
    assert_eq!(config.generation.random_bodies, 10);
    assert_eq!(config.generation.systems, 0);
    assert_eq!(config.generation.body_mass, GenerationConfig::default().body_mass);
    assert_eq!(config.seed, 7);
}

#[test]
fn test_tagged_enum_fields_default() {
    let quadtree: PartitioningConfig = serde_json::from_str(r#"{ "type": "quad_tree" }"#).unwrap();
    assert_eq!(quadtree, PartitioningConfig::default());

    let barnes_hut: GravityConfig = serde_json::from_str(r#"{ "type": "barnes_hut" }"#).unwrap();
    assert_eq!(barnes_hut, GravityConfig::BarnesHut { approximation: 0.5 });
}

#[test]
fn test_unknown_partitioning_is_rejected() {
    let result = serde_json::from_str::<PartitioningConfig>(r#"{ "type": "octree" }"#);

    assert!(result.is_err());
}

#[test]
fn test_value_range_sampling() {
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    let mut rng = ChaChaRng::seed_from_u64(1);
    let range = ValueRange::new(2.0, 3.0);

    for _ in 0..100 {
        assert!(range.contains(range.sample(&mut rng)));
    }
    assert_eq!(ValueRange::new(4.0, 4.0).sample(&mut rng), 4.0);
}
