//! Partitioning comparison example
//!
//! Runs the same seeded universe under every spatial partitioning strategy
//! and reports how many pairwise collision checks each one needed.
//!
//! Run with: cargo run --package gravitas --example partitioning_race

use std::time::Instant;

use gravitas::config::{GenerationConfig, PartitioningConfig, UniverseConfig};
use gravitas::{RemovalEvent, Universe};

const TICKS: u64 = 200;

fn main() {
    println!("Gravitas partitioning race: {TICKS} ticks per strategy\n");
    println!("{}", "=".repeat(72));

    let strategies = [
        PartitioningConfig::default(),
        PartitioningConfig::Grid { cell_size: 64.0 },
        PartitioningConfig::LineSweep,
        PartitioningConfig::BruteForce,
    ];

    let base = UniverseConfig {
        generation: GenerationConfig {
            random_bodies: 1_000,
            systems: 3,
            ..GenerationConfig::default()
        },
        ..UniverseConfig::default()
    };

    for partitioning in strategies {
        let mut universe = match Universe::generate(base.clone().with_partitioning(partitioning)) {
            Ok(universe) => universe,
            Err(err) => {
                eprintln!("invalid configuration: {err}");
                return;
            }
        };
        let initial = universe.body_count();
        let mut absorbed = 0;

        let start = Instant::now();
        for _ in 0..TICKS {
            universe.update();
            absorbed += universe
                .drain_events()
                .iter()
                .filter(|event| matches!(event, RemovalEvent::Absorbed { .. }))
                .count();
        }
        let elapsed = start.elapsed();

        println!(
            "  {:<12} {:>5} -> {:>5} bodies  {:>5} absorbed  {:>12} checks  {:>8.1} ms",
            universe.partitioning_name(),
            initial,
            universe.body_count(),
            absorbed,
            universe.collision_checks_total(),
            elapsed.as_secs_f64() * 1_000.0
        );
    }

    println!("{}", "=".repeat(72));
}
