use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::{radius_for_mass, BodyId};
use crate::config::{GenerationConfig, GravityConfig, UniverseConfig};
use crate::events::RemovalEvent;
use crate::interaction::{CreationSession, InteractionMode};
use crate::physics;
use crate::universe::Universe;

fn absorbed(removed: u32, into: u32) -> RemovalEvent {
    RemovalEvent::Absorbed {
        removed: BodyId(removed),
        into: BodyId(into),
    }
}

fn destroyed(removed: u32) -> RemovalEvent {
    RemovalEvent::Destroyed {
        removed: BodyId(removed),
    }
}

#[test]
fn test_default_mode_has_no_anchor() {
    let mode = InteractionMode::default();

    assert_eq!(mode, InteractionMode::Default);
    assert_eq!(mode.anchor(), None);
    assert!(!mode.is_creating());
}

#[test]
fn test_begin_and_cancel() {
    let mode = InteractionMode::default().begin_creation(BodyId(5));
    assert_eq!(mode, InteractionMode::Creating(CreationSession::new(BodyId(5))));

    // Restarting replaces the anchor
    let mode = mode.begin_creation(BodyId(6));
    assert_eq!(mode.anchor(), Some(BodyId(6)));

    assert_eq!(mode.cancel(), InteractionMode::Default);
}

#[test]
fn test_unrelated_removals_are_ignored() {
    let mode = InteractionMode::default().begin_creation(BodyId(5));

    let after = mode.on_removal(&absorbed(7, 5)).on_removal(&destroyed(8));

    assert_eq!(after, mode);
    assert_eq!(InteractionMode::Default.on_removal(&destroyed(5)), InteractionMode::Default);
}

#[test]
fn test_absorbed_parent_retargets_and_keeps_parameters() {
    let mut mode = InteractionMode::default().begin_creation(BodyId(5));
    if let Some(session) = mode.session_mut() {
        session.mass = 42.0;
        session.eccentricity = 0.3;
    }

    let mode = mode.on_removal(&absorbed(5, 2));

    let InteractionMode::Creating(session) = mode else {
        panic!("session was cancelled");
    };
    assert_eq!(session.parent, BodyId(2));
    assert_eq!(session.mass, 42.0);
    assert_eq!(session.eccentricity, 0.3);
}

#[test]
fn test_destroyed_parent_cancels() {
    let mode = InteractionMode::default().begin_creation(BodyId(5));

    assert_eq!(mode.on_removal(&destroyed(5)), InteractionMode::Default);
}

#[test]
fn test_event_batches_are_applied_in_order() {
    let mode = InteractionMode::default().begin_creation(BodyId(1));

    // 1 -> 2 -> 3 through successive absorptions
    let chained = mode.on_removals(&[absorbed(1, 2), absorbed(2, 3), destroyed(9)]);
    assert_eq!(chained.anchor(), Some(BodyId(3)));

    // The retargeted anchor is destroyed later in the same batch
    let cancelled = mode.on_removals(&[absorbed(1, 2), destroyed(2)]);
    assert_eq!(cancelled, InteractionMode::Default);
}

fn quiet_universe() -> Universe {
    let config = UniverseConfig {
        world_size: 1000.0,
        gravity_constant: 0.0,
        gravity: GravityConfig::Exact { parallel: false },
        generation: GenerationConfig::empty(),
        ..UniverseConfig::default()
    };
    Universe::new(config).unwrap()
}

#[test]
fn test_commit_places_satellite() {
    let mut universe = quiet_universe();
    let parent = universe
        .add_body(Point2::new(500.0, 500.0), Vector2::zeros(), 20_000.0)
        .unwrap();
    let mut mode = InteractionMode::default().begin_creation(parent);
    if let Some(session) = mode.session_mut() {
        session.mass = 300.0;
        session.separation = 3.0;
    }

    let (mode, created) = mode.commit(&mut universe);

    assert_eq!(mode, InteractionMode::Default);
    let satellite = universe.body_by_id(created.unwrap()).unwrap();
    let parent_body = universe.body_by_id(parent).unwrap();
    assert_relative_eq!(
        physics::distance(parent_body.position, satellite.position),
        3.0 * (parent_body.radius() + radius_for_mass(300.0)),
        epsilon = 1e-9
    );
    assert_eq!(universe.body_count(), 2);
}

#[test]
fn test_failed_commit_keeps_session() {
    let mut universe = quiet_universe();
    let mode = InteractionMode::default().begin_creation(BodyId(99));

    let (after, created) = mode.commit(&mut universe);

    assert_eq!(created, None);
    assert_eq!(after, mode);

    let (idle, created) = InteractionMode::Default.commit(&mut universe);
    assert_eq!(idle, InteractionMode::Default);
    assert_eq!(created, None);
}

#[test]
fn test_session_follows_parent_through_a_tick() {
    let mut universe = quiet_universe();
    let big = universe.add_body(Point2::new(100.0, 100.0), Vector2::zeros(), 80.0).unwrap();
    let parent = universe.add_body(Point2::new(106.0, 100.0), Vector2::zeros(), 30.0).unwrap();
    let mode = InteractionMode::default().begin_creation(parent);

    universe.update();
    let mode = mode.on_removals(&universe.drain_events());

    assert_eq!(mode.anchor(), Some(big));
    assert!(universe.body_by_id(big).is_some());
}
