use nalgebra::{Point2, Vector2};

use crate::arena::BodyArena;
use crate::body::{Body, BodyId};

fn body(id: u32) -> Body {
    Body::new(BodyId(id), Point2::new(id as f64, 0.0), Vector2::zeros(), 10.0)
}

#[test]
fn test_insert_and_get() {
    let mut arena = BodyArena::new();
    let a = arena.insert(body(0));
    let b = arena.insert(body(1));

    assert_eq!(arena.len(), 2);
    assert_eq!(arena.body(a).id, BodyId(0));
    assert_eq!(arena.body(b).id, BodyId(1));
    assert_eq!(arena.find_by_id(BodyId(1)), Some(b));
}

#[test]
fn test_stale_handle_after_slot_reuse() {
    let mut arena = BodyArena::new();
    let old = arena.insert(body(0));
    arena.remove(old);

    let new = arena.insert(body(1));

    // Same slot, different generation
    assert_eq!(old.index(), new.index());
    assert_ne!(old.generation(), new.generation());
    assert!(arena.get(old).is_none());
    assert!(arena.remove(old).is_none());
    assert_eq!(arena.body(new).id, BodyId(1));
}

#[test]
fn test_double_remove_is_none() {
    let mut arena = BodyArena::new();
    let h = arena.insert(body(0));

    assert!(arena.remove(h).is_some());
    assert!(arena.remove(h).is_none());
    assert!(arena.is_empty());
}

#[test]
#[should_panic(expected = "stale body handle")]
fn test_body_panics_on_stale_handle() {
    let mut arena = BodyArena::new();
    let h = arena.insert(body(0));
    arena.remove(h);

    arena.body(h);
}

#[test]
fn test_iter_skips_free_slots() {
    let mut arena = BodyArena::new();
    let handles: Vec<_> = (0..5).map(|i| arena.insert(body(i))).collect();
    arena.remove(handles[1]);
    arena.remove(handles[3]);

    let ids: Vec<_> = arena.iter().map(|(_, b)| b.id.0).collect();
    assert_eq!(ids, vec![0, 2, 4]);
}

#[test]
fn test_compact_moves_tail_into_holes() {
    let mut arena = BodyArena::new();
    let handles: Vec<_> = (0..6).map(|i| arena.insert(body(i))).collect();
    arena.remove(handles[0]);
    arena.remove(handles[2]);
    arena.remove(handles[5]);

    let moves = arena.compact();

    // Body 4 moves into slot 0, body 3 into slot 2
    assert_eq!(moves.len(), 2);
    let (from, to) = moves[0];
    assert_eq!(from, handles[4]);
    assert_eq!(to.index(), 0);
    assert_eq!(arena.body(to).id, BodyId(4));

    let (from, to) = moves[1];
    assert_eq!(from, handles[3]);
    assert_eq!(to.index(), 2);

    // Old handles are stale, live bodies are dense
    assert!(arena.get(handles[4]).is_none());
    let indices: Vec<_> = arena.iter().map(|(h, _)| h.index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(arena.len(), 3);

    // Freed tail slots are reused from the lowest index
    let h = arena.insert(body(9));
    assert_eq!(h.index(), 3);
}

#[test]
fn test_compact_without_holes_is_noop() {
    let mut arena = BodyArena::new();
    (0..3).for_each(|i| {
        arena.insert(body(i));
    });

    assert!(arena.compact().is_empty());
    assert_eq!(arena.len(), 3);
}
