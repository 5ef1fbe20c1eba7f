use crate::cache::{CacheStore, ChunkKey, StoreOutcome};
use crate::sim::SimTick;

fn keys(c: &CacheStore) -> Vec<String> {
    c.keys_in_order().map(ChunkKey::to_string).collect()
}

#[test]
fn fifo_evicts_in_strict_insertion_order() {
    let mut c = CacheStore::new(3);
    for i in 0..3 {
        assert_eq!(
            c.store("video_1", i, SimTick(i as u64)),
            StoreOutcome::Inserted { evicted: None }
        );
    }
    assert_eq!(c.len(), 3);

    let out = c.store("video_1", 3, SimTick(10));
    assert_eq!(
        out,
        StoreOutcome::Inserted {
            evicted: Some(ChunkKey::new("video_1", 0))
        }
    );
    let out = c.store("video_2", 0, SimTick(11));
    assert_eq!(
        out,
        StoreOutcome::Inserted {
            evicted: Some(ChunkKey::new("video_1", 1))
        }
    );
    assert_eq!(keys(&c), ["video_1_2", "video_1_3", "video_2_0"]);
    assert_eq!(c.evictions(), 2);
}

#[test]
fn size_never_exceeds_capacity() {
    let mut c = CacheStore::new(4);
    for i in 0..100u32 {
        c.store(&format!("video_{}", i % 7), i % 3, SimTick(i as u64));
        assert!(c.len() <= c.capacity(), "size {} > capacity", c.len());
        assert_eq!(c.keys_in_order().count(), c.len());
    }
}

#[test]
fn restoring_existing_key_does_not_reorder() {
    let mut c = CacheStore::new(2);
    c.store("a", 0, SimTick(0));
    c.store("b", 0, SimTick(1));

    assert_eq!(c.store("a", 0, SimTick(2)), StoreOutcome::Refreshed);
    assert_eq!(keys(&c), ["a_0", "b_0"]);

    // "a" is still the oldest insertion, so it goes first.
    let out = c.store("c", 0, SimTick(3));
    assert_eq!(
        out,
        StoreOutcome::Inserted {
            evicted: Some(ChunkKey::new("a", 0))
        }
    );
    assert!(!c.has("a", 0));
    assert!(c.has("b", 0));
    assert!(c.has("c", 0));
}

#[test]
fn hits_do_not_protect_old_entries() {
    let mut c = CacheStore::new(2);
    c.store("a", 0, SimTick(0));
    c.store("b", 0, SimTick(1));
    for t in 2..10 {
        assert!(c.on_hit("a", 0, SimTick(t)));
    }
    c.store("c", 0, SimTick(10));
    assert!(!c.has("a", 0), "FIFO must evict the oldest insert regardless of hits");
    assert_eq!(c.hits(), 8);
}

#[test]
fn entry_bookkeeping_tracks_accesses() {
    let mut c = CacheStore::new(2);
    c.store("v", 1, SimTick(5));
    let e = *c.get("v", 1).expect("entry");
    assert_eq!(e.stored_at, SimTick(5));
    assert_eq!(e.last_accessed, SimTick(5));
    assert_eq!(e.access_count, 0);

    c.store("v", 1, SimTick(7));
    assert!(c.on_hit("v", 1, SimTick(9)));
    let e = *c.get("v", 1).expect("entry");
    assert_eq!(e.stored_at, SimTick(5));
    assert_eq!(e.last_accessed, SimTick(9));
    assert_eq!(e.access_count, 2);
}

#[test]
fn on_hit_for_missing_key_is_a_noop() {
    let mut c = CacheStore::new(1);
    assert!(!c.on_hit("nope", 0, SimTick(1)));
    assert!(c.is_empty());
    assert_eq!(c.hits(), 0);
}

#[test]
fn zero_capacity_is_clamped_to_one() {
    let mut c = CacheStore::new(0);
    assert_eq!(c.capacity(), 1);
    c.store("a", 0, SimTick(0));
    c.store("b", 0, SimTick(1));
    assert_eq!(c.len(), 1);
    assert!(c.has("b", 0));
}
