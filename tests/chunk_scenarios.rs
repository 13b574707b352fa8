// Deterministic chunk-layout scenarios with a simulated per-table limit of 3.
//
// Each test builds its own map/set against its own ceiling cell so discovery
// in one test cannot leak into another. The invariants exercised:
// - Growth: a full last chunk causes a new chunk; earlier chunks keep their
//   entries.
// - Splicing: a chunk that loses its last entry disappears from the list.
// - Backfill: a freed slot in an earlier chunk is reused before the list
//   grows; append-only mode never does so.
// - Discovery: the ceiling is learned from the first rejection and survives
//   `clear()`.
use chunked_hashmap::{
    Builder, CapacityCeiling, ChunkState, ChunkedHashMap, ChunkedHashSet, Reclaim,
};

fn map_with(cell: &'static CapacityCeiling, reclaim: Reclaim) -> ChunkedHashMap<&'static str, u32> {
    Builder::new()
        .table_bound(3)
        .ceiling(cell)
        .reclaim(reclaim)
        .build_map()
}

fn lens<K, V, S>(m: &ChunkedHashMap<K, V, S>) -> Vec<usize> {
    m.chunk_lens().collect()
}

fn sorted_keys(m: &ChunkedHashMap<&'static str, u32>) -> Vec<&'static str> {
    let mut keys: Vec<_> = m.keys().copied().collect();
    keys.sort_unstable();
    keys
}

// Test: five keys over a limit of three.
// Assumes: each table holds at most three entries.
// Verifies: two chunks {a,b,c} and {d,e}; every key is reachable.
#[test]
fn five_keys_make_two_chunks() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut m = map_with(&CELL, Reclaim::Backfill);
    for (i, k) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
        assert_eq!(m.insert(k, i as u32), None);
    }
    assert_eq!(m.len(), 5);
    assert_eq!(lens(&m), [3, 2]);
    assert!(m.contains_key("c"));

    let first: Vec<_> = {
        let mut v: Vec<_> = m.keys().take(3).copied().collect();
        v.sort_unstable();
        v
    };
    assert_eq!(first, ["a", "b", "c"]);
    assert_eq!(CELL.get().map(|c| c.get()), Some(3));
}

// Test: emptying the oldest chunk.
// Assumes: chunks {a,b,c} and {d,e}.
// Verifies: deleting b, a, c removes the first chunk; later inserts still land.
#[test]
fn emptied_chunk_is_spliced_out() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut m = map_with(&CELL, Reclaim::Backfill);
    m.extend([("a", 0), ("b", 1), ("c", 2), ("d", 3), ("e", 4)]);

    assert_eq!(m.remove("b"), Some(1));
    assert_eq!(m.remove("a"), Some(0));
    assert_eq!(m.remove("c"), Some(2));
    assert_eq!(m.chunk_count(), 1);
    assert_eq!(m.len(), 2);
    assert_eq!(sorted_keys(&m), ["d", "e"]);

    assert_eq!(m.insert("f", 5), None);
    assert!(m.contains_key("f"));
    assert_eq!(m.len(), 3);
    assert_eq!(lens(&m), [3]);
}

// Test: backfill after a buried removal.
// Assumes: chunks {a,b,c} and {d,e,f}, both full.
// Verifies: after removing b, inserting g reuses chunk 0 and no chunk is added.
#[test]
fn freed_slot_is_backfilled() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut m = map_with(&CELL, Reclaim::Backfill);
    m.extend([("a", 0), ("b", 1), ("c", 2), ("d", 3), ("e", 4), ("f", 5)]);
    assert_eq!(lens(&m), [3, 3]);

    m.remove("b");
    assert_eq!(lens(&m), [2, 3]);
    m.insert("g", 6);
    assert_eq!(m.chunk_count(), 2);
    assert_eq!(lens(&m), [3, 3]);
    assert_eq!(m.get("g"), Some(&6));

    // g now iterates among the oldest chunk's entries.
    let mut first: Vec<_> = m.keys().take(3).copied().collect();
    first.sort_unstable();
    assert_eq!(first, ["a", "c", "g"]);
}

// Test: backfill with room only in the last chunk.
// Assumes: chunks {a,b,c} and {d,e}.
// Verifies: removing b then inserting x keeps two chunks either way.
#[test]
fn partial_last_chunk_does_not_grow() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut m = map_with(&CELL, Reclaim::Backfill);
    m.extend([("a", 0), ("b", 1), ("c", 2), ("d", 3), ("e", 4)]);
    m.remove("b");
    m.insert("x", 9);
    assert_eq!(m.chunk_count(), 2);
    assert_eq!(m.len(), 5);
}

// Test: append-only mode.
// Assumes: chunks {a,b,c} and {d,e,f}.
// Verifies: a freed slot in chunk 0 is left empty; the list grows instead.
#[test]
fn append_only_never_backfills() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut m = map_with(&CELL, Reclaim::AppendOnly);
    m.extend([("a", 0), ("b", 1), ("c", 2), ("d", 3), ("e", 4), ("f", 5)]);
    m.remove("b");
    m.insert("g", 6);
    assert_eq!(lens(&m), [2, 3, 1]);

    let keys: Vec<_> = m.keys().copied().collect();
    assert_eq!(keys.last(), Some(&"g"));
}

// Test: chunk state transitions.
// Assumes: the ceiling is discovered on the fourth insert.
// Verifies: the first chunk is sealed exactly when it rejects; new chunks open.
#[test]
fn chunk_states_follow_rejections() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut m = map_with(&CELL, Reclaim::Backfill);
    m.extend([("a", 0), ("b", 1), ("c", 2)]);
    assert_eq!(m.chunk_states().collect::<Vec<_>>(), [ChunkState::Open]);
    m.insert("d", 3);
    assert_eq!(
        m.chunk_states().collect::<Vec<_>>(),
        [ChunkState::Sealed, ChunkState::Open]
    );
    // Updating a key in the sealed chunk keeps it where it is.
    assert_eq!(m.insert("a", 10), Some(0));
    assert_eq!(lens(&m), [3, 1]);
}

// Test: clear keeps the discovered ceiling.
// Assumes: the ceiling was discovered before clearing.
// Verifies: the container is empty, yields nothing, and the cell still holds 3.
#[test]
fn clear_keeps_ceiling() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut m = map_with(&CELL, Reclaim::Backfill);
    m.extend([("a", 0), ("b", 1), ("c", 2), ("d", 3)]);
    m.clear();
    assert_eq!(m.len(), 0);
    assert!(!m.contains_key("a"));
    assert_eq!(m.iter().count(), 0);
    assert_eq!(m.chunk_count(), 0);
    assert_eq!(CELL.get().map(|c| c.get()), Some(3));

    // Refilling relies on the cached ceiling rather than a new trial.
    m.extend([("p", 0), ("q", 1), ("r", 2), ("s", 3)]);
    assert_eq!(lens(&m), [3, 1]);
}

// Test: a second container sharing the cell.
// Assumes: one map already discovered the ceiling.
// Verifies: another container on the same cell splits at the cached value.
#[test]
fn ceiling_shared_between_instances() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut m = map_with(&CELL, Reclaim::Backfill);
    m.extend([("a", 0), ("b", 1), ("c", 2), ("d", 3)]);

    let mut s: ChunkedHashSet<u32> = Builder::new().table_bound(3).ceiling(&CELL).build_set();
    s.extend(0..7);
    assert!(core::ptr::eq(s.ceiling(), m.ceiling()));
    assert_eq!(s.chunk_lens().collect::<Vec<_>>(), [3, 3, 1]);
}

// Test: same scenarios for the set.
// Assumes: limit of three.
// Verifies: growth, splicing and backfill mirror the map.
#[test]
fn set_scenario() {
    static CELL: CapacityCeiling = CapacityCeiling::new();
    let mut s: ChunkedHashSet<char> = Builder::new().table_bound(3).ceiling(&CELL).build_set();
    s.extend("abcde".chars());
    assert_eq!(s.chunk_lens().collect::<Vec<_>>(), [3, 2]);
    assert!(s.contains(&'c'));

    s.remove(&'b');
    s.insert('f');
    assert_eq!(s.chunk_lens().collect::<Vec<_>>(), [3, 2]);

    for c in ['a', 'c', 'f'] {
        s.remove(&c);
    }
    assert_eq!(s.chunk_count(), 1);
    assert_eq!(s.len(), 2);
    assert!(s.insert('g'));
    assert!(s.contains(&'g'));
}
