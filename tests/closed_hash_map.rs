// ClosedHashMap integration suite.
//
// Each test documents what behavior is being verified. The core
// invariants exercised through the public API:
// - Size: len() equals the number of distinct live keys.
// - Lookup: insert(k, v) then get(k) yields v; absent keys fail with
//   KeyNotFound from get/remove.
// - Overwrite: a second insert replaces the value, len unchanged.
// - Resize: growth at load >= 0.70 and shrink at load <= 0.20 keep every
//   live key reachable; capacity never goes under INITIAL_CAPACITY.
// - Traversal: cursor, iter and for_each agree on the live key set.
mod common;

use closed_hashmap::{ClosedHashMap, MapError, INITIAL_CAPACITY, RESIZE_FACTOR};
use std::collections::BTreeSet;

// Test: the three-key walk.
// Verifies: remove returns the stored value and only that key disappears.
#[test]
fn three_key_scenario() {
    let mut m = ClosedHashMap::new();
    m.insert("a", 1);
    m.insert("b", 2);
    m.insert("c", 3);
    assert_eq!(m.len(), 3);

    assert_eq!(m.remove("b"), Ok(2));
    assert_eq!(m.len(), 2);
    assert!(!m.contains_key("b"));
    assert_eq!(m.get("a"), Ok(&1));
}

// Test: twenty integer keys into a fresh 13-slot map.
// Verifies: at least one growth rehash and every key retrievable afterward.
#[test]
fn twenty_integer_keys_cross_growth() {
    common::init_logger();
    let mut m = ClosedHashMap::new();
    assert_eq!(m.capacity(), INITIAL_CAPACITY);
    for i in 0..20 {
        m.insert(i, format!("v{i}"));
    }
    assert!(m.capacity() >= INITIAL_CAPACITY * RESIZE_FACTOR);
    assert_eq!(m.len(), 20);
    for i in 0..20 {
        assert_eq!(m.get(&i).map(String::as_str), Ok(format!("v{i}").as_str()));
    }
}

// Test: overwrite law.
// Verifies: the last value wins and the second insert does not count.
#[test]
fn overwrite_law() {
    let mut m = ClosedHashMap::new();
    m.insert(42u64, "first");
    let len = m.len();
    assert_eq!(m.insert(42u64, "second"), Some("first"));
    assert_eq!(m.get(&42), Ok(&"second"));
    assert_eq!(m.len(), len);
}

// Test: removed and never-inserted keys.
// Verifies: KeyNotFound from both get and remove; contains_key is false.
#[test]
fn absent_keys_fail_with_key_not_found() {
    let mut m: ClosedHashMap<String, u8> = ClosedHashMap::new();
    assert_eq!(m.get("ghost"), Err(MapError::KeyNotFound));
    assert_eq!(m.remove("ghost"), Err(MapError::KeyNotFound));

    m.insert("gone".to_string(), 1);
    m.remove("gone").unwrap();
    assert!(!m.contains_key("gone"));
    assert_eq!(m.get("gone"), Err(MapError::KeyNotFound));
    assert_eq!(m.remove("gone"), Err(MapError::KeyNotFound));
}

// Test: error values render human-readable messages.
#[test]
fn errors_display() {
    assert_eq!(
        MapError::KeyNotFound.to_string(),
        "key does not belong to the map"
    );
    assert_eq!(
        MapError::IteratorExhausted.to_string(),
        "cursor has finished iterating"
    );
}

// Test: grow to a large table, then drain it.
// Verifies: capacity shrinks back to the floor, never past it, and the
// survivors stay reachable throughout.
#[test]
fn grow_then_drain_returns_to_floor() {
    common::init_logger();
    let mut m = ClosedHashMap::new();
    for i in 0..500u32 {
        m.insert(i, u64::from(i) * 3);
    }
    let peak = m.capacity();
    assert!(peak > 500);

    for i in 0..500u32 {
        assert_eq!(m.remove(&i), Ok(u64::from(i) * 3));
        assert!(m.capacity() >= INITIAL_CAPACITY);
        if i % 50 == 0 {
            for j in (i + 1)..500 {
                assert_eq!(m.get(&j), Ok(&(u64::from(j) * 3)));
            }
        }
    }
    assert!(m.is_empty());
    assert_eq!(m.capacity(), INITIAL_CAPACITY);
}

// Test: interleaved inserts and removes leave tombstones behind.
// Verifies: keys inserted after tombstones appear stay reachable, and len
// tracks the live set exactly.
#[test]
fn interleaved_churn_tracks_live_set() {
    let mut m = ClosedHashMap::new();
    let mut live = BTreeSet::new();
    let mut s = 0x9e37_79b9_7f4a_7c15u64;
    for _ in 0..5_000 {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        let k = (s >> 33) % 64;
        if s & 1 == 0 {
            m.insert(k, k);
            live.insert(k);
        } else {
            let expected = if live.remove(&k) {
                Ok(k)
            } else {
                Err(MapError::KeyNotFound)
            };
            assert_eq!(m.remove(&k), expected);
        }
        assert_eq!(m.len(), live.len());
    }
    for k in 0..64 {
        assert_eq!(m.contains_key(&k), live.contains(&k));
    }
}

// Test: cursor completeness.
// Verifies: a fresh cursor advanced to exhaustion sees exactly the
// for_each key set, each once; exhaustion is terminal.
#[test]
fn cursor_matches_for_each() {
    let mut m = ClosedHashMap::new();
    for i in 0..30i32 {
        m.insert(i.to_string(), i);
    }
    for i in (0..30i32).step_by(7) {
        m.remove(i.to_string().as_str()).unwrap();
    }

    let mut from_cursor = Vec::new();
    let mut c = m.cursor();
    while c.has_next() {
        let (k, v) = c.current().unwrap();
        assert_eq!(k.parse::<i32>().unwrap(), *v);
        from_cursor.push(k.clone());
        c.advance().unwrap();
    }
    assert_eq!(c.current(), Err(MapError::IteratorExhausted));
    assert_eq!(c.advance(), Err(MapError::IteratorExhausted));
    assert!(!c.has_next());

    let mut from_visit = BTreeSet::new();
    m.for_each(|k, _| {
        from_visit.insert(k.clone());
        true
    });

    let unique: BTreeSet<String> = from_cursor.iter().cloned().collect();
    assert_eq!(unique.len(), from_cursor.len());
    assert_eq!(unique, from_visit);
    assert_eq!(unique.len(), m.len());
}

// Test: std iteration adapters.
// Verifies: `for (k, v) in &map` and collect round out the API.
#[test]
fn iterates_by_reference() {
    let m: ClosedHashMap<char, usize> = "hello".chars().zip(0..).collect();
    assert_eq!(m.len(), 4, "duplicate 'l' overwrites");
    let mut total = 0;
    for (_, v) in &m {
        total += v;
    }
    // h=0, e=1, l=3 (second 'l' wins), o=4
    assert_eq!(total, 8);
    assert_eq!(m.get(&'l'), Ok(&3));
}
