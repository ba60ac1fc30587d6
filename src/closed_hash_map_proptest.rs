#![cfg(test)]

// Property tests for ClosedHashMap kept inside the crate so they can
// inspect the table's tombstone count alongside the public API.

use crate::closed_hash_map::ClosedHashMap;
use crate::error::MapError;
use crate::table::INITIAL_CAPACITY;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Walk,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            1 => idx.clone().prop_map(Op::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
            1 => Just(Op::Walk),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one operation sequence against `std::collections::HashMap`.
// Invariants checked after every op:
// - `insert` returns the previous value exactly when the model had one.
// - `get`/`remove` succeed iff the model holds the key; otherwise KeyNotFound.
// - `iter`, `for_each` and the cursor each yield the model's key set once.
// - `len` parity; `len + tombstones < capacity`; capacity >= the floor.
fn run_state_machine<S: BuildHasher>(
    mut sut: ClosedHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = key_from(pool, i);
                let prev = sut.insert(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = key_from(pool, i);
                match model.remove(&k) {
                    Some(mv) => prop_assert_eq!(sut.remove(&k), Ok(mv)),
                    None => prop_assert_eq!(sut.remove(&k), Err(MapError::KeyNotFound)),
                }
            }
            Op::Get(i) => {
                let k = key_from(pool, i);
                match model.get(&k) {
                    Some(mv) => prop_assert_eq!(sut.get(&k), Ok(mv)),
                    None => prop_assert_eq!(sut.get(&k), Err(MapError::KeyNotFound)),
                }
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            Op::Mutate(i, d) => {
                let k = key_from(pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Ok(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (Err(MapError::KeyNotFound), None) => {}
                    (s, m) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m),
                }
            }
            Op::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(sut.iter().count(), model.len());
                prop_assert_eq!(s_keys, m_keys);

                let mut visited = 0usize;
                sut.for_each(|k, v| {
                    visited += usize::from(model.get(k) == Some(v));
                    true
                });
                prop_assert_eq!(visited, model.len());
            }
            Op::Walk => {
                let mut c = sut.cursor();
                let mut seen = BTreeSet::new();
                while c.has_next() {
                    let (k, v) = c.current().expect("positioned cursor");
                    prop_assert_eq!(model.get(k), Some(v));
                    prop_assert!(seen.insert(k.clone()), "cursor repeated a key");
                    c.advance().expect("advance from positioned cursor");
                }
                prop_assert_eq!(seen.len(), model.len());
                prop_assert_eq!(c.current(), Err(MapError::IteratorExhausted));
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= INITIAL_CAPACITY);
        prop_assert!(sut.len() + sut.tombstones() < sut.capacity());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(ClosedHashMap::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key probes from slot 0,
// so each lookup walks one long chain through live slots and tombstones.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(ClosedHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
