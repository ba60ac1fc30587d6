//! ClosedHashMap: public map API over the probing table.

use crate::cursor::{Cursor, Iter};
use crate::error::MapError;
use crate::reentrancy::ReentryGuard;
use crate::table::{Entry, Probe, Table};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use xxhash_rust::xxh3::Xxh3DefaultBuilder;

/// A key→value map stored in a single slot array.
///
/// Collisions are resolved by linear probing; removal leaves a tombstone
/// that only a rehash reclaims. The table starts at
/// [`INITIAL_CAPACITY`](crate::INITIAL_CAPACITY) slots, doubles when
/// live entries plus tombstones reach 70% of capacity, and halves (down
/// to the initial capacity) when live entries fall to 20%.
///
/// Keys need `Eq + Hash` with the usual contract: equal keys must hash
/// equally. The default hasher is unseeded XXH3, so slot positions are
/// reproducible from run to run.
pub struct ClosedHashMap<K, V, S = Xxh3DefaultBuilder> {
    hasher: S,
    table: Table<K, V>,
    reentrancy: ReentryGuard,
}

impl<K, V> ClosedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(Xxh3DefaultBuilder::new())
    }
}

impl<K, V, S: Default> Default for ClosedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ClosedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            table: Table::new(),
            reentrancy: ReentryGuard::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    #[cfg(test)]
    pub(crate) fn tombstones(&self) -> usize {
        self.table.tombstones()
    }

    /// Visit entries in slot order until `visit` returns `false`.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (k, v) in self.iter() {
            if !visit(k, v) {
                break;
            }
        }
    }

    /// Stateful cursor positioned on the first entry in slot order.
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.table)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.table)
    }
}

impl<K, V, S> ClosedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find_index<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        self.table.find(hash, |k| k.borrow() == q)
    }

    /// Insert or overwrite. Returns the previous value when `key` was
    /// already present; the stored key is kept in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter();
        if self.table.needs_growth() {
            self.table.grow();
        }
        let hash = self.hasher.hash_one(&key);
        loop {
            match self.table.probe(hash, |k| *k == key) {
                Some(Probe::Occupied(index)) => {
                    return self
                        .table
                        .entry_mut(index)
                        .map(|e| mem::replace(&mut e.value, value));
                }
                Some(Probe::Empty(index)) => {
                    self.table.fill(index, Entry { key, value, hash });
                    return None;
                }
                // Only reachable if the load policy let the table fill up.
                None => self.table.grow(),
            }
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_index(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Result<(&K, &V), MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_index(q)
            .and_then(|index| self.table.entry(index))
            .map(|e| (&e.key, &e.value))
            .ok_or(MapError::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find_index(q).ok_or(MapError::KeyNotFound)?;
        self.table
            .entry_mut(index)
            .map(|e| &mut e.value)
            .ok_or(MapError::KeyNotFound)
    }

    /// Remove `q` and return its value.
    ///
    /// The shrink check runs before the lookup, so a lightly loaded table
    /// may shrink even when `q` turns out to be absent.
    pub fn remove<Q>(&mut self, q: &Q) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Result<(K, V), MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        if self.table.needs_shrink() {
            self.table.shrink();
        }
        let hash = self.make_hash(q);
        let index = self
            .table
            .find(hash, |k| k.borrow() == q)
            .ok_or(MapError::KeyNotFound)?;
        self.table
            .take(index)
            .map(|e| (e.key, e.value))
            .ok_or(MapError::KeyNotFound)
    }
}

impl<K, V, S> fmt::Debug for ClosedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for ClosedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ClosedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::default();
        m.extend(iter);
        m
    }
}

impl<'a, K, V, S> IntoIterator for &'a ClosedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
