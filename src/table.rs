//! Table: the slot array, linear probing and rehashing.
//!
//! The table never calls into user code on its own. Key equality is
//! supplied by the caller as a closure, and every occupied slot keeps the
//! hash computed at insertion so rehashing only moves entries.

use core::mem;
use log::{debug, trace};

/// Capacity of a fresh table and the floor for shrinking.
pub const INITIAL_CAPACITY: usize = 13;
/// Grow once `(len + tombstones) / capacity` reaches this ratio.
pub const GROW_LOAD_FACTOR: f64 = 0.70;
/// Shrink once `len / capacity` falls to this ratio.
pub const SHRINK_LOAD_FACTOR: f64 = 0.20;
/// Multiplier for growth, divisor for shrinking.
pub const RESIZE_FACTOR: usize = 2;

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

#[derive(Debug)]
pub(crate) enum Slot<K, V> {
    Empty,
    Occupied(Entry<K, V>),
    /// Tombstone: keeps probe chains that ran through this slot intact.
    Deleted,
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub(crate) fn entry(&self) -> Option<&Entry<K, V>> {
        match self {
            Slot::Occupied(e) => Some(e),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> Option<&mut Entry<K, V>> {
        match self {
            Slot::Occupied(e) => Some(e),
            Slot::Empty | Slot::Deleted => None,
        }
    }
}

/// Outcome of a probe: the slot holding the key, or the first Empty slot
/// on its chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    Occupied(usize),
    Empty(usize),
}

#[derive(Debug)]
pub(crate) struct Table<K, V> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    tombstones: usize,
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    core::iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// Linear probe from `hash mod capacity`, one full circuit at most.
///
/// Deleted slots are stepped over, never returned. `None` means the
/// circuit saw neither the key nor an Empty slot.
fn probe_slots<K, V, F>(slots: &[Slot<K, V>], hash: u64, mut is_match: F) -> Option<Probe>
where
    F: FnMut(&K) -> bool,
{
    let capacity = slots.len();
    if capacity == 0 {
        return None;
    }
    let start = (hash % capacity as u64) as usize;
    for step in 0..capacity {
        let index = (start + step) % capacity;
        match &slots[index] {
            Slot::Occupied(e) if e.hash == hash && is_match(&e.key) => {
                return Some(Probe::Occupied(index))
            }
            Slot::Empty => return Some(Probe::Empty(index)),
            Slot::Occupied(_) | Slot::Deleted => {}
        }
    }
    None
}

impl<K, V> Table<K, V> {
    pub(crate) fn new() -> Self {
        trace!("allocating table with {} slots", INITIAL_CAPACITY);
        Self {
            slots: empty_slots(INITIAL_CAPACITY),
            len: 0,
            tombstones: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub(crate) fn needs_growth(&self) -> bool {
        (self.len + self.tombstones) as f64 / self.capacity() as f64 >= GROW_LOAD_FACTOR
    }

    // Uses live entries only, unlike growth which also counts tombstones.
    pub(crate) fn needs_shrink(&self) -> bool {
        self.capacity() > INITIAL_CAPACITY
            && self.len as f64 / self.capacity() as f64 <= SHRINK_LOAD_FACTOR
    }

    pub(crate) fn grow(&mut self) {
        self.rehash(self.capacity() * RESIZE_FACTOR);
    }

    pub(crate) fn shrink(&mut self) {
        self.rehash((self.capacity() / RESIZE_FACTOR).max(INITIAL_CAPACITY));
    }

    #[inline]
    pub(crate) fn probe<F>(&self, hash: u64, is_match: F) -> Option<Probe>
    where
        F: FnMut(&K) -> bool,
    {
        probe_slots(&self.slots, hash, is_match)
    }

    /// Index of the occupied slot holding the matching key, if any.
    #[inline]
    pub(crate) fn find<F>(&self, hash: u64, is_match: F) -> Option<usize>
    where
        F: FnMut(&K) -> bool,
    {
        match self.probe(hash, is_match)? {
            Probe::Occupied(index) => Some(index),
            Probe::Empty(_) => None,
        }
    }

    pub(crate) fn entry(&self, index: usize) -> Option<&Entry<K, V>> {
        self.slots.get(index).and_then(Slot::entry)
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(index).and_then(Slot::entry_mut)
    }

    /// Write a new entry into an Empty slot returned by `probe`.
    pub(crate) fn fill(&mut self, index: usize, entry: Entry<K, V>) {
        debug_assert!(matches!(self.slots[index], Slot::Empty));
        self.slots[index] = Slot::Occupied(entry);
        self.len += 1;
    }

    /// Turn an occupied slot into a tombstone and hand back its entry.
    pub(crate) fn take(&mut self, index: usize) -> Option<Entry<K, V>> {
        let slot = self.slots.get_mut(index)?;
        if !matches!(slot, Slot::Occupied(_)) {
            return None;
        }
        match mem::replace(slot, Slot::Deleted) {
            Slot::Occupied(e) => {
                self.len -= 1;
                self.tombstones += 1;
                Some(e)
            }
            Slot::Empty | Slot::Deleted => None,
        }
    }

    /// Rebuild at `new_capacity`, moving live entries in physical order and
    /// dropping every tombstone.
    pub(crate) fn rehash(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity > self.len);
        let old_capacity = self.capacity();
        let reclaimed = self.tombstones;
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        for slot in old {
            if let Slot::Occupied(entry) = slot {
                // Keys are already unique, so only an Empty slot can match.
                match probe_slots(&self.slots, entry.hash, |_| false) {
                    Some(Probe::Empty(index)) => self.slots[index] = Slot::Occupied(entry),
                    _ => unreachable!("rehash target has more slots than live entries"),
                }
            }
        }
        self.tombstones = 0;
        debug!(
            "rehashed table: capacity {} -> {}, {} live entries, {} tombstones reclaimed",
            old_capacity, new_capacity, self.len, reclaimed
        );
    }

    /// First occupied index at or after `from`, or `capacity()` when none.
    pub(crate) fn next_occupied(&self, from: usize) -> usize {
        let capacity = self.capacity();
        (from.min(capacity)..capacity)
            .find(|&i| matches!(self.slots[i], Slot::Occupied(_)))
            .unwrap_or(capacity)
    }
}
