//! Traversal in slot order: an explicit `Cursor` and a std `Iter`.
//!
//! Both borrow the map immutably, so the table cannot be mutated or
//! rehashed while either is alive.

use crate::error::MapError;
use crate::table::{Slot, Table};
use core::iter::FusedIterator;

/// Cursor over occupied slots.
///
/// The position is always an occupied slot index or `capacity` once
/// exhausted; exhaustion is terminal.
pub struct Cursor<'a, K, V> {
    table: &'a Table<K, V>,
    index: usize,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(table: &'a Table<K, V>) -> Self {
        Self {
            table,
            index: table.next_occupied(0),
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.table.capacity()
    }

    pub fn current(&self) -> Result<(&'a K, &'a V), MapError> {
        self.table
            .entry(self.index)
            .map(|e| (&e.key, &e.value))
            .ok_or(MapError::IteratorExhausted)
    }

    pub fn advance(&mut self) -> Result<(), MapError> {
        if !self.has_next() {
            return Err(MapError::IteratorExhausted);
        }
        self.index = self.table.next_occupied(self.index + 1);
        Ok(())
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            index: self.index,
        }
    }
}

/// Iterator over `(&K, &V)` in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(table: &'a Table<K, V>) -> Self {
        Self {
            slots: table.slots().iter(),
            remaining: table.len(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let e = self.slots.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use crate::{ClosedHashMap, MapError};
    use std::collections::BTreeSet;

    /// Invariant: a cursor on an empty map starts exhausted and both
    /// `current` and `advance` report it.
    #[test]
    fn empty_map_cursor_is_exhausted() {
        let m: ClosedHashMap<u32, u32> = ClosedHashMap::new();
        let mut c = m.cursor();
        assert!(!c.has_next());
        assert_eq!(c.current(), Err(MapError::IteratorExhausted));
        assert_eq!(c.advance(), Err(MapError::IteratorExhausted));
    }

    /// Invariant: walking the cursor to exhaustion yields each live key once,
    /// the same set `for_each` sees, and exhaustion stays terminal.
    #[test]
    fn cursor_visits_live_entries_once() {
        let mut m = ClosedHashMap::new();
        for i in 0..40u32 {
            m.insert(i, i + 1);
        }
        for i in (0..40u32).filter(|i| i % 4 == 0) {
            m.remove(&i).unwrap();
        }

        let mut c = m.cursor();
        let mut seen = Vec::new();
        while c.has_next() {
            let (k, v) = c.current().unwrap();
            assert_eq!(*v, k + 1);
            seen.push(*k);
            c.advance().unwrap();
        }
        assert_eq!(c.advance(), Err(MapError::IteratorExhausted));
        assert!(!c.has_next());

        let unique: BTreeSet<u32> = seen.iter().copied().collect();
        assert_eq!(unique.len(), seen.len(), "no key visited twice");

        let mut visited = BTreeSet::new();
        m.for_each(|k, _| {
            visited.insert(*k);
            true
        });
        assert_eq!(unique, visited);
        assert_eq!(unique.len(), m.len());
    }

    /// Invariant: cursor and `iter` walk entries in the same slot order.
    #[test]
    fn cursor_and_iter_agree_on_order() {
        let m: ClosedHashMap<String, usize> =
            (0..15).map(|i| (format!("key-{i}"), i)).collect();
        let from_iter: Vec<_> = m.iter().map(|(k, _)| k.clone()).collect();

        let mut c = m.cursor();
        let mut from_cursor = Vec::new();
        while c.has_next() {
            from_cursor.push(c.current().unwrap().0.clone());
            c.advance().unwrap();
        }
        assert_eq!(from_iter, from_cursor);
    }

    #[test]
    fn cloned_cursor_advances_independently() {
        let m: ClosedHashMap<u8, u8> = [(1, 1), (2, 2)].into_iter().collect();
        let mut a = m.cursor();
        let b = a.clone();
        a.advance().unwrap();
        assert_ne!(a.current().unwrap(), b.current().unwrap());
    }

    #[test]
    fn iter_reports_exact_len() {
        let mut m = ClosedHashMap::new();
        for i in 0..12u16 {
            m.insert(i, ());
        }
        m.remove(&3).unwrap();
        let mut it = m.iter();
        assert_eq!(it.len(), 11);
        it.next();
        assert_eq!(it.len(), 10);
        assert_eq!(it.count(), 10);
        assert_eq!((&m).into_iter().count(), 11);
    }
}
