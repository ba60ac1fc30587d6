//! Debug-only reentrancy detection for the map's probing sections.
//!
//! While a `ClosedHashMap` operation is probing or rehashing, the only
//! user code that runs is the key's `Hash` and `Eq`. A key whose `eq`
//! reaches back into the same map would observe a half-updated table, so
//! in debug builds the map marks itself busy for the span of each
//! operation and a nested entry panics. Release builds skip the check.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct ReentryGuard {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // The map is single-threaded: keep it !Send + !Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl ReentryGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _single_thread: PhantomData,
        }
    }

    /// Mark the map busy until the returned token is dropped.
    #[inline]
    pub(crate) fn enter(&self) -> Entered<'_> {
        #[cfg(debug_assertions)]
        assert!(
            !self.busy.replace(true),
            "reentrancy detected: ClosedHashMap accessed from its own key's Hash/Eq"
        );
        Entered { guard: self }
    }
}

impl Default for ReentryGuard {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Entered<'a> {
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    guard: &'a ReentryGuard,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.guard.busy.set(false);
    }
}
