//! closed-hashmap: a single-threaded key→value map using closed hashing
//! (open addressing with linear probing) over one contiguous slot array.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the probing, tombstone and resize rules in one small
//!   layer that can be reasoned about without the public API around it.
//! - Layers:
//!   - Table<K, V>: the slot array (`Empty` / `Occupied` / `Deleted`),
//!     live and tombstone counts, linear probing, rehashing. Never calls
//!     user code except the equality closure handed to `probe`.
//!   - ClosedHashMap<K, V, S>: public API. Hashes keys with `S`, applies
//!     the growth/shrink policy, and guards each operation with a
//!     debug-only reentrancy check.
//!   - Cursor / Iter: read-only traversal in slot order.
//!
//! Probing
//! - Start at `hash mod capacity`, walk forward one slot at a time and
//!   wrap at the end, for at most one full circuit.
//! - A matching occupied slot is a hit; the first Empty slot ends the
//!   probe and is where a new key goes. Deleted slots are stepped over,
//!   never reused, since another key's chain may run through them.
//!
//! Resize policy
//! - Grow ×2 before an insert when `(len + tombstones) / capacity >= 0.70`.
//! - Shrink ÷2 before a remove when `len / capacity <= 0.20` and capacity
//!   is above [`INITIAL_CAPACITY`]; never below it.
//! - The growth rule counts tombstones and the shrink rule does not.
//! - Growth keeps at least one Empty slot in the table, which is what
//!   bounds every probe.
//! - Rehash moves live entries in slot order into a fresh array and
//!   drops all tombstones.
//!
//! Hashing
//! - Keys need `Eq + Hash`; equal keys must produce equal hashes.
//! - Each occupied slot stores the hash computed at insertion, so rehash
//!   never calls `K: Hash` and probing compares hashes before keys.
//! - The default [`Xxh3DefaultBuilder`] (from `xxhash-rust`) is unseeded
//!   and deterministic.
//!
//! Errors
//! - [`MapError::KeyNotFound`] from `get`/`get_mut`/`remove` on absent keys.
//! - [`MapError::IteratorExhausted`] from `Cursor::current`/`advance`
//!   past the end.
//!
//! Notes and non-goals
//! - Single-threaded: the map is `!Send`/`!Sync`.
//! - Cursors and iterators borrow the map, so mutation while traversing
//!   is rejected at compile time.
//! - No ordering beyond physical slot order; no persistence.

mod closed_hash_map;
mod closed_hash_map_proptest;
mod cursor;
mod error;
mod reentrancy;
mod table;
mod test_logger;

// Public surface
pub use closed_hash_map::ClosedHashMap;
pub use cursor::{Cursor, Iter};
pub use error::MapError;
pub use table::{GROW_LOAD_FACTOR, INITIAL_CAPACITY, RESIZE_FACTOR, SHRINK_LOAD_FACTOR};
pub use xxhash_rust::xxh3::{Xxh3Builder, Xxh3DefaultBuilder};
