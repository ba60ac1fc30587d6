use thiserror::Error;

/// Failures reported by lookups, removals and cursors.
///
/// Both variants describe a caller that skipped the matching check
/// (`contains_key` before `get`/`remove`, `has_next` before
/// `current`/`advance`).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapError {
    #[error("key does not belong to the map")]
    KeyNotFound,
    #[error("cursor has finished iterating")]
    IteratorExhausted,
}
