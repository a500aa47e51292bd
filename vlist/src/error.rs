use thiserror::Error;

/// Errors surfaced by the engine's fallible entry points.
///
/// Out-of-range indices are programming errors on the caller's side (a stale
/// index held across a data swap, an off-by-one against `count`), so they
/// are reported rather than silently clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// An index outside `[0, count)` was passed to an operation that needs
    /// an existing item.
    #[error("index {index} out of range for a list of {count} items")]
    IndexOutOfRange { index: usize, count: usize },
}
