//! Errors surfaced by ID generation.
//!
//! ## Error Cases
//! - `Configuration`: a worker or datacenter ID does not fit its field.
//! - `ClockRegression`: the clock reads earlier than the last issued
//!   timestamp. Nothing is mutated and the generator stays usable.
//! - `LockPoisoned`: a thread panicked inside the lock generator's critical
//!   section. Only exists with the std mutex (`parking-lot` disabled).
//!
//! Running out of sequence numbers inside one millisecond is not an error; the
//! generators wait for the next millisecond instead.

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `snowgen` can produce.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A machine identity component is outside `0..=max`.
    #[error("{field} must be between 0 and {max}, got {value}")]
    Configuration {
        field: &'static str,
        value: i64,
        max: u64,
    },

    /// The clock moved backwards relative to the last issued ID.
    ///
    /// Both values are milliseconds since the generator's epoch. Issuing an ID
    /// here could repeat or reorder earlier IDs, so the call is refused and
    /// the caller decides whether to wait, retry or give up.
    #[error("clock moved backwards: now {now}ms, last issued at {last}ms")]
    ClockRegression { now: u64, last: u64 },

    /// The generator's mutex was poisoned by a panicking thread.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// How far the clock is behind, for clock regressions.
    pub const fn regression_millis(&self) -> Option<u64> {
        match self {
            Self::ClockRegression { now, last } => Some(*last - *now),
            _ => None,
        }
    }
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
