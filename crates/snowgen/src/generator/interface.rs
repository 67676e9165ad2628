use crate::{
    error::Result,
    generator::IdGenStatus,
    id::{Layout, MachineId, SnowflakeId, TwitterLayout},
};

/// The interface shared by every Snowflake generator.
///
/// Implementations must make [`poll_id`](Self::poll_id) atomic with respect
/// to concurrent callers: the clock read and the update of the last issued
/// timestamp and sequence happen as one step, so no two calls can observe the
/// same `(timestamp, sequence)` pair.
pub trait SnowflakeGenerator<L: Layout = TwitterLayout> {
    /// The identity stamped into every ID.
    fn machine_id(&self) -> MachineId<L>;

    /// Attempts to generate the next ID without waiting.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock is behind the last issued
    ///   timestamp. State is left untouched.
    /// - [`Error::LockPoisoned`] for a poisoned std mutex.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::LockPoisoned`]: crate::Error
    fn poll_id(&self) -> Result<IdGenStatus<L>>;

    /// Generates the next ID, spinning while the current millisecond's
    /// sequence space is exhausted.
    ///
    /// The wait is bounded by the clock: it ends as soon as the next
    /// millisecond is observed. There is no timeout.
    ///
    /// # Errors
    ///
    /// Same as [`poll_id`](Self::poll_id). A regression observed while
    /// waiting also ends the wait with an error.
    fn next_id(&self) -> Result<SnowflakeId<L>> {
        loop {
            match self.poll_id()? {
                IdGenStatus::Ready { id } => break Ok(id),
                IdGenStatus::Pending { .. } => core::hint::spin_loop(),
            }
        }
    }
}
