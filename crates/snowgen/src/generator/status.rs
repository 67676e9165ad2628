use crate::id::{Layout, SnowflakeId, TwitterLayout};

/// Outcome of one non-blocking generation attempt.
///
/// - [`IdGenStatus::Ready`]: a new ID was issued and the generator state
///   advanced.
/// - [`IdGenStatus::Pending`]: nothing was issued. Either this millisecond's
///   sequence space is used up, or (for the atomic generator) another thread
///   won the race. Try again after `yield_for` milliseconds; `0` means retry
///   immediately.
///
/// Clock regressions are not a status; they are reported as
/// [`Error::ClockRegression`](crate::Error::ClockRegression).
///
/// # Example
///
/// ```
/// use snowgen::{IdGenStatus, LockSnowflakeGenerator, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let generator = LockSnowflakeGenerator::with_clock(0, 0, FixedTime).unwrap();
/// match generator.poll_id().unwrap() {
///     IdGenStatus::Ready { id } => println!("ID: {}", id.timestamp()),
///     IdGenStatus::Pending { yield_for } => println!("Back off for: {yield_for}ms"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus<L: Layout = TwitterLayout> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId<L>,
    },
    /// No ID could be generated yet.
    Pending {
        /// Milliseconds to wait before polling again.
        yield_for: u64,
    },
}
