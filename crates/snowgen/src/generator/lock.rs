use core::cmp::Ordering;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{IdGenStatus, Mutex, SnowflakeGenerator},
    id::{Layout, MachineId, SnowflakeId, TwitterLayout},
    time::{SystemClock, TimeSource},
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID is kept in an [`Arc<Mutex<_>>`]. The clock read and the
/// state update both happen while the lock is held, so concurrent callers are
/// fully serialized. Cloning the generator shares that state: clones never
/// issue the same ID.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support 64-bit atomics
///
/// ## See Also
/// - [`AtomicSnowflakeGenerator`]
///
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct LockSnowflakeGenerator<T = SystemClock, L = TwitterLayout>
where
    T: TimeSource,
    L: Layout,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<Option<SnowflakeId<L>>>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<Option<SnowflakeId<L>>>>,
    machine: MachineId<L>,
    time: T,
}

impl LockSnowflakeGenerator {
    /// Creates a generator on the wall clock, aligned to [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if either ID is outside `0..=31`.
    ///
    /// # Example
    /// ```
    /// use snowgen::LockSnowflakeGenerator;
    ///
    /// let generator = LockSnowflakeGenerator::new(1, 1).unwrap();
    /// let a = generator.next_id().unwrap();
    /// let b = generator.next_id().unwrap();
    /// assert!(b > a);
    /// assert_eq!((a.worker_id(), a.datacenter_id()), (1, 1));
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self> {
        Self::with_clock(worker_id, datacenter_id, SystemClock::default())
    }
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator reading time from `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if either ID is outside `0..=31`.
    pub fn with_clock(worker_id: i64, datacenter_id: i64, time: T) -> Result<Self> {
        Ok(Self::from_machine(
            MachineId::new(worker_id, datacenter_id)?,
            time,
        ))
    }
}

impl<T, L> LockSnowflakeGenerator<T, L>
where
    T: TimeSource,
    L: Layout,
{
    /// Creates a generator for an already validated identity. Nothing has
    /// been issued yet, so the first call always starts a new millisecond.
    pub fn from_machine(machine: MachineId<L>, time: T) -> Self {
        Self::from_state(machine, None, time)
    }

    /// Creates a generator that resumes after `last`.
    ///
    /// The next ID issued in `last`'s millisecond gets the following sequence
    /// number; an earlier clock reading is a regression. Only the timestamp
    /// and sequence of `last` are used.
    pub fn resume_after(machine: MachineId<L>, last: SnowflakeId<L>, time: T) -> Self {
        let last = SnowflakeId::compose(last.timestamp(), machine, last.sequence());
        Self::from_state(machine, Some(last), time)
    }

    fn from_state(machine: MachineId<L>, last: Option<SnowflakeId<L>>, time: T) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(last))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(last)),
            machine,
            time,
        }
    }

    pub const fn machine_id(&self) -> MachineId<L> {
        self.machine
    }

    /// Generates the next ID, waiting out an exhausted millisecond.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock went backwards.
    /// - `Error::LockPoisoned` if the std mutex is poisoned.
    pub fn next_id(&self) -> Result<SnowflakeId<L>> {
        <Self as SnowflakeGenerator<L>>::next_id(self)
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: a new ID was issued
    /// - `Ok(IdGenStatus::Pending { yield_for })`: the sequence for this
    ///   millisecond is exhausted; retry after `yield_for` milliseconds
    /// - `Err(e)`: the clock went backwards, or the lock was poisoned
    ///
    /// # Errors
    /// - [`Error::ClockRegression`] with the observed and last timestamps.
    /// - `Error::LockPoisoned` if the std mutex is poisoned.
    ///
    /// # Example
    /// ```
    /// use snowgen::{IdGenStatus, LockSnowflakeGenerator};
    ///
    /// let generator = LockSnowflakeGenerator::new(0, 0).unwrap();
    ///
    /// let id = loop {
    ///     match generator.poll_id() {
    ///         Ok(IdGenStatus::Ready { id }) => break id,
    ///         Ok(IdGenStatus::Pending { yield_for }) => {
    ///             std::thread::sleep(core::time::Duration::from_millis(yield_for));
    ///         }
    ///         Err(e) => panic!("Generator error: {}", e),
    ///     }
    /// };
    /// assert_eq!(id.sequence(), 0);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus<L>> {
        let mut last = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        // Compare in field width: a clock past the timestamp field wraps to a
        // value behind the last ID and is reported as a regression.
        let now = self.time.current_millis() & L::TIMESTAMP_MASK;

        let next = match *last {
            None => SnowflakeId::compose(now, self.machine, 0),
            Some(prev) => {
                let last_ts = prev.timestamp();
                match now.cmp(&last_ts) {
                    Ordering::Equal => {
                        if prev.has_sequence_room() {
                            prev.increment_sequence()
                        } else {
                            return Ok(IdGenStatus::Pending { yield_for: 1 });
                        }
                    }
                    Ordering::Greater => SnowflakeId::compose(now, self.machine, 0),
                    Ordering::Less => return Err(Self::cold_clock_behind(now, last_ts)),
                }
            }
        };

        *last = Some(next);
        Ok(IdGenStatus::Ready { id: next })
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, "clock moved backwards, refusing to issue id");
        Error::ClockRegression { now, last }
    }
}

impl<T, L> Clone for LockSnowflakeGenerator<T, L>
where
    T: TimeSource + Clone,
    L: Layout,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            machine: self.machine,
            time: self.time.clone(),
        }
    }
}

impl<T, L> SnowflakeGenerator<L> for LockSnowflakeGenerator<T, L>
where
    T: TimeSource,
    L: Layout,
{
    fn machine_id(&self) -> MachineId<L> {
        self.machine
    }

    fn poll_id(&self) -> Result<IdGenStatus<L>> {
        self.poll_id()
    }
}
