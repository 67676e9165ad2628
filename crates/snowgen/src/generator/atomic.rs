use core::cmp;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{IdGenStatus, SnowflakeGenerator},
    id::{Layout, MachineId, SnowflakeId, TwitterLayout},
    time::{SystemClock, TimeSource},
};

/// Raw state before the first ID. Unreachable as a real ID because layouts
/// keep the top bit clear.
const UNSET: u64 = u64::MAX;

/// A lock-free Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID is the whole generator state, so it fits in one
/// [`AtomicU64`]. Each attempt loads it, reads the clock, computes the
/// successor and publishes it with a single compare-and-swap; a lost race
/// returns [`IdGenStatus::Pending`] with `yield_for == 0` and the caller
/// simply tries again.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Fair access across threads
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct AtomicSnowflakeGenerator<T = SystemClock, L = TwitterLayout>
where
    T: TimeSource,
    L: Layout,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    machine: MachineId<L>,
    time: T,
}

impl AtomicSnowflakeGenerator {
    /// Creates a generator on the wall clock, aligned to [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if either ID is outside `0..=31`.
    ///
    /// # Example
    /// ```
    /// use snowgen::AtomicSnowflakeGenerator;
    ///
    /// let generator = AtomicSnowflakeGenerator::new(3, 4).unwrap();
    /// let id = generator.next_id().unwrap();
    /// assert_eq!((id.worker_id(), id.datacenter_id()), (3, 4));
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self> {
        Self::with_clock(worker_id, datacenter_id, SystemClock::default())
    }
}

impl<T> AtomicSnowflakeGenerator<T>
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

impl<T, L> AtomicSnowflakeGenerator<T, L>
where
    T: TimeSource,
    L: Layout,
{
    /// Creates a generator for an already validated identity.
    pub fn from_machine(machine: MachineId<L>, time: T) -> Self {
        Self::from_raw_state(machine, UNSET, time)
    }

    /// Creates a generator that resumes after `last`. See
    /// [`LockSnowflakeGenerator::resume_after`].
    ///
    /// [`LockSnowflakeGenerator::resume_after`]: crate::LockSnowflakeGenerator::resume_after
    pub fn resume_after(machine: MachineId<L>, last: SnowflakeId<L>, time: T) -> Self {
        let last = SnowflakeId::compose(last.timestamp(), machine, last.sequence());
        Self::from_raw_state(machine, last.to_raw(), time)
    }

    fn from_raw_state(machine: MachineId<L>, raw: u64, time: T) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(raw)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(raw),
            machine,
            time,
        }
    }

    pub const fn machine_id(&self) -> MachineId<L> {
        self.machine
    }

    /// Generates the next ID, retrying lost races and waiting out an
    /// exhausted millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock went backwards.
    pub fn next_id(&self) -> Result<SnowflakeId<L>> {
        <Self as SnowflakeGenerator<L>>::next_id(self)
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: a new ID was issued
    /// - `Ok(IdGenStatus::Pending { yield_for: 1 })`: the sequence for this
    ///   millisecond is exhausted
    /// - `Ok(IdGenStatus::Pending { yield_for: 0 })`: another thread won the
    ///   CAS; retry immediately
    ///
    /// # Errors
    /// - [`Error::ClockRegression`] if the clock went backwards.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus<L>> {
        // Load before reading the clock: any timestamp already published was
        // read earlier, so only a real regression can put `now` behind it.
        let current_raw = self.state.load(Ordering::Acquire);
        // Masked like the stored timestamp, so a wrap reads as a regression
        let now = self.time.current_millis() & L::TIMESTAMP_MASK;

        let next_id = if current_raw == UNSET {
            SnowflakeId::compose(now, self.machine, 0)
        } else {
            let current_id = SnowflakeId::<L>::from_raw(current_raw);
            let current_ts = current_id.timestamp();
            match now.cmp(&current_ts) {
                cmp::Ordering::Equal => {
                    if current_id.has_sequence_room() {
                        current_id.increment_sequence()
                    } else {
                        return Ok(IdGenStatus::Pending { yield_for: 1 });
                    }
                }
                cmp::Ordering::Greater => SnowflakeId::compose(now, self.machine, 0),
                cmp::Ordering::Less => return Err(Self::cold_clock_behind(now, current_ts)),
            }
        };

        if self
            .state
            .compare_exchange(
                current_raw,
                next_id.to_raw(),
                Ordering::AcqRel,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            Ok(IdGenStatus::Ready { id: next_id })
        } else {
            Ok(IdGenStatus::Pending { yield_for: 0 })
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, "clock moved backwards, refusing to issue id");
        Error::ClockRegression { now, last }
    }
}

impl<T, L> SnowflakeGenerator<L> for AtomicSnowflakeGenerator<T, L>
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
