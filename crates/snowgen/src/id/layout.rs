use core::{fmt, hash::Hash};

/// Bit allocation of a Snowflake ID.
///
/// Fields are packed most-significant-first: timestamp, datacenter ID, worker
/// ID, sequence. Every shift, mask and maximum is derived from the four
/// widths, so a deployment that needs a different split (e.g. more workers,
/// fewer datacenters) only defines a new layout type.
///
/// The widths must sum to at most 63 bits. The top bit stays clear so the ID
/// is positive when stored as a signed 64-bit integer, and so the generators
/// can use `u64::MAX` as their "nothing issued yet" marker.
///
/// # Example
///
/// ```
/// use snowgen::Layout;
///
/// #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// struct WideWorkers;
///
/// impl Layout for WideWorkers {
///     const TIMESTAMP_BITS: u32 = 41;
///     const DATACENTER_ID_BITS: u32 = 2;
///     const WORKER_ID_BITS: u32 = 8;
///     const SEQUENCE_BITS: u32 = 12;
/// }
///
/// assert_eq!(WideWorkers::MAX_WORKER_ID, 255);
/// assert_eq!(WideWorkers::TIMESTAMP_SHIFT, 22);
/// ```
///
/// A layout that fills all 64 bits is rejected when a [`MachineId`] is built
/// for it:
///
/// ```compile_fail
/// use snowgen::{Layout, MachineId};
///
/// #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// struct TooWide;
///
/// impl Layout for TooWide {
///     const TIMESTAMP_BITS: u32 = 42;
///     const DATACENTER_ID_BITS: u32 = 5;
///     const WORKER_ID_BITS: u32 = 5;
///     const SEQUENCE_BITS: u32 = 12;
/// }
///
/// let _ = MachineId::<TooWide>::new(0, 0);
/// ```
///
/// [`MachineId`]: crate::MachineId
pub trait Layout:
    Copy + Clone + Default + fmt::Debug + PartialEq + Eq + PartialOrd + Ord + Hash + Send + Sync + 'static
{
    /// Width of the timestamp field (milliseconds since the epoch).
    const TIMESTAMP_BITS: u32;
    /// Width of the datacenter ID field.
    const DATACENTER_ID_BITS: u32;
    /// Width of the worker ID field.
    const WORKER_ID_BITS: u32;
    /// Width of the intra-millisecond sequence field.
    const SEQUENCE_BITS: u32;

    const SEQUENCE_SHIFT: u32 = 0;
    const WORKER_ID_SHIFT: u32 = Self::SEQUENCE_BITS;
    const DATACENTER_ID_SHIFT: u32 = Self::SEQUENCE_BITS + Self::WORKER_ID_BITS;
    const TIMESTAMP_SHIFT: u32 =
        Self::SEQUENCE_BITS + Self::WORKER_ID_BITS + Self::DATACENTER_ID_BITS;

    const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    const DATACENTER_ID_MASK: u64 = (1 << Self::DATACENTER_ID_BITS) - 1;
    const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;
    const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;
    const MAX_DATACENTER_ID: u64 = Self::DATACENTER_ID_MASK;
    const MAX_WORKER_ID: u64 = Self::WORKER_ID_MASK;
    const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Total number of bits in use. Must not exceed 63.
    const TOTAL_BITS: u32 = Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS;
}

/// The classic Twitter split
///
/// ```text
///  Bit Index:  63       63 62        22 21         17 16      12 11        0
///              +----------+------------+-------------+----------+-----------+
///  Field:      | reserved | timestamp  | datacenter  | worker   | sequence  |
///              |   (1)    |    (41)    |     (5)     |   (5)    |   (12)    |
///              +----------+------------+-------------+----------+-----------+
///              |<-------------- MSB ------- 64 bits ------- LSB ----------->|
/// ```
///
/// 41 bits of milliseconds cover roughly 69 years from the epoch. Overflow is
/// not checked at runtime; the field is masked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TwitterLayout;

impl Layout for TwitterLayout {
    const TIMESTAMP_BITS: u32 = 41;
    const DATACENTER_ID_BITS: u32 = 5;
    const WORKER_ID_BITS: u32 = 5;
    const SEQUENCE_BITS: u32 = 12;
}
