use core::{fmt, marker::PhantomData, time::Duration};

use crate::id::{Layout, MachineId, TwitterLayout};

/// A packed 64-bit Snowflake ID.
///
/// The raw value orders the same way as the `(timestamp, datacenter, worker,
/// sequence)` tuple, so IDs from one generator compare in issue order and IDs
/// from different generators compare roughly by creation time.
///
/// The layout parameter only fixes how the bits are read; it is a zero-sized
/// marker and does not change the in-memory size.
///
/// # Example
///
/// ```
/// use snowgen::SnowflakeId;
///
/// let id: SnowflakeId = SnowflakeId::from_components(1_000, 3, 7, 42);
/// assert_eq!(id.timestamp(), 1_000);
/// assert_eq!(id.datacenter_id(), 3);
/// assert_eq!(id.worker_id(), 7);
/// assert_eq!(id.sequence(), 42);
/// assert_eq!(id.to_raw(), (1_000 << 22) | (3 << 17) | (7 << 12) | 42);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent, bound = "")
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId<L: Layout = TwitterLayout> {
    id: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    _layout: PhantomData<L>,
}

/// The four fields of a [`SnowflakeId`], decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SnowflakeComponents {
    /// Milliseconds since the epoch the generator was configured with.
    pub timestamp: u64,
    pub datacenter_id: u64,
    pub worker_id: u64,
    pub sequence: u64,
}

impl<L: Layout> SnowflakeId<L> {
    /// Packs the given fields. Each value is masked to its field width.
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & L::TIMESTAMP_MASK) << L::TIMESTAMP_SHIFT;
        let datacenter_id = (datacenter_id & L::DATACENTER_ID_MASK) << L::DATACENTER_ID_SHIFT;
        let worker_id = (worker_id & L::WORKER_ID_MASK) << L::WORKER_ID_SHIFT;
        let sequence = (sequence & L::SEQUENCE_MASK) << L::SEQUENCE_SHIFT;
        Self::from_raw(timestamp | datacenter_id | worker_id | sequence)
    }

    pub(crate) const fn compose(timestamp: u64, machine: MachineId<L>, sequence: u64) -> Self {
        debug_assert!(sequence <= L::MAX_SEQUENCE, "sequence overflow");
        Self::from_components(
            timestamp,
            machine.datacenter_id(),
            machine.worker_id(),
            sequence,
        )
    }

    /// Wraps a raw value, e.g. one read back from storage.
    pub const fn from_raw(id: u64) -> Self {
        Self {
            id,
            _layout: PhantomData,
        }
    }

    /// Returns the packed value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Milliseconds since the epoch.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> L::TIMESTAMP_SHIFT) & L::TIMESTAMP_MASK
    }

    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> L::DATACENTER_ID_SHIFT) & L::DATACENTER_ID_MASK
    }

    pub const fn worker_id(&self) -> u64 {
        (self.id >> L::WORKER_ID_SHIFT) & L::WORKER_ID_MASK
    }

    pub const fn sequence(&self) -> u64 {
        (self.id >> L::SEQUENCE_SHIFT) & L::SEQUENCE_MASK
    }

    /// Returns true if another ID fits in the same millisecond.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < L::MAX_SEQUENCE
    }

    /// Same timestamp and machine, sequence + 1.
    pub(crate) const fn increment_sequence(&self) -> Self {
        Self::from_raw(self.id + (1 << L::SEQUENCE_SHIFT))
    }

    /// Decodes every field at once.
    pub const fn components(&self) -> SnowflakeComponents {
        SnowflakeComponents {
            timestamp: self.timestamp(),
            datacenter_id: self.datacenter_id(),
            worker_id: self.worker_id(),
            sequence: self.sequence(),
        }
    }

    /// Converts the timestamp field back to milliseconds since the Unix epoch,
    /// given the epoch the generator was configured with.
    ///
    /// Returns `None` if the result does not fit in a `u64`.
    ///
    /// ```
    /// use core::time::Duration;
    /// use snowgen::{DEFAULT_EPOCH, SnowflakeId};
    ///
    /// let id: SnowflakeId = SnowflakeId::from_components(250, 0, 0, 0);
    /// assert_eq!(id.unix_millis(DEFAULT_EPOCH), Some(1_609_459_200_250));
    /// assert_eq!(id.unix_millis(Duration::from_millis(u64::MAX)), None);
    /// ```
    pub const fn unix_millis(&self, epoch: Duration) -> Option<u64> {
        let epoch_millis = epoch.as_millis();
        if epoch_millis > u64::MAX as u128 {
            return None;
        }
        (epoch_millis as u64).checked_add(self.timestamp())
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    /// Renders the bit layout as a table.
    ///
    /// ```
    /// use snowgen::SnowflakeId;
    ///
    /// let id: SnowflakeId = SnowflakeId::from_components(1, 2, 3, 4);
    /// let table = id.layout_table().to_string();
    /// assert!(table.contains("datacenter (5)"));
    /// ```
    pub const fn layout_table(&self) -> LayoutTable<L> {
        LayoutTable { id: *self }
    }

    fn fields(&self) -> [(&'static str, u32, u64); 5] {
        [
            ("reserved", 64 - L::TOTAL_BITS, self.id >> L::TOTAL_BITS),
            ("timestamp", L::TIMESTAMP_BITS, self.timestamp()),
            ("datacenter", L::DATACENTER_ID_BITS, self.datacenter_id()),
            ("worker", L::WORKER_ID_BITS, self.worker_id()),
            ("sequence", L::SEQUENCE_BITS, self.sequence()),
        ]
    }
}

impl<L: Layout> From<SnowflakeId<L>> for u64 {
    fn from(id: SnowflakeId<L>) -> Self {
        id.to_raw()
    }
}

impl<L: Layout> From<u64> for SnowflakeId<L> {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl<L: Layout> fmt::Display for SnowflakeId<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<L: Layout> fmt::Debug for SnowflakeId<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

/// Display adapter returned by [`SnowflakeId::layout_table`].
pub struct LayoutTable<L: Layout> {
    id: SnowflakeId<L>,
}

impl<L: Layout> fmt::Display for LayoutTable<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn center(s: impl ToString, width: usize) -> String {
            let s = s.to_string();
            let len = s.len();
            if len >= width {
                return s;
            }
            let pad = width - len;
            let left = pad / 2;
            let right = pad - left;
            format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
        }

        let fields: Vec<_> = self
            .id
            .fields()
            .into_iter()
            .filter(|(_, bits, _)| *bits > 0)
            .collect();

        // Widest of label, decimal and hex, plus one space either side
        let columns: Vec<usize> = fields
            .iter()
            .map(|(name, bits, value)| {
                let label = format!("{name} ({bits})").len();
                let dec = value.to_string().len();
                let hex = format!("0x{value:x}").len();
                label.max(dec).max(hex) + 2
            })
            .collect();

        let border = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            write!(f, "+")?;
            for &w in &columns {
                write!(f, "{}+", "-".repeat(w))?;
            }
            writeln!(f)
        };

        writeln!(f, "id {} (0x{:016x})", self.id.id, self.id.id)?;
        border(f)?;
        write!(f, "|")?;
        for ((name, bits, _), &w) in fields.iter().zip(&columns) {
            write!(f, "{}|", center(format!("{name} ({bits})"), w))?;
        }
        writeln!(f)?;
        border(f)?;
        write!(f, "|")?;
        for ((_, _, value), &w) in fields.iter().zip(&columns) {
            write!(f, "{}|", center(value, w))?;
        }
        writeln!(f)?;
        write!(f, "|")?;
        for ((_, _, value), &w) in fields.iter().zip(&columns) {
            write!(f, "{}|", center(format!("0x{value:x}"), w))?;
        }
        writeln!(f)?;
        border(f)
    }
}
