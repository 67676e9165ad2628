use core::marker::PhantomData;

use crate::{
    error::{Error, Result},
    id::{Layout, TwitterLayout},
};

/// The static `(datacenter, worker)` identity of a generator.
///
/// A `MachineId` only exists if both values fit their fields, so a generator
/// holding one can never emit IDs with a truncated identity. Keeping the pair
/// distinct across live generators is the deployment's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MachineId<L: Layout = TwitterLayout> {
    worker_id: u64,
    datacenter_id: u64,
    _layout: PhantomData<L>,
}

impl<L: Layout> MachineId<L> {
    /// Validates and builds an identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the first field outside
    /// `0..=max`. The worker ID is checked first.
    ///
    /// # Example
    ///
    /// ```
    /// use snowgen::{Error, MachineId};
    ///
    /// let machine: MachineId = MachineId::new(0, 31).unwrap();
    /// assert_eq!(machine.datacenter_id(), 31);
    ///
    /// let err = MachineId::<snowgen::TwitterLayout>::new(32, 0).unwrap_err();
    /// assert!(matches!(err, Error::Configuration { field: "worker_id", value: 32, max: 31 }));
    /// ```
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self> {
        const { assert!(L::TOTAL_BITS < 64, "layout must leave the top bit clear") };
        let worker_id = check_range("worker_id", worker_id, L::MAX_WORKER_ID)?;
        let datacenter_id = check_range("datacenter_id", datacenter_id, L::MAX_DATACENTER_ID)?;
        Ok(Self {
            worker_id,
            datacenter_id,
            _layout: PhantomData,
        })
    }

    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    pub const fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }
}

fn check_range(field: &'static str, value: i64, max: u64) -> Result<u64> {
    match u64::try_from(value) {
        Ok(v) if v <= max => Ok(v),
        _ => Err(Error::Configuration { field, value, max }),
    }
}
