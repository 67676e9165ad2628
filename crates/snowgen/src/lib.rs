//! Coordination-free, time-ordered 64-bit Snowflake IDs.
//!
//! Every generator owns a fixed `(datacenter, worker)` identity and issues IDs
//! laid out as
//!
//! ```text
//! | reserved (1) | timestamp (41) | datacenter (5) | worker (5) | sequence (12) |
//! ```
//!
//! IDs from one generator strictly increase. IDs from generators with distinct
//! identities never collide. A clock that moves backwards is reported as
//! [`Error::ClockRegression`] rather than papered over.
//!
//! ```
//! use snowgen::{AtomicSnowflakeGenerator, LockSnowflakeGenerator};
//!
//! let lock = LockSnowflakeGenerator::new(1, 1)?;
//! let atomic = AtomicSnowflakeGenerator::new(2, 1)?;
//!
//! let a = lock.next_id()?;
//! let b = atomic.next_id()?;
//! assert_ne!(a, b);
//! assert_eq!(a.worker_id(), 1);
//! # Ok::<(), snowgen::Error>(())
//! ```

mod error;
mod generator;
mod id;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
