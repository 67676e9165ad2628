use std::sync::Arc;

/// A source of "now" in milliseconds since a generator's epoch.
///
/// This abstraction lets you plug in the wall clock, or a scripted clock in
/// tests. Generators never assume the value is monotonic: a reading earlier
/// than the last issued timestamp is reported as a clock regression.
///
/// # Example
///
/// ```
/// use snowgen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
