//! Microsecond clock used by the profiler

/// Free-running microsecond counter
///
/// Only differences between two readings are used, so the counter may wrap
/// at `u32::MAX`. Implementations must be cheap; the sweep reads the clock
/// twice per serviced task.
pub trait Clock {
    /// Current time in microseconds
    fn now_us(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}
