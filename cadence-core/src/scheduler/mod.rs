//! Tick scheduler
//!
//! The registry of task records, the two-pass sweep that turns drained
//! ticks into callback invocations, and the lifecycle API addressed by PID.

pub mod context;
pub mod executor;
pub mod lifecycle;
pub mod registry;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;

pub use context::TaskContext;
pub use executor::Scheduler;
pub use registry::MAX_TASKS;

use crate::task::{Pid, ProfilingRecord, Recurrence, TaskState};

/// Reasons a task cannot be created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Period must be at least two ticks
    InvalidPeriod,
    /// All [`MAX_TASKS`] slots are in use
    RegistryFull,
}

/// Aggregate sweep counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepStats {
    /// Sweeps that consumed ticks or a forced fire
    pub total_sweeps: u32,
    /// Sweeps that serviced at least one task
    pub productive_sweeps: u32,
    /// Firings whose due point was missed by more than a period
    pub lagged_schedules: u32,
    /// Skipped sweeps in the current stall episode
    pub skipped_sweeps: u32,
    /// Skipped sweeps since boot
    pub total_skipped_sweeps: u32,
    /// Ticks drained by sweeps since boot
    pub ticks_consumed: u64,
    /// Time spent in execution passes, in microseconds
    pub busy_us: u64,
    /// Event raises a sink did not handle
    pub unhandled_events: u32,
}

impl SweepStats {
    /// Share of elapsed time spent running callbacks, in percent
    ///
    /// `tick_us` is the length of one tick. Returns 0 before any tick has
    /// been consumed.
    pub fn duty_cycle_percent(&self, tick_us: u32) -> u32 {
        let window_us = self.ticks_consumed.saturating_mul(u64::from(tick_us));
        if window_us == 0 {
            return 0;
        }
        (self.busy_us.saturating_mul(100) / window_us).min(100) as u32
    }
}

/// Copyable snapshot of one task record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskView {
    /// Identifier
    pub pid: Pid,
    /// Ticks between firings
    pub period: u32,
    /// Ticks until the next firing
    pub time_to_wait: u32,
    /// Remaining-firings policy
    pub recurrence: Recurrence,
    /// Counting down
    pub enabled: bool,
    /// Runs on the next execution pass
    pub fire_pending: bool,
    /// Deleted rather than disabled when exhausted
    pub autoclear: bool,
    /// Lifecycle state
    pub state: TaskState,
    /// Profiling statistics, if any
    pub profiling: Option<ProfilingRecord>,
}
