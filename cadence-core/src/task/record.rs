//! Task record and its identifiers

use core::fmt;
use core::num::NonZeroU32;

use super::profile::ProfilingRecord;
use crate::event::EventBus;
use crate::scheduler::TaskContext;

/// Process-style identifier of a registered schedule
///
/// Never zero. Assigned monotonically by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(NonZeroU32);

impl Pid {
    /// Wrap a raw PID, rejecting zero
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Raw PID value
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Pid {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.get())
    }
}

/// Remaining-firings policy of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Recurrence {
    /// Fires until disabled or removed
    Forever,
    /// Fires once more, then `n` more times after that
    Finite(u32),
}

impl Recurrence {
    /// A task that fires exactly once
    pub const ONCE: Self = Recurrence::Finite(0);

    /// Decode the `-1 / 0 / N` encoding (any negative value means forever)
    pub const fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            Recurrence::Forever
        } else {
            Recurrence::Finite(raw as u32)
        }
    }

    /// Encode as `-1 / 0 / N`, saturating at `i32::MAX`
    pub const fn as_raw(self) -> i32 {
        match self {
            Recurrence::Forever => -1,
            Recurrence::Finite(n) if n > i32::MAX as u32 => i32::MAX,
            Recurrence::Finite(n) => n as i32,
        }
    }

    /// Check if firings remain after the next one
    pub const fn has_more(self) -> bool {
        !matches!(self, Recurrence::Finite(0))
    }
}

impl From<i32> for Recurrence {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

/// Raw callback body
///
/// The context gives the callback the lifecycle API, including on its own
/// PID, without access to the sweep itself.
pub type TaskFn<C, B> = fn(&mut TaskContext<'_, C, B>);

/// What a task does when it fires
pub enum Callback<C, B: EventBus> {
    /// Call a function
    Raw(TaskFn<C, B>),
    /// Raise a pre-built event into a sink
    Event {
        /// Receiving sink
        sink: B::Sink,
        /// Event delivered on every firing
        event: B::Event,
    },
}

impl<C, B: EventBus> Callback<C, B> {
    /// Short name of the callback kind, for dumps
    pub fn kind(&self) -> &'static str {
        match self {
            Callback::Raw(_) => "raw",
            Callback::Event { .. } => "event",
        }
    }
}

impl<C, B: EventBus> fmt::Debug for Callback<C, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback::{}", self.kind())
    }
}

/// Lifecycle state derived from a record's flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskState {
    /// Not counting down
    Disabled,
    /// Enabled and counting down
    Armed,
    /// Countdown reached zero or fire was forced; runs on the next pass
    Due,
    /// Callback is running right now
    Executing,
}

/// One registered schedule
#[derive(Debug)]
pub struct TaskRecord<C, B: EventBus> {
    pub(crate) pid: Pid,
    pub(crate) period: u32,
    pub(crate) time_to_wait: u32,
    pub(crate) recurrence: Recurrence,
    pub(crate) enabled: bool,
    pub(crate) fire_pending: bool,
    pub(crate) autoclear: bool,
    pub(crate) callback: Callback<C, B>,
    pub(crate) profiling: Option<ProfilingRecord>,
}

impl<C, B: EventBus> TaskRecord<C, B> {
    /// Create an enabled record with a full countdown
    pub(crate) fn new(
        pid: Pid,
        period: u32,
        recurrence: Recurrence,
        autoclear: bool,
        callback: Callback<C, B>,
    ) -> Self {
        Self {
            pid,
            period,
            time_to_wait: period,
            recurrence,
            enabled: true,
            fire_pending: false,
            autoclear,
            callback,
            profiling: None,
        }
    }

    /// Identifier of this schedule
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Ticks between firings
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Ticks until the next firing
    pub fn time_to_wait(&self) -> u32 {
        self.time_to_wait
    }

    /// Remaining-firings policy
    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Whether the record counts down
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the record will run on the next execution pass
    pub fn is_fire_pending(&self) -> bool {
        self.fire_pending
    }

    /// Whether the record is deleted (not just disabled) when exhausted
    pub fn autoclear(&self) -> bool {
        self.autoclear
    }

    /// Callback fired by this record
    pub fn callback(&self) -> &Callback<C, B> {
        &self.callback
    }

    /// Profiling statistics, if profiling was ever started
    pub fn profiling(&self) -> Option<&ProfilingRecord> {
        self.profiling.as_ref()
    }

    /// Derive the lifecycle state
    pub fn state(&self, executing: bool) -> TaskState {
        if executing {
            TaskState::Executing
        } else if !self.enabled {
            TaskState::Disabled
        } else if self.fire_pending {
            TaskState::Due
        } else {
            TaskState::Armed
        }
    }

    /// Restart the countdown from a full period
    pub(crate) fn reset_countdown(&mut self) {
        self.time_to_wait = self.period;
        self.fire_pending = false;
    }

    /// Stop counting down; a later enable starts from a full period
    pub(crate) fn disable(&mut self) {
        self.enabled = false;
        self.reset_countdown();
    }

    /// Check if the record fires again after its next firing
    pub(crate) fn will_run_again(&self) -> bool {
        self.enabled && self.recurrence.has_more()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NullBus;

    fn noop(_ctx: &mut TaskContext<'_, (), NullBus>) {}

    fn make_record(period: u32, recurrence: Recurrence) -> TaskRecord<(), NullBus> {
        TaskRecord::new(
            Pid::new(7).unwrap(),
            period,
            recurrence,
            false,
            Callback::Raw(noop),
        )
    }

    #[test]
    fn test_pid_rejects_zero() {
        assert!(Pid::new(0).is_none());
        assert_eq!(Pid::new(42).unwrap().get(), 42);
    }

    #[test]
    fn test_recurrence_raw_encoding() {
        assert_eq!(Recurrence::from_raw(-1), Recurrence::Forever);
        assert_eq!(Recurrence::from_raw(-50), Recurrence::Forever);
        assert_eq!(Recurrence::from_raw(0), Recurrence::ONCE);
        assert_eq!(Recurrence::from(3), Recurrence::Finite(3));

        assert_eq!(Recurrence::Forever.as_raw(), -1);
        assert_eq!(Recurrence::Finite(5).as_raw(), 5);
        assert_eq!(Recurrence::Finite(u32::MAX).as_raw(), i32::MAX);
    }

    #[test]
    fn test_recurrence_has_more() {
        assert!(Recurrence::Forever.has_more());
        assert!(Recurrence::Finite(1).has_more());
        assert!(!Recurrence::ONCE.has_more());
    }

    #[test]
    fn test_new_record_is_armed_with_full_countdown() {
        let rec = make_record(10, Recurrence::Forever);
        assert_eq!(rec.time_to_wait(), 10);
        assert!(rec.is_enabled());
        assert!(!rec.is_fire_pending());
        assert_eq!(rec.state(false), TaskState::Armed);
        assert_eq!(rec.state(true), TaskState::Executing);
        assert_eq!(rec.callback().kind(), "raw");
    }

    #[test]
    fn test_disable_resets_countdown() {
        let mut rec = make_record(10, Recurrence::Forever);
        rec.time_to_wait = 3;
        rec.fire_pending = true;
        assert_eq!(rec.state(false), TaskState::Due);

        rec.disable();

        assert_eq!(rec.time_to_wait(), 10);
        assert!(!rec.is_fire_pending());
        assert_eq!(rec.state(false), TaskState::Disabled);
    }

    #[test]
    fn test_will_run_again() {
        assert!(make_record(5, Recurrence::Forever).will_run_again());
        assert!(make_record(5, Recurrence::Finite(2)).will_run_again());
        assert!(!make_record(5, Recurrence::ONCE).will_run_again());

        let mut rec = make_record(5, Recurrence::Forever);
        rec.disable();
        assert!(!rec.will_run_again());
    }
}
