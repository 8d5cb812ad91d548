//! Callback context
//!
//! Raw callbacks receive a [`TaskContext`] instead of the scheduler. It
//! borrows the scheduler mutably for the duration of the call and exposes
//! the lifecycle API, so a task can reschedule or remove itself, but it
//! cannot start a nested sweep.

use core::fmt::{self, Write};

use super::{ScheduleError, Scheduler, SweepStats, TaskView};
use crate::event::EventBus;
use crate::task::{Callback, Pid, ProfilingRecord, Recurrence};
use crate::tick::TickIngress;

/// Handle passed to a running raw callback
pub struct TaskContext<'s, C, B: EventBus> {
    scheduler: &'s mut Scheduler<C, B>,
    pid: Pid,
}

impl<'s, C, B: EventBus> TaskContext<'s, C, B> {
    pub(crate) fn new(scheduler: &'s mut Scheduler<C, B>, pid: Pid) -> Self {
        Self { scheduler, pid }
    }

    /// PID of the running task
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Tick handoff of the scheduler
    pub fn ingress(&self) -> &'static TickIngress {
        self.scheduler.ingress
    }

    /// Clock the scheduler profiles with
    pub fn clock(&self) -> &C {
        &self.scheduler.clock
    }

    /// Event bus of the scheduler
    pub fn bus(&self) -> &B {
        &self.scheduler.bus
    }

    /// Mutable access to the event bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.scheduler.bus
    }

    /// Remove the running task once this callback returns
    pub fn remove_self(&mut self) -> bool {
        self.scheduler.remove(self.pid)
    }

    /// Stop the running task after this callback
    pub fn disable_self(&mut self) -> bool {
        self.scheduler.disable(self.pid)
    }

    /// Wait `by` ticks before the running task fires again
    pub fn delay_self(&mut self, by: u32) -> bool {
        self.scheduler.delay(self.pid, by)
    }

    /// See [`Scheduler::create`]
    pub fn create(
        &mut self,
        period: u32,
        recurrence: Recurrence,
        autoclear: bool,
        callback: Callback<C, B>,
    ) -> Result<Pid, ScheduleError> {
        self.scheduler.create(period, recurrence, autoclear, callback)
    }

    /// See [`Scheduler::alter`]
    pub fn alter(
        &mut self,
        pid: Pid,
        period: u32,
        recurrence: Recurrence,
        autoclear: bool,
        callback: Callback<C, B>,
    ) -> bool {
        self.scheduler.alter(pid, period, recurrence, autoclear, callback)
    }

    /// See [`Scheduler::enable`]
    pub fn enable(&mut self, pid: Pid) -> bool {
        self.scheduler.enable(pid)
    }

    /// See [`Scheduler::disable`]
    pub fn disable(&mut self, pid: Pid) -> bool {
        self.scheduler.disable(pid)
    }

    /// See [`Scheduler::delay`]
    pub fn delay(&mut self, pid: Pid, by: u32) -> bool {
        self.scheduler.delay(pid, by)
    }

    /// See [`Scheduler::delay_period`]
    pub fn delay_period(&mut self, pid: Pid) -> bool {
        self.scheduler.delay_period(pid)
    }

    /// See [`Scheduler::fire`]
    pub fn fire(&mut self, pid: Pid) -> bool {
        self.scheduler.fire(pid)
    }

    /// See [`Scheduler::remove`]
    pub fn remove(&mut self, pid: Pid) -> bool {
        self.scheduler.remove(pid)
    }

    /// See [`Scheduler::will_run_again`]
    pub fn will_run_again(&self, pid: Pid) -> bool {
        self.scheduler.will_run_again(pid)
    }

    /// See [`Scheduler::begin_profiling`]
    pub fn begin_profiling(&mut self, pid: Pid) -> bool {
        self.scheduler.begin_profiling(pid)
    }

    /// See [`Scheduler::stop_profiling`]
    pub fn stop_profiling(&mut self, pid: Pid) -> bool {
        self.scheduler.stop_profiling(pid)
    }

    /// See [`Scheduler::clear_profiling`]
    pub fn clear_profiling(&mut self, pid: Pid) -> bool {
        self.scheduler.clear_profiling(pid)
    }

    /// Snapshot of a task; the running task reports [`TaskState::Executing`](crate::task::TaskState::Executing)
    pub fn task(&self, pid: Pid) -> Option<TaskView> {
        self.scheduler.task(pid)
    }

    /// Check if `pid` is registered
    pub fn contains(&self, pid: Pid) -> bool {
        self.scheduler.contains(pid)
    }

    /// See [`Scheduler::profile`]
    pub fn profile(&self, pid: Pid) -> Option<ProfilingRecord> {
        self.scheduler.profile(pid)
    }

    /// Aggregate counters as of this callback
    pub fn stats(&self) -> SweepStats {
        self.scheduler.stats()
    }

    /// See [`Scheduler::print_debug`]
    pub fn print_debug(&self, out: &mut dyn Write) -> fmt::Result {
        self.scheduler.print_debug(out)
    }

    /// See [`Scheduler::print_profiler`]
    pub fn print_profiler(&self, out: &mut dyn Write) -> fmt::Result {
        self.scheduler.print_profiler(out)
    }
}

impl<C, B: EventBus> fmt::Debug for TaskContext<'_, C, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext").field("pid", &self.pid).finish()
    }
}
