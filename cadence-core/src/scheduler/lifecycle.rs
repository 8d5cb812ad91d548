//! Registry and lifecycle API
//!
//! Every operation addresses a task by PID. Unknown PIDs are reported with
//! `false` / `None` and leave the scheduler untouched.

use super::{ScheduleError, Scheduler, SweepStats, TaskView};
use crate::event::EventBus;
use crate::task::{Callback, Pid, ProfilingRecord, Recurrence, TaskRecord};

impl<C, B: EventBus> Scheduler<C, B> {
    /// Register a new task
    ///
    /// The task starts enabled with a full countdown of `period` ticks.
    pub fn create(
        &mut self,
        period: u32,
        recurrence: Recurrence,
        autoclear: bool,
        callback: Callback<C, B>,
    ) -> Result<Pid, ScheduleError> {
        if period <= 1 {
            return Err(ScheduleError::InvalidPeriod);
        }
        if self.registry.is_full() {
            return Err(ScheduleError::RegistryFull);
        }

        let pid = self.registry.allocate_pid();
        let record = TaskRecord::new(pid, period, recurrence, autoclear, callback);
        self.registry
            .insert(record)
            .map_err(|_| ScheduleError::RegistryFull)?;

        log_info!("created pid {} (period {})", pid.get(), period);
        Ok(pid)
    }

    /// Rewrite the static fields of a task and restart its countdown
    ///
    /// Profiling statistics are kept. Rejects `period <= 1`.
    pub fn alter(
        &mut self,
        pid: Pid,
        period: u32,
        recurrence: Recurrence,
        autoclear: bool,
        callback: Callback<C, B>,
    ) -> bool {
        if period <= 1 {
            return false;
        }
        let Some(record) = self.registry.get_mut(pid) else {
            return false;
        };

        record.period = period;
        record.recurrence = recurrence;
        record.autoclear = autoclear;
        record.callback = callback;
        record.reset_countdown();
        true
    }

    /// Resume counting down
    pub fn enable(&mut self, pid: Pid) -> bool {
        match self.registry.get_mut(pid) {
            Some(record) => {
                record.enabled = true;
                true
            }
            None => false,
        }
    }

    /// Stop counting down and restart the countdown from a full period
    pub fn disable(&mut self, pid: Pid) -> bool {
        match self.registry.get_mut(pid) {
            Some(record) => {
                record.disable();
                true
            }
            None => false,
        }
    }

    /// Wait `by` ticks before the next firing, then resume the normal period
    ///
    /// Enables the task and cancels a pending firing.
    pub fn delay(&mut self, pid: Pid, by: u32) -> bool {
        match self.registry.get_mut(pid) {
            Some(record) => {
                record.enabled = true;
                record.fire_pending = false;
                record.time_to_wait = by;
                true
            }
            None => false,
        }
    }

    /// Restart the countdown from a full period and enable the task
    pub fn delay_period(&mut self, pid: Pid) -> bool {
        match self.registry.get_mut(pid) {
            Some(record) => {
                record.enabled = true;
                record.reset_countdown();
                true
            }
            None => false,
        }
    }

    /// Run an enabled task on the next sweep, even if no tick elapses
    ///
    /// Returns `false` for unknown or disabled tasks.
    pub fn fire(&mut self, pid: Pid) -> bool {
        match self.registry.get_mut(pid) {
            Some(record) if record.enabled => {
                record.fire_pending = true;
                record.time_to_wait = 0;
                self.fire_requested = true;
                true
            }
            _ => false,
        }
    }

    /// Delete a task
    ///
    /// A task removing itself from its own callback is only marked: it
    /// becomes a final, auto-clearing firing and is deleted once the
    /// callback returns.
    pub fn remove(&mut self, pid: Pid) -> bool {
        if self.currently_executing == Some(pid) {
            return match self.registry.get_mut(pid) {
                Some(record) => {
                    record.autoclear = true;
                    record.recurrence = Recurrence::ONCE;
                    log_debug!("pid {} removal deferred", pid.get());
                    true
                }
                None => false,
            };
        }

        if self.registry.remove(pid).is_none() {
            return false;
        }
        self.queue.retain(|&queued| queued != pid);
        log_info!("removed pid {}", pid.get());
        true
    }

    /// Check if the task is enabled and has firings left after the next one
    pub fn will_run_again(&self, pid: Pid) -> bool {
        self.registry
            .get(pid)
            .map_or(false, |record| record.will_run_again())
    }

    /// Start (or resume) sampling run times
    pub fn begin_profiling(&mut self, pid: Pid) -> bool {
        match self.registry.get_mut(pid) {
            Some(record) => {
                record
                    .profiling
                    .get_or_insert_with(ProfilingRecord::new)
                    .active = true;
                true
            }
            None => false,
        }
    }

    /// Stop sampling but keep the statistics gathered so far
    pub fn stop_profiling(&mut self, pid: Pid) -> bool {
        match self.registry.get_mut(pid) {
            Some(record) => {
                if let Some(profile) = record.profiling.as_mut() {
                    profile.active = false;
                }
                true
            }
            None => false,
        }
    }

    /// Stop sampling and discard the statistics
    pub fn clear_profiling(&mut self, pid: Pid) -> bool {
        match self.registry.get_mut(pid) {
            Some(record) => {
                record.profiling = None;
                true
            }
            None => false,
        }
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if no task is registered
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Check if `pid` is registered
    pub fn contains(&self, pid: Pid) -> bool {
        self.registry.get(pid).is_some()
    }

    /// Borrow a task record
    pub fn record(&self, pid: Pid) -> Option<&TaskRecord<C, B>> {
        self.registry.get(pid)
    }

    /// Snapshot of a task
    pub fn task(&self, pid: Pid) -> Option<TaskView> {
        self.registry.get(pid).map(|record| self.view(record))
    }

    /// Profiling statistics of a task, if profiling was ever started
    pub fn profile(&self, pid: Pid) -> Option<ProfilingRecord> {
        self.registry.get(pid).and_then(|record| record.profiling)
    }

    /// Registered PIDs in creation order
    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.registry.iter().map(|record| record.pid)
    }

    /// Snapshots of all tasks in creation order
    pub fn tasks(&self) -> impl Iterator<Item = TaskView> + '_ {
        self.registry.iter().map(move |record| self.view(record))
    }

    /// Reset the sweep counters (ingress skip totals are not affected)
    pub fn reset_stats(&mut self) {
        self.stats = SweepStats::default();
    }

    fn view(&self, record: &TaskRecord<C, B>) -> TaskView {
        let executing = self.currently_executing == Some(record.pid);
        TaskView {
            pid: record.pid,
            period: record.period,
            time_to_wait: record.time_to_wait,
            recurrence: record.recurrence,
            enabled: record.enabled,
            fire_pending: record.fire_pending,
            autoclear: record.autoclear,
            state: record.state(executing),
            profiling: record.profiling,
        }
    }
}
