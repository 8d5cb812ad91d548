//! Sweep engine
//!
//! [`Scheduler::service`] is called from the application's idle loop. Each
//! call drains the tick counter and runs two passes:
//!
//! 1. Decrement pass: every enabled record's countdown is reduced by the
//!    elapsed ticks; records that reach zero are queued, in registry order.
//! 2. Execution pass: queued records run one at a time, then take their
//!    recurrence transition (keep going, disable, or delete).
//!
//! Callbacks run with the record still in the registry, so a callback that
//! removes itself only marks the record; the deletion happens after it
//! returns.

use heapless::Vec;

use super::registry::{Registry, MAX_TASKS};
use super::{SweepStats, TaskContext};
use crate::config::SchedulerConfig;
use crate::event::EventBus;
use crate::task::{Callback, Pid, Recurrence};
use crate::tick::TickIngress;
use crate::traits::Clock;

/// Cooperative tick scheduler
///
/// `C` supplies the microsecond clock for profiling, `B` the event bus that
/// structured callbacks raise into.
#[derive(Debug)]
pub struct Scheduler<C, B: EventBus> {
    /// Tick handoff shared with the timer interrupt
    pub(super) ingress: &'static TickIngress,
    pub(super) clock: C,
    pub(super) bus: B,
    /// Length of one tick in microseconds
    pub(super) tick_us: u32,
    pub(super) registry: Registry<C, B>,
    /// Due PIDs for the current execution pass, in discovery order
    pub(super) queue: Vec<Pid, MAX_TASKS>,
    pub(super) currently_executing: Option<Pid>,
    /// A forced fire is outstanding; the next sweep runs even without ticks
    pub(super) fire_requested: bool,
    pub(super) stats: SweepStats,
}

impl<C, B: EventBus> Scheduler<C, B> {
    /// Create an empty scheduler with 1 ms ticks
    pub fn new(ingress: &'static TickIngress, clock: C, bus: B) -> Self {
        Self::with_config(ingress, clock, bus, &SchedulerConfig::DEFAULT)
    }

    /// Create an empty scheduler using `config`'s tick length
    ///
    /// The stall thresholds in `config` belong to the [`TickIngress`],
    /// which is built separately so it can live in a `static`.
    pub fn with_config(
        ingress: &'static TickIngress,
        clock: C,
        bus: B,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            ingress,
            clock,
            bus,
            tick_us: config.tick_us.max(1),
            registry: Registry::new(),
            queue: Vec::new(),
            currently_executing: None,
            fire_requested: false,
            stats: SweepStats::default(),
        }
    }

    /// Tick handoff this scheduler drains
    pub fn ingress(&self) -> &'static TickIngress {
        self.ingress
    }

    /// Event bus used by structured callbacks
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the event bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Profiling clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Length of one tick in microseconds
    pub fn tick_us(&self) -> u32 {
        self.tick_us
    }

    /// PID whose callback is running, if any
    pub fn currently_executing(&self) -> Option<Pid> {
        self.currently_executing
    }

    /// Aggregate counters, including the ingress-side skip counts
    pub fn stats(&self) -> SweepStats {
        SweepStats {
            skipped_sweeps: self.ingress.skipped_sweeps(),
            total_skipped_sweeps: self.ingress.total_skipped_sweeps(),
            ..self.stats
        }
    }

    /// Decrement pass: count down and queue due records
    fn collect_due(&mut self, elapsed: u32) {
        self.queue.clear();
        let queue = &mut self.queue;
        let mut lagged = 0u32;

        self.registry.for_each_mut(|record| {
            if !record.enabled {
                return;
            }
            if !record.fire_pending && record.time_to_wait > elapsed {
                record.time_to_wait -= elapsed;
                return;
            }

            record.fire_pending = true;
            let overshoot = elapsed.saturating_sub(record.time_to_wait);
            if overshoot <= record.period {
                record.time_to_wait = record.period - overshoot;
            } else {
                // backlog is dropped, never replayed
                record.time_to_wait = record.period;
                lagged += 1;
                log_debug!("pid {} lagged by {} ticks", record.pid.get(), overshoot);
            }
            // one entry per record, and the queue holds MAX_TASKS
            let _ = queue.push(record.pid);
        });

        self.stats.lagged_schedules = self.stats.lagged_schedules.wrapping_add(lagged);
    }

    /// Raise the event of an event-kind record
    fn raise_event(&mut self, pid: Pid) {
        let Some(record) = self.registry.get(pid) else {
            return;
        };
        if let Callback::Event { sink, event } = &record.callback {
            let status = self.bus.raise(*sink, event);
            if !status.is_handled() {
                self.stats.unhandled_events = self.stats.unhandled_events.wrapping_add(1);
                log_debug!("pid {} event not handled", pid.get());
            }
        }
    }

    /// Apply the post-execution recurrence transition
    fn finish(&mut self, pid: Pid, run_time_us: Option<u32>) {
        let Some(record) = self.registry.get_mut(pid) else {
            return;
        };

        if let (Some(us), Some(profile)) = (run_time_us, record.profiling.as_mut()) {
            if profile.active {
                profile.record(us);
            }
        }

        let delete = match record.recurrence {
            Recurrence::Forever => false,
            Recurrence::Finite(0) if record.autoclear => true,
            Recurrence::Finite(0) => {
                record.disable();
                false
            }
            Recurrence::Finite(n) => {
                record.recurrence = Recurrence::Finite(n - 1);
                false
            }
        };

        if delete {
            self.registry.remove(pid);
            log_debug!("pid {} exhausted and cleared", pid.get());
        }
    }
}

impl<C: Clock, B: EventBus> Scheduler<C, B> {
    /// Run one sweep (main-loop context)
    ///
    /// Returns the number of tasks serviced. Cheap when nothing is pending:
    /// with no elapsed ticks and no forced fire it returns 0 immediately.
    pub fn service(&mut self) -> usize {
        let elapsed = self.ingress.take();
        let forced = core::mem::take(&mut self.fire_requested);
        if elapsed == 0 && !forced {
            return 0;
        }

        self.stats.ticks_consumed = self.stats.ticks_consumed.wrapping_add(u64::from(elapsed));
        self.collect_due(elapsed);

        let started = self.clock.now_us();
        let mut serviced = 0;
        while !self.queue.is_empty() {
            let pid = self.queue.remove(0);
            if self.execute(pid) {
                serviced += 1;
            }
        }
        let busy = self.clock.now_us().wrapping_sub(started);

        self.stats.busy_us = self.stats.busy_us.wrapping_add(u64::from(busy));
        self.stats.total_sweeps = self.stats.total_sweeps.wrapping_add(1);
        if serviced > 0 {
            self.stats.productive_sweeps = self.stats.productive_sweeps.wrapping_add(1);
        }
        self.ingress.sweep_completed();

        log_trace!("sweep: {} ticks, {} serviced", elapsed, serviced);
        serviced
    }

    /// Run one due record; false if it was removed or cancelled meanwhile
    fn execute(&mut self, pid: Pid) -> bool {
        let (raw, profiled) = match self.registry.get_mut(pid) {
            Some(record) if record.enabled && record.fire_pending => {
                // a fire() issued by the callback itself carries over
                record.fire_pending = false;
                let raw = match &record.callback {
                    Callback::Raw(f) => Some(*f),
                    Callback::Event { .. } => None,
                };
                let profiled = record.profiling.map_or(false, |p| p.active);
                (raw, profiled)
            }
            _ => return false,
        };

        self.currently_executing = Some(pid);
        self.ingress.set_executing(pid.get());
        let started = profiled.then(|| self.clock.now_us());

        match raw {
            Some(f) => f(&mut TaskContext::new(self, pid)),
            None => self.raise_event(pid),
        }

        let run_time = started.map(|t| self.clock.now_us().wrapping_sub(t));
        self.currently_executing = None;
        self.ingress.set_executing(0);

        self.finish(pid, run_time);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::testing::*;
    use crate::task::TaskState;

    #[test]
    fn test_no_ticks_no_work() {
        let mut sched = scheduler();
        sched
            .create(5, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        assert_eq!(sched.service(), 0);
        assert_eq!(sched.stats().total_sweeps, 0);
    }

    #[test]
    fn test_partial_countdown_then_fire() {
        let mut sched = scheduler();
        let pid = sched
            .create(5, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(2);
        assert_eq!(sched.service(), 0);
        assert_eq!(sched.task(pid).unwrap().time_to_wait, 3);

        sched.ingress().advance(3);
        assert_eq!(sched.service(), 1);
        assert_eq!(sched.task(pid).unwrap().time_to_wait, 5);
        assert_eq!(sched.bus().fired, vec![pid.get()]);
    }

    #[test]
    fn test_overshoot_preserves_phase() {
        let mut sched = scheduler();
        let pid = sched
            .create(10, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(13);
        assert_eq!(sched.service(), 1);
        assert_eq!(sched.task(pid).unwrap().time_to_wait, 7);
        assert_eq!(sched.stats().lagged_schedules, 0);
    }

    #[test]
    fn test_lagged_schedule_is_clamped_without_catch_up() {
        let mut sched = scheduler();
        let pid = sched
            .create(10, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(35);
        assert_eq!(sched.service(), 1);

        assert_eq!(sched.stats().lagged_schedules, 1);
        assert_eq!(sched.task(pid).unwrap().time_to_wait, 10);
        assert_eq!(sched.bus().fired.len(), 1);
    }

    #[test]
    fn test_finite_recurrence_scenario() {
        let mut sched = scheduler();
        let pid = sched
            .create(10, Recurrence::Finite(3), true, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(30);
        assert_eq!(sched.service(), 1);
        assert_eq!(sched.task(pid).unwrap().recurrence, Recurrence::Finite(2));

        for _ in 0..3 {
            sched.ingress().advance(10);
            assert_eq!(sched.service(), 1);
        }

        assert!(!sched.contains(pid));
        assert!(!sched.will_run_again(pid));
        assert!(sched.task(pid).is_none());
        assert_eq!(sched.bus().fired.len(), 4);
    }

    #[test]
    fn test_exhausted_without_autoclear_is_disabled() {
        let mut sched = scheduler();
        let pid = sched
            .create(4, Recurrence::ONCE, false, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(5);
        assert_eq!(sched.service(), 1);

        let view = sched.task(pid).unwrap();
        assert_eq!(view.state, TaskState::Disabled);
        assert_eq!(view.time_to_wait, 4);
        assert!(!sched.will_run_again(pid));

        sched.ingress().advance(100);
        assert_eq!(sched.service(), 0);
        assert_eq!(sched.bus().fired.len(), 1);
    }

    #[test]
    fn test_due_tasks_run_in_registration_order() {
        let mut sched = scheduler();
        let slow = sched
            .create(8, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();
        let fast = sched
            .create(2, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(8);
        assert_eq!(sched.service(), 2);
        assert_eq!(sched.bus().fired, vec![slow.get(), fast.get()]);
    }

    #[test]
    fn test_event_callback_raises_into_bus() {
        let mut sched = scheduler();
        let pid = sched
            .create(
                3,
                Recurrence::Forever,
                false,
                Callback::Event {
                    sink: Sink::Accept,
                    event: 77,
                },
            )
            .unwrap();

        sched.ingress().advance(3);
        assert_eq!(sched.service(), 1);
        assert_eq!(sched.bus().raised, vec![77]);
        assert_eq!(sched.stats().unhandled_events, 0);
        assert!(sched.contains(pid));
    }

    #[test]
    fn test_unhandled_event_is_counted() {
        let mut sched = scheduler();
        sched
            .create(
                3,
                Recurrence::Forever,
                false,
                Callback::Event {
                    sink: Sink::Refuse,
                    event: 1,
                },
            )
            .unwrap();

        sched.ingress().advance(3);
        assert_eq!(sched.service(), 1);
        assert_eq!(sched.stats().unhandled_events, 1);
    }

    #[test]
    fn test_self_removal_is_deferred() {
        let mut sched = scheduler();
        let pid = sched
            .create(5, Recurrence::Forever, false, Callback::Raw(remove_self))
            .unwrap();

        sched.ingress().advance(5);
        assert_eq!(sched.service(), 1);

        // callback saw its own record still registered
        assert_eq!(sched.bus().fired, vec![pid.get()]);
        assert!(!sched.contains(pid));
        assert!(!sched.will_run_again(pid));

        sched.ingress().advance(5);
        assert_eq!(sched.service(), 0);
    }

    #[test]
    fn test_callback_cancels_later_task_in_same_sweep() {
        let mut sched = scheduler();
        let first = sched
            .create(4, Recurrence::Forever, false, Callback::Raw(remove_next))
            .unwrap();
        let second = sched
            .create(4, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(4);
        assert_eq!(sched.service(), 1);

        assert!(sched.contains(first));
        assert!(!sched.contains(second));
        assert!(sched.bus().fired.is_empty());
    }

    #[test]
    fn test_slot_reused_mid_sweep_does_not_run() {
        let mut sched = scheduler();
        sched
            .create(4, Recurrence::Forever, false, Callback::Raw(replace_next))
            .unwrap();
        let second = sched
            .create(4, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(4);
        assert_eq!(sched.service(), 1);

        assert!(!sched.contains(second));
        let created = sched.pids().last().unwrap();
        assert_eq!(created.get(), 3);
        assert_eq!(sched.task(created).unwrap().state, TaskState::Armed);
        assert_eq!(sched.task(created).unwrap().time_to_wait, 4);
        assert!(sched.bus().fired.is_empty());
    }

    #[test]
    fn test_forced_fire_sweep_clears_stall_latch() {
        let mut sched = scheduler();
        let pid = sched
            .create(50, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();
        sched.ingress().advance(1);
        sched.ingress().advance(1);
        assert!(sched.ingress().is_stall_latched());

        assert!(sched.fire(pid));
        assert_eq!(sched.service(), 1);

        assert!(!sched.ingress().is_stall_latched());
        assert_eq!(sched.stats().skipped_sweeps, 0);
        assert_eq!(sched.bus().fired, vec![pid.get()]);
    }

    #[test]
    fn test_fire_runs_without_ticks() {
        let mut sched = scheduler();
        let pid = sched
            .create(50, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        assert!(sched.fire(pid));
        assert_eq!(sched.task(pid).unwrap().state, TaskState::Due);
        assert_eq!(sched.service(), 1);
        assert_eq!(sched.task(pid).unwrap().time_to_wait, 50);

        // the forced fire is consumed
        assert_eq!(sched.service(), 0);
    }

    #[test]
    fn test_profiling_samples_run_time() {
        let mut sched = scheduler();
        let pid = sched
            .create(2, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();
        assert!(sched.begin_profiling(pid));

        for _ in 0..3 {
            sched.ingress().advance(2);
            sched.service();
        }

        let profile = sched.profile(pid).unwrap();
        assert_eq!(profile.executions, 3);
        assert_eq!(profile.run_time_last, CLOCK_STEP_US);
        assert_eq!(profile.run_time_average, CLOCK_STEP_US);
    }

    #[test]
    fn test_stopped_profiling_keeps_stats() {
        let mut sched = scheduler();
        let pid = sched
            .create(2, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();
        sched.begin_profiling(pid);
        sched.ingress().advance(2);
        sched.service();

        assert!(sched.stop_profiling(pid));
        sched.ingress().advance(2);
        sched.service();

        let profile = sched.profile(pid).unwrap();
        assert_eq!(profile.executions, 1);
        assert!(!profile.active);
    }

    #[test]
    fn test_sweep_counters() {
        let mut sched = scheduler();
        sched
            .create(10, Recurrence::Forever, false, Callback::Raw(record_fire))
            .unwrap();

        sched.ingress().advance(3);
        sched.service();
        sched.ingress().advance(7);
        sched.service();

        let stats = sched.stats();
        assert_eq!(stats.total_sweeps, 2);
        assert_eq!(stats.productive_sweeps, 1);
        assert_eq!(stats.ticks_consumed, 10);
    }

    #[test]
    fn test_sweep_clears_stall_latch() {
        let mut sched = scheduler();
        for _ in 0..5 {
            sched.ingress().advance(1);
        }
        assert_eq!(sched.stats().skipped_sweeps, 4);

        sched.service();
        let stats = sched.stats();
        assert_eq!(stats.skipped_sweeps, 0);
        assert_eq!(stats.total_skipped_sweeps, 4);
        assert!(!sched.ingress().is_stall_latched());
    }

    #[test]
    fn test_executing_pid_published_during_callback() {
        let mut sched = scheduler();
        let pid = sched
            .create(3, Recurrence::Forever, false, Callback::Raw(record_executing))
            .unwrap();

        sched.ingress().advance(3);
        sched.service();

        assert_eq!(sched.bus().fired, vec![pid.get()]);
        assert_eq!(sched.ingress().executing(), 0);
        assert_eq!(sched.currently_executing(), None);
    }
}
