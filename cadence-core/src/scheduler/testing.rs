//! Shared fixtures for scheduler unit tests

use core::cell::Cell;

use super::{Scheduler, TaskContext};
use crate::event::{EventBus, EventStatus};
use crate::task::{Callback, Recurrence};
use crate::tick::TickIngress;
use crate::traits::Clock;

/// Microseconds the mock clock advances per reading
pub const CLOCK_STEP_US: u32 = 25;

/// Clock that advances a fixed step every time it is read
pub struct StepClock {
    now: Cell<u32>,
}

impl Clock for StepClock {
    fn now_us(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(CLOCK_STEP_US));
        now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Accept,
    Refuse,
}

/// Bus that records raised events, plus a scratch log for raw callbacks
#[derive(Default)]
pub struct RecordingBus {
    pub raised: Vec<u32>,
    pub fired: Vec<u32>,
}

impl EventBus for RecordingBus {
    type Sink = Sink;
    type Event = u32;

    fn raise(&mut self, sink: Sink, event: &u32) -> EventStatus {
        match sink {
            Sink::Accept => {
                self.raised.push(*event);
                EventStatus::Handled
            }
            Sink::Refuse => EventStatus::Rejected,
        }
    }

    fn write_debug(&self, out: &mut dyn core::fmt::Write) -> core::fmt::Result {
        writeln!(out, "raised {}", self.raised.len())
    }
}

pub type TestScheduler = Scheduler<StepClock, RecordingBus>;
pub type TestContext<'s> = TaskContext<'s, StepClock, RecordingBus>;

pub fn scheduler() -> TestScheduler {
    let ingress: &'static TickIngress = Box::leak(Box::new(TickIngress::default()));
    Scheduler::new(
        ingress,
        StepClock { now: Cell::new(0) },
        RecordingBus::default(),
    )
}

pub fn record_fire(ctx: &mut TestContext<'_>) {
    let pid = ctx.pid().get();
    ctx.bus_mut().fired.push(pid);
}

pub fn remove_self(ctx: &mut TestContext<'_>) {
    let pid = ctx.pid();
    assert!(ctx.remove_self());
    assert!(ctx.contains(pid));
    ctx.bus_mut().fired.push(pid.get());
}

/// Removes the task registered right after this one
pub fn remove_next(ctx: &mut TestContext<'_>) {
    let next = crate::task::Pid::new(ctx.pid().get() + 1).unwrap();
    assert!(ctx.remove(next));
}

/// Removes the next task, then registers a new one in its freed slot
pub fn replace_next(ctx: &mut TestContext<'_>) {
    remove_next(ctx);
    ctx.create(4, Recurrence::Forever, false, Callback::Raw(record_fire))
        .unwrap();
}

pub fn record_executing(ctx: &mut TestContext<'_>) {
    let pid = ctx.pid();
    assert_eq!(ctx.task(pid).unwrap().state, crate::task::TaskState::Executing);
    assert_eq!(ctx.ingress().executing(), pid.get());
    ctx.bus_mut().fired.push(pid.get());
}
