//! Scheduler service loop and the tasks it runs

use cadence_core::{Callback, Recurrence, ScheduleError, Scheduler, TaskContext};
use defmt::*;
use embassy_futures::yield_now;

use super::tick::TICKS;
use crate::config;
use crate::diag::DefmtLines;
use crate::events::{AppEvent, ChannelBus, Sink};
use crate::platform::RpClock;

/// Scheduler as wired on this board
pub type AppScheduler = Scheduler<RpClock, ChannelBus>;

type Ctx<'s> = TaskContext<'s, RpClock, ChannelBus>;

/// Build the scheduler and register the board's tasks
pub fn build() -> Result<AppScheduler, ScheduleError> {
    let mut scheduler = Scheduler::with_config(&TICKS, RpClock, ChannelBus, &config::SCHEDULER);

    scheduler.create(
        config::HEARTBEAT_PERIOD,
        Recurrence::Forever,
        false,
        Callback::Event {
            sink: Sink::Led,
            event: AppEvent::Toggle,
        },
    )?;

    scheduler.create(
        config::HEARTBEAT_PERIOD,
        Recurrence::ONCE,
        true,
        Callback::Event {
            sink: Sink::Log,
            event: AppEvent::Notice("scheduler running"),
        },
    )?;

    let report = scheduler.create(
        config::REPORT_PERIOD,
        Recurrence::Forever,
        false,
        Callback::Raw(report),
    )?;
    scheduler.begin_profiling(report);

    Ok(scheduler)
}

/// Periodic status dump
fn report(ctx: &mut Ctx<'_>) {
    let stats = ctx.stats();
    if stats.lagged_schedules > 0 || stats.total_skipped_sweeps > 0 {
        warn!(
            "Scheduler lagged {} times, {} sweeps skipped",
            stats.lagged_schedules, stats.total_skipped_sweeps
        );
    }

    let mut out = DefmtLines::new();
    if ctx.print_debug(&mut out).is_err() || ctx.print_profiler(&mut out).is_err() {
        warn!("Status report truncated");
    }
}

/// Main-loop service task
///
/// Sweeps, then yields so other embassy tasks get the core. A callback
/// that blocks here stalls every sweep and trips the watchdog.
#[embassy_executor::task]
pub async fn scheduler_task(mut scheduler: AppScheduler) {
    info!("Scheduler task started, {} tasks", scheduler.len());

    loop {
        scheduler.service();
        yield_now().await;
    }
}
