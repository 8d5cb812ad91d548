//! Diagnostic dumps
//!
//! Human-readable text written into a caller-supplied [`core::fmt::Write`].
//! None of these touch scheduler state.

use core::fmt::{self, Write};

use super::Scheduler;
use crate::event::EventBus;
use crate::task::{Pid, Recurrence};

impl<C, B: EventBus> Scheduler<C, B> {
    /// Aggregate counters and duty cycle
    pub fn print_debug(&self, out: &mut dyn Write) -> fmt::Result {
        let stats = self.stats();

        writeln!(out, "tasks: {}", self.len())?;
        writeln!(
            out,
            "sweeps: {} ({} productive)",
            stats.total_sweeps, stats.productive_sweeps
        )?;
        writeln!(out, "lagged schedules: {}", stats.lagged_schedules)?;
        writeln!(
            out,
            "skipped sweeps: {} (total {})",
            stats.skipped_sweeps, stats.total_skipped_sweeps
        )?;
        writeln!(out, "unhandled events: {}", stats.unhandled_events)?;
        writeln!(
            out,
            "ticks: {} x {}us, busy {}us",
            stats.ticks_consumed, self.tick_us, stats.busy_us
        )?;
        writeln!(out, "duty cycle: {}%", stats.duty_cycle_percent(self.tick_us))?;
        match self.currently_executing {
            Some(pid) => writeln!(out, "executing: pid {}", pid),
            None => writeln!(out, "executing: none"),
        }
    }

    /// One row per profiled task
    pub fn print_profiler(&self, out: &mut dyn Write) -> fmt::Result {
        writeln!(
            out,
            "{:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>10} active",
            "pid", "runs", "last", "best", "worst", "avg", "total"
        )?;
        for record in self.registry.iter() {
            let Some(profile) = record.profiling() else {
                continue;
            };
            writeln!(
                out,
                "{:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>10} {}",
                record.pid(),
                profile.executions,
                profile.run_time_last,
                profile.run_time_best,
                profile.run_time_worst,
                profile.run_time_average,
                profile.run_time_total,
                if profile.active { "yes" } else { "no" },
            )?;
        }
        Ok(())
    }

    /// Full record of one task; `Ok(false)` if `pid` is unknown
    pub fn print_schedule(&self, pid: Pid, out: &mut dyn Write) -> Result<bool, fmt::Error> {
        let Some(view) = self.task(pid) else {
            return Ok(false);
        };
        let kind = self
            .registry
            .get(pid)
            .map_or("?", |record| record.callback().kind());

        writeln!(out, "pid {} ({} callback)", view.pid, kind)?;
        writeln!(out, "  state: {:?}", view.state)?;
        writeln!(out, "  period: {}, wait: {}", view.period, view.time_to_wait)?;
        match view.recurrence {
            Recurrence::Forever => writeln!(out, "  recurrence: forever")?,
            Recurrence::Finite(n) => writeln!(out, "  recurrence: {} more", n)?,
        }
        writeln!(
            out,
            "  enabled: {}, pending: {}, autoclear: {}",
            view.enabled, view.fire_pending, view.autoclear
        )?;
        match view.profiling {
            Some(profile) if profile.has_samples() => writeln!(
                out,
                "  profile: {} runs, avg {}us, worst {}us",
                profile.executions, profile.run_time_average, profile.run_time_worst
            )?,
            Some(_) => writeln!(out, "  profile: no samples")?,
            None => writeln!(out, "  profile: off")?,
        }
        Ok(true)
    }
}
