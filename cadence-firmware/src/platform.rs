//! RP2040 platform hooks
//!
//! Microsecond clock for the profiler, plus the debug dump and reset used
//! by the liveness watchdog.

use core::fmt::{self, Write};

use cadence_core::{Clock, Platform};
use cortex_m::peripheral::SCB;
use defmt::*;
use embassy_time::Instant;

use crate::config;

/// Profiling clock on the embassy time driver (1 MHz timer)
#[derive(Debug, Clone, Copy, Default)]
pub struct RpClock;

impl Clock for RpClock {
    fn now_us(&self) -> u32 {
        // wraps after ~71 minutes; only differences are used
        Instant::now().as_micros() as u32
    }
}

/// Watchdog escalation target
#[derive(Debug, Clone, Copy, Default)]
pub struct RpPlatform;

impl Platform for RpPlatform {
    fn write_debug(&self, out: &mut dyn Write) -> fmt::Result {
        writeln!(out, "uptime: {} ms", Instant::now().as_millis())?;
        writeln!(out, "tick: {} us (reload {})", config::TICK_US, config::SYST_RELOAD)
    }

    fn fatal_recovery(&self) {
        error!("Scheduler stalled, resetting");
        SCB::sys_reset();
    }
}
