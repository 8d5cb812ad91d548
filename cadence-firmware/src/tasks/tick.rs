//! Tick source
//!
//! SysTick fires once per tick and only feeds the shared [`TickIngress`].
//! When the ingress reports a stall stage, the watchdog response runs
//! right here, since the main loop is the thing that is stuck.

use cadence_core::{watchdog, TickIngress};
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use cortex_m_rt::exception;
use defmt::*;

use crate::config;
use crate::diag::DefmtLines;
use crate::events::ChannelBus;
use crate::platform::RpPlatform;

/// Tick handoff between SysTick and the scheduler task
pub static TICKS: TickIngress = TickIngress::new(config::STALL);

/// Start SysTick at the configured tick period
pub fn start(mut syst: SYST) {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(config::SYST_RELOAD);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();

    info!("SysTick running, {} us per tick", config::TICK_US);
}

#[exception]
fn SysTick() {
    let Some(stage) = TICKS.advance(1) else {
        return;
    };

    warn!("Stall stage {} reached", stage);
    let mut out = DefmtLines::new();
    if watchdog::respond(stage, &TICKS, &ChannelBus, &RpPlatform, &mut out).is_err() {
        warn!("Stall dump truncated");
    }
}
