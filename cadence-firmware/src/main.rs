//! Cadence - scheduler demo firmware
//!
//! Runs the cooperative tick scheduler on an RP2040: SysTick counts ticks,
//! an embassy task sweeps the scheduler, and event-kind tasks hand work to
//! other embassy tasks through channels.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod config;
mod diag;
mod events;
mod platform;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Cadence firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    if let Err(e) = config::SCHEDULER.validate() {
        // build.rs checks the same rules, so this means a stale build
        error!("Scheduler configuration rejected: {}", e);
        return;
    }

    let scheduler = unwrap!(tasks::scheduler::build());
    info!("Registered {} scheduler tasks", scheduler.len());

    // Status LED (Pico: GPIO25)
    let led = Output::new(p.PIN_25, Level::Low);

    let core = unwrap!(cortex_m::Peripherals::take());
    tasks::tick::start(core.SYST);

    spawner.spawn(tasks::led_task(led)).unwrap();
    spawner.spawn(tasks::event_log_task()).unwrap();
    spawner.spawn(tasks::scheduler_task(scheduler)).unwrap();

    info!("All tasks spawned, firmware running");
}
