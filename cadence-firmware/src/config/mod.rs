//! Scheduler configuration
//!
//! Generated by build.rs from scheduler.toml, which is validated at build
//! time. Edit scheduler.toml and rebuild to customize.

use cadence_core::config::{CONFIG_MAGIC, CONFIG_VERSION};
use cadence_core::SchedulerConfig;

include!(concat!(env!("OUT_DIR"), "/scheduler_config.rs"));

/// Configuration compiled into the firmware
pub const SCHEDULER: SchedulerConfig = SchedulerConfig {
    magic: CONFIG_MAGIC,
    version: CONFIG_VERSION,
    tick_us: TICK_US,
    stall: STALL,
};
