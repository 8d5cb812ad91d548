//! Board-agnostic cooperative tick scheduler
//!
//! This crate contains everything that does not depend on a specific
//! board or interrupt controller:
//!
//! - Tick ingestion shared with the timer interrupt
//! - Task records with recurrence and optional profiling
//! - The sweep engine that turns elapsed ticks into callback invocations
//! - The registry and lifecycle API addressed by PID
//! - The liveness watchdog and its escalation stages
//! - Diagnostic dumps and configuration types
//!
//! # Timing domains
//!
//! ```text
//!  timer IRQ                         main loop
//! ┌──────────────┐  ticks_pending  ┌──────────────────────────────┐
//! │ advance(n)   │ ──────────────▶ │ service()                    │
//! │  (atomic +=) │                 │  decrement pass -> due queue │
//! └──────────────┘                 │  execution pass -> callbacks │
//!                                  └──────────────────────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod logging;

pub mod config;
pub mod event;
pub mod scheduler;
pub mod task;
pub mod tick;
pub mod traits;
pub mod watchdog;

pub use config::{ConfigError, SchedulerConfig};
pub use event::{EventBus, EventStatus, NullBus};
pub use scheduler::{Scheduler, ScheduleError, SweepStats, TaskContext, TaskView, MAX_TASKS};
pub use task::{Callback, Pid, ProfilingRecord, Recurrence, TaskFn, TaskRecord, TaskState};
pub use tick::TickIngress;
pub use traits::{Clock, Platform};
pub use watchdog::{StallStage, StallThresholds};
