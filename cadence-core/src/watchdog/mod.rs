//! Liveness watchdog
//!
//! Detects a main loop that has stopped calling
//! [`Scheduler::service`](crate::Scheduler::service) while the tick
//! interrupt keeps counting, and escalates through diagnostic dumps to a
//! platform recovery hook.

pub mod monitor;
pub mod response;

pub use monitor::{StallStage, StallThresholds};
pub use response::respond;
