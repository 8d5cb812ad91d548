//! Embassy async tasks and the tick interrupt
//!
//! Each task runs independently and communicates via channels/signals.

pub mod event_log;
pub mod led;
pub mod scheduler;
pub mod tick;

pub use event_log::event_log_task;
pub use led::led_task;
pub use scheduler::scheduler_task;
