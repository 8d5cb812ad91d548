//! Task records
//!
//! One [`TaskRecord`] per registered schedule, plus the optional
//! [`ProfilingRecord`] that accumulates run-time statistics for it.

pub mod profile;
pub mod record;

pub use profile::ProfilingRecord;
pub use record::{Callback, Pid, Recurrence, TaskFn, TaskRecord, TaskState};
