//! Platform hooks used by the liveness watchdog

use core::fmt::{self, Write};

/// Board-level services the watchdog escalates into
///
/// Both methods may be called from interrupt context, since the watchdog
/// runs inside tick ingestion.
pub trait Platform {
    /// Write a human-readable dump of platform state (clocks, stack, resets)
    fn write_debug(&self, out: &mut dyn Write) -> fmt::Result {
        let _ = out;
        Ok(())
    }

    /// Recover from a scheduler that has stopped servicing ticks
    ///
    /// Typically a controlled reboot. Called on every tick once the
    /// terminal threshold has been passed, until the platform acts.
    fn fatal_recovery(&self);
}
