//! Tick ingestion
//!
//! [`TickIngress`] is the only state shared between the timer interrupt and
//! the main loop. The interrupt side does one atomic add plus the stall
//! bookkeeping; it never touches a task record. The main loop drains the
//! counter with an atomic exchange, so ticks counted between the read and
//! the reset cannot be lost.

use core::fmt::{self, Write};

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::watchdog::{StallStage, StallThresholds};

/// Interrupt-to-main-loop tick handoff and stall latch
///
/// Lives in a `static` so the interrupt handler can reach it:
///
/// ```
/// use cadence_core::{StallThresholds, TickIngress};
///
/// static TICKS: TickIngress = TickIngress::new(StallThresholds::DEFAULT);
///
/// // timer interrupt
/// if let Some(stage) = TICKS.advance(1) {
///     // respond to the stall stage
///     let _ = stage;
/// }
/// ```
#[derive(Debug)]
pub struct TickIngress {
    ticks_pending: AtomicU32,
    stall_latched: AtomicBool,
    skipped_sweeps: AtomicU32,
    total_skipped_sweeps: AtomicU32,
    executing: AtomicU32,
    thresholds: StallThresholds,
}

impl TickIngress {
    /// Create an idle ingress point
    pub const fn new(thresholds: StallThresholds) -> Self {
        Self {
            ticks_pending: AtomicU32::new(0),
            stall_latched: AtomicBool::new(false),
            skipped_sweeps: AtomicU32::new(0),
            total_skipped_sweeps: AtomicU32::new(0),
            executing: AtomicU32::new(0),
            thresholds,
        }
    }

    /// Record elapsed ticks (interrupt context)
    ///
    /// The first call after a completed sweep arms the stall latch; every
    /// further call before the next sweep counts as a skipped sweep.
    /// Returns the escalation stage reached by this call, if any.
    pub fn advance(&self, ticks: u32) -> Option<StallStage> {
        self.ticks_pending.fetch_add(ticks, Ordering::AcqRel);

        if !self.stall_latched.swap(true, Ordering::AcqRel) {
            return None;
        }

        let skipped = self.skipped_sweeps.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        self.total_skipped_sweeps.fetch_add(1, Ordering::Relaxed);
        self.thresholds.stage_at(skipped)
    }

    /// Drain all pending ticks (main loop)
    pub(crate) fn take(&self) -> u32 {
        self.ticks_pending.swap(0, Ordering::AcqRel)
    }

    /// End a stall episode (main loop, after a sweep that did work)
    pub(crate) fn sweep_completed(&self) {
        self.skipped_sweeps.store(0, Ordering::Release);
        self.stall_latched.store(false, Ordering::Release);
    }

    /// Publish the PID currently executing (0 when idle)
    pub(crate) fn set_executing(&self, pid: u32) {
        self.executing.store(pid, Ordering::Release);
    }

    /// Ticks counted but not yet consumed by a sweep
    pub fn ticks_pending(&self) -> u32 {
        self.ticks_pending.load(Ordering::Acquire)
    }

    /// Whether ticks arrived since the last sweep that did work
    pub fn is_stall_latched(&self) -> bool {
        self.stall_latched.load(Ordering::Acquire)
    }

    /// Skipped sweeps in the current stall episode
    pub fn skipped_sweeps(&self) -> u32 {
        self.skipped_sweeps.load(Ordering::Acquire)
    }

    /// Skipped sweeps across all episodes since boot
    pub fn total_skipped_sweeps(&self) -> u32 {
        self.total_skipped_sweeps.load(Ordering::Relaxed)
    }

    /// PID of the callback currently running, 0 when idle
    pub fn executing(&self) -> u32 {
        self.executing.load(Ordering::Acquire)
    }

    /// Escalation thresholds in use
    pub fn thresholds(&self) -> &StallThresholds {
        &self.thresholds
    }

    /// Write the scheduler state visible from interrupt context
    pub fn write_debug(&self, out: &mut dyn Write) -> fmt::Result {
        writeln!(out, "ticks pending: {}", self.ticks_pending())?;
        writeln!(out, "stall latched: {}", self.is_stall_latched())?;
        writeln!(
            out,
            "skipped sweeps: {} (total {})",
            self.skipped_sweeps(),
            self.total_skipped_sweeps()
        )?;
        match self.executing() {
            0 => writeln!(out, "executing: none"),
            pid => writeln!(out, "executing: pid {}", pid),
        }
    }
}

impl Default for TickIngress {
    fn default() -> Self {
        Self::new(StallThresholds::DEFAULT)
    }
}
