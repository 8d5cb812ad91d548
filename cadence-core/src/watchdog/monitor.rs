//! Stall thresholds and escalation stages

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Escalation steps of a stall episode, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StallStage {
    /// Emit a "hung scheduler" notice
    Hung,
    /// Dump the event bus state
    EventDump,
    /// Dump the scheduler state visible from interrupt context
    SchedulerDump,
    /// Dump the platform state
    PlatformDump,
    /// Hand over to platform recovery
    Fatal,
}

/// Skipped-sweep counts at which each stage triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StallThresholds {
    /// Hung notice
    pub hung: u32,
    /// Event bus dump
    pub event_dump: u32,
    /// Scheduler dump
    pub scheduler_dump: u32,
    /// Platform dump
    pub platform_dump: u32,
    /// Fatal recovery (applies at and past this count)
    pub fatal: u32,
}

impl StallThresholds {
    /// Stock thresholds, in ticks at 1 ms per tick
    pub const DEFAULT: Self = Self {
        hung: 2000,
        event_dump: 2040,
        scheduler_dump: 2200,
        platform_dump: 3500,
        fatal: 5000,
    };

    /// Stage reached at exactly `skipped` skipped sweeps
    ///
    /// Dump stages trigger once, on the exact count. Fatal triggers on
    /// every count at or past its threshold.
    pub const fn stage_at(&self, skipped: u32) -> Option<StallStage> {
        if skipped >= self.fatal {
            Some(StallStage::Fatal)
        } else if skipped == self.platform_dump {
            Some(StallStage::PlatformDump)
        } else if skipped == self.scheduler_dump {
            Some(StallStage::SchedulerDump)
        } else if skipped == self.event_dump {
            Some(StallStage::EventDump)
        } else if skipped == self.hung {
            Some(StallStage::Hung)
        } else {
            None
        }
    }

    /// Check that every stage comes strictly after the previous one
    pub const fn is_ordered(&self) -> bool {
        self.hung > 0
            && self.hung < self.event_dump
            && self.event_dump < self.scheduler_dump
            && self.scheduler_dump < self.platform_dump
            && self.platform_dump < self.fatal
    }
}

impl Default for StallThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
