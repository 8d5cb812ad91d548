//! Per-task execution profiling

/// Run-time statistics for one task, in microseconds
///
/// Totals saturate instead of wrapping, so a long-lived task keeps a
/// pessimistic (never too small) average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProfilingRecord {
    /// Number of profiled executions
    pub executions: u32,
    /// Duration of the most recent execution
    pub run_time_last: u32,
    /// Shortest execution seen
    pub run_time_best: u32,
    /// Longest execution seen
    pub run_time_worst: u32,
    /// Sum of all execution durations
    pub run_time_total: u32,
    /// `run_time_total / executions`
    pub run_time_average: u32,
    /// Whether new executions are being sampled
    pub active: bool,
}

impl ProfilingRecord {
    /// Create an empty, active record
    pub const fn new() -> Self {
        Self {
            executions: 0,
            run_time_last: 0,
            run_time_best: 0,
            run_time_worst: 0,
            run_time_total: 0,
            run_time_average: 0,
            active: true,
        }
    }

    /// Fold one execution sample into the statistics
    pub fn record(&mut self, run_time_us: u32) {
        self.run_time_last = run_time_us;
        if self.executions == 0 {
            self.run_time_best = run_time_us;
            self.run_time_worst = run_time_us;
        } else {
            self.run_time_best = self.run_time_best.min(run_time_us);
            self.run_time_worst = self.run_time_worst.max(run_time_us);
        }
        self.run_time_total = self.run_time_total.saturating_add(run_time_us);
        self.executions = self.executions.saturating_add(1);
        self.run_time_average = self.run_time_total / self.executions;
    }

    /// Check if any execution has been sampled
    pub fn has_samples(&self) -> bool {
        self.executions > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_active_and_empty() {
        let rec = ProfilingRecord::new();
        assert!(rec.active);
        assert!(!rec.has_samples());
        assert_eq!(rec.run_time_average, 0);
    }

    #[test]
    fn test_first_sample_sets_best_and_worst() {
        let mut rec = ProfilingRecord::new();
        rec.record(120);

        assert_eq!(rec.executions, 1);
        assert_eq!(rec.run_time_last, 120);
        assert_eq!(rec.run_time_best, 120);
        assert_eq!(rec.run_time_worst, 120);
        assert_eq!(rec.run_time_average, 120);
    }

    #[test]
    fn test_statistics_accumulate() {
        let mut rec = ProfilingRecord::new();
        rec.record(100);
        rec.record(40);
        rec.record(250);

        assert_eq!(rec.executions, 3);
        assert_eq!(rec.run_time_last, 250);
        assert_eq!(rec.run_time_best, 40);
        assert_eq!(rec.run_time_worst, 250);
        assert_eq!(rec.run_time_total, 390);
        assert_eq!(rec.run_time_average, 130);
    }

    #[test]
    fn test_total_saturates() {
        let mut rec = ProfilingRecord::new();
        rec.record(u32::MAX - 10);
        rec.record(100);

        assert_eq!(rec.run_time_total, u32::MAX);
        assert_eq!(rec.run_time_average, u32::MAX / 2);
    }
}
