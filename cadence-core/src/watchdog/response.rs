//! Stage actions
//!
//! Runs in interrupt context, right after [`TickIngress::advance`] reports
//! a stage. Only touches the ingress counters, the bus and the platform,
//! never the registry, which the stalled main loop still owns.

use core::fmt::{self, Write};

use super::monitor::StallStage;
use crate::event::EventBus;
use crate::tick::TickIngress;
use crate::traits::Platform;

/// Perform the action for `stage`, writing any dump to `out`
pub fn respond<B, P>(
    stage: StallStage,
    ingress: &TickIngress,
    bus: &B,
    platform: &P,
    out: &mut dyn Write,
) -> fmt::Result
where
    B: EventBus + ?Sized,
    P: Platform + ?Sized,
{
    match stage {
        StallStage::Hung => {
            log_warn!("scheduler hung: {} sweeps skipped", ingress.skipped_sweeps());
            writeln!(
                out,
                "hung scheduler: {} ticks pending, {} sweeps skipped",
                ingress.ticks_pending(),
                ingress.skipped_sweeps()
            )
        }
        StallStage::EventDump => {
            writeln!(out, "-- event bus --")?;
            bus.write_debug(out)
        }
        StallStage::SchedulerDump => {
            writeln!(out, "-- scheduler --")?;
            ingress.write_debug(out)
        }
        StallStage::PlatformDump => {
            writeln!(out, "-- platform --")?;
            platform.write_debug(out)
        }
        StallStage::Fatal => {
            log_warn!("scheduler stall fatal after {} skipped sweeps", ingress.skipped_sweeps());
            platform.fatal_recovery();
            Ok(())
        }
    }
}
