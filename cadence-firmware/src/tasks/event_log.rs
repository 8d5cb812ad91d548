//! Event log task

use defmt::*;

use crate::channels::EVENT_CHANNEL;
use crate::events::AppEvent;

/// Drain the log sink
#[embassy_executor::task]
pub async fn event_log_task() {
    info!("Event log task started");

    loop {
        match EVENT_CHANNEL.receive().await {
            AppEvent::Notice(msg) => info!("Notice: {=str}", msg),
            event => debug!("Event: {}", event),
        }
    }
}
