//! Inter-task communication channels
//!
//! Static embassy-sync primitives that event-kind scheduler tasks raise
//! into. Async tasks on the other end do the actual work.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::events::AppEvent;

/// Channel capacity for logged events
pub const EVENT_CHANNEL_SIZE: usize = 8;

/// Events routed to the log sink
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, AppEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Signal that the status LED should toggle
pub static LED_TOGGLE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
