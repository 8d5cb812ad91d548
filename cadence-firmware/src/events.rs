//! Event bus backed by embassy-sync channels

use core::fmt::{self, Write};

use cadence_core::{EventBus, EventStatus};

use crate::channels::{EVENT_CHANNEL, EVENT_CHANNEL_SIZE, LED_TOGGLE};

/// Receivers an event task can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Sink {
    /// Status LED task
    Led,
    /// Event log task
    Log,
}

/// Events carried by scheduler tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum AppEvent {
    /// Flip the status LED
    Toggle,
    /// Log a fixed message
    Notice(&'static str),
}

/// Bus handle; all state lives in the static channels
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelBus;

impl EventBus for ChannelBus {
    type Sink = Sink;
    type Event = AppEvent;

    fn raise(&mut self, sink: Sink, event: &AppEvent) -> EventStatus {
        match (sink, event) {
            (Sink::Led, AppEvent::Toggle) => {
                LED_TOGGLE.signal(());
                EventStatus::Handled
            }
            (Sink::Led, _) => EventStatus::Ignored,
            (Sink::Log, event) => match EVENT_CHANNEL.try_send(*event) {
                Ok(()) => EventStatus::Handled,
                Err(_) => EventStatus::Rejected,
            },
        }
    }

    fn write_debug(&self, out: &mut dyn Write) -> fmt::Result {
        writeln!(
            out,
            "event channel: {}/{}",
            EVENT_CHANNEL.len(),
            EVENT_CHANNEL_SIZE
        )?;
        writeln!(out, "led toggle pending: {}", LED_TOGGLE.signaled())
    }
}
