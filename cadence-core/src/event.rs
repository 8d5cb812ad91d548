//! Event bus seam for structured callbacks
//!
//! A task whose callback is [`Callback::Event`](crate::task::Callback::Event)
//! does not run code of its own; each firing raises a pre-built event into
//! a sink through the bus injected at scheduler construction. The scheduler
//! never looks inside the event.

use core::convert::Infallible;
use core::fmt::{self, Write};

/// Outcome reported by a sink for one raised event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventStatus {
    /// Sink consumed the event
    Handled,
    /// Sink is not interested in this event
    Ignored,
    /// Sink could not accept the event (queue full, sink gone)
    Rejected,
}

impl EventStatus {
    /// Check if the sink took the event
    pub fn is_handled(&self) -> bool {
        matches!(self, EventStatus::Handled)
    }
}

/// Dispatch capability for structured callbacks
pub trait EventBus {
    /// Handle identifying the receiving sink
    type Sink: Copy;
    /// Event object carried by the task record
    ///
    /// Owned by the record and dropped with it. Use a reference or handle
    /// type for events whose storage is managed elsewhere.
    type Event;

    /// Deliver `event` to `sink`
    fn raise(&mut self, sink: Self::Sink, event: &Self::Event) -> EventStatus;

    /// Write a human-readable dump of the bus state
    fn write_debug(&self, out: &mut dyn Write) -> fmt::Result {
        let _ = out;
        Ok(())
    }
}

/// Bus for schedulers that only run raw callbacks
///
/// Its event type is uninhabited, so an event callback cannot be built.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBus;

impl EventBus for NullBus {
    type Sink = ();
    type Event = Infallible;

    fn raise(&mut self, _sink: (), event: &Infallible) -> EventStatus {
        match *event {}
    }
}
