//! Event sinks.
//!
//! The encounter owns one boxed sink handed in at construction. Sinks
//! receive events by reference and return nothing, so they cannot feed back
//! into combat state.

use super::event::CombatEvent;

/// Receiver for combat notifications.
pub trait EventSink {
    fn notify(&mut self, event: &CombatEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _event: &CombatEvent) {}
}

/// Records every event in order. Mostly useful in tests and replays.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn notify(&mut self, event: &CombatEvent) {
        self.events.push(event.clone());
    }
}

impl<F> EventSink for F
where
    F: FnMut(&CombatEvent),
{
    fn notify(&mut self, event: &CombatEvent) {
        self(event);
    }
}
