use std::sync::Mutex;

use crate::domain::identity::events::AuthEvent;
use crate::domain::identity::ports::EventSink;

/// Keeps every emitted event in memory, in emission order.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<AuthEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<AuthEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(AuthEvent::name)
            .collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, event: AuthEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
