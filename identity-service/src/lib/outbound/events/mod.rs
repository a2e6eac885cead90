pub mod kafka;
pub mod memory;
pub mod messages;
pub mod tracing_sink;

use std::sync::Arc;

pub use kafka::KafkaEventSink;
pub use memory::InMemoryEventSink;
pub use tracing_sink::TracingEventSink;

use crate::domain::identity::events::AuthEvent;
use crate::domain::identity::ports::EventSink;

/// Forwards every event to each of its sinks, in order.
#[derive(Default)]
pub struct FanoutEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutEventSink {
    fn emit(&self, event: AuthEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}
