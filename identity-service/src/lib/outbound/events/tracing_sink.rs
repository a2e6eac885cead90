use crate::domain::identity::events::AuthEvent;
use crate::domain::identity::events::EventKind;
use crate::domain::identity::ports::EventSink;

/// Writes every event to the tracing subscriber.
///
/// Successes log at `info`, rejections at `warn`, infrastructure errors at
/// `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn emit(&self, event: AuthEvent) {
        let name = event.name();
        let user_id = event
            .user_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let detail = event.detail().unwrap_or_default();

        match event.kind() {
            EventKind::Success => {
                tracing::info!(event = name, user_id = %user_id, detail = %detail, "auth event")
            }
            EventKind::Failure => {
                tracing::warn!(event = name, user_id = %user_id, detail = %detail, "auth event")
            }
            EventKind::Error => {
                tracing::error!(event = name, user_id = %user_id, detail = %detail, "auth event")
            }
        }
    }
}
