use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::identity::events::AuthEvent;
use crate::domain::identity::events::EventKind;

/// Serializable envelope for auth lifecycle events.
///
/// Infrastructure representation for event publishing. Tokens, passwords,
/// and digests never make it into a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEventMessage {
    pub event_id: String,
    pub event_type: String,
    pub kind: EventKindMessage,
    pub user_id: Option<i64>,
    pub detail: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKindMessage {
    Success,
    Failure,
    Error,
}

impl From<EventKind> for EventKindMessage {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Success => EventKindMessage::Success,
            EventKind::Failure => EventKindMessage::Failure,
            EventKind::Error => EventKindMessage::Error,
        }
    }
}

impl From<&AuthEvent> for AuthEventMessage {
    fn from(event: &AuthEvent) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            event_type: event.name().to_string(),
            kind: event.kind().into(),
            user_id: event.user_id().map(|id| id.value()),
            detail: event.detail(),
            occurred_at: Utc::now(),
        }
    }
}
