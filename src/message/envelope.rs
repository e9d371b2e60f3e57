use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved top-level fields shared by every wire message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default = "new_message_id")]
    message_id: String,
    event_type: String,
    #[serde(default = "Utc::now")]
    timestamp: DateTime<Utc>,
}

fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

impl Envelope {
    /// Envelope for a message about to be sent: fresh id, current instant.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            message_id: new_message_id(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn from_parts(
        message_id: impl Into<String>,
        event_type: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            event_type: event_type.into(),
            timestamp,
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
