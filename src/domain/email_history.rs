use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailRecordId, EventId, text_enum};

text_enum!(
    /// Kind of notification sent about an event.
    EmailKind, "email kind", {
        Proposal => "proposal",
        Update => "update",
        Reminder => "reminder",
    }
);

/// One notification attempt about an event.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmailRecord {
    pub id: EmailRecordId,
    pub event_id: EventId,
    pub kind: EmailKind,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub sent_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewEmailRecord {
    pub event_id: EventId,
    pub kind: EmailKind,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub success: bool,
    pub error_message: Option<String>,
}

impl NewEmailRecord {
    pub fn sent(
        event_id: EventId,
        kind: EmailKind,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            event_id,
            kind,
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            success: true,
            error_message: None,
        }
    }

    /// Marks the attempt as failed with the given error text.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_attempt_keeps_error_text() {
        let event_id = EventId::new(3).unwrap();
        let record = NewEmailRecord::sent(event_id, EmailKind::Reminder, "a@b.c", "s", "b")
            .failed("relay unavailable");
        assert!(!record.success);
        assert_eq!(record.error_message.as_deref(), Some("relay unavailable"));
        assert_eq!(record.kind.as_str(), "reminder");
    }
}
