use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::email_history::{EmailRecord as DomainEmailRecord, NewEmailRecord as DomainNewEmailRecord};
use crate::domain::types::{EmailRecordId, EventId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::email_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EmailRecord {
    pub id: i32,
    pub event_id: i32,
    pub kind: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub sent_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::email_history)]
pub struct NewEmailRecord<'a> {
    pub event_id: i32,
    pub kind: &'a str,
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
    pub success: bool,
    pub error_message: Option<&'a str>,
    pub sent_at: NaiveDateTime,
}

impl TryFrom<EmailRecord> for DomainEmailRecord {
    type Error = TypeConstraintError;

    fn try_from(record: EmailRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EmailRecordId::new(record.id)?,
            event_id: EventId::new(record.event_id)?,
            kind: record.kind.parse()?,
            recipient: record.recipient,
            subject: record.subject,
            body: record.body,
            success: record.success,
            error_message: record.error_message,
            sent_at: record.sent_at,
        })
    }
}

impl<'a> NewEmailRecord<'a> {
    pub fn from_domain(record: &'a DomainNewEmailRecord, now: NaiveDateTime) -> Self {
        Self {
            event_id: record.event_id.get(),
            kind: record.kind.as_str(),
            recipient: record.recipient.as_str(),
            subject: record.subject.as_str(),
            body: record.body.as_str(),
            success: record.success,
            error_message: record.error_message.as_deref(),
            sent_at: now,
        }
    }
}
