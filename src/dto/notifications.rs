use chrono::NaiveDate;
use serde::Serialize;

/// Outcome of one reminder sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderSummary {
    pub sent: usize,
    pub failed: usize,
    /// Events whose client has no email address.
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaDispatch {
    pub date: NaiveDate,
    pub total_events: usize,
    pub recipients: Vec<String>,
}
