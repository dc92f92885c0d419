use serde::Serialize;

use crate::domain::event::{Event, EventSummary};

/// Filtered events with their status counts and revenue.
#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    pub events: Vec<Event>,
    pub summary: EventSummary,
}
