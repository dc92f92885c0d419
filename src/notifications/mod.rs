//! Outbound documents and email for event notifications.
//!
//! Proposals and agendas are rendered to PDF with `pdf-writer`, agendas and
//! reports to CSV, email bodies through Tera. Delivery goes through the
//! [`mailer::Mailer`] trait so services never talk to a transport directly.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::client::Client;
use crate::domain::event::Event;

pub mod mailer;
pub mod pdf;
pub mod spreadsheet;
pub mod templates;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("document error: {0}")]
    Document(String),

    #[error("mail transport error: {0}")]
    Transport(String),
}

impl From<csv::Error> for NotificationError {
    fn from(err: csv::Error) -> Self {
        NotificationError::Document(err.to_string())
    }
}

impl From<serde_json::Error> for NotificationError {
    fn from(err: serde_json::Error) -> Self {
        NotificationError::Transport(format!("cannot encode message: {err}"))
    }
}

/// An event on the agenda together with its client.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgendaEntry {
    pub event: Event,
    pub client: Client,
}

/// Brazilian `dd/mm/yyyy` date.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// File-name friendly `dd-mm-yyyy` date.
pub fn file_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_use_day_first() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(date), "07/03/2025");
        assert_eq!(file_date(date), "07-03-2025");
    }
}
