//! Flat key/value operational settings.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Comma-separated recipients of the daily agenda.
pub const AGENDA_RECIPIENTS: &str = "agenda_recipients";
/// Time of day the external scheduler triggers the agenda, informational.
pub const AGENDA_TIME: &str = "agenda_time";
pub const AGENDA_SUBJECT: &str = "agenda_subject";
pub const AGENDA_MESSAGE: &str = "agenda_message";
/// Tera template overriding the proposal email body.
pub const PROPOSAL_TEMPLATE: &str = "proposal_template";
pub const UPDATE_TEMPLATE: &str = "update_template";
pub const REMINDER_TEMPLATE: &str = "reminder_template";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

impl NewSetting {
    /// Keys are trimmed and must be non-empty; values are stored verbatim.
    pub fn try_new(
        key: impl Into<String>,
        value: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(TypeConstraintError::MissingField("setting key"));
        }
        Ok(Self {
            key,
            value: value.into(),
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }
}

/// Splits a comma or semicolon separated recipient list.
pub fn parse_recipients(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_are_split_and_trimmed() {
        assert_eq!(
            parse_recipients(" a@x.com, b@x.com;; ,c@x.com "),
            vec!["a@x.com", "b@x.com", "c@x.com"]
        );
        assert!(parse_recipients("  ").is_empty());
    }

    #[test]
    fn setting_key_is_required() {
        assert!(NewSetting::try_new("  ", "v", None).is_err());
        let setting = NewSetting::try_new(" agenda_time ", "07:00", Some(" ".into())).unwrap();
        assert_eq!(setting.key, "agenda_time");
        assert_eq!(setting.description, None);
    }
}
