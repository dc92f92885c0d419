use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::sanitize_optional_text;
use crate::forms::FormError;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
/// Optional operator message added to a proposal or update email.
pub struct SendEventEmailForm {
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: Option<String>,
}

impl SendEventEmailForm {
    /// Sanitized message, `None` when blank.
    pub fn into_message(self) -> Result<Option<String>, FormError> {
        self.validate()?;
        Ok(sanitize_optional_text(self.message))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
/// Body of `POST /agenda/send`.
pub struct SendAgendaForm {
    pub date: NaiveDate,
    /// Overrides the configured recipients when present.
    #[serde(default)]
    #[validate(length(min = 1), custom(function = "validate_recipients"))]
    pub recipients: Option<Vec<String>>,
}

fn validate_recipients(recipients: &[String]) -> Result<(), validator::ValidationError> {
    use validator::ValidateEmail;

    if recipients.iter().all(|r| r.trim().validate_email()) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("email"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Body of `POST /reminders/send`; defaults to the current day.
pub struct SendRemindersForm {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}
