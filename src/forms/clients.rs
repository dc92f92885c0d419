use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{ClientPatch, NewClient};
use crate::forms::{FormError, double_option};

#[derive(Debug, Clone, Deserialize, Validate)]
/// Payload for registering a client.
pub struct CreateClientForm {
    #[validate(length(max = 255))]
    pub full_name: String,
    #[validate(length(max = 50))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub company: Option<String>,
}

impl TryFrom<CreateClientForm> for NewClient {
    type Error = FormError;

    fn try_from(form: CreateClientForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewClient::try_new(
            form.full_name,
            form.phone,
            form.email,
            form.address,
            form.company,
        )?)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
/// Partial client update. Optional contact fields can be cleared with `null`.
pub struct UpdateClientForm {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
}

impl TryFrom<UpdateClientForm> for ClientPatch {
    type Error = FormError;

    fn try_from(form: UpdateClientForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(ClientPatch {
            full_name: form.full_name,
            phone: form.phone,
            email: form.email,
            address: form.address,
            company: form.company,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_form_normalizes_contact() {
        let form: CreateClientForm = serde_json::from_str(
            r#"{"full_name": " Ana Souza ", "phone": "11999990000", "email": " ANA@Example.com ", "company": "  "}"#,
        )
        .unwrap();

        let client = NewClient::try_from(form).unwrap();
        assert_eq!(client.full_name.as_str(), "Ana Souza");
        assert_eq!(client.email.unwrap().as_str(), "ana@example.com");
        assert_eq!(client.company, None);
    }

    #[test]
    fn create_form_rejects_missing_name_and_bad_email() {
        let blank = CreateClientForm {
            full_name: " ".into(),
            phone: "1".into(),
            email: None,
            address: None,
            company: None,
        };
        assert_eq!(
            NewClient::try_from(blank).unwrap_err().to_string(),
            "full name is required"
        );

        let bad_email = CreateClientForm {
            full_name: "Ana".into(),
            phone: "1".into(),
            email: Some("not-an-email".into()),
            address: None,
            company: None,
        };
        assert!(NewClient::try_from(bad_email).is_err());
    }

    #[test]
    fn update_form_can_clear_email() {
        let form: UpdateClientForm = serde_json::from_str(r#"{"email": null}"#).unwrap();
        let patch = ClientPatch::try_from(form).unwrap();
        assert_eq!(patch.email, Some(None));
        assert_eq!(patch.full_name, None);
    }
}
