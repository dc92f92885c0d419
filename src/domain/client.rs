use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientEmail, ClientId, ClientName, PhoneNumber, TypeConstraintError, sanitize_optional_text,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub full_name: ClientName,
    pub phone: PhoneNumber,
    pub email: Option<ClientEmail>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated payload for inserting a client.
#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub full_name: ClientName,
    pub phone: PhoneNumber,
    pub email: Option<ClientEmail>,
    pub address: Option<String>,
    pub company: Option<String>,
}

impl NewClient {
    /// Normalizes raw input: trims values, lowercases the email and drops
    /// blank optional fields.
    pub fn try_new(
        full_name: impl Into<String>,
        phone: impl Into<String>,
        email: Option<String>,
        address: Option<String>,
        company: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            full_name: ClientName::new(full_name)?,
            phone: PhoneNumber::new(phone)?,
            email: optional_email(email)?,
            address: sanitize_optional_text(address),
            company: sanitize_optional_text(company),
        })
    }

    /// Contact values used by the duplicate check.
    pub fn probe(&self) -> ContactProbe {
        ContactProbe::new(
            self.full_name.as_str(),
            self.phone.as_str(),
            self.email.as_ref().map(ClientEmail::as_str),
        )
    }
}

/// Full replacement record for an existing client.
pub type UpdateClient = NewClient;

/// Partial update of a client. `None` keeps the stored value; for optional
/// fields `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientPatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub company: Option<Option<String>>,
}

impl ClientPatch {
    /// Merges the patch over the stored client and validates the result.
    pub fn apply(self, current: &Client) -> Result<UpdateClient, TypeConstraintError> {
        NewClient::try_new(
            self.full_name
                .unwrap_or_else(|| current.full_name.as_str().to_string()),
            self.phone
                .unwrap_or_else(|| current.phone.as_str().to_string()),
            self.email
                .unwrap_or_else(|| current.email.as_ref().map(|e| e.as_str().to_string())),
            self.address.unwrap_or_else(|| current.address.clone()),
            self.company.unwrap_or_else(|| current.company.clone()),
        )
    }
}

fn optional_email(email: Option<String>) -> Result<Option<ClientEmail>, TypeConstraintError> {
    match email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()) {
        Some(email) => ClientEmail::new(email).map(Some),
        None => Ok(None),
    }
}

/// Normalized contact values compared by the duplicate check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactProbe {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl ContactProbe {
    pub fn new(name: &str, phone: &str, email: Option<&str>) -> Self {
        Self {
            name: normalize(name),
            phone: normalize(phone),
            email: email.map(normalize).filter(|e| !e.is_empty()),
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Which contact fields of a candidate collide with existing clients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateFields {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub phone: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub email: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub name_and_phone: bool,
}

impl DuplicateFields {
    pub fn any(&self) -> bool {
        self.phone || self.email || self.name_and_phone
    }
}

impl Display for DuplicateFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = [
            (self.phone, "telefone"),
            (self.email, "e-mail"),
            (self.name_and_phone, "nome completo + telefone"),
        ]
        .into_iter()
        .filter_map(|(flag, label)| flag.then_some(label))
        .collect();
        f.write_str(&labels.join(", "))
    }
}

/// Compares the probe against existing clients, skipping `exclude`.
///
/// Each flag is set independently; `None` means no collision at all.
pub fn find_duplicates(
    probe: &ContactProbe,
    candidates: &[Client],
    exclude: Option<ClientId>,
) -> Option<DuplicateFields> {
    let mut found = DuplicateFields::default();

    for client in candidates.iter().filter(|c| Some(c.id) != exclude) {
        let same_phone = normalize(client.phone.as_str()) == probe.phone;
        if same_phone {
            found.phone = true;
            if normalize(client.full_name.as_str()) == probe.name {
                found.name_and_phone = true;
            }
        }
        if let (Some(wanted), Some(existing)) = (&probe.email, &client.email) {
            if normalize(existing.as_str()) == *wanted {
                found.email = true;
            }
        }
    }

    found.any().then_some(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn client(id: i32, name: &str, phone: &str, email: Option<&str>) -> Client {
        let now = Utc::now().naive_utc();
        Client {
            id: ClientId::new(id).unwrap(),
            full_name: ClientName::new(name).unwrap(),
            phone: PhoneNumber::new(phone).unwrap(),
            email: email.map(|e| ClientEmail::new(e).unwrap()),
            address: None,
            company: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_client_is_normalized() {
        let new = NewClient::try_new(
            "  Maria Souza ",
            " (13) 99999-0000 ",
            Some("  Maria@Example.com ".into()),
            Some("   ".into()),
            Some("Acme".into()),
        )
        .unwrap();

        assert_eq!(new.full_name.as_str(), "Maria Souza");
        assert_eq!(new.phone.as_str(), "(13) 99999-0000");
        assert_eq!(new.email.unwrap().as_str(), "maria@example.com");
        assert_eq!(new.address, None);
        assert_eq!(new.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn new_client_requires_name_and_phone() {
        assert_eq!(
            NewClient::try_new("", "123", None, None, None).unwrap_err(),
            TypeConstraintError::MissingField("full name")
        );
        assert_eq!(
            NewClient::try_new("Ana", " ", None, None, None).unwrap_err(),
            TypeConstraintError::MissingField("phone")
        );
        assert_eq!(
            NewClient::try_new("Ana", "1", Some("bad".into()), None, None).unwrap_err(),
            TypeConstraintError::InvalidEmail
        );
    }

    #[test]
    fn patch_merges_over_current_values() {
        let mut current = client(1, "Ana", "111", Some("ana@example.com"));
        current.company = Some("Old Co".into());

        let patch = ClientPatch {
            phone: Some("222".into()),
            email: Some(None),
            ..Default::default()
        };
        let merged = patch.apply(&current).unwrap();

        assert_eq!(merged.full_name.as_str(), "Ana");
        assert_eq!(merged.phone.as_str(), "222");
        assert_eq!(merged.email, None);
        assert_eq!(merged.company.as_deref(), Some("Old Co"));
    }

    #[test]
    fn no_duplicates_for_brand_new_contact() {
        let probe = ContactProbe::new("Ana", "111", Some("ana@example.com"));
        assert_eq!(find_duplicates(&probe, &[], None), None);

        let others = [client(1, "Bruno", "222", Some("bruno@example.com"))];
        assert_eq!(find_duplicates(&probe, &others, None), None);
    }

    #[test]
    fn phone_only_match() {
        let existing = [client(1, "Bruno", "111", None)];
        let probe = ContactProbe::new("Ana", "111", None);

        let found = find_duplicates(&probe, &existing, None).unwrap();
        assert_eq!(
            found,
            DuplicateFields {
                phone: true,
                ..Default::default()
            }
        );
        assert_eq!(serde_json::to_value(found).unwrap(), serde_json::json!({"phone": true}));
    }

    #[test]
    fn name_and_phone_match_sets_both_flags() {
        let existing = [client(1, "Ana Lima", "111", Some("other@example.com"))];
        let probe = ContactProbe::new("  ANA LIMA ", " 111 ", Some("ana@example.com"));

        let found = find_duplicates(&probe, &existing, None).unwrap();
        assert!(found.phone);
        assert!(found.name_and_phone);
        assert!(!found.email);
        assert_eq!(found.to_string(), "telefone, nome completo + telefone");
    }

    #[test]
    fn email_match_is_case_insensitive() {
        let existing = [client(1, "Bruno", "999", Some("ana@example.com"))];
        let probe = ContactProbe::new("Ana", "111", Some("ANA@example.com"));

        let found = find_duplicates(&probe, &existing, None).unwrap();
        assert!(found.email);
        assert!(!found.phone);
        assert_eq!(found.to_string(), "e-mail");
    }

    #[test]
    fn excluded_client_is_ignored() {
        let existing = [client(7, "Ana", "111", Some("ana@example.com"))];
        let probe = ContactProbe::new("Ana", "111", Some("ana@example.com"));

        assert_eq!(
            find_duplicates(&probe, &existing, ClientId::new(7).ok()),
            None
        );
    }
}
