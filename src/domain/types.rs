//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, well-formed `HH:MM` times) so that once a value
//! reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// A named field was missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// A named numeric field must be strictly positive.
    #[error("{0} must be greater than zero")]
    NonPositiveValue(&'static str),
    /// A named numeric field must not be negative.
    #[error("{0} cannot be negative")]
    NegativeValue(&'static str),
    /// A named numeric field exceeded its upper bound.
    #[error("{0} is too large")]
    ValueTooLarge(&'static str),
    /// Time of day was not a valid `HH:MM` string.
    #[error("time must use the HH:MM format")]
    InvalidTime,
    /// Stored or submitted text did not match any known variant.
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Strips markup from operator-entered free text, dropping blank results.
pub fn sanitize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| ammonia::clean(text.trim()).trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ClientId, "Unique identifier for a client.");
id_newtype!(MenuId, "Unique identifier for a menu.");
id_newtype!(DishId, "Unique identifier for a dish of a menu.");
id_newtype!(EventId, "Unique identifier for a scheduled event.");
id_newtype!(WineLineId, "Unique identifier for a wine line of an event.");
id_newtype!(SnapshotDishId, "Unique identifier for a dish frozen on an event.");
id_newtype!(EmailRecordId, "Unique identifier for a send-history entry.");

/// Generates an enum persisted as snake_case text.
macro_rules! text_enum {
    (
        $(#[$meta:meta])* $name:ident, $kind:expr,
        { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Storage representation of the variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::types::TypeConstraintError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::domain::types::TypeConstraintError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::types::TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use text_enum;

/// Lower-cased and validated email address of a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientEmail(String);

impl ClientEmail {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ClientEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClientEmail {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ClientEmail {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientEmail> for String {
    fn from(value: ClientEmail) -> Self {
        value.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $field:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Trims whitespace and rejects empty inputs.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::MissingField($field));
                }
                Ok(Self(trimmed))
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper returning the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(ClientName, "full name", "Trimmed, non-empty client full name.");
non_empty_string_newtype!(PhoneNumber, "phone", "Trimmed, non-empty contact phone.");
non_empty_string_newtype!(MenuName, "menu name", "Trimmed, non-empty menu name.");
non_empty_string_newtype!(DishName, "dish name", "Trimmed, non-empty dish name.");
non_empty_string_newtype!(EventType, "event type", "Free-text kind of event (wedding, dinner, ...).");
non_empty_string_newtype!(WineName, "wine name", "Trimmed, non-empty wine label of a line item.");

/// Time of day stored as minutes past midnight, rendered as zero-padded `HH:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Builds a time from its components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TypeConstraintError> {
        if hour > 23 || minute > 59 {
            return Err(TypeConstraintError::InvalidTime);
        }
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Parses a strict, zero-padded 24-hour `HH:MM` string.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let bytes = value.trim().as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(TypeConstraintError::InvalidTime);
        }
        let digit = |b: u8| -> Result<u8, TypeConstraintError> {
            if b.is_ascii_digit() {
                Ok(b - b'0')
            } else {
                Err(TypeConstraintError::InvalidTime)
            }
        };
        let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
        let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;
        Self::new(hour, minute)
    }

    /// Offset from midnight in minutes.
    pub const fn minutes(self) -> i32 {
        self.0 as i32
    }

    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    pub const fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(ClientId::new(1).is_ok());
        assert_eq!(EventId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(MenuId::new(-3), Err(TypeConstraintError::NonPositiveId));
    }

    #[test]
    fn client_email_is_trimmed_and_lowercased() {
        let email = ClientEmail::new("  Ana@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
        assert_eq!(
            ClientEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn blank_names_report_the_field() {
        let err = ClientName::new("   ").unwrap_err();
        assert_eq!(err.to_string(), "full name is required");
        assert_eq!(WineName::new(" Malbec ").unwrap().as_str(), "Malbec");
    }

    #[test]
    fn time_of_day_parses_strict_format() {
        let time = TimeOfDay::parse("14:05").unwrap();
        assert_eq!(time.minutes(), 14 * 60 + 5);
        assert_eq!(time.to_string(), "14:05");
        assert_eq!(TimeOfDay::parse("00:00").unwrap().minutes(), 0);
        assert_eq!(TimeOfDay::parse("23:59").unwrap().minutes(), 1439);

        for bad in ["24:00", "12:60", "9:30", "09-30", "ab:cd", "", "12:300"] {
            assert_eq!(
                TimeOfDay::parse(bad),
                Err(TypeConstraintError::InvalidTime),
                "{bad}"
            );
        }
    }

    #[test]
    fn time_of_day_serializes_as_string() {
        let time = TimeOfDay::new(8, 0).unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"08:00\"");
        let parsed: TimeOfDay = serde_json::from_str("\"19:30\"").unwrap();
        assert_eq!(parsed, TimeOfDay::new(19, 30).unwrap());
        assert!(serde_json::from_str::<TimeOfDay>("\"7pm\"").is_err());
    }

    #[test]
    fn sanitize_optional_text_strips_markup_and_blanks() {
        assert_eq!(sanitize_optional_text(Some("   ".into())), None);
        assert_eq!(
            sanitize_optional_text(Some(" <script>x</script>Vegan guests ".into())),
            Some("Vegan guests".to_string())
        );
        assert_eq!(sanitize_optional_text(None), None);
    }
}
