//! JSON payloads accepted by the API routes.

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;
use crate::services::ServiceError;

pub mod clients;
pub mod events;
pub mod menus;
pub mod notifications;
pub mod settings;

#[derive(Debug, Error)]
/// Errors that can occur when processing request payloads.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

/// Keeps an explicit `null` apart from an absent field.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: a missing
/// key yields `None`, `null` yields `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
