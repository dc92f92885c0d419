//! Use cases of the back office, independent of HTTP.

use thiserror::Error;

use crate::domain::client::DuplicateFields;
use crate::models::auth::AuthenticatedUser;
use crate::notifications::NotificationError;
use crate::repository::errors::RepositoryError;

pub mod clients;
pub mod events;
pub mod menus;
pub mod notifications;
pub mod reports;
pub mod settings;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Cliente já cadastrado com: {0}")]
    Duplicate(DuplicateFields),

    #[error("{0}")]
    ScheduleConflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Erro ao enviar e-mail: {0}")]
    Downstream(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound("record not found".into()),
            RepositoryError::Reference(_) | RepositoryError::Invalid(_) => {
                ServiceError::Validation(err.to_string())
            }
            other => ServiceError::Repository(other),
        }
    }
}

impl From<NotificationError> for ServiceError {
    fn from(err: NotificationError) -> Self {
        ServiceError::Downstream(err.to_string())
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless the user carries `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if user.has_role(role) {
        Ok(())
    } else {
        log::warn!("User {} lacks role {role}", user.email);
        Err(ServiceError::Unauthorized)
    }
}
