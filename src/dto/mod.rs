//! DTOs that bridge services with the JSON API.

pub mod events;
pub mod notifications;
pub mod reports;
