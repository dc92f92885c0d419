//! Domain aggregates exposed by the back-office service layer.

pub mod client;
pub mod email_history;
pub mod event;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod menu;
pub mod money;
pub mod pricing;
pub mod settings;
pub mod types;
