//! Database models shared across the back-office repository.

#[cfg(feature = "server")]
pub mod auth;
pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod email_history;
pub mod event;
pub mod menu;
pub mod settings;
