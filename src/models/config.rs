//! Configuration model loaded from external sources.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers and the dispatch worker.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// ZeroMQ endpoint of the mail relay subscriber.
    pub zmq_emailer_pub: String,
    /// Shared secret used to sign session cookies and verify identity tokens.
    pub secret: String,
    pub auth_service_url: String,
    /// Venue name printed on proposals and agendas.
    pub venue_name: String,
}

impl ServerConfig {
    /// Loads `config/default.yaml`, the optional `config/{APP_ENV}.yaml`
    /// overlay and `APP_*` environment variables, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
