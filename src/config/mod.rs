//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `EVENTS` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use events_subscriptions::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod pdp;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use pdp::PdpSettings;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Policy decision point configuration
    pub pdp: PdpSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present (development), then reads
    /// environment variables with the `EVENTS` prefix, using `__` to
    /// separate nested values:
    ///
    /// - `EVENTS__DATABASE__URL=postgres://...` -> `database.url`
    /// - `EVENTS__PDP__DECISION_ENDPOINT=https://...` -> `pdp.decision_endpoint`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required values are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("EVENTS").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.pdp.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_checks_every_section() {
        let config = AppConfig {
            database: DatabaseConfig {
                url: "postgres://localhost/events".to_string(),
                min_connections: 1,
                max_connections: 10,
                acquire_timeout_secs: 30,
                run_migrations: false,
            },
            pdp: PdpSettings {
                decision_endpoint: "https://pdp.example.com/decision".to_string(),
                timeout_secs: 5,
            },
        };
        assert!(config.validate().is_ok());

        let mut broken = config.clone();
        broken.pdp.decision_endpoint.clear();
        assert!(broken.validate().is_err());
    }
}
