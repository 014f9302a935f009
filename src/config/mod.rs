//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `REVENUE_INTEL` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use revenue_intel::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod database;
mod error;
mod server;
mod storage;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Which backend the revenue data is read from
    #[serde(default)]
    pub storage: StorageConfig,

    /// PostgreSQL connection, required for the `postgres` backend
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `REVENUE_INTEL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `REVENUE_INTEL__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `REVENUE_INTEL__STORAGE__BACKEND=postgres` -> `storage.backend = postgres`
    /// - `REVENUE_INTEL__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REVENUE_INTEL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid, or
    /// if the `postgres` backend is selected without a `database` section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.storage.validate()?;
        match (&self.storage.backend, &self.database) {
            (StorageBackend::Postgres, None) => {
                return Err(ValidationError::MissingRequired("database.url"))
            }
            (_, Some(database)) => database.validate()?,
            (StorageBackend::Snapshot, None) => {}
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "REVENUE_INTEL__SERVER__PORT",
        "REVENUE_INTEL__SERVER__ENVIRONMENT",
        "REVENUE_INTEL__STORAGE__BACKEND",
        "REVENUE_INTEL__STORAGE__SNAPSHOT_DIR",
        "REVENUE_INTEL__DATABASE__URL",
        "REVENUE_INTEL__DATABASE__RUN_MIGRATIONS",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_need_no_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.storage.backend, StorageBackend::Snapshot);
        assert_eq!(config.storage.snapshot_dir, PathBuf::from("./data"));
        assert!(config.database.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REVENUE_INTEL__STORAGE__BACKEND", "postgres");
        env::set_var("REVENUE_INTEL__DATABASE__URL", "postgresql://test@localhost/revenue");
        env::set_var("REVENUE_INTEL__DATABASE__RUN_MIGRATIONS", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        let database = config.database.as_ref().unwrap();
        assert_eq!(database.url, "postgresql://test@localhost/revenue");
        assert!(database.run_migrations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_requires_database() {
        let config = AppConfig {
            storage: StorageConfig {
                backend: StorageBackend::Postgres,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("database.url"))
        );
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REVENUE_INTEL__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REVENUE_INTEL__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }
}
