//! Service configuration

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Market service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Where accounts and catalogs are kept
    pub storage: StorageBackend,
    /// Apply bundled migrations at startup (postgres only)
    pub run_migrations: bool,
}

impl AppConfig {
    /// Load configuration from defaults overlaid with environment variables
    ///
    /// # Environment Variables
    /// - `MARKET_HOST`: Interface to bind (default: "0.0.0.0")
    /// - `MARKET_PORT`: Port to listen on (default: 5000)
    /// - `MARKET_STORAGE`: `postgres` or `memory` (default: "postgres")
    /// - `MARKET_RUN_MIGRATIONS`: Apply migrations at startup (default: true)
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000_i64)?
            .set_default("storage", "postgres")?
            .set_default("run_migrations", true)?
            .add_source(Environment::with_prefix("MARKET").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Socket address to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("MARKET_HOST");
            std::env::remove_var("MARKET_PORT");
            std::env::remove_var("MARKET_STORAGE");
            std::env::remove_var("MARKET_RUN_MIGRATIONS");
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = AppConfig::load().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert!(config.run_migrations);
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("MARKET_HOST", "127.0.0.1");
            std::env::set_var("MARKET_PORT", "8080");
            std::env::set_var("MARKET_STORAGE", "memory");
            std::env::set_var("MARKET_RUN_MIGRATIONS", "false");
        }

        let config = AppConfig::load().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(!config.run_migrations);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unknown_storage_is_rejected() {
        clear_env();
        unsafe {
            std::env::set_var("MARKET_STORAGE", "mongo");
        }

        assert!(AppConfig::load().is_err());

        clear_env();
    }
}
