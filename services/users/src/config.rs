//! Service configuration
//!
//! Values are layered: built-in defaults, then an optional config file,
//! then environment variables (`HTTP_ADDR`, `REQUEST_TIMEOUT_SECS`,
//! `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `DATABASE_MIN_CONNECTIONS`,
//! `DATABASE_CONNECTION_TIMEOUT`). This is the only place those variables
//! are read.

use std::time::Duration;

use anyhow::{Context, Result};
use common::database::DatabaseConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Raw settings as read from the config sources
#[derive(Debug, Deserialize)]
struct Settings {
    http_addr: String,
    request_timeout_secs: u64,
    database_url: String,
    database_max_connections: u32,
    database_min_connections: u32,
    database_connection_timeout: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to
    pub http_addr: String,
    /// Deadline for a single user operation
    pub request_timeout: Duration,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load the configuration, reading `config_path` first when given.
    ///
    /// A given path that cannot be read is an error.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let db_defaults = DatabaseConfig::default();

        let mut builder = Config::builder()
            .set_default("http_addr", "0.0.0.0:8080")?
            .set_default("request_timeout_secs", 10)?
            .set_default("database_url", db_defaults.database_url)?
            .set_default("database_max_connections", db_defaults.max_connections)?
            .set_default("database_min_connections", db_defaults.min_connections)?
            .set_default("database_connection_timeout", db_defaults.connection_timeout)?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings: Settings = builder
            .add_source(Environment::default().try_parsing(true))
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        let database = DatabaseConfig {
            database_url: settings.database_url,
            max_connections: settings.database_max_connections,
            min_connections: settings.database_min_connections,
            connection_timeout: settings.database_connection_timeout,
        };
        database.validate()?;

        Ok(Self {
            http_addr: settings.http_addr,
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            database,
        })
    }
}
