//! Library backend configuration loaded via OrthoConfig.
//!
//! Settings are layered from defaults, an optional configuration file,
//! `LIBRARY_*` environment variables and command-line flags. The database URL
//! falls back to the conventional `DATABASE_URL` variable.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DATABASE_URL_FALLBACK: &str = "DATABASE_URL";

/// Errors raised while turning settings into runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Neither `LIBRARY_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("database URL missing: set LIBRARY_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Connection settings for the library database.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LIBRARY")]
pub struct LibrarySettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Idle connections kept open.
    #[ortho_config(default = 2)]
    pub pool_min_idle: u32,
    /// Seconds to wait for a pooled connection.
    #[ortho_config(default = 30)]
    pub connection_timeout_secs: u64,
}

impl LibrarySettings {
    /// Resolve the database URL, preferring the layered setting.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no URL is configured.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                std::env::var(DATABASE_URL_FALLBACK)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Build the pool configuration described by these settings.
    ///
    /// A zero `pool_min_idle` disables idle connections.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no URL is configured.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let min_idle = Some(self.pool_min_idle).filter(|idle| *idle > 0);
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(self.pool_max_size)
            .with_min_idle(min_idle)
            .with_connection_timeout(Duration::from_secs(self.connection_timeout_secs)))
    }
}
