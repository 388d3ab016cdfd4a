//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `BILLING_*` environment variables, CLI flags or a config
//! file. Every field is optional; accessors apply the defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::billing::{DEFAULT_BILLING_BASE_URL, DEFAULT_BILLING_TIMEOUT};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE_HOST: &str = "localhost:5432";
const DEFAULT_DATABASE_NAME: &str = "billing";
const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/billing";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
#[error("invalid setting `{setting}`: {message}")]
pub struct SettingsError {
    setting: &'static str,
    message: String,
}

impl SettingsError {
    fn new(setting: &'static str, message: impl std::fmt::Display) -> Self {
        Self {
            setting,
            message: message.to_string(),
        }
    }
}

/// Configuration for the billing service binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BILLING")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Full PostgreSQL URL; when absent the URL is assembled from the
    /// `local-store` credentials plus host and database name.
    pub database_url: Option<String>,
    /// `host:port` of the local store.
    pub database_host: Option<String>,
    /// Database name of the local store.
    pub database_name: Option<String>,
    /// API root of the billing provider.
    pub provider_base_url: Option<String>,
    /// Billing provider request timeout in seconds.
    pub provider_timeout_secs: Option<u64>,
    /// Directory holding `<resource>.json` secret files.
    pub secrets_dir: Option<PathBuf>,
    /// Seconds to reuse resolved credentials; zero or absent resolves them
    /// on every request.
    pub credential_cache_ttl_secs: Option<u64>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Idle database connections kept open.
    pub pool_min_idle: Option<u32>,
}

impl AppSettings {
    /// Parsed bind address.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err| SettingsError::new("bind_addr", err))
    }

    /// Explicit database URL, if configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn database_host(&self) -> &str {
        self.database_host
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_HOST)
    }

    pub fn database_name(&self) -> &str {
        self.database_name
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_NAME)
    }

    /// Parsed billing provider API root.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the value is not an absolute URL.
    pub fn provider_base_url(&self) -> Result<Url, SettingsError> {
        Url::parse(
            self.provider_base_url
                .as_deref()
                .unwrap_or(DEFAULT_BILLING_BASE_URL),
        )
        .map_err(|err| SettingsError::new("provider_base_url", err))
    }

    pub fn provider_timeout(&self) -> Duration {
        self.provider_timeout_secs
            .map_or(DEFAULT_BILLING_TIMEOUT, Duration::from_secs)
    }

    pub fn secrets_dir(&self) -> &Path {
        self.secrets_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SECRETS_DIR))
    }

    /// Credential cache lifetime, or `None` when caching is disabled.
    pub fn credential_cache_ttl(&self) -> Option<Duration> {
        self.credential_cache_ttl_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}
