//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::session::DEFAULT_SESSION_TTL;

/// Admin web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Agent provider API base URL.
    pub agent_api_url: String,
    /// Agent provider API key.
    pub agent_api_key: String,
    /// Directory of static dashboard assets.
    pub static_dir: String,
    /// How long a sign-in stays valid.
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:storyteller.db?mode=rwc` |
    /// | `AGENT_API_URL` | Agent provider base URL | `https://api.retellai.com` |
    /// | `AGENT_API_KEY` | Agent provider API key | (required) |
    /// | `STATIC_DIR` | Static asset directory | `static` |
    /// | `SESSION_TTL_SECS` | Session lifetime in seconds | `43200` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("ADMIN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = lookup("SQLITE_PATH")
            .unwrap_or_else(|| "sqlite:storyteller.db?mode=rwc".to_string());

        let agent_api_url = lookup("AGENT_API_URL")
            .unwrap_or_else(|| agent_provider::config::DEFAULT_BASE_URL.to_string());

        let agent_api_key = lookup("AGENT_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingAgentApiKey)?;

        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string());

        let session_ttl = match lookup("SESSION_TTL_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidSessionTtl)?,
            None => DEFAULT_SESSION_TTL,
        };

        Ok(Self {
            addr,
            database_url,
            agent_api_url,
            agent_api_key,
            static_dir,
            session_ttl,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,

    #[error("AGENT_API_KEY environment variable is required")]
    MissingAgentApiKey,

    #[error("SESSION_TTL_SECS must be a positive number of seconds")]
    InvalidSessionTtl,
}
