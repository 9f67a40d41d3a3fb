use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;

/// Errors raised while reading [`ServerConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// Everything except the database and auth service locations has a default
/// suitable for running locally.
///
/// The server acts for whoever the process-wide session store holds, so it
/// only binds to a loopback address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`). Must be a loopback IP.
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub database_url: String,
    /// Base URL of the hosted auth/database project.
    pub supabase_url: String,
    /// Public anon key sent with every auth request.
    pub supabase_anon_key: String,
    /// Where the signed-in session is kept between runs.
    pub session_file: PathBuf,
    /// Upper bound on the initial session fetch (default: `10`).
    pub session_fetch_timeout_secs: u64,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                  |
    /// |------------------------------|--------------------------|
    /// | `HOST`                       | `127.0.0.1`              |
    /// | `PORT`                       | `3000`                   |
    /// | `DATABASE_URL`               | required                 |
    /// | `SUPABASE_URL`               | required                 |
    /// | `SUPABASE_ANON_KEY`          | required                 |
    /// | `SESSION_FILE`               | `.budgetra/session.json` |
    /// | `SESSION_FETCH_TIMEOUT_SECS` | `10`                     |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:3000`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &'static str, default: &str| {
            lookup(name).unwrap_or_else(|| default.to_string())
        };
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let cors_origins = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let host = var("HOST", "127.0.0.1");
        if !is_loopback(&host) {
            return Err(ConfigError::Invalid {
                name: "HOST",
                value: host,
            });
        }

        Ok(Self {
            host,
            port: parse("PORT", var("PORT", "3000"))?,
            database_url: required("DATABASE_URL")?,
            supabase_url: required("SUPABASE_URL")?,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            session_file: PathBuf::from(var("SESSION_FILE", ".budgetra/session.json")),
            session_fetch_timeout_secs: parse_secs(
                "SESSION_FETCH_TIMEOUT_SECS",
                var("SESSION_FETCH_TIMEOUT_SECS", "10"),
            )?,
            request_timeout_secs: parse_secs(
                "REQUEST_TIMEOUT_SECS",
                var("REQUEST_TIMEOUT_SECS", "30"),
            )?,
            cors_origins,
        })
    }

    pub fn session_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.session_fetch_timeout_secs)
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

/// A timeout in whole seconds. Zero would expire immediately.
fn parse_secs(name: &'static str, value: String) -> Result<u64, ConfigError> {
    match parse(name, value.clone())? {
        0 => Err(ConfigError::Invalid { name, value }),
        secs => Ok(secs),
    }
}

fn is_loopback(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok_and(|addr| addr.is_loopback())
}
