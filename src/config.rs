//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_SESSION_FILE: &str = ".encenape-session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin without the `/api` prefix and without a trailing slash.
    pub api_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Where a 401 sends the user.
    pub login_path: String,
    /// File backing the persisted session for native front ends.
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `api_url` with every other value defaulted.
    #[must_use]
    pub fn for_url(api_url: &str) -> Self {
        Self { api_url: normalize_url(api_url), ..Self::default() }
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ENCENAPE_API_URL`: default `http://localhost:8080`
    /// - `ENCENAPE_REQUEST_TIMEOUT_SECS`: default 10
    /// - `ENCENAPE_CONNECT_TIMEOUT_SECS`: default 5
    /// - `ENCENAPE_LOGIN_PATH`: default `/login`
    /// - `ENCENAPE_SESSION_FILE`: default `.encenape-session.json`
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is set but not an integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("ENCENAPE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let request_secs = env_parse_u64("ENCENAPE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let connect_secs = env_parse_u64("ENCENAPE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let login_path = env_nonblank("ENCENAPE_LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_owned());
        let session_file =
            env_nonblank("ENCENAPE_SESSION_FILE").map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self {
            api_url: normalize_url(&api_url),
            request_timeout: Duration::from_secs(request_secs),
            connect_timeout: Duration::from_secs(connect_secs),
            login_path,
            session_file,
        })
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api", self.api_url)
    }
}

fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_nonblank(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn env_parse_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(default),
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
