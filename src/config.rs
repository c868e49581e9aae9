//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const SESSION_DIR: &str = ".rentride";
const SESSION_FILE: &str = "session.json";
const FALLBACK_SESSION_FILE: &str = ".rentride-session.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown RENTRIDE_ON_UNAUTHORIZED: {0} (expected 'observe' or 'logout')")]
    UnknownPolicy(String),
}

/// What the API client does when the server answers `401`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnauthorizedPolicy {
    /// Log it and hand the error to the caller. The session stays.
    #[default]
    Observe,
    /// Also sign out through the auth context.
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
    pub on_unauthorized: UnauthorizedPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            session_file: default_session_file(std::env::var_os("HOME").map(PathBuf::from)),
            timeouts: Timeouts::default(),
            on_unauthorized: UnauthorizedPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `RENTRIDE_API_URL`: API base URL, default `http://localhost:5000/api/v1`
    /// - `RENTRIDE_SESSION_FILE`: default `$HOME/.rentride/session.json`
    /// - `RENTRIDE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `RENTRIDE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `RENTRIDE_ON_UNAUTHORIZED`: `observe` (default) or `logout`
    ///
    /// # Errors
    ///
    /// Returns an error if `RENTRIDE_ON_UNAUTHORIZED` names an unknown policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `RENTRIDE_ON_UNAUTHORIZED` names an unknown policy.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("RENTRIDE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| DEFAULT_API_URL.to_owned(), |v| normalize_base_url(&v));
        let session_file = lookup("RENTRIDE_SESSION_FILE")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_session_file(lookup("HOME").map(PathBuf::from)), PathBuf::from);
        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("RENTRIDE_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("RENTRIDE_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let on_unauthorized = parse_policy(lookup("RENTRIDE_ON_UNAUTHORIZED").as_deref())?;

        Ok(Self { api_url, session_file, timeouts, on_unauthorized })
    }

    #[must_use]
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = normalize_base_url(url);
        self
    }

    #[must_use]
    pub fn with_session_file(mut self, path: PathBuf) -> Self {
        self.session_file = path;
        self
    }
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

fn default_session_file(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) if !home.as_os_str().is_empty() => home.join(SESSION_DIR).join(SESSION_FILE),
        _ => PathBuf::from(FALLBACK_SESSION_FILE),
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

fn parse_policy(raw: Option<&str>) -> Result<UnauthorizedPolicy, ConfigError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "observe") => Ok(UnauthorizedPolicy::Observe),
        Some("logout") => Ok(UnauthorizedPolicy::Logout),
        Some(other) => Err(ConfigError::UnknownPolicy(other.to_owned())),
    }
}
