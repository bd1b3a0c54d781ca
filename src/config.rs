use crate::error::ConfigError;
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:55123";
pub const DEFAULT_LIMIT_PATH: &str = "/limit";

/// Runtime configuration for talking to the exporter.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub limit_path: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - RLEX_URL (default: http://localhost:55123)
    /// - RLEX_LIMIT_PATH (default: /limit)
    /// - RLEX_HTTP_TIMEOUT_SECS (default: 30)
    /// - RLEX_INTERVAL_SECS (default: 300)
    /// - RLEX_USER_AGENT (default: rlex-status/<version>)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: u64| {
            get(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Self {
            base_url: get("RLEX_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            limit_path: get("RLEX_LIMIT_PATH").unwrap_or_else(|| DEFAULT_LIMIT_PATH.to_string()),
            user_agent: get("RLEX_USER_AGENT")
                .unwrap_or_else(|| format!("rlex-status/{}", env!("CARGO_PKG_VERSION"))),
            timeout_secs: secs("RLEX_HTTP_TIMEOUT_SECS", 30),
            interval_secs: secs("RLEX_INTERVAL_SECS", 300),
        }
    }

    /// Full URL of the limit endpoint.
    pub fn limit_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let base = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base.scheme())));
        }
        // Url::join would drop the last base segment without a trailing slash.
        let mut joined = base.as_str().trim_end_matches('/').to_string();
        if !self.limit_path.starts_with('/') {
            joined.push('/');
        }
        joined.push_str(&self.limit_path);
        Url::parse(&joined).map_err(|e| invalid(e.to_string()))
    }

    pub fn interval(&self) -> Result<Duration, ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(Duration::from_secs(self.interval_secs))
    }
}
