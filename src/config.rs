//! Client configuration parsed from environment variables.

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceConfig {
    /// Backend root, without trailing slash.
    pub base_url: String,
    /// `None` leaves requests without a deadline.
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl PresenceConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `PRESENCE_BASE_URL`: default `http://127.0.0.1:5000`
    /// - `PRESENCE_REQUEST_TIMEOUT_SECS`: unset means no timeout
    /// - `PRESENCE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is set but not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("PRESENCE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let request_timeout_secs = env_parse_u64("PRESENCE_REQUEST_TIMEOUT_SECS")?;
        let connect_timeout_secs =
            env_parse_u64("PRESENCE_CONNECT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(Self::new(base_url, request_timeout_secs, connect_timeout_secs))
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>, request_timeout_secs: Option<u64>, connect_timeout_secs: u64) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, request_timeout_secs, connect_timeout_secs }
    }

    /// Replace each setting that has an override; the rest stay as read.
    #[must_use]
    pub fn with_overrides(
        self,
        base_url: Option<String>,
        request_timeout_secs: Option<u64>,
        connect_timeout_secs: Option<u64>,
    ) -> Self {
        Self::new(
            base_url.unwrap_or(self.base_url),
            request_timeout_secs.or(self.request_timeout_secs),
            connect_timeout_secs.unwrap_or(self.connect_timeout_secs),
        )
    }
}

fn env_parse_u64(var: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
