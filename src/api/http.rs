//! `reqwest` implementation of `PresenceApi`.
//!
//! Thin HTTP wrapper: one GET per endpoint, status check, JSON decode.
//! No retries and no caching; every call hits the backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::PresenceApi;
use super::types::{ApiError, MeanTimeRow, PresenceInterval, UserId, UserRef};
use crate::config::PresenceConfig;

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpPresenceApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPresenceApi {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &PresenceConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fetching");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }

        parse_body(&text)
    }
}

#[async_trait::async_trait]
impl PresenceApi for HttpPresenceApi {
    async fn users(&self) -> Result<Vec<UserRef>, ApiError> {
        self.get_json("/api/v1/users").await
    }

    async fn presence_start_end(&self, user_id: UserId) -> Result<Vec<PresenceInterval>, ApiError> {
        self.get_json(&format!("/api/v1/presence_start_end/{user_id}")).await
    }

    async fn presence_weekday(&self, user_id: UserId) -> Result<Vec<Vec<Value>>, ApiError> {
        self.get_json(&format!("/api/v1/presence_weekday/{user_id}")).await
    }

    async fn mean_time_weekday(&self, user_id: UserId) -> Result<Vec<MeanTimeRow>, ApiError> {
        self.get_json(&format!("/api/v1/mean_time_weekday/{user_id}")).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}
