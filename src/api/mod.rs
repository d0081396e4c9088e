//! API — read-only client for the presence-analyzer backend.
//!
//! DESIGN
//! ======
//! Widgets depend on the `PresenceApi` capability rather than on a concrete
//! HTTP client, so they can be driven by stubs in tests. `HttpPresenceApi`
//! is the production implementation over `reqwest`.

pub mod http;
pub mod types;

pub use http::HttpPresenceApi;
pub use types::{ApiError, MeanTimeRow, PresenceInterval, UserId, UserRef};

use serde_json::Value;

// =============================================================================
// CAPABILITY
// =============================================================================

/// Backend endpoints consumed by the selector and the chart widgets.
#[async_trait::async_trait]
pub trait PresenceApi: Send + Sync {
    /// `GET /api/v1/users`
    async fn users(&self) -> Result<Vec<UserRef>, ApiError>;

    /// `GET /api/v1/presence_start_end/{user_id}`
    async fn presence_start_end(&self, user_id: UserId) -> Result<Vec<PresenceInterval>, ApiError>;

    /// `GET /api/v1/presence_weekday/{user_id}`
    ///
    /// Rows are returned untouched; the first row is conventionally a header.
    async fn presence_weekday(&self, user_id: UserId) -> Result<Vec<Vec<Value>>, ApiError>;

    /// `GET /api/v1/mean_time_weekday/{user_id}`
    async fn mean_time_weekday(&self, user_id: UserId) -> Result<Vec<MeanTimeRow>, ApiError>;
}
