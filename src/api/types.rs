//! Wire types for the presence-analyzer endpoints.
//!
//! Interval and mean-time rows arrive as positional JSON arrays
//! (`["Mon", 32400, 61200]`), so they deserialize from tuples.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("response parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// USERS
// =============================================================================

/// Backend user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

/// Entry of `GET /api/v1/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "user_id")]
    pub id: UserId,
    #[serde(rename = "name")]
    pub display_name: String,
}

// =============================================================================
// PRESENCE ROWS
// =============================================================================

/// One weekday's usual start and end, in seconds since midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, i64, i64)", into = "(String, i64, i64)")]
pub struct PresenceInterval {
    pub weekday: String,
    pub start_offset_secs: i64,
    pub end_offset_secs: i64,
}

impl From<(String, i64, i64)> for PresenceInterval {
    fn from((weekday, start_offset_secs, end_offset_secs): (String, i64, i64)) -> Self {
        Self { weekday, start_offset_secs, end_offset_secs }
    }
}

impl From<PresenceInterval> for (String, i64, i64) {
    fn from(interval: PresenceInterval) -> Self {
        (interval.weekday, interval.start_offset_secs, interval.end_offset_secs)
    }
}

/// One weekday's mean presence duration. The backend sends a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)", into = "(String, f64)")]
pub struct MeanTimeRow {
    pub weekday: String,
    pub mean_secs: f64,
}

impl From<(String, f64)> for MeanTimeRow {
    fn from((weekday, mean_secs): (String, f64)) -> Self {
        Self { weekday, mean_secs }
    }
}

impl From<MeanTimeRow> for (String, f64) {
    fn from(row: MeanTimeRow) -> Self {
        (row.weekday, row.mean_secs)
    }
}
