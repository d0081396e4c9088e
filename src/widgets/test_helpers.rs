//! Stub backend and recording renderer shared by widget tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use crate::api::{ApiError, MeanTimeRow, PresenceApi, PresenceInterval, UserId, UserRef};
use crate::chart::{ChartError, ChartKind, ChartRenderer, DataTable};
use crate::view::ChartArea;

// =============================================================================
// STUB API
// =============================================================================

#[derive(Default)]
pub struct StubApi {
    pub users: Vec<UserRef>,
    pub intervals: HashMap<UserId, Vec<PresenceInterval>>,
    pub weekday_rows: HashMap<UserId, Vec<Vec<Value>>>,
    pub mean_rows: HashMap<UserId, Vec<MeanTimeRow>>,
    pub delays: HashMap<UserId, Duration>,
    pub fail: bool,
    pub calls: Mutex<Vec<(&'static str, Option<UserId>)>>,
}

impl StubApi {
    pub fn calls(&self) -> Vec<(&'static str, Option<UserId>)> {
        self.calls.lock().unwrap().clone()
    }

    async fn hit(&self, endpoint: &'static str, user_id: Option<UserId>) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push((endpoint, user_id));
        if let Some(delay) = user_id.and_then(|id| self.delays.get(&id)) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(ApiError::Status { status: 500, body: "stub failure".into() });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PresenceApi for StubApi {
    async fn users(&self) -> Result<Vec<UserRef>, ApiError> {
        self.hit("users", None).await?;
        Ok(self.users.clone())
    }

    async fn presence_start_end(&self, user_id: UserId) -> Result<Vec<PresenceInterval>, ApiError> {
        self.hit("presence_start_end", Some(user_id)).await?;
        Ok(self.intervals.get(&user_id).cloned().unwrap_or_default())
    }

    async fn presence_weekday(&self, user_id: UserId) -> Result<Vec<Vec<Value>>, ApiError> {
        self.hit("presence_weekday", Some(user_id)).await?;
        Ok(self.weekday_rows.get(&user_id).cloned().unwrap_or_default())
    }

    async fn mean_time_weekday(&self, user_id: UserId) -> Result<Vec<MeanTimeRow>, ApiError> {
        self.hit("mean_time_weekday", Some(user_id)).await?;
        Ok(self.mean_rows.get(&user_id).cloned().unwrap_or_default())
    }
}

pub fn interval(weekday: &str, start: i64, end: i64) -> PresenceInterval {
    PresenceInterval { weekday: weekday.into(), start_offset_secs: start, end_offset_secs: end }
}

// =============================================================================
// RECORDING RENDERER
// =============================================================================

#[derive(Debug, Clone)]
pub struct Drawn {
    pub container: &'static str,
    pub kind: ChartKind,
    pub table: DataTable,
    pub options: Value,
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub draws: Mutex<Vec<Drawn>>,
}

impl RecordingRenderer {
    pub fn draws(&self) -> Vec<Drawn> {
        self.draws.lock().unwrap().clone()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn draw(
        &self,
        container: &ChartArea,
        kind: ChartKind,
        table: &DataTable,
        options: &Value,
    ) -> Result<(), ChartError> {
        self.draws.lock().unwrap().push(Drawn {
            container: container.id(),
            kind,
            table: table.clone(),
            options: options.clone(),
        });
        Ok(())
    }
}
