//! Pie chart of total presence per weekday.
//!
//! The backend already aggregates and labels the rows, so they go into the
//! table as received.

use std::sync::Arc;

use serde_json::{Value, json};

use super::{ChartSpec, Widget, WidgetError};
use crate::api::{PresenceApi, UserId};
use crate::chart::{ChartKind, DataTable};

#[cfg(test)]
#[path = "weekday_test.rs"]
mod tests;

pub struct WeekdayWidget {
    api: Arc<dyn PresenceApi>,
}

impl WeekdayWidget {
    #[must_use]
    pub fn new(api: Arc<dyn PresenceApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Widget for WeekdayWidget {
    fn name(&self) -> &'static str {
        "weekday"
    }

    async fn prepare(&self, user_id: UserId) -> Result<ChartSpec, WidgetError> {
        let rows: Vec<Vec<Value>> = self.api.presence_weekday(user_id).await?;
        Ok(ChartSpec { kind: ChartKind::PieChart, table: DataTable::from_array(&rows)?, options: json!({}) })
    }
}
