//! Timeline of each weekday's usual start and end of presence.

use std::sync::Arc;

use serde_json::json;

use super::{ChartSpec, TIME_PATTERN, Widget, WidgetError, offset_datetime};
use crate::api::{PresenceApi, PresenceInterval, UserId};
use crate::chart::{CellValue, ChartKind, Column, ColumnType, DataTable, DateFormat};

#[cfg(test)]
#[path = "timeline_test.rs"]
mod tests;

pub struct TimelineWidget {
    api: Arc<dyn PresenceApi>,
}

impl TimelineWidget {
    #[must_use]
    pub fn new(api: Arc<dyn PresenceApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Widget for TimelineWidget {
    fn name(&self) -> &'static str {
        "timeline"
    }

    async fn prepare(&self, user_id: UserId) -> Result<ChartSpec, WidgetError> {
        let intervals = self.api.presence_start_end(user_id).await?;
        Ok(ChartSpec {
            kind: ChartKind::Timeline,
            table: build_table(&intervals)?,
            options: json!({ "hAxis": { "title": "Weekday" } }),
        })
    }
}

/// `(Weekday, Start, End)` with both time columns formatted `HH:mm:ss`.
///
/// # Errors
///
/// Returns an error if an offset does not fit a date-time.
pub fn build_table(intervals: &[PresenceInterval]) -> Result<DataTable, WidgetError> {
    let mut table = DataTable::new();
    table.add_column(Column::new(ColumnType::String).with_label("Weekday"));
    let start = table.add_column(Column::new(ColumnType::DateTime).with_id("Start"));
    let end = table.add_column(Column::new(ColumnType::DateTime).with_id("End"));

    for interval in intervals {
        table.add_row(vec![
            CellValue::String(interval.weekday.clone()),
            CellValue::DateTime(offset_datetime(interval.start_offset_secs)?),
            CellValue::DateTime(offset_datetime(interval.end_offset_secs)?),
        ])?;
    }

    let formatter = DateFormat::new(TIME_PATTERN)?;
    formatter.format(&mut table, start)?;
    formatter.format(&mut table, end)?;
    Ok(table)
}
