//! Column chart of mean presence time per weekday.

use std::sync::Arc;

use serde_json::json;

use super::{ChartSpec, TIME_PATTERN, Widget, WidgetError, offset_datetime};
use crate::api::{MeanTimeRow, PresenceApi, UserId};
use crate::chart::{CellValue, ChartKind, Column, ColumnType, DataTable, DateFormat};

#[cfg(test)]
#[path = "mean_time_test.rs"]
mod tests;

pub struct MeanTimeWidget {
    api: Arc<dyn PresenceApi>,
}

impl MeanTimeWidget {
    #[must_use]
    pub fn new(api: Arc<dyn PresenceApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Widget for MeanTimeWidget {
    fn name(&self) -> &'static str {
        "mean-time"
    }

    async fn prepare(&self, user_id: UserId) -> Result<ChartSpec, WidgetError> {
        let rows = self.api.mean_time_weekday(user_id).await?;
        Ok(ChartSpec {
            kind: ChartKind::ColumnChart,
            table: build_table(&rows)?,
            options: json!({ "hAxis": { "title": "Weekday" }, "legend": { "position": "none" } }),
        })
    }
}

/// `(Weekday, Mean time)`; fractional seconds are dropped.
///
/// # Errors
///
/// Returns an error if a mean does not fit a date-time.
#[allow(clippy::cast_possible_truncation)]
pub fn build_table(rows: &[MeanTimeRow]) -> Result<DataTable, WidgetError> {
    let mut table = DataTable::new();
    table.add_column(Column::new(ColumnType::String).with_label("Weekday"));
    let mean = table.add_column(Column::new(ColumnType::DateTime).with_label("Mean time (h:m:s)"));

    for row in rows {
        table.add_row(vec![
            CellValue::String(row.weekday.clone()),
            CellValue::DateTime(offset_datetime(row.mean_secs.trunc() as i64)?),
        ])?;
    }

    DateFormat::new(TIME_PATTERN)?.format(&mut table, mean)?;
    Ok(table)
}
