//! Plain-text chart renderer for terminals.
//!
//! Timelines are drawn as bars over a 24-hour axis, pie charts as share
//! bars with percentages, column charts as bars scaled to the largest value.

use serde_json::Value;

use super::table::DataTable;
use super::{ChartError, ChartKind, ChartRenderer};
use crate::view::ChartArea;

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;

const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DEFAULT_WIDTH: usize = 48;

#[derive(Debug, Clone)]
pub struct TextRenderer {
    width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH }
    }
}

impl TextRenderer {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self { width: width.max(1) }
    }

    /// Render a chart to a string without printing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the table lacks the columns the chart kind reads.
    pub fn render(&self, kind: ChartKind, table: &DataTable, options: &Value) -> Result<String, ChartError> {
        let mut out = String::new();
        if let Some(title) = options.get("title").and_then(Value::as_str) {
            out.push_str(title);
            out.push('\n');
        }
        if let Some(axis) = options.pointer("/hAxis/title").and_then(Value::as_str) {
            out.push_str(&format!("[{axis}]\n"));
        }

        let lines = match kind {
            ChartKind::Timeline => self.timeline(table)?,
            ChartKind::PieChart => self.pie(table)?,
            ChartKind::ColumnChart => self.columns(table)?,
        };
        for line in lines {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        Ok(out)
    }

    fn timeline(&self, table: &DataTable) -> Result<Vec<String>, ChartError> {
        require_columns(table, 3)?;
        let label_width = label_width(table);
        let mut lines = Vec::with_capacity(table.num_rows());

        for row in table.rows() {
            let start = row[1].value.as_f64().unwrap_or(0.0);
            let end = row[2].value.as_f64().unwrap_or(0.0);
            let from = self.scale(start / SECONDS_PER_DAY);
            let to = self.scale(end / SECONDS_PER_DAY);

            let bar: String = (0..self.width)
                .map(|i| {
                    let inside = if from <= to { i >= from && i < to.max(from + 1) } else { i >= from || i < to };
                    if inside { '#' } else { '.' }
                })
                .collect();
            lines.push(format!(
                "{:<label_width$} |{bar}| {} - {}",
                row[0].display(),
                row[1].display(),
                row[2].display(),
            ));
        }
        Ok(lines)
    }

    fn pie(&self, table: &DataTable) -> Result<Vec<String>, ChartError> {
        require_columns(table, 2)?;
        let label_width = label_width(table);
        let total: f64 = table
            .rows()
            .iter()
            .filter_map(|row| row[1].value.as_f64())
            .filter(|v| *v > 0.0)
            .sum();

        let lines = table
            .rows()
            .iter()
            .map(|row| {
                let value = row[1].value.as_f64().unwrap_or(0.0).max(0.0);
                let share = if total > 0.0 { value / total } else { 0.0 };
                let bar = "#".repeat(self.scale(share));
                format!("{:<label_width$} {:>5.1}% {bar} ({})", row[0].display(), share * 100.0, row[1].display())
            })
            .collect();
        Ok(lines)
    }

    fn columns(&self, table: &DataTable) -> Result<Vec<String>, ChartError> {
        require_columns(table, 2)?;
        let label_width = label_width(table);
        let max = table
            .rows()
            .iter()
            .filter_map(|row| row[1].value.as_f64())
            .fold(0.0_f64, f64::max);

        let lines = table
            .rows()
            .iter()
            .map(|row| {
                let value = row[1].value.as_f64().unwrap_or(0.0).max(0.0);
                let ratio = if max > 0.0 { value / max } else { 0.0 };
                let bar = "#".repeat(self.scale(ratio));
                format!("{:<label_width$} {bar} {}", row[0].display(), row[1].display())
            })
            .collect();
        Ok(lines)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn scale(&self, ratio: f64) -> usize {
        let cells = (ratio.clamp(0.0, 1.0) * self.width as f64).round() as usize;
        cells.min(self.width)
    }
}

impl ChartRenderer for TextRenderer {
    fn draw(
        &self,
        container: &ChartArea,
        kind: ChartKind,
        table: &DataTable,
        options: &Value,
    ) -> Result<(), ChartError> {
        let rendered = self.render(kind, table, options)?;
        println!("== {} ({}) ==", container.id(), kind.as_str());
        print!("{rendered}");
        Ok(())
    }
}

fn require_columns(table: &DataTable, count: usize) -> Result<(), ChartError> {
    if table.columns().len() < count {
        return Err(ChartError::ColumnOutOfRange(count - 1));
    }
    Ok(())
}

fn label_width(table: &DataTable) -> usize {
    table
        .rows()
        .iter()
        .map(|row| row[0].display().chars().count())
        .max()
        .unwrap_or(0)
}
