//! Typed rows-and-columns table consumed by chart renderers.

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;

use serde_json::{Number, Value};
use time::PrimitiveDateTime;
use time::macros::format_description;

use super::ChartError;

// =============================================================================
// COLUMNS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    DateTime,
}

impl ColumnType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub kind: ColumnType,
    pub label: Option<String>,
    pub id: Option<String>,
}

impl Column {
    #[must_use]
    pub fn new(kind: ColumnType) -> Self {
        Self { kind, label: None, id: None }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Label, falling back to id, falling back to empty.
    #[must_use]
    pub fn title(&self) -> &str {
        self.label.as_deref().or(self.id.as_deref()).unwrap_or("")
    }
}

// =============================================================================
// CELLS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    String(String),
    Number(Number),
    Boolean(bool),
    DateTime(PrimitiveDateTime),
}

impl CellValue {
    fn matches(&self, kind: ColumnType) -> bool {
        matches!(
            (self, kind),
            (Self::Null, _)
                | (Self::String(_), ColumnType::String)
                | (Self::Number(_), ColumnType::Number)
                | (Self::Boolean(_), ColumnType::Boolean)
                | (Self::DateTime(_), ColumnType::DateTime)
        )
    }

    /// Numeric view used for sizing bars and slices. Date-times count as
    /// seconds since midnight.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::DateTime(dt) => {
                let (h, m, s) = dt.time().as_hms();
                Some(f64::from(u32::from(h) * 3600 + u32::from(m) * 60 + u32::from(s)))
            }
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::DateTime(dt) => {
                let iso = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
                dt.format(iso).map_or(Value::Null, Value::String)
            }
        }
    }

    fn from_json(value: &Value, row: usize, column: usize) -> Result<Self, ChartError> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Number(n) => Ok(Self::Number(n.clone())),
            Value::Bool(b) => Ok(Self::Boolean(*b)),
            Value::Array(_) | Value::Object(_) => Err(ChartError::UnsupportedCell { row, column }),
        }
    }

    fn inferred_type(&self) -> Option<ColumnType> {
        match self {
            Self::Null => None,
            Self::String(_) => Some(ColumnType::String),
            Self::Number(_) => Some(ColumnType::Number),
            Self::Boolean(_) => Some(ColumnType::Boolean),
            Self::DateTime(_) => Some(ColumnType::DateTime),
        }
    }
}

/// A cell value plus the text a formatter produced for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub formatted: Option<String>,
}

impl Cell {
    /// Formatted text if present, otherwise a plain rendering of the value.
    #[must_use]
    pub fn display(&self) -> String {
        if let Some(text) = &self.formatted {
            return text.clone();
        }
        match &self.value {
            CellValue::Null => String::new(),
            CellValue::String(s) => s.clone(),
            other => match other.to_json() {
                Value::String(s) => s,
                json => json.to_string(),
            },
        }
    }
}

// =============================================================================
// TABLE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl DataTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw JSON rows. The first row holds column labels;
    /// column types come from the first non-null value below it, `string`
    /// when a column has none.
    ///
    /// # Errors
    ///
    /// Returns an error on empty input, ragged rows, non-scalar cells or
    /// cells that disagree with their column's type.
    pub fn from_array(rows: &[Vec<Value>]) -> Result<Self, ChartError> {
        let (header, body) = rows.split_first().ok_or(ChartError::EmptyTable)?;
        let width = header.len();

        let mut parsed = Vec::with_capacity(body.len());
        for (index, row) in body.iter().enumerate() {
            let row_no = index + 1;
            if row.len() != width {
                return Err(ChartError::RowWidth { row: row_no, got: row.len(), expected: width });
            }
            let cells = row
                .iter()
                .enumerate()
                .map(|(column, value)| CellValue::from_json(value, row_no, column))
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push(cells);
        }

        let mut table = Self::new();
        for (column, label) in header.iter().enumerate() {
            let label = match label {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                _ => return Err(ChartError::UnsupportedCell { row: 0, column }),
            };
            let kind = parsed
                .iter()
                .find_map(|cells| cells[column].inferred_type())
                .unwrap_or(ColumnType::String);
            table.add_column(Column::new(kind).with_label(label));
        }
        table.add_rows(parsed)?;
        Ok(table)
    }

    /// Append a column and return its index.
    pub fn add_column(&mut self, column: Column) -> usize {
        self.columns.push(column);
        for row in &mut self.rows {
            row.push(Cell { value: CellValue::Null, formatted: None });
        }
        self.columns.len() - 1
    }

    /// # Errors
    ///
    /// Returns an error if the row width or a cell type does not match the columns.
    pub fn add_row(&mut self, values: Vec<CellValue>) -> Result<(), ChartError> {
        let row = self.rows.len() + 1;
        if values.len() != self.columns.len() {
            return Err(ChartError::RowWidth { row, got: values.len(), expected: self.columns.len() });
        }
        for (column, (value, col)) in values.iter().zip(&self.columns).enumerate() {
            if !value.matches(col.kind) {
                return Err(ChartError::CellType { row, column, expected: col.kind.as_str() });
            }
        }
        self.rows.push(values.into_iter().map(|value| Cell { value, formatted: None }).collect());
        Ok(())
    }

    /// # Errors
    ///
    /// Stops at the first row `add_row` rejects; earlier rows stay added.
    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = Vec<CellValue>>) -> Result<(), ChartError> {
        for row in rows {
            self.add_row(row)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    pub(crate) fn column_mut_cells(&mut self, column: usize) -> impl Iterator<Item = &mut Cell> {
        self.rows.iter_mut().filter_map(move |cells| cells.get_mut(column))
    }

    /// Header row of labels followed by the raw cell values.
    #[must_use]
    pub fn to_array(&self) -> Vec<Vec<Value>> {
        let header = self
            .columns
            .iter()
            .map(|c| Value::String(c.title().to_string()))
            .collect();
        std::iter::once(header)
            .chain(
                self.rows
                    .iter()
                    .map(|cells| cells.iter().map(|cell| cell.value.to_json()).collect()),
            )
            .collect()
    }
}
