//! Chart — tabular chart data, value formatting and the renderer seam.
//!
//! DESIGN
//! ======
//! Widgets build a `DataTable`, optionally run a `DateFormat` over its
//! time columns, and hand the table to a `ChartRenderer` together with a
//! `ChartKind` and a JSON options object. The renderer is injected, so the
//! same widgets drive the terminal renderer in the binary and a recording
//! renderer in tests.

pub mod format;
pub mod table;
pub mod text;

pub use format::DateFormat;
pub use table::{Cell, CellValue, Column, ColumnType, DataTable};
pub use text::TextRenderer;

use serde_json::Value;

use crate::view::ChartArea;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while building, formatting or drawing a chart.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A row did not have one cell per column.
    #[error("row {row} has {got} cells, expected {expected}")]
    RowWidth { row: usize, got: usize, expected: usize },

    /// Array input had no header row.
    #[error("table needs at least a header row")]
    EmptyTable,

    /// A JSON value cannot live in a table cell.
    #[error("unsupported cell value at row {row}, column {column}")]
    UnsupportedCell { row: usize, column: usize },

    /// A cell value does not match its column type.
    #[error("column {column} is {expected}, cell at row {row} is not")]
    CellType { row: usize, column: usize, expected: &'static str },

    /// The formatter pattern could not be translated.
    #[error("invalid date pattern: {0}")]
    Pattern(String),

    /// A value could not be rendered with the pattern.
    #[error("date format failed: {0}")]
    Format(String),

    /// A column index was past the last column.
    #[error("column {0} out of range")]
    ColumnOutOfRange(usize),

    /// The operation needs a different column type.
    #[error("column {column} is {actual}, expected {expected}")]
    ColumnType { column: usize, actual: &'static str, expected: &'static str },
}

// =============================================================================
// RENDERING
// =============================================================================

/// Visualization kinds the widgets draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Timeline,
    PieChart,
    ColumnChart,
}

impl ChartKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeline => "Timeline",
            Self::PieChart => "PieChart",
            Self::ColumnChart => "ColumnChart",
        }
    }
}

/// Draws a finished table into a chart container.
pub trait ChartRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the table does not fit the chart kind.
    fn draw(&self, container: &ChartArea, kind: ChartKind, table: &DataTable, options: &Value)
    -> Result<(), ChartError>;
}
