//! Date value formatter for table columns.
//!
//! Patterns use the ICU-style letters chart libraries accept (`HH:mm:ss`,
//! `dd/MM/yyyy`, `h:mm a`); they are translated once into a `time` format
//! description. Quoted text (`'at'`) is copied through literally.

use time::PrimitiveDateTime;
use time::format_description::{self, OwnedFormatItem};

use super::table::{CellValue, ColumnType, DataTable};
use super::ChartError;

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    items: OwnedFormatItem,
}

impl DateFormat {
    /// # Errors
    ///
    /// Returns an error if the pattern uses a letter sequence with no
    /// `time` equivalent or has an unterminated quote.
    pub fn new(pattern: &str) -> Result<Self, ChartError> {
        let description = translate(pattern)?;
        let items = format_description::parse_owned::<1>(&description)
            .map_err(|e| ChartError::Pattern(e.to_string()))?;
        Ok(Self { pattern: pattern.to_string(), items })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// # Errors
    ///
    /// Returns an error if the value cannot be rendered.
    pub fn format_value(&self, value: PrimitiveDateTime) -> Result<String, ChartError> {
        value.format(&self.items).map_err(|e| ChartError::Format(e.to_string()))
    }

    /// Set the formatted text of every date-time cell in `column`.
    /// Null cells are left without text.
    ///
    /// # Errors
    ///
    /// Returns an error if the column does not exist or is not `datetime`.
    pub fn format(&self, table: &mut DataTable, column: usize) -> Result<(), ChartError> {
        let target = table.columns().get(column).ok_or(ChartError::ColumnOutOfRange(column))?;
        if target.kind != ColumnType::DateTime {
            return Err(ChartError::ColumnType {
                column,
                actual: target.kind.as_str(),
                expected: ColumnType::DateTime.as_str(),
            });
        }

        for cell in table.column_mut_cells(column) {
            if let CellValue::DateTime(dt) = cell.value {
                cell.formatted = Some(self.format_value(dt)?);
            }
        }
        Ok(())
    }
}

// =============================================================================
// PATTERN TRANSLATION
// =============================================================================

fn translate(pattern: &str) -> Result<String, ChartError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i = quoted_literal(&chars, i + 1, &mut out)
                .ok_or_else(|| ChartError::Pattern(format!("unterminated quote in '{pattern}'")))?;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let run = chars[i..].iter().take_while(|&&r| r == c).count();
            out.push_str(component(c, run).ok_or_else(|| {
                ChartError::Pattern(format!("unsupported field '{}' in '{pattern}'", c.to_string().repeat(run)))
            })?);
            i += run;
            continue;
        }

        push_literal(&mut out, c);
        i += 1;
    }

    Ok(out)
}

/// Copy a quoted run starting after its opening quote. `''` inside the run
/// is a literal quote. Returns the index past the closing quote.
fn quoted_literal(chars: &[char], mut i: usize, out: &mut String) -> Option<usize> {
    while let Some(&c) = chars.get(i) {
        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            return Some(i + 1);
        }
        push_literal(out, c);
        i += 1;
    }
    None
}

fn component(letter: char, run: usize) -> Option<&'static str> {
    Some(match (letter, run) {
        ('H', 1) => "[hour padding:none]",
        ('H', 2) => "[hour]",
        ('h', 1) => "[hour repr:12 padding:none]",
        ('h', 2) => "[hour repr:12]",
        ('m', 1) => "[minute padding:none]",
        ('m', 2) => "[minute]",
        ('s', 1) => "[second padding:none]",
        ('s', 2) => "[second]",
        ('a', 1) => "[period]",
        ('d', 1) => "[day padding:none]",
        ('d', 2) => "[day]",
        ('M', 1) => "[month padding:none]",
        ('M', 2) => "[month]",
        ('M', 3) => "[month repr:short]",
        ('y', 2) => "[year repr:last_two]",
        ('y', 4) => "[year]",
        _ => return None,
    })
}

fn push_literal(out: &mut String, c: char) {
    if c == '[' {
        out.push_str("[[");
    } else {
        out.push(c);
    }
}
