mod coerce;
mod columns;

pub use columns::Column;

use super::domain::{TimeEntry, TimesheetDataset, DEFAULT_TASK_TYPE};
use super::intake::RawTable;
use columns::ColumnIndex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required column(s): {}", .missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataFormatError {
    #[error("row {row}: '{value}' in column '{column}' is not a valid date")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: column '{column}' must not be empty")]
    MissingValue { row: usize, column: &'static str },
}

impl DataFormatError {
    pub fn row(&self) -> usize {
        match self {
            Self::InvalidDate { row, .. } | Self::MissingValue { row, .. } => *row,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
}

/// Turns a raw table into validated [`TimeEntry`] rows.
///
/// Dates are strict: a row whose date cannot be read aborts normalization.
/// Hours are lenient: unreadable, negative, or missing values become `0`.
pub struct RecordNormalizer;

impl RecordNormalizer {
    pub fn normalize(table: &RawTable) -> Result<TimesheetDataset, NormalizeError> {
        let index =
            ColumnIndex::resolve(&table.headers).map_err(|missing| SchemaError { missing })?;

        let mut entries = Vec::with_capacity(table.rows.len());
        let mut filled_hours = 0usize;

        for source in &table.rows {
            if source.is_blank() {
                continue;
            }

            let row = source.line;
            let cell = |column: Column| source.cell(index.position(column));

            let date_cell = cell(Column::Date);
            if date_cell.is_blank() {
                return Err(DataFormatError::MissingValue {
                    row,
                    column: Column::Date.key(),
                }
                .into());
            }
            let date =
                coerce::parse_date(date_cell).ok_or_else(|| DataFormatError::InvalidDate {
                    row,
                    column: Column::Date.key(),
                    value: date_cell.display_text(),
                })?;

            let member = cell(Column::Member).display_text();
            if member.is_empty() {
                return Err(DataFormatError::MissingValue {
                    row,
                    column: Column::Member.key(),
                }
                .into());
            }

            let mut hours = |column: Column| {
                coerce::parse_hours(cell(column)).unwrap_or_else(|| {
                    filled_hours += 1;
                    0.0
                })
            };
            let estimated_hours = hours(Column::EstimatedHours);
            let actual_hours = hours(Column::ActualHours);

            let task_type = match cell(Column::TaskType).display_text() {
                value if value.is_empty() => DEFAULT_TASK_TYPE.to_string(),
                value => value,
            };

            entries.push(TimeEntry {
                date,
                member,
                task_name: cell(Column::TaskName).display_text(),
                task_type,
                estimated_hours,
                actual_hours,
                status: cell(Column::Status).display_text(),
            });
        }

        tracing::debug!(
            entries = entries.len(),
            source_rows = table.rows.len(),
            filled_hours,
            "timesheet normalized"
        );

        Ok(TimesheetDataset::new(entries))
    }
}
