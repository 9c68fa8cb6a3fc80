use super::table::{RawCell, RawRow, RawTable};
use super::IntakeError;
use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::io::Cursor;

// 9999-12-31 as an Excel serial; anything larger cannot be a calendar date.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Reads the first worksheet; its first used row is taken as the header row.
pub(crate) fn read_workbook(bytes: &[u8]) -> Result<RawTable, IntakeError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IntakeError::NoWorksheet)??;
    // The used range may begin below row 1.
    let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| to_raw_cell(cell).display_text())
            .collect(),
        None => return Ok(RawTable::default()),
    };

    let rows = (header_line + 1..)
        .zip(rows)
        .map(|(line, row)| RawRow::new(line, row.iter().map(to_raw_cell).collect()))
        .collect();

    Ok(RawTable::with_rows(headers, rows))
}

fn to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::String(value) => RawCell::Text(value.clone()),
        Data::Int(value) => RawCell::Number(*value as f64),
        Data::Float(value) => RawCell::Number(*value),
        Data::Bool(value) => RawCell::Bool(*value),
        Data::DateTime(value) => match workbook_datetime(value) {
            Some(datetime) => RawCell::DateTime(datetime),
            None => RawCell::Number(value.as_f64()),
        },
        Data::DateTimeIso(value) | Data::DurationIso(value) => RawCell::Text(value.clone()),
    }
}

/// Resolves a typed date cell against the workbook's own epoch (1900 or 1904).
fn workbook_datetime(value: &ExcelDateTime) -> Option<NaiveDateTime> {
    let serial = value.as_f64();
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    let (year, month, day, hour, minute, second, milli) = value.to_ymd_hms_milli();
    NaiveDate::from_ymd_opt(year.into(), month.into(), day.into())?.and_hms_milli_opt(
        hour.into(),
        minute.into(),
        second.into(),
        milli.into(),
    )
}

/// Converts an untyped Excel 1900-system serial number to a timestamp.
pub(crate) fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}
