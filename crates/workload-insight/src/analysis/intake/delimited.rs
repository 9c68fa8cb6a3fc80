use super::table::{RawCell, RawRow, RawTable};

pub(crate) fn read_delimited(bytes: &[u8]) -> Result<RawTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect();

    let mut rows: Vec<RawRow> = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = match record.position() {
            Some(position) => record_line(bytes, position),
            None => rows.last().map_or(2, |previous| previous.line + 1),
        };
        let cells: Vec<RawCell> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(field.to_string())
                }
            })
            .collect();
        rows.push(RawRow::new(line, cells));
    }

    Ok(RawTable::with_rows(headers, rows))
}

/// Line of the record's first byte.
///
/// The reader reports where the previous record ended, which sits before any
/// blank lines it skipped.
fn record_line(bytes: &[u8], position: &csv::Position) -> usize {
    let start = usize::try_from(position.byte()).unwrap_or(usize::MAX);
    let skipped = bytes
        .get(start..)
        .unwrap_or_default()
        .iter()
        .take_while(|byte| matches!(byte, b'\r' | b'\n'))
        .filter(|byte| **byte == b'\n')
        .count();
    position.line() as usize + skipped
}
