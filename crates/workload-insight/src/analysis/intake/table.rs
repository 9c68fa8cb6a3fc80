use chrono::NaiveDateTime;

/// Loosely-typed spreadsheet cell as read from an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl RawCell {
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for string-typed columns and error messages.
    pub fn display_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(value) => value.trim().to_string(),
            RawCell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            RawCell::Number(value) => value.to_string(),
            RawCell::Bool(value) => value.to_string(),
            RawCell::DateTime(value) => value.to_string(),
        }
    }
}

/// One data row and the 1-based line it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<RawCell>) -> Self {
        Self { line, cells }
    }

    /// Cell lookup tolerant of ragged rows.
    pub fn cell(&self, column: usize) -> &RawCell {
        static EMPTY: RawCell = RawCell::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(RawCell::is_blank)
    }
}

/// Header row plus data rows of a single sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Numbers rows consecutively below a header on line 1.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        let rows = (2..)
            .zip(rows)
            .map(|(line, cells)| RawRow::new(line, cells))
            .collect();
        Self { headers, rows }
    }

    pub fn with_rows(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }
}
