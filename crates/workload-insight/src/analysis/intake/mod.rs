mod delimited;
mod spreadsheet;
mod table;

pub use table::{RawCell, RawRow, RawTable};

pub(crate) use spreadsheet::excel_serial_to_datetime;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("upload is empty")]
    Empty,
    #[error("unable to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("workbook contains no worksheets")]
    NoWorksheet,
    #[error("invalid delimited data: {0}")]
    Delimited(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// xlsx, xlsm, xlsb, xls or ods.
    Workbook,
    /// Comma separated text with a header row.
    Delimited,
}

impl SheetFormat {
    /// Sniffs the container signature first and falls back to the file name.
    pub fn detect(file_name: Option<&str>, bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            return Self::Workbook;
        }

        let guessed = file_name
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|mime| mime.essence_str().to_ascii_lowercase());
        match guessed.as_deref() {
            Some(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                | "application/vnd.ms-excel"
                | "application/vnd.ms-excel.sheet.macroenabled.12"
                | "application/vnd.ms-excel.sheet.binary.macroenabled.12"
                | "application/vnd.oasis.opendocument.spreadsheet",
            ) => Self::Workbook,
            _ => Self::Delimited,
        }
    }
}

/// A spreadsheet received from a caller, held in memory for one request.
#[derive(Debug, Clone)]
pub struct SpreadsheetUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl SpreadsheetUpload {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }

    pub fn format(&self) -> SheetFormat {
        SheetFormat::detect(self.file_name.as_deref(), &self.bytes)
    }

    pub fn read_table(&self) -> Result<RawTable, IntakeError> {
        if self.bytes.is_empty() {
            return Err(IntakeError::Empty);
        }

        let table = match self.format() {
            SheetFormat::Workbook => spreadsheet::read_workbook(&self.bytes)?,
            SheetFormat::Delimited => delimited::read_delimited(&self.bytes)?,
        };

        tracing::debug!(
            file = self.file_name.as_deref().unwrap_or("<unnamed>"),
            columns = table.headers.len(),
            rows = table.rows.len(),
            "spreadsheet decoded"
        );
        Ok(table)
    }
}
