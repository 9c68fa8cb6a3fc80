mod sheets;
mod workbook;

pub use sheets::{
    DailyDetailRow, ReportCell, ReportSection, ReportSheets, ReportSynthesizer, TaskCompletionRow,
    WorkloadSummaryRow,
};

pub const REPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const REPORT_FILE_NAME: &str = "workload-report.xlsx";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no analysed timesheet is available; upload a spreadsheet first")]
    NoData,
    #[error("unable to render report workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

impl ReportSheets {
    pub fn to_xlsx(&self) -> Result<Vec<u8>, ReportError> {
        Ok(workbook::render_workbook(self)?)
    }
}
