pub mod distribution;
pub mod domain;
pub mod envelope;
pub mod intake;
pub mod normalizer;
pub mod report;
pub mod router;
pub mod summary;
pub mod variance;
pub mod workload;

pub use distribution::{TaskTypeCounts, TaskTypeDistribution};
pub use domain::{TimeEntry, TimesheetDataset};
pub use envelope::{EnvelopeStatus, ResponseEnvelope};
pub use intake::{IntakeError, SheetFormat, SpreadsheetUpload};
pub use normalizer::{DataFormatError, NormalizeError, RecordNormalizer, SchemaError};
pub use report::{ReportError, ReportSheets, ReportSynthesizer};
pub use router::workload_router;
pub use summary::{
    GenerationFailure, GenerationOutcome, HttpTextGenerator, MemberSummary, SummaryPipeline,
    TextGenerator, FALLBACK_SUMMARY,
};
pub use variance::{TimeVariance, VarianceAnalyzer};
pub use workload::{MemberSaturation, WorkloadAggregator, WorkloadMatrix};

use serde::Serialize;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl AnalysisError {
    /// HTTP status the service answers with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::Intake(_) => 400,
            AnalysisError::Normalize(_) => 422,
            AnalysisError::Report(ReportError::NoData) => 409,
            AnalysisError::Report(ReportError::Workbook(_)) => 500,
        }
    }
}

/// The three synchronous aggregates derived from one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBundle {
    pub workload: WorkloadMatrix,
    pub time_variance: TimeVariance,
    pub task_types: TaskTypeCounts,
}

impl AggregateBundle {
    pub fn compute(dataset: &TimesheetDataset) -> Self {
        Self {
            workload: WorkloadAggregator::aggregate(dataset),
            time_variance: VarianceAnalyzer::analyze(dataset),
            task_types: TaskTypeDistribution::tally(dataset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBundle {
    pub workload: WorkloadMatrix,
    pub time_variance: TimeVariance,
    pub task_types: TaskTypeCounts,
    pub personal_summaries: Vec<MemberSummary>,
}

impl AnalysisBundle {
    fn assemble(aggregates: AggregateBundle, personal_summaries: Vec<MemberSummary>) -> Self {
        Self {
            workload: aggregates.workload,
            time_variance: aggregates.time_variance,
            task_types: aggregates.task_types,
            personal_summaries,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub include_summaries: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_summaries: true,
        }
    }
}

/// Holds the dataset normalized for one request so the report can be built
/// from it. A session that never loaded data cannot produce a report.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    dataset: Option<TimesheetDataset>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, upload: &SpreadsheetUpload) -> Result<&TimesheetDataset, AnalysisError> {
        let table = upload.read_table()?;
        let dataset = RecordNormalizer::normalize(&table)?;
        Ok(self.dataset.insert(dataset))
    }

    pub fn dataset(&self) -> Option<&TimesheetDataset> {
        self.dataset.as_ref()
    }

    pub fn report(&self) -> Result<ReportSheets, ReportError> {
        self.dataset
            .as_ref()
            .map(ReportSynthesizer::synthesize)
            .ok_or(ReportError::NoData)
    }
}

/// Entry point tying intake, normalization, aggregation, and summaries
/// together for a single upload.
#[derive(Debug, Clone)]
pub struct WorkloadAnalyzer {
    summaries: SummaryPipeline,
}

impl WorkloadAnalyzer {
    pub fn new(summaries: SummaryPipeline) -> Self {
        Self { summaries }
    }

    pub async fn analyze(
        &self,
        upload: &SpreadsheetUpload,
        options: AnalysisOptions,
    ) -> Result<AnalysisBundle, AnalysisError> {
        let mut session = AnalysisSession::new();
        let dataset = session.load(upload)?;
        let aggregates = AggregateBundle::compute(dataset);

        let personal_summaries = if options.include_summaries {
            self.summaries.summarize(dataset).await
        } else {
            Vec::new()
        };

        info!(
            entries = dataset.len(),
            members = aggregates.workload.members.len(),
            summaries = personal_summaries.len(),
            "timesheet analysed"
        );
        Ok(AnalysisBundle::assemble(aggregates, personal_summaries))
    }

    /// Builds the `.xlsx` report. `None` means no spreadsheet was supplied.
    pub fn report(&self, upload: Option<&SpreadsheetUpload>) -> Result<Vec<u8>, AnalysisError> {
        let mut session = AnalysisSession::new();
        if let Some(upload) = upload {
            session.load(upload)?;
        }
        let bytes = session.report()?.to_xlsx()?;
        info!(bytes = bytes.len(), "workload report rendered");
        Ok(bytes)
    }
}
