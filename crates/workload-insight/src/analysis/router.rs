use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::report::{REPORT_CONTENT_TYPE, REPORT_FILE_NAME};
use super::{AnalysisOptions, SpreadsheetUpload, WorkloadAnalyzer};
use crate::analysis::envelope::ResponseEnvelope;
use crate::error::AppError;

const UPLOAD_FIELD: &str = "file";

/// Router builder exposing the timesheet analysis and report endpoints.
pub fn workload_router(analyzer: Arc<WorkloadAnalyzer>) -> Router {
    Router::new()
        .route("/api/v1/workload/analyze", post(analyze_handler))
        .route("/api/v1/workload/report", post(report_handler))
        .with_state(analyzer)
}

pub(crate) async fn analyze_handler(
    State(analyzer): State<Arc<WorkloadAnalyzer>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(multipart).await?.ok_or(AppError::MissingUpload)?;
    let bundle = analyzer
        .analyze(&upload, AnalysisOptions::default())
        .await?;
    let envelope = ResponseEnvelope::success(bundle, "analysis complete");
    Ok(Json(envelope).into_response())
}

pub(crate) async fn report_handler(
    State(analyzer): State<Arc<WorkloadAnalyzer>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(multipart).await?;
    let bytes = analyzer.report(upload.as_ref())?;
    let disposition = format!("attachment; filename=\"{REPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, REPORT_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Takes the part named `file`, or failing that the first part carrying a
/// file name. Other parts are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<Option<SpreadsheetUpload>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        let is_upload = field.name() == Some(UPLOAD_FIELD) || field.file_name().is_some();
        if !is_upload {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        tracing::debug!(
            file = file_name.as_deref().unwrap_or("<unnamed>"),
            bytes = bytes.len(),
            "spreadsheet upload received"
        );
        return Ok(Some(SpreadsheetUpload::new(file_name, bytes.to_vec())));
    }
    Ok(None)
}
