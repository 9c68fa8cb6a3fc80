use crate::analysis::envelope::ResponseEnvelope;
use crate::analysis::summary::GeneratorSetupError;
use crate::analysis::AnalysisError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Generator(GeneratorSetupError),
    Analysis(AnalysisError),
    Upload(MultipartError),
    MissingUpload,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Analysis(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::Upload(err) => err.status(),
            AppError::MissingUpload => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Generator(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the error envelope; analysis failures are reported
    /// without the internal prefix.
    fn public_message(&self) -> String {
        match self {
            AppError::Analysis(err) => err.to_string(),
            AppError::Upload(err) => err.body_text(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Generator(err) => write!(f, "summary generator error: {}", err),
            AppError::Analysis(err) => write!(f, "analysis failed: {}", err),
            AppError::Upload(err) => write!(f, "upload error: {}", err),
            AppError::MissingUpload => write!(f, "no spreadsheet file was uploaded"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Generator(err) => Some(err),
            AppError::Analysis(err) => Some(err),
            AppError::Upload(err) => Some(err),
            AppError::MissingUpload => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::info!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = Json(ResponseEnvelope::<()>::error(self.public_message()));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<GeneratorSetupError> for AppError {
    fn from(value: GeneratorSetupError) -> Self {
        Self::Generator(value)
    }
}

impl From<AnalysisError> for AppError {
    fn from(value: AnalysisError) -> Self {
        Self::Analysis(value)
    }
}

impl From<MultipartError> for AppError {
    fn from(value: MultipartError) -> Self {
        Self::Upload(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::intake::IntakeError;
    use crate::analysis::report::ReportError;
    use serde_json::Value;

    async fn envelope(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn analysis_errors_map_to_client_statuses() {
        let response = AppError::from(AnalysisError::from(ReportError::NoData)).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let payload = envelope(response).await;
        assert_eq!(payload["status"], "error");
        assert!(payload["data"].is_null());
        assert!(payload["message"]
            .as_str()
            .expect("message")
            .starts_with("no analysed timesheet"));

        let response = AppError::from(AnalysisError::from(IntakeError::Empty)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn infrastructure_errors_are_internal() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope(response).await["message"], "io error: disk");
    }
}
