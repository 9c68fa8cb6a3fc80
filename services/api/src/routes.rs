use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use workload_insight::analysis::{workload_router, WorkloadAnalyzer};

pub(crate) fn with_workload_routes(analyzer: Arc<WorkloadAnalyzer>) -> axum::Router {
    workload_router(analyzer)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;
    use workload_insight::analysis::{GenerationOutcome, SummaryPipeline, TextGenerator};

    const BOUNDARY: &str = "workload-test-boundary";
    const TIMESHEET: &str = "Date,Member,Task Name,Task Type,Estimated Hours,Actual Hours,Status\n\
        2024-01-01,A,T1,dev,4,5,Completed\n\
        2024-01-01,B,T2,test,2,2,Pending\n";

    #[derive(Debug)]
    struct CannedGenerator;

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> GenerationOutcome {
            GenerationOutcome::Generated("on track".to_string())
        }
    }

    fn app(ready: bool) -> axum::Router {
        let analyzer = Arc::new(WorkloadAnalyzer::new(SummaryPipeline::with_limits(
            Arc::new(CannedGenerator),
            Duration::from_secs(1),
            2,
        )));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_workload_routes(analyzer).layer(Extension(state))
    }

    fn multipart_part(name: &str, file_name: Option<&str>, content: &str) -> String {
        let disposition = match file_name {
            Some(file_name) => {
                format!("form-data; name=\"{name}\"; filename=\"{file_name}\"")
            }
            None => format!("form-data; name=\"{name}\""),
        };
        format!("--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\r\n{content}\r\n")
    }

    fn upload_request(uri: &str, parts: &[String]) -> Request<Body> {
        let mut body = parts.concat();
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request builds")
    }

    async fn read_body(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec()
    }

    async fn read_json_body(response: Response) -> Value {
        serde_json::from_slice(&read_body(response).await).expect("json payload")
    }

    #[tokio::test]
    async fn health_and_readiness_report_status() {
        let response = app(false)
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json_body(response).await["status"], "initializing");

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_prometheus_text() {
        let response = app(true)
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn analyze_route_returns_success_envelope() {
        let request = upload_request(
            "/api/v1/workload/analyze",
            &[
                multipart_part("note", None, "weekly upload"),
                multipart_part("file", Some("timesheet.csv"), TIMESHEET),
            ],
        );
        let response = app(true).oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json_body(response).await;
        assert_eq!(payload["status"], "success");
        let data = &payload["data"];
        assert_eq!(data["workload"]["dates"][0], "2024-01-01");
        assert_eq!(data["workload"]["members"][0]["saturation"][0], 62.5);
        assert_eq!(data["timeVariance"]["tasks"][1], "T2");
        assert_eq!(data["taskTypes"]["test"], 1);
        assert_eq!(data["personalSummaries"][1]["name"], "B");
        assert_eq!(data["personalSummaries"][1]["content"], "on track");
    }

    #[tokio::test]
    async fn analyze_route_without_file_is_bad_request() {
        let request = upload_request(
            "/api/v1/workload/analyze",
            &[multipart_part("note", None, "forgot the file")],
        );
        let response = app(true).oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payload = read_json_body(response).await;
        assert_eq!(payload["status"], "error");
        assert!(payload["data"].is_null());
        assert_eq!(payload["message"], "no spreadsheet file was uploaded");
    }

    #[tokio::test]
    async fn analyze_route_rejects_missing_columns() {
        let request = upload_request(
            "/api/v1/workload/analyze",
            &[multipart_part(
                "file",
                Some("timesheet.csv"),
                "Date,Member\n2024-01-01,A\n",
            )],
        );
        let response = app(true).oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let payload = read_json_body(response).await;
        let message = payload["message"].as_str().expect("message");
        assert!(message.starts_with("missing required column(s)"));
        assert!(message.contains("taskName"));
    }

    #[tokio::test]
    async fn report_route_returns_workbook_attachment() {
        let request = upload_request(
            "/api/v1/workload/report",
            &[multipart_part("file", Some("timesheet.csv"), TIMESHEET)],
        );
        let response = app(true).oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"workload-report.xlsx\""
        );

        let bytes = read_body(response).await;
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[tokio::test]
    async fn report_route_without_file_is_conflict() {
        let request = upload_request("/api/v1/workload/report", &[]);
        let response = app(true).oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(read_json_body(response).await["status"], "error");
    }
}
