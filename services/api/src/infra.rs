use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use workload_insight::analysis::summary::{HttpTextGenerator, SummaryPipeline};
use workload_insight::analysis::WorkloadAnalyzer;
use workload_insight::config::SummaryConfig;
use workload_insight::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the HTTP text generator into an analyzer using the configured limits.
pub(crate) fn build_analyzer(settings: &SummaryConfig) -> Result<WorkloadAnalyzer, AppError> {
    if settings.api_key.is_none() {
        tracing::warn!("APP_SUMMARY_API_KEY is not set; personal summaries will use fallback text");
    }
    let generator = Arc::new(HttpTextGenerator::new(settings.clone())?);
    Ok(WorkloadAnalyzer::new(SummaryPipeline::new(generator, settings)))
}
