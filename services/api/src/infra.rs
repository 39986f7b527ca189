use loan_eligibility::config::ModelConfig;
use loan_eligibility::eligibility::{EligibilityService, ModelAvailability, ModelStatusView};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) model: ModelStatusView,
}

/// Loads the configured artifacts once; an unavailable model still yields a service.
pub(crate) fn build_service(config: &ModelConfig) -> Arc<EligibilityService> {
    let source = config.source();
    for path in source.paths() {
        info!(path = %path.display(), "loading model artifact");
    }
    Arc::new(EligibilityService::new(ModelAvailability::load(&source)))
}
