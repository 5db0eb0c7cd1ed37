use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tone_guard::collaborators::http::registry_from_endpoints;
use tone_guard::config::AppConfig;
use tone_guard::ToneService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Service backed by the configured model endpoints. Clients connect on first use.
pub(crate) fn tone_service(config: &AppConfig) -> ToneService {
    let registry = registry_from_endpoints(&config.collaborators);
    ToneService::new(Arc::new(registry), config.analysis.clone())
}
