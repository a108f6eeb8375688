use credit_risk::scoring::{
    ArtifactError, HomeOwnership, LoanGrade, LoanIntent, ModelBundle, ModelChoice,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the pretrained bundle, degrading to `None` so the service can come
/// up and refuse scoring rather than crash on missing artifacts.
pub(crate) fn load_bundle(dir: &Path) -> Option<Arc<ModelBundle>> {
    match ModelBundle::load(dir) {
        Ok(bundle) => {
            info!(dir = %dir.display(), "model artifacts loaded");
            Some(Arc::new(bundle))
        }
        Err(err) => {
            report_artifact_failure(dir, &err);
            None
        }
    }
}

fn report_artifact_failure(dir: &Path, err: &ArtifactError) {
    error!(
        dir = %dir.display(),
        %err,
        "model artifacts unavailable; scoring requests will be refused"
    );
}

pub(crate) fn parse_model(raw: &str) -> Result<ModelChoice, String> {
    raw.parse()
}

pub(crate) fn parse_home_ownership(raw: &str) -> Result<HomeOwnership, String> {
    raw.parse()
}

pub(crate) fn parse_loan_intent(raw: &str) -> Result<LoanIntent, String> {
    raw.parse()
}

pub(crate) fn parse_loan_grade(raw: &str) -> Result<LoanGrade, String> {
    raw.parse()
}
