use std::sync::Arc;

use tracing::debug;

use super::artifacts::ModelBundle;
use super::domain::{LoanApplication, ModelChoice};
use super::features;
use super::intake::{IntakeGuard, IntakeViolation};
use super::model::ScoringError;
use super::scorer::Scorer;
use super::validation::{self, ValidationError};
use super::views::{
    self, ApplicationReview, ApplicationSummaryView, ModelsView, PredictionView, ScoreResponse,
};

/// Facade over the full pipeline: intake guard, plausibility validation,
/// feature assembly, scaling, and classification. Pure with respect to the
/// shared bundle; every call re-runs the pipeline from the submitted record.
pub struct ScoringService {
    bundle: Option<Arc<ModelBundle>>,
    guard: IntakeGuard,
}

impl ScoringService {
    pub fn new(bundle: Option<Arc<ModelBundle>>) -> Self {
        Self::with_guard(bundle, IntakeGuard::default())
    }

    pub fn with_guard(bundle: Option<Arc<ModelBundle>>, guard: IntakeGuard) -> Self {
        Self { bundle, guard }
    }

    pub fn model_available(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn models(&self) -> ModelsView {
        views::models_view(self.bundle.as_deref())
    }

    /// Summarize and validate a submission without invoking any classifier.
    pub fn review(&self, application: &LoanApplication) -> ApplicationReview {
        let warning = self.admit(application).err().map(|err| err.to_string());
        ApplicationReview::from_application(application, warning)
    }

    /// Run the full pipeline. Refuses before any classifier is touched when
    /// the submission is rejected or the bundle is absent.
    pub fn score(
        &self,
        application: &LoanApplication,
        choice: ModelChoice,
    ) -> Result<ScoreResponse, ScoringServiceError> {
        self.admit(application)?;

        let bundle = self
            .bundle
            .as_ref()
            .ok_or(ScoringServiceError::ModelUnavailable)?;

        let features = features::assemble(application);
        let scorer = Scorer::new(Arc::clone(bundle));
        let prediction = scorer.score(choice, &features)?;

        debug!(
            model = %choice,
            probability_of_default = prediction.probability_of_default(),
            "application scored"
        );

        Ok(ScoreResponse {
            summary: ApplicationSummaryView::from(application),
            prediction: PredictionView::from_prediction(
                bundle.classifier(choice).display_name(),
                &prediction,
            ),
        })
    }

    fn admit(&self, application: &LoanApplication) -> Result<(), ScoringServiceError> {
        self.guard.check(application)?;
        validation::check_employment(application.age, application.years_employed)?;
        Ok(())
    }
}

/// Error raised by the scoring facade.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("model unavailable: artifacts were not loaded")]
    ModelUnavailable,
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
