use std::sync::Arc;

use super::artifacts::ModelBundle;
use super::domain::{FeatureVector, ModelChoice, RiskBand, RiskLabel};
use super::model::{ClassProbabilities, ScoringError};

/// Applies the fitted scaler and the chosen classifier to an assembled
/// feature vector. Stateless beyond the shared bundle; one deterministic call
/// per request, no retries.
pub struct Scorer {
    bundle: Arc<ModelBundle>,
}

impl Scorer {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        Self { bundle }
    }

    pub fn score(
        &self,
        choice: ModelChoice,
        features: &FeatureVector,
    ) -> Result<Prediction, ScoringError> {
        let scaled = self.bundle.scaler().transform(features.values());
        let probabilities = self.bundle.classifier(choice).predict_proba(&scaled)?;

        Ok(Prediction {
            model: choice,
            label: probabilities.predicted_label(),
            probabilities,
        })
    }
}

/// Outcome of one classifier invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub model: ModelChoice,
    pub label: RiskLabel,
    pub probabilities: ClassProbabilities,
}

impl Prediction {
    /// Probability assigned to the positive ("default") class.
    pub fn probability_of_default(&self) -> f64 {
        self.probabilities.at_risk
    }

    pub fn risk_band(&self) -> RiskBand {
        RiskBand::from_probability(self.probability_of_default())
    }
}
