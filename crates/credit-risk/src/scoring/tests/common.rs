use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::scoring::artifacts::{CategoryEncoders, ModelBundle};
use crate::scoring::domain::{
    HomeOwnership, LoanApplication, LoanGrade, LoanIntent, FEATURE_COUNT,
};
use crate::scoring::model::{
    ClassProbabilities, Classifier, ScalerArtifact, ScoringError, StandardScaler,
};
use crate::scoring::service::ScoringService;

/// The reference applicant from the product walkthrough: 25 years old,
/// $50k income, renting, grade A personal loan of $10k.
pub(super) fn applicant() -> LoanApplication {
    LoanApplication {
        age: 25,
        income: 50_000,
        years_employed: 2,
        home_ownership: HomeOwnership::Rent,
        loan_amount: 10_000,
        loan_intent: LoanIntent::Personal,
        loan_grade: LoanGrade::A,
    }
}

/// An applicant claiming more employment than their age allows.
pub(super) fn implausible_applicant() -> LoanApplication {
    LoanApplication {
        age: 20,
        years_employed: 10,
        ..applicant()
    }
}

/// Classifier double that records how often it was invoked.
pub(super) struct CountingClassifier {
    name: &'static str,
    at_risk: f64,
    calls: AtomicUsize,
}

impl CountingClassifier {
    pub(super) fn new(name: &'static str, at_risk: f64) -> Arc<Self> {
        Arc::new(Self {
            name,
            at_risk,
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for CountingClassifier {
    fn display_name(&self) -> &str {
        self.name
    }

    fn predict_proba(
        &self,
        _features: &[f64; FEATURE_COUNT],
    ) -> Result<ClassProbabilities, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ClassProbabilities {
            performing: 1.0 - self.at_risk,
            at_risk: self.at_risk,
        })
    }
}

/// Classifier double that always fails, for exercising the scoring-error
/// path.
pub(super) struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn display_name(&self) -> &str {
        "Broken"
    }

    fn predict_proba(
        &self,
        _features: &[f64; FEATURE_COUNT],
    ) -> Result<ClassProbabilities, ScoringError> {
        Err(ScoringError::NonFiniteProbability {
            model: "Broken".to_string(),
        })
    }
}

pub(super) fn identity_scaler() -> StandardScaler {
    StandardScaler::from_artifact(ScalerArtifact {
        mean: vec![0.0; FEATURE_COUNT],
        scale: vec![1.0; FEATURE_COUNT],
    })
    .expect("identity scaler is valid")
}

pub(super) fn bundle_with(
    xgboost: Arc<dyn Classifier>,
    random_forest: Arc<dyn Classifier>,
) -> Arc<ModelBundle> {
    Arc::new(ModelBundle::from_parts(
        xgboost,
        random_forest,
        identity_scaler(),
        CategoryEncoders::builtin(),
    ))
}

pub(super) fn counting_service() -> (
    ScoringService,
    Arc<CountingClassifier>,
    Arc<CountingClassifier>,
) {
    let xgboost = CountingClassifier::new("XGBoost", 0.2);
    let random_forest = CountingClassifier::new("Random Forest", 0.8);
    let service = ScoringService::new(Some(bundle_with(
        xgboost.clone(),
        random_forest.clone(),
    )));
    (service, xgboost, random_forest)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
