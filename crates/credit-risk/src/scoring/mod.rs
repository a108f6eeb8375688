//! Loan-application scoring: intake validation, feature assembly, pretrained
//! artifact loading, and classification.
//!
//! The pipeline is deliberately a pure function from (submitted record,
//! loaded bundle) to (validation verdict, optional prediction); the HTTP
//! router and the CLI renderer are thin shells over [`service::ScoringService`].

pub mod artifacts;
pub mod domain;
pub mod features;
pub mod intake;
pub mod model;
pub mod router;
pub mod scorer;
pub mod service;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use artifacts::{
    ArtifactError, CategoryEncoders, ModelBundle, LABEL_ENCODERS_FILE, MODEL_RANDOM_FOREST_FILE,
    MODEL_XGBOOST_FILE, SCALER_FILE,
};
pub use domain::{
    FeatureVector, HomeOwnership, LoanApplication, LoanGrade, LoanIntent, ModelChoice, RiskBand,
    RiskLabel, FEATURE_COUNT, FEATURE_NAMES,
};
pub use features::assemble;
pub use intake::{IntakeBounds, IntakeGuard, IntakeViolation};
pub use model::{
    ClassProbabilities, Classifier, ClassifierArtifact, DecisionTree, EnsembleFamily,
    ModelFormatError, ScalerArtifact, ScoringError, StandardScaler, TreeEnsemble, TreeNode,
};
pub use router::{scoring_router, ScoreRequest};
pub use scorer::{Prediction, Scorer};
pub use service::{ScoringService, ScoringServiceError};
pub use validation::{check_employment, ValidationError, MINIMUM_WORKING_AGE};
pub use views::{
    ApplicationReview, ApplicationSummaryView, ModelEntry, ModelsView, PredictionView,
    ScoreResponse, ValidationView,
};
