use chrono::{DateTime, Utc};
use serde::Serialize;

use super::artifacts::ModelBundle;
use super::domain::{LoanApplication, ModelChoice};
use super::scorer::Prediction;

/// Echo of the submitted record, with category labels and the derived ratio.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummaryView {
    pub age: u8,
    pub income: u32,
    pub years_employed: u8,
    pub home_ownership: &'static str,
    pub loan_amount: u32,
    pub loan_grade: &'static str,
    pub loan_intent: &'static str,
    pub loan_to_income: f64,
}

impl From<&LoanApplication> for ApplicationSummaryView {
    fn from(application: &LoanApplication) -> Self {
        Self {
            age: application.age,
            income: application.income,
            years_employed: application.years_employed,
            home_ownership: application.home_ownership.label(),
            loan_amount: application.loan_amount,
            loan_grade: application.loan_grade.label(),
            loan_intent: application.loan_intent.label(),
            loan_to_income: application.loan_to_income(),
        }
    }
}

/// Pass/fail verdict with the corrective warning when input was rejected.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationView {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Summary plus validation verdict; produced without touching any classifier.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationReview {
    pub summary: ApplicationSummaryView,
    pub validation: ValidationView,
}

impl ApplicationReview {
    pub fn from_application(application: &LoanApplication, warning: Option<String>) -> Self {
        Self {
            summary: ApplicationSummaryView::from(application),
            validation: ValidationView {
                valid: warning.is_none(),
                warning,
            },
        }
    }
}

/// Rendered prediction: binary status, positive-class probability, and the
/// qualitative risk band.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub model: ModelChoice,
    pub model_name: String,
    pub status: &'static str,
    pub outlook: &'static str,
    pub probability_of_default: f64,
    pub risk_band: &'static str,
    pub scored_at: DateTime<Utc>,
}

impl PredictionView {
    pub fn from_prediction(model_name: &str, prediction: &Prediction) -> Self {
        Self {
            model: prediction.model,
            model_name: model_name.to_string(),
            status: prediction.label.label(),
            outlook: prediction.label.outlook(),
            probability_of_default: prediction.probability_of_default(),
            risk_band: prediction.risk_band().label(),
            scored_at: Utc::now(),
        }
    }
}

/// Full scoring response returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub summary: ApplicationSummaryView,
    pub prediction: PredictionView,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
    pub id: ModelChoice,
    pub display_name: String,
}

/// The selectable classifiers and whether the bundle behind them is loaded.
#[derive(Debug, Clone, Serialize)]
pub struct ModelsView {
    pub available: bool,
    pub models: Vec<ModelEntry>,
}

pub(crate) fn models_view(bundle: Option<&ModelBundle>) -> ModelsView {
    let models = ModelChoice::ALL
        .iter()
        .map(|&choice| ModelEntry {
            id: choice,
            display_name: match bundle {
                Some(bundle) => bundle.classifier(choice).display_name().to_string(),
                None => choice.label().to_string(),
            },
        })
        .collect();

    ModelsView {
        available: bundle.is_some(),
        models,
    }
}
