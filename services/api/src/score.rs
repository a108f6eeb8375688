use crate::infra::{parse_home_ownership, parse_loan_grade, parse_loan_intent, parse_model};
use clap::Args;
use credit_risk::config::AppConfig;
use credit_risk::error::AppError;
use credit_risk::scoring::{
    ApplicationSummaryView, HomeOwnership, LoanApplication, LoanGrade, LoanIntent, ModelBundle,
    ModelChoice, PredictionView, ScoringService, ScoringServiceError,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Applicant age in years
    #[arg(long)]
    pub(crate) age: u8,
    /// Annual income
    #[arg(long)]
    pub(crate) income: u32,
    /// Years of employment
    #[arg(long)]
    pub(crate) years_employed: u8,
    /// Home ownership category (RENT, OWN, MORTGAGE, OTHER)
    #[arg(long, value_parser = parse_home_ownership)]
    pub(crate) home_ownership: HomeOwnership,
    /// Requested loan amount
    #[arg(long)]
    pub(crate) loan_amount: u32,
    /// Loan purpose (PERSONAL, EDUCATION, MEDICAL, VENTURE, HOMEIMPROVEMENT, DEBTCONSOLIDATION)
    #[arg(long, value_parser = parse_loan_intent)]
    pub(crate) loan_intent: LoanIntent,
    /// Loan grade (A through G)
    #[arg(long, value_parser = parse_loan_grade)]
    pub(crate) loan_grade: LoanGrade,
    /// Classifier to use (xgboost or random_forest)
    #[arg(long, value_parser = parse_model, default_value = "xgboost")]
    pub(crate) model: ModelChoice,
    /// Override the directory holding the serialized model artifacts
    #[arg(long)]
    pub(crate) model_dir: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        age,
        income,
        years_employed,
        home_ownership,
        loan_amount,
        loan_intent,
        loan_grade,
        model,
        model_dir,
    } = args;

    let config = AppConfig::load()?;
    let model_dir = model_dir.unwrap_or(config.models.dir);

    let application = LoanApplication {
        age,
        income,
        years_employed,
        home_ownership,
        loan_amount,
        loan_intent,
        loan_grade,
    };

    let bundle = match ModelBundle::load(&model_dir) {
        Ok(bundle) => Some(Arc::new(bundle)),
        Err(err) => {
            eprintln!(
                "warning: model artifacts could not be loaded from {} ({err})",
                model_dir.display()
            );
            None
        }
    };
    let service = ScoringService::new(bundle);

    let review = service.review(&application);
    render_summary(&review.summary);

    if let Some(warning) = review.validation.warning {
        println!("\nApplication rejected: {warning}");
        return Ok(());
    }

    match service.score(&application, model) {
        Ok(response) => render_prediction(&response.prediction),
        Err(ScoringServiceError::ModelUnavailable) => {
            println!("\nThe application is valid, but no classifier is available to score it.");
        }
        Err(err) => {
            println!("\nScoring failed: {err}");
        }
    }

    Ok(())
}

fn render_summary(summary: &ApplicationSummaryView) {
    println!("Loan application summary");
    println!(
        "- Applicant: age {} | income {} | {} years employed | housing {}",
        summary.age, summary.income, summary.years_employed, summary.home_ownership
    );
    println!(
        "- Loan: {} for {} at grade {} | {:.1}% of income",
        summary.loan_amount,
        summary.loan_intent,
        summary.loan_grade,
        summary.loan_to_income * 100.0
    );
}

fn render_prediction(prediction: &PredictionView) {
    println!("\nPrediction ({})", prediction.model_name);
    println!(
        "- Outcome: {} | probability of default {:.1}%",
        prediction.outlook,
        prediction.probability_of_default * 100.0
    );
    println!("- Risk band: {}", prediction.risk_band);
}
