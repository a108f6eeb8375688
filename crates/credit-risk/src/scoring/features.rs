use super::domain::{FeatureVector, LoanApplication};

/// Map a raw application onto the fixed-order numeric vector the classifiers
/// were trained on: age, income, years employed, home-ownership code, loan
/// amount, grade code, intent code, loan-to-income ratio.
pub fn assemble(application: &LoanApplication) -> FeatureVector {
    FeatureVector::new([
        f64::from(application.age),
        f64::from(application.income),
        f64::from(application.years_employed),
        f64::from(application.home_ownership.code()),
        f64::from(application.loan_amount),
        f64::from(application.loan_grade.code()),
        f64::from(application.loan_intent.code()),
        application.loan_to_income(),
    ])
}
