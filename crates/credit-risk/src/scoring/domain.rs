use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the feature vector the classifiers were trained on.
pub const FEATURE_COUNT: usize = 8;

/// Training-time column order. Every scaler statistic and tree split index
/// refers to a position in this sequence.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "person_age",
    "person_income",
    "person_emp_length",
    "person_home_ownership",
    "loan_amnt",
    "loan_grade",
    "loan_intent",
    "loan_percent_income",
];

/// One loan application as submitted from the form. Ephemeral: built per
/// interaction, scored, and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub age: u8,
    pub income: u32,
    pub years_employed: u8,
    pub home_ownership: HomeOwnership,
    pub loan_amount: u32,
    pub loan_intent: LoanIntent,
    pub loan_grade: LoanGrade,
}

impl LoanApplication {
    /// Loan amount relative to annual income. Zero income yields 0.0 rather
    /// than a division error; the intake guard keeps that case out of the
    /// public surface anyway.
    pub fn loan_to_income(&self) -> f64 {
        if self.income == 0 {
            return 0.0;
        }
        f64::from(self.loan_amount) / f64::from(self.income)
    }
}

/// Home-ownership category with the integer code assigned at training time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomeOwnership {
    #[serde(rename = "MORTGAGE")]
    Mortgage,
    #[serde(rename = "OTHER")]
    Other,
    #[serde(rename = "OWN")]
    Own,
    #[serde(rename = "RENT")]
    Rent,
}

impl HomeOwnership {
    pub const ALL: [Self; 4] = [Self::Mortgage, Self::Other, Self::Own, Self::Rent];

    pub const fn code(self) -> u8 {
        match self {
            Self::Mortgage => 0,
            Self::Other => 1,
            Self::Own => 2,
            Self::Rent => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mortgage => "MORTGAGE",
            Self::Other => "OTHER",
            Self::Own => "OWN",
            Self::Rent => "RENT",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.code() == code)
    }
}

/// Loan purpose category with its training-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanIntent {
    #[serde(rename = "DEBTCONSOLIDATION")]
    DebtConsolidation,
    #[serde(rename = "EDUCATION")]
    Education,
    #[serde(rename = "HOMEIMPROVEMENT")]
    HomeImprovement,
    #[serde(rename = "MEDICAL")]
    Medical,
    #[serde(rename = "PERSONAL")]
    Personal,
    #[serde(rename = "VENTURE")]
    Venture,
}

impl LoanIntent {
    pub const ALL: [Self; 6] = [
        Self::DebtConsolidation,
        Self::Education,
        Self::HomeImprovement,
        Self::Medical,
        Self::Personal,
        Self::Venture,
    ];

    pub const fn code(self) -> u8 {
        match self {
            Self::DebtConsolidation => 0,
            Self::Education => 1,
            Self::HomeImprovement => 2,
            Self::Medical => 3,
            Self::Personal => 4,
            Self::Venture => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DebtConsolidation => "DEBTCONSOLIDATION",
            Self::Education => "EDUCATION",
            Self::HomeImprovement => "HOMEIMPROVEMENT",
            Self::Medical => "MEDICAL",
            Self::Personal => "PERSONAL",
            Self::Venture => "VENTURE",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.code() == code)
    }
}

/// Loan grade ordered A (lowest risk) through G, codes 0 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoanGrade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl LoanGrade {
    pub const ALL: [Self; 7] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
    ];

    pub const fn code(self) -> u8 {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
            Self::E => 4,
            Self::F => 5,
            Self::G => 6,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.code() == code)
    }
}

/// The 8 numeric values handed to the scaler and classifiers, in the exact
/// order of [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub const fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// Selects one of the two interchangeable classifier artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelChoice {
    Xgboost,
    RandomForest,
}

impl ModelChoice {
    pub const ALL: [Self; 2] = [Self::Xgboost, Self::RandomForest];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Xgboost => "XGBoost",
            Self::RandomForest => "Random Forest",
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Xgboost => "xgboost",
            Self::RandomForest => "random_forest",
        }
    }
}

impl Default for ModelChoice {
    fn default() -> Self {
        Self::Xgboost
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelChoice {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "xgboost" => Ok(Self::Xgboost),
            "random_forest" => Ok(Self::RandomForest),
            other => Err(format!(
                "unknown model '{other}', expected 'xgboost' or 'random_forest'"
            )),
        }
    }
}

impl FromStr for HomeOwnership {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|variant| variant.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown home ownership category '{raw}'"))
    }
}

impl FromStr for LoanIntent {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|variant| variant.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown loan intent category '{raw}'"))
    }
}

impl FromStr for LoanGrade {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|variant| variant.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown loan grade '{raw}', expected A through G"))
    }
}

/// Binary outcome of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    Performing,
    AtRisk,
}

impl RiskLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Performing => "performing",
            Self::AtRisk => "at_risk",
        }
    }

    pub const fn outlook(self) -> &'static str {
        match self {
            Self::Performing => "applicant is expected to keep the loan current",
            Self::AtRisk => "applicant is at risk of defaulting on the loan",
        }
    }
}

/// Qualitative band over the positive-class probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    High,
}

impl RiskBand {
    pub fn from_probability(probability_of_default: f64) -> Self {
        if probability_of_default > 0.5 {
            Self::High
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low_risk",
            Self::High => "high_risk",
        }
    }
}
