use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{HomeOwnership, LoanGrade, LoanIntent, ModelChoice};
use super::model::{
    Classifier, ClassifierArtifact, ModelFormatError, ScalerArtifact, StandardScaler, TreeEnsemble,
};

pub const MODEL_XGBOOST_FILE: &str = "model_xgboost.json";
pub const MODEL_RANDOM_FOREST_FILE: &str = "model_random_forest.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const LABEL_ENCODERS_FILE: &str = "label_encoders.json";

/// Failure to produce a usable model bundle. Reported once at startup; the
/// service keeps running with an absent bundle and refuses scoring requests.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact '{name}' could not be read from {}: {source}", dir.display())]
    Unreadable {
        name: &'static str,
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("artifact '{name}' is not valid JSON: {source}")]
    Malformed {
        name: &'static str,
        source: serde_json::Error,
    },
    #[error("artifact '{name}' is invalid: {source}")]
    Invalid {
        name: &'static str,
        source: ModelFormatError,
    },
    #[error("label encoder for '{field}' diverges from the configured mapping at '{label}'")]
    EncoderDrift { field: &'static str, label: String },
}

/// Category-to-code maps exported by the training pipeline. The compiled-in
/// enums are canonical; this artifact is loaded alongside the models and
/// checked against them so drift fails loudly instead of mis-encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEncoders {
    pub person_home_ownership: BTreeMap<String, u8>,
    pub loan_intent: BTreeMap<String, u8>,
    pub loan_grade: BTreeMap<String, u8>,
}

impl CategoryEncoders {
    /// The mappings baked into the category enums.
    pub fn builtin() -> Self {
        Self {
            person_home_ownership: HomeOwnership::ALL
                .iter()
                .map(|variant| (variant.label().to_string(), variant.code()))
                .collect(),
            loan_intent: LoanIntent::ALL
                .iter()
                .map(|variant| (variant.label().to_string(), variant.code()))
                .collect(),
            loan_grade: LoanGrade::ALL
                .iter()
                .map(|variant| (variant.label().to_string(), variant.code()))
                .collect(),
        }
    }

    fn verify(&self) -> Result<(), ArtifactError> {
        let expected = Self::builtin();
        verify_map(
            "person_home_ownership",
            &self.person_home_ownership,
            &expected.person_home_ownership,
        )?;
        verify_map("loan_intent", &self.loan_intent, &expected.loan_intent)?;
        verify_map("loan_grade", &self.loan_grade, &expected.loan_grade)?;
        Ok(())
    }
}

fn verify_map(
    field: &'static str,
    encoded: &BTreeMap<String, u8>,
    expected: &BTreeMap<String, u8>,
) -> Result<(), ArtifactError> {
    for (label, code) in expected {
        if encoded.get(label) != Some(code) {
            return Err(ArtifactError::EncoderDrift {
                field,
                label: label.clone(),
            });
        }
    }

    if let Some(extra) = encoded.keys().find(|label| !expected.contains_key(*label)) {
        return Err(ArtifactError::EncoderDrift {
            field,
            label: extra.clone(),
        });
    }

    Ok(())
}

/// The four pretrained artifacts, loaded once per process and shared
/// read-only across all scoring requests.
pub struct ModelBundle {
    xgboost: Arc<dyn Classifier>,
    random_forest: Arc<dyn Classifier>,
    scaler: StandardScaler,
    encoders: CategoryEncoders,
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("xgboost", &self.xgboost.display_name())
            .field("random_forest", &self.random_forest.display_name())
            .field("scaler", &self.scaler)
            .finish_non_exhaustive()
    }
}

impl ModelBundle {
    /// Read the four named artifacts from `dir` and validate them.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let xgboost: ClassifierArtifact = read_artifact(dir, MODEL_XGBOOST_FILE)?;
        let random_forest: ClassifierArtifact = read_artifact(dir, MODEL_RANDOM_FOREST_FILE)?;
        let scaler: ScalerArtifact = read_artifact(dir, SCALER_FILE)?;
        let encoders: CategoryEncoders = read_artifact(dir, LABEL_ENCODERS_FILE)?;

        encoders.verify()?;

        let scaler = StandardScaler::from_artifact(scaler)
            .map_err(|source| ArtifactError::Invalid {
                name: SCALER_FILE,
                source,
            })?;
        let xgboost = TreeEnsemble::from_artifact(xgboost)
            .map_err(|source| ArtifactError::Invalid {
                name: MODEL_XGBOOST_FILE,
                source,
            })?;
        let random_forest = TreeEnsemble::from_artifact(random_forest)
            .map_err(|source| ArtifactError::Invalid {
                name: MODEL_RANDOM_FOREST_FILE,
                source,
            })?;

        info!(dir = %dir.display(), "model bundle loaded");

        Ok(Self::from_parts(
            Arc::new(xgboost),
            Arc::new(random_forest),
            scaler,
            encoders,
        ))
    }

    /// Assemble a bundle from already-constructed parts. Exists so tests can
    /// swap in classifier doubles.
    pub fn from_parts(
        xgboost: Arc<dyn Classifier>,
        random_forest: Arc<dyn Classifier>,
        scaler: StandardScaler,
        encoders: CategoryEncoders,
    ) -> Self {
        Self {
            xgboost,
            random_forest,
            scaler,
            encoders,
        }
    }

    /// The one classifier the operator selected; the other is never touched.
    pub fn classifier(&self, choice: ModelChoice) -> &dyn Classifier {
        match choice {
            ModelChoice::Xgboost => self.xgboost.as_ref(),
            ModelChoice::RandomForest => self.random_forest.as_ref(),
        }
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoders(&self) -> &CategoryEncoders {
        &self.encoders
    }
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, name: &'static str) -> Result<T, ArtifactError> {
    let raw = fs::read(dir.join(name)).map_err(|source| ArtifactError::Unreadable {
        name,
        dir: dir.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ArtifactError::Malformed { name, source })
}
