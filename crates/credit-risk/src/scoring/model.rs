use serde::{Deserialize, Serialize};

use super::domain::{RiskLabel, FEATURE_COUNT};

/// Numeric failure while producing a prediction. Never retried; surfaced to
/// the caller as a failed prediction.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("classifier '{model}' produced a non-finite probability")]
    NonFiniteProbability { model: String },
}

/// Structural problems in a deserialized artifact, caught at load time so the
/// inference path stays infallible apart from numeric failures.
#[derive(Debug, thiserror::Error)]
pub enum ModelFormatError {
    #[error("scaler expects {expected} features, artifact carries {found}")]
    ScalerShape { expected: usize, found: usize },
    #[error("scaler statistics must be finite with strictly positive scale")]
    ScalerStatistics,
    #[error("classifier '{model}' carries no trees")]
    EmptyEnsemble { model: String },
    #[error("classifier '{model}', tree {tree}: {detail}")]
    TreeStructure {
        model: String,
        tree: usize,
        detail: String,
    },
}

/// Probability pair over the two outcome classes. Always sums to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub performing: f64,
    pub at_risk: f64,
}

impl ClassProbabilities {
    /// Argmax over the pair; a tie resolves to the performing class.
    pub fn predicted_label(&self) -> RiskLabel {
        if self.at_risk > self.performing {
            RiskLabel::AtRisk
        } else {
            RiskLabel::Performing
        }
    }
}

/// Contract both pretrained classifier artifacts satisfy: a scaled feature
/// vector in, a class-probability pair out.
pub trait Classifier: Send + Sync {
    fn display_name(&self) -> &str;
    fn predict_proba(
        &self,
        features: &[f64; FEATURE_COUNT],
    ) -> Result<ClassProbabilities, ScoringError>;
}

/// Serialized form of the fitted standard scaler: per-feature mean and scale
/// computed at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Fitted normalization transform. Statistics are fixed at training time and
/// never re-fitted at inference.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self, ModelFormatError> {
        let mean: [f64; FEATURE_COUNT] =
            artifact
                .mean
                .try_into()
                .map_err(|values: Vec<f64>| ModelFormatError::ScalerShape {
                    expected: FEATURE_COUNT,
                    found: values.len(),
                })?;
        let scale: [f64; FEATURE_COUNT] =
            artifact
                .scale
                .try_into()
                .map_err(|values: Vec<f64>| ModelFormatError::ScalerShape {
                    expected: FEATURE_COUNT,
                    found: values.len(),
                })?;

        let statistics_sane = mean.iter().all(|value| value.is_finite())
            && scale.iter().all(|value| value.is_finite() && *value > 0.0);
        if !statistics_sane {
            return Err(ModelFormatError::ScalerStatistics);
        }

        Ok(Self { mean, scale })
    }

    pub fn transform(&self, values: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = *values;
        for (index, value) in scaled.iter_mut().enumerate() {
            *value = (*value - self.mean[index]) / self.scale[index];
        }
        scaled
    }
}

/// One node of a serialized decision tree. Child indices always point
/// forward in the node array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn output(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    fn validate(&self, leaf_bounds: Option<(f64, f64)>) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(format!(
                            "node {index} splits on feature {feature}, only {FEATURE_COUNT} exist"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {index} has a non-finite threshold"));
                    }
                    // Forward-only children guarantee traversal terminates.
                    if left <= index || right <= index {
                        return Err(format!("node {index} has a backward child reference"));
                    }
                    if left >= self.nodes.len() || right >= self.nodes.len() {
                        return Err(format!("node {index} references a missing child"));
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {index} has a non-finite leaf value"));
                    }
                    if let Some((min, max)) = leaf_bounds {
                        if value < min || value > max {
                            return Err(format!(
                                "node {index} leaf value {value} outside {min}..={max}"
                            ));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// How tree outputs combine into a positive-class probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnsembleFamily {
    /// Trees emit margins; the sum (plus base score) passes through a
    /// sigmoid.
    GradientBoosting { base_score: f64 },
    /// Trees emit per-leaf positive-class fractions; the forest averages
    /// them.
    RandomForest,
}

/// Serialized form of one classifier artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub name: String,
    pub family: EnsembleFamily,
    pub trees: Vec<DecisionTree>,
}

/// Pretrained tree-ensemble classifier, structurally validated on
/// construction.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    name: String,
    family: EnsembleFamily,
    trees: Vec<DecisionTree>,
}

impl TreeEnsemble {
    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self, ModelFormatError> {
        if artifact.trees.is_empty() {
            return Err(ModelFormatError::EmptyEnsemble {
                model: artifact.name,
            });
        }

        let leaf_bounds = match artifact.family {
            EnsembleFamily::GradientBoosting { base_score } => {
                if !base_score.is_finite() {
                    return Err(ModelFormatError::TreeStructure {
                        model: artifact.name,
                        tree: 0,
                        detail: "base score is non-finite".to_string(),
                    });
                }
                None
            }
            EnsembleFamily::RandomForest => Some((0.0, 1.0)),
        };

        for (index, tree) in artifact.trees.iter().enumerate() {
            if let Err(detail) = tree.validate(leaf_bounds) {
                return Err(ModelFormatError::TreeStructure {
                    model: artifact.name,
                    tree: index,
                    detail,
                });
            }
        }

        Ok(Self {
            name: artifact.name,
            family: artifact.family,
            trees: artifact.trees,
        })
    }
}

impl Classifier for TreeEnsemble {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn predict_proba(
        &self,
        features: &[f64; FEATURE_COUNT],
    ) -> Result<ClassProbabilities, ScoringError> {
        let at_risk = match self.family {
            EnsembleFamily::GradientBoosting { base_score } => {
                let margin: f64 = base_score
                    + self
                        .trees
                        .iter()
                        .map(|tree| tree.output(features))
                        .sum::<f64>();
                sigmoid(margin)
            }
            EnsembleFamily::RandomForest => {
                let total: f64 = self.trees.iter().map(|tree| tree.output(features)).sum();
                total / self.trees.len() as f64
            }
        };

        if !at_risk.is_finite() {
            return Err(ScoringError::NonFiniteProbability {
                model: self.name.clone(),
            });
        }

        Ok(ClassProbabilities {
            performing: 1.0 - at_risk,
            at_risk,
        })
    }
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}
