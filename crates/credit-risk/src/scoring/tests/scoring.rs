use std::sync::Arc;

use super::common::*;
use crate::scoring::artifacts::{CategoryEncoders, ModelBundle};
use crate::scoring::domain::{ModelChoice, RiskBand, RiskLabel};
use crate::scoring::features::assemble;
use crate::scoring::model::{
    Classifier, ClassifierArtifact, DecisionTree, EnsembleFamily, ScalerArtifact, StandardScaler,
    TreeEnsemble, TreeNode,
};
use crate::scoring::scorer::Scorer;
use crate::scoring::service::{ScoringService, ScoringServiceError};

#[test]
fn scaler_applies_training_statistics() {
    let scaler = StandardScaler::from_artifact(ScalerArtifact {
        mean: vec![25.0, 50_000.0, 2.0, 3.0, 10_000.0, 0.0, 4.0, 0.2],
        scale: vec![5.0, 10_000.0, 2.0, 1.0, 5_000.0, 1.0, 2.0, 0.1],
    })
    .expect("valid scaler");

    let scaled = scaler.transform(assemble(&applicant()).values());
    assert_eq!(scaled, [0.0; 8]);
}

#[test]
fn gradient_boosting_margin_passes_through_sigmoid() {
    let ensemble = TreeEnsemble::from_artifact(ClassifierArtifact {
        name: "XGBoost".to_string(),
        family: EnsembleFamily::GradientBoosting { base_score: -1.0 },
        trees: vec![
            DecisionTree {
                nodes: vec![TreeNode::Leaf { value: 0.4 }],
            },
            DecisionTree {
                nodes: vec![TreeNode::Leaf { value: 0.6 }],
            },
        ],
    })
    .expect("valid ensemble");

    // Margin is exactly zero, so the sigmoid lands on 0.5.
    let probabilities = ensemble.predict_proba(&[0.0; 8]).expect("prediction");
    assert!((probabilities.at_risk - 0.5).abs() < 1e-12);
    assert_eq!(probabilities.predicted_label(), RiskLabel::Performing);
    assert_eq!(RiskBand::from_probability(probabilities.at_risk), RiskBand::Low);
}

#[test]
fn random_forest_averages_tree_probabilities() {
    let ensemble = TreeEnsemble::from_artifact(ClassifierArtifact {
        name: "Random Forest".to_string(),
        family: EnsembleFamily::RandomForest,
        trees: vec![
            DecisionTree {
                nodes: vec![TreeNode::Leaf { value: 0.2 }],
            },
            DecisionTree {
                nodes: vec![TreeNode::Leaf { value: 0.4 }],
            },
        ],
    })
    .expect("valid ensemble");

    let probabilities = ensemble.predict_proba(&[0.0; 8]).expect("prediction");
    assert!((probabilities.at_risk - 0.3).abs() < 1e-12);
    assert!((probabilities.performing - 0.7).abs() < 1e-12);
}

#[test]
fn splits_route_on_the_scaled_feature() {
    let ensemble = TreeEnsemble::from_artifact(ClassifierArtifact {
        name: "Random Forest".to_string(),
        family: EnsembleFamily::RandomForest,
        trees: vec![DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 7,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: 0.1 },
                TreeNode::Leaf { value: 0.9 },
            ],
        }],
    })
    .expect("valid ensemble");

    let mut low_ratio = [0.0; 8];
    low_ratio[7] = 0.2;
    let mut high_ratio = [0.0; 8];
    high_ratio[7] = 0.8;

    assert_eq!(
        ensemble.predict_proba(&low_ratio).expect("prediction").at_risk,
        0.1
    );
    assert_eq!(
        ensemble
            .predict_proba(&high_ratio)
            .expect("prediction")
            .at_risk,
        0.9
    );
}

#[test]
fn no_classifier_is_invoked_for_invalid_input() {
    let (service, xgboost, random_forest) = counting_service();

    let result = service.score(&implausible_applicant(), ModelChoice::Xgboost);

    assert!(matches!(result, Err(ScoringServiceError::Validation(_))));
    assert_eq!(xgboost.calls(), 0);
    assert_eq!(random_forest.calls(), 0);
}

#[test]
fn no_classifier_is_invoked_for_out_of_range_input() {
    let (service, xgboost, random_forest) = counting_service();

    let mut application = applicant();
    application.income = 100;
    let result = service.score(&application, ModelChoice::RandomForest);

    assert!(matches!(result, Err(ScoringServiceError::Intake(_))));
    assert_eq!(xgboost.calls(), 0);
    assert_eq!(random_forest.calls(), 0);
}

#[test]
fn scoring_is_refused_when_bundle_is_absent() {
    let service = ScoringService::new(None);

    let result = service.score(&applicant(), ModelChoice::Xgboost);

    assert!(matches!(
        result,
        Err(ScoringServiceError::ModelUnavailable)
    ));
}

#[test]
fn model_choice_routes_to_exactly_the_chosen_classifier() {
    let (service, xgboost, random_forest) = counting_service();

    service
        .score(&applicant(), ModelChoice::Xgboost)
        .expect("scores");
    assert_eq!(xgboost.calls(), 1);
    assert_eq!(random_forest.calls(), 0);

    service
        .score(&applicant(), ModelChoice::RandomForest)
        .expect("scores");
    assert_eq!(xgboost.calls(), 1);
    assert_eq!(random_forest.calls(), 1);
}

#[test]
fn prediction_view_carries_status_probability_and_band() {
    let (service, _, _) = counting_service();

    let response = service
        .score(&applicant(), ModelChoice::RandomForest)
        .expect("scores");

    assert_eq!(response.prediction.status, "at_risk");
    assert_eq!(response.prediction.risk_band, "high_risk");
    assert!((response.prediction.probability_of_default - 0.8).abs() < 1e-12);
    assert_eq!(response.summary.loan_to_income, 0.2);
}

#[test]
fn classifier_failures_surface_as_scoring_errors() {
    let service = ScoringService::new(Some(bundle_with(
        Arc::new(FailingClassifier),
        CountingClassifier::new("Random Forest", 0.5),
    )));

    let result = service.score(&applicant(), ModelChoice::Xgboost);
    assert!(matches!(result, Err(ScoringServiceError::Scoring(_))));
}

#[test]
fn repeated_scoring_is_deterministic() {
    let scaler = StandardScaler::from_artifact(ScalerArtifact {
        mean: vec![27.7, 66_074.0, 4.8, 2.1, 9_589.0, 2.0, 2.5, 0.17],
        scale: vec![6.3, 61_983.0, 4.1, 1.3, 6_322.0, 1.4, 1.7, 0.1],
    })
    .expect("valid scaler");
    let ensemble = TreeEnsemble::from_artifact(ClassifierArtifact {
        name: "XGBoost".to_string(),
        family: EnsembleFamily::GradientBoosting { base_score: -0.5 },
        trees: vec![DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 7,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: -0.3 },
                TreeNode::Leaf { value: 0.6 },
            ],
        }],
    })
    .expect("valid ensemble");
    let ensemble: Arc<TreeEnsemble> = Arc::new(ensemble);

    let bundle = Arc::new(ModelBundle::from_parts(
        ensemble.clone(),
        ensemble,
        scaler,
        CategoryEncoders::builtin(),
    ));
    let scorer = Scorer::new(bundle);
    let features = assemble(&applicant());

    let first = scorer
        .score(ModelChoice::Xgboost, &features)
        .expect("scores");
    let second = scorer
        .score(ModelChoice::Xgboost, &features)
        .expect("scores");

    assert_eq!(first.probabilities, second.probabilities);
    assert_eq!(first.label, second.label);
    assert!(first.probability_of_default() > 0.0 && first.probability_of_default() < 1.0);
}
