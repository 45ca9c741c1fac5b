//! Classifier training
//!
//! Provides the probabilistic-classifier capability used as the pipeline's
//! terminal stage, the scoring functions, and k-fold cross-validation:
//! - Logistic regression (gradient descent, L2)
//! - Gaussian Naive Bayes
//! - Scorers: ROC-AUC, accuracy, log loss
//! - Seeded k-fold splitting and per-fold evaluation

pub mod cross_validation;
mod linear_models;
pub mod metrics;
mod naive_bayes;

pub use cross_validation::{cross_validate, CVReport, CVSplit, FoldResult, KFold};
pub use linear_models::{LogisticRegression, LogisticRegressionParams};
pub use metrics::{accuracy_score, log_loss_score, roc_auc_score, Scorer};
pub use naive_bayes::{GaussianNaiveBayes, GaussianNaiveBayesParams};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Capability interface for classifiers.
///
/// `predict_probability` returns one row per sample and one column per class
/// in ascending class order; in the binary setting the positive class is
/// column 1.
pub trait ProbabilisticClassifier {
    /// Fit the classifier to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Class-probability predictions, shape `(n_samples, n_classes)`
    fn predict_probability(&self, x: &Array2<f64>) -> Result<Array2<f64>>;
}

/// The classifiers constructible through the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifierKind {
    LogisticRegression(LogisticRegression),
    GaussianNb(GaussianNaiveBayes),
}

impl ProbabilisticClassifier for ClassifierKind {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            ClassifierKind::LogisticRegression(c) => c.fit(x, y),
            ClassifierKind::GaussianNb(c) => c.fit(x, y),
        }
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        match self {
            ClassifierKind::LogisticRegression(c) => c.predict_probability(x),
            ClassifierKind::GaussianNb(c) => c.predict_probability(x),
        }
    }
}
