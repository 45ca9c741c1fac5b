//! Linear classification models

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::ProbabilisticClassifier;
use crate::error::{Result, TabError};

/// Constructor parameters for [`LogisticRegression`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogisticRegressionParams {
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Maximum gradient descent iterations
    pub max_iter: usize,
    /// L2 regularization strength
    pub alpha: f64,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
    /// Whether to fit an intercept term
    pub fit_intercept: bool,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 1000,
            alpha: 0.01,
            tol: 1e-6,
            fit_intercept: true,
        }
    }
}

/// Logistic regression for binary classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    learning_rate: f64,
    max_iter: usize,
    alpha: f64,
    tol: f64,
    fit_intercept: bool,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
    is_fitted: bool,
}

impl LogisticRegression {
    pub fn new(params: LogisticRegressionParams) -> Self {
        Self {
            learning_rate: params.learning_rate,
            max_iter: params.max_iter,
            alpha: params.alpha,
            tol: params.tol,
            fit_intercept: params.fit_intercept,
            coefficients: None,
            intercept: 0.0,
            is_fitted: false,
        }
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Probability of the positive class for each sample
    fn positive_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(TabError::NotFitted);
        }
        let coefficients = self.coefficients.as_ref().ok_or(TabError::NotFitted)?;
        let linear = x.dot(coefficients) + self.intercept;
        Ok(Self::sigmoid(&linear))
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(LogisticRegressionParams::default())
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    /// Fit with full-batch gradient descent.
    ///
    /// Weights start at zero, so fitting is deterministic for a given input.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(TabError::Data(format!(
                "feature rows ({n_samples}) and target length ({}) differ",
                y.len()
            )));
        }

        let mut weights = Array1::zeros(x.ncols());
        let mut bias = 0.0;

        for _iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);

            let errors = &predictions - y;
            let dw = (x.t().dot(&errors) / n_samples as f64) + (self.alpha * &weights);
            let db = if self.fit_intercept {
                errors.mean().unwrap_or(0.0)
            } else {
                0.0
            };

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - self.learning_rate * dw;
            bias -= self.learning_rate * db;
        }

        self.coefficients = Some(weights);
        self.intercept = bias;
        self.is_fitted = true;
        Ok(())
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let p1 = self.positive_proba(x)?;
        let p0 = p1.mapv(|p| 1.0 - p);
        let stacked = ndarray::stack(
            Axis(1),
            &[p0.view(), p1.view()],
        )?;
        Ok(stacked)
    }
}
