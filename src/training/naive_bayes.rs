//! Naive Bayes classifiers
//!
//! Gaussian Naive Bayes for continuous features.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

use super::ProbabilisticClassifier;
use crate::error::{Result, TabError};

/// Constructor parameters for [`GaussianNaiveBayes`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaussianNaiveBayesParams {
    /// Additive variance smoothing
    pub var_smoothing: f64,
}

impl Default for GaussianNaiveBayesParams {
    fn default() -> Self {
        Self {
            var_smoothing: 1e-9,
        }
    }
}

/// Gaussian Naive Bayes classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianNaiveBayes {
    /// Mean of each feature for each class
    means: HashMap<i64, Vec<f64>>,
    /// Variance of each feature for each class
    variances: HashMap<i64, Vec<f64>>,
    /// Prior probability of each class
    priors: HashMap<i64, f64>,
    /// Classes in ascending order
    classes: Vec<i64>,
    var_smoothing: f64,
    is_fitted: bool,
}

impl GaussianNaiveBayes {
    pub fn new(params: GaussianNaiveBayesParams) -> Self {
        Self {
            means: HashMap::new(),
            variances: HashMap::new(),
            priors: HashMap::new(),
            classes: Vec::new(),
            var_smoothing: params.var_smoothing,
            is_fitted: false,
        }
    }

    fn log_likelihood(&self, x: ndarray::ArrayView1<'_, f64>, class: i64) -> f64 {
        let means = &self.means[&class];
        let vars = &self.variances[&class];

        x.iter()
            .zip(means.iter())
            .zip(vars.iter())
            .map(|((&xi, &mean), &var)| {
                -0.5 * ((xi - mean).powi(2) / var + var.ln() + (2.0 * PI).ln())
            })
            .sum()
    }

    fn predict_log_proba(&self, x: &Array2<f64>) -> Array2<f64> {
        let n_samples = x.nrows();
        let n_classes = self.classes.len();

        let mut log_probs = Array2::zeros((n_samples, n_classes));

        for (i, row) in x.rows().into_iter().enumerate() {
            for (j, &class) in self.classes.iter().enumerate() {
                let log_prior = self.priors[&class].ln();
                log_probs[[i, j]] = log_prior + self.log_likelihood(row, class);
            }
        }

        // Normalize (log-sum-exp trick)
        for mut row in log_probs.rows_mut() {
            let max_val = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let log_sum: f64 = row.iter().map(|&v| (v - max_val).exp()).sum::<f64>().ln();
            for val in row.iter_mut() {
                *val = *val - max_val - log_sum;
            }
        }

        log_probs
    }
}

impl Default for GaussianNaiveBayes {
    fn default() -> Self {
        Self::new(GaussianNaiveBayesParams::default())
    }
}

impl ProbabilisticClassifier for GaussianNaiveBayes {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples != y.len() {
            return Err(TabError::Data(format!(
                "feature rows ({n_samples}) and target length ({}) differ",
                y.len()
            )));
        }

        let mut class_counts: HashMap<i64, usize> = HashMap::new();
        for &label in y.iter() {
            *class_counts.entry(label as i64).or_insert(0) += 1;
        }

        self.classes = class_counts.keys().cloned().collect();
        self.classes.sort_unstable();

        for (&class, &count) in &class_counts {
            self.priors.insert(class, count as f64 / n_samples as f64);
        }

        for &class in &self.classes {
            let class_indices: Vec<usize> = y
                .iter()
                .enumerate()
                .filter(|(_, &yi)| yi as i64 == class)
                .map(|(i, _)| i)
                .collect();
            let n_class = class_indices.len();

            // Single-pass Welford's algorithm for mean and variance
            let mut feature_means = vec![0.0; n_features];
            let mut feature_m2 = vec![0.0; n_features];
            let mut count = 0usize;
            for &idx in &class_indices {
                count += 1;
                for (j, &val) in x.row(idx).iter().enumerate() {
                    let delta = val - feature_means[j];
                    feature_means[j] += delta / count as f64;
                    let delta2 = val - feature_means[j];
                    feature_m2[j] += delta * delta2;
                }
            }
            let feature_vars: Vec<f64> = feature_m2
                .iter()
                .map(|&m2| (m2 / n_class as f64) + self.var_smoothing)
                .collect();

            self.means.insert(class, feature_means);
            self.variances.insert(class, feature_vars);
        }

        self.is_fitted = true;
        Ok(())
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(TabError::NotFitted);
        }
        Ok(self.predict_log_proba(x).mapv(|v| v.exp()))
    }
}
