//! Evaluation metrics and named scoring functions

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{Result, TabError};

/// ROC-AUC via the rank-sum (Mann-Whitney) statistic with midrank tie
/// handling.
///
/// Fails with a data error when fewer than two classes are present, where
/// the metric is undefined. The result is always within [0, 1].
pub fn roc_auc_score(y_true: &Array1<f64>, y_score: ArrayView1<'_, f64>) -> Result<f64> {
    let n = y_true.len();
    if n != y_score.len() {
        return Err(TabError::Data(format!(
            "target length ({n}) and score length ({}) differ",
            y_score.len()
        )));
    }

    let n_pos = y_true.iter().filter(|&&y| y > 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(TabError::Data(
            "ROC AUC is undefined when only one class is present".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        y_score[a]
            .partial_cmp(&y_score[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Midranks: tied scores share the average of their rank range
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && y_score[order[j + 1]] == y_score[order[i]] {
            j += 1;
        }
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = midrank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&y, _)| y > 0.5)
        .map(|(_, &r)| r)
        .sum();

    let auc = (rank_sum_pos - n_pos as f64 * (n_pos as f64 + 1.0) / 2.0)
        / (n_pos as f64 * n_neg as f64);
    Ok(auc)
}

/// Fraction of correctly predicted labels
pub fn accuracy_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| (*t - *p).abs() < 0.5)
        .count();
    correct as f64 / y_true.len() as f64
}

/// Negative mean log-likelihood of the positive-class probabilities
pub fn log_loss_score(y_true: &Array1<f64>, p_pos: ArrayView1<'_, f64>) -> Result<f64> {
    let n = y_true.len();
    if n != p_pos.len() {
        return Err(TabError::Data(format!(
            "target length ({n}) and probability length ({}) differ",
            p_pos.len()
        )));
    }
    if n == 0 {
        return Err(TabError::Data("log loss of an empty target".to_string()));
    }

    const EPS: f64 = 1e-15;
    let total: f64 = y_true
        .iter()
        .zip(p_pos.iter())
        .map(|(&y, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            if y > 0.5 {
                -p.ln()
            } else {
                -(1.0 - p).ln()
            }
        })
        .sum();
    Ok(total / n as f64)
}

/// A named scoring function resolvable from configuration.
///
/// All scorers consume the pipeline's `(n, 2)` probability output; the
/// positive class is column 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scorer {
    RocAuc,
    Accuracy,
    LogLoss,
}

impl Scorer {
    pub const KNOWN: &'static [&'static str] = &["roc_auc", "accuracy", "log_loss"];

    /// Resolve a scorer by its configured name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "roc_auc" => Ok(Scorer::RocAuc),
            "accuracy" => Ok(Scorer::Accuracy),
            "log_loss" => Ok(Scorer::LogLoss),
            other => Err(TabError::Resolution(format!(
                "no scoring function named '{other}' (known: {})",
                Self::KNOWN.join(", ")
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scorer::RocAuc => "roc_auc",
            Scorer::Accuracy => "accuracy",
            Scorer::LogLoss => "log_loss",
        }
    }

    /// Apply the scorer to a fold's true labels and probability matrix.
    ///
    /// Whatever the underlying metric raises (e.g. a single-class fold for
    /// ROC-AUC) propagates as a compute error and is fatal to the run.
    pub fn score(&self, y_true: &Array1<f64>, proba: &Array2<f64>) -> Result<f64> {
        if proba.ncols() != 2 {
            return Err(TabError::Compute(format!(
                "scorer '{}': expected 2 probability columns, got {}",
                self.name(),
                proba.ncols()
            )));
        }
        let p_pos = proba.column(1);

        let result = match self {
            Scorer::RocAuc => roc_auc_score(y_true, p_pos),
            Scorer::Accuracy => {
                let labels: Array1<f64> =
                    p_pos.iter().map(|&p| if p >= 0.5 { 1.0 } else { 0.0 }).collect();
                Ok(accuracy_score(y_true, &labels))
            }
            Scorer::LogLoss => log_loss_score(y_true, p_pos),
        };

        result.map_err(|e| TabError::Compute(format!("scorer '{}': {e}", self.name())))
    }
}
