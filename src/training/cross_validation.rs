//! K-fold cross-validation

use ndarray::Array1;
use polars::prelude::DataFrame;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::config::CrossValConfig;
use crate::data::take_rows;
use crate::error::{Result, TabError};
use crate::pipeline::ClassifierPipeline;
use crate::training::Scorer;

/// A single train/test split
#[derive(Debug, Clone)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Seeded k-fold splitter
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    random_state: u64,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: true,
            random_state: 0,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the shuffling seed; splits are fully deterministic for a given seed
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Generate `n_splits` train/test splits over `n_samples` rows
    pub fn split(&self, n_samples: usize) -> Result<Vec<CVSplit>> {
        if self.n_splits < 2 {
            return Err(TabError::ConfigValidation(
                "fold count must be at least 2".to_string(),
            ));
        }
        if n_samples < self.n_splits {
            return Err(TabError::Data(format!(
                "n_samples ({n_samples}) must be >= fold count ({})",
                self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
            indices.shuffle(&mut rng);
        }

        let fold_sizes: Vec<usize> = (0..self.n_splits)
            .map(|i| {
                let base = n_samples / self.n_splits;
                let remainder = n_samples % self.n_splits;
                if i < remainder {
                    base + 1
                } else {
                    base
                }
            })
            .collect();

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut current = 0;

        for (fold_idx, &fold_size) in fold_sizes.iter().enumerate() {
            let test_indices: Vec<usize> = indices[current..current + fold_size].to_vec();
            let train_indices: Vec<usize> = indices[..current]
                .iter()
                .chain(indices[current + fold_size..].iter())
                .copied()
                .collect();

            splits.push(CVSplit {
                train_indices,
                test_indices,
                fold_idx,
            });

            current += fold_size;
        }

        Ok(splits)
    }
}

/// Result of evaluating one fold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold: usize,
    /// Seconds spent fitting the fold's pipeline clone
    pub fit_time: f64,
    /// Seconds spent predicting and scoring the held-out fold
    pub score_time: f64,
    /// (scorer name, value) in configured order
    pub scores: Vec<(String, f64)>,
}

/// Cross-validation results: one row per fold, one column per scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CVReport {
    pub folds: Vec<FoldResult>,
    /// Number of rows in the evaluated dataset
    pub n_samples: usize,
}

impl CVReport {
    /// Mean of a scorer's values across folds
    pub fn mean_score(&self, name: &str) -> Option<f64> {
        let values: Vec<f64> = self
            .folds
            .iter()
            .filter_map(|f| {
                f.scores
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| *v)
            })
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

impl fmt::Display for CVReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6} {:>10} {:>11}", "fold", "fit_time", "score_time")?;
        if let Some(first) = self.folds.first() {
            for (name, _) in &first.scores {
                write!(f, " {name:>12}")?;
            }
        }
        writeln!(f)?;
        for fold in &self.folds {
            write!(
                f,
                "{:<6} {:>10.4} {:>11.4}",
                fold.fold, fold.fit_time, fold.score_time
            )?;
            for (_, value) in &fold.scores {
                write!(f, " {value:>12.4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fit and score a clone of the pipeline on each of `cfg.cv` folds.
///
/// Folds are evaluated on the rayon pool; shuffling is seeded and results
/// are aggregated in fold order, so concurrency cannot change the report.
pub fn cross_validate(
    pipeline: &ClassifierPipeline,
    features: &DataFrame,
    target: &Array1<f64>,
    cfg: &CrossValConfig,
) -> Result<CVReport> {
    let n_samples = features.height();
    if target.len() != n_samples {
        return Err(TabError::Data(format!(
            "feature rows ({n_samples}) and target length ({}) differ",
            target.len()
        )));
    }

    let scorers: Vec<Scorer> = cfg
        .scores
        .iter()
        .map(|s| Scorer::from_name(s))
        .collect::<Result<_>>()?;

    let splits = KFold::new(cfg.cv)
        .with_random_state(cfg.random_state)
        .split(n_samples)?;

    let folds: Vec<FoldResult> = splits
        .par_iter()
        .map(|split| evaluate_fold(pipeline, features, target, split, &scorers))
        .collect::<Result<Vec<_>>>()?;

    Ok(CVReport { folds, n_samples })
}

fn evaluate_fold(
    pipeline: &ClassifierPipeline,
    features: &DataFrame,
    target: &Array1<f64>,
    split: &CVSplit,
    scorers: &[Scorer],
) -> Result<FoldResult> {
    let train_df = take_rows(features, &split.train_indices)?;
    let test_df = take_rows(features, &split.test_indices)?;
    let train_y: Array1<f64> = split.train_indices.iter().map(|&i| target[i]).collect();
    let test_y: Array1<f64> = split.test_indices.iter().map(|&i| target[i]).collect();

    let mut fold_pipeline = pipeline.clone();

    let start = Instant::now();
    fold_pipeline.fit(&train_df, &train_y)?;
    let fit_time = start.elapsed().as_secs_f64();

    let start = Instant::now();
    let proba = fold_pipeline.predict_probability(&test_df)?;
    let scores = scorers
        .iter()
        .map(|scorer| Ok((scorer.name().to_string(), scorer.score(&test_y, &proba)?)))
        .collect::<Result<Vec<_>>>()?;
    let score_time = start.elapsed().as_secs_f64();

    Ok(FoldResult {
        fold: split.fold_idx,
        fit_time,
        score_time,
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k_fold_covers_all_indices_once() {
        let splits = KFold::new(5).with_shuffle(false).split(100).unwrap();
        assert_eq!(splits.len(), 5);

        for split in &splits {
            assert_eq!(split.test_indices.len(), 20);
            assert_eq!(split.train_indices.len(), 80);
        }

        let mut all_test: Vec<usize> = splits
            .iter()
            .flat_map(|s| s.test_indices.clone())
            .collect();
        all_test.sort_unstable();
        assert_eq!(all_test, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_k_fold_uneven_sizes() {
        let splits = KFold::new(3).with_shuffle(false).split(10).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.test_indices.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn test_k_fold_seed_is_deterministic() {
        let a = KFold::new(4).with_random_state(7).split(40).unwrap();
        let b = KFold::new(4).with_random_state(7).split(40).unwrap();
        for (sa, sb) in a.iter().zip(b.iter()) {
            assert_eq!(sa.test_indices, sb.test_indices);
        }
    }

    #[test]
    fn test_too_few_samples_is_data_error() {
        let err = KFold::new(5).split(3).unwrap_err();
        assert!(matches!(err, TabError::Data(_)));
    }

    #[test]
    fn test_report_display_and_mean() {
        let report = CVReport {
            folds: vec![
                FoldResult {
                    fold: 0,
                    fit_time: 0.01,
                    score_time: 0.001,
                    scores: vec![("roc_auc".to_string(), 0.9)],
                },
                FoldResult {
                    fold: 1,
                    fit_time: 0.01,
                    score_time: 0.001,
                    scores: vec![("roc_auc".to_string(), 0.7)],
                },
            ],
            n_samples: 100,
        };
        let rendered = report.to_string();
        assert!(rendered.contains("roc_auc"));
        assert!(rendered.lines().count() >= 3);
        assert!((report.mean_score("roc_auc").unwrap() - 0.8).abs() < 1e-12);
        assert!(report.mean_score("accuracy").is_none());
    }
}
