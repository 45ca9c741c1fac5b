//! The assembled classification pipeline

mod builder;

pub use builder::PipelineBuilder;

use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, TabError};
use crate::preprocessing::ColumnTransformer;
use crate::training::{ClassifierKind, ProbabilisticClassifier};

/// An ordered two-stage pipeline: a composite feature-transform stage
/// followed by a terminal probabilistic classifier.
///
/// Structure is fixed at build time; only internal learned state changes
/// across fit calls. Cloning yields an unfitted-equivalent copy of whatever
/// state the source held, which is how cross-validation refits per fold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierPipeline {
    feature_transform: ColumnTransformer,
    classifier: ClassifierKind,
    is_fitted: bool,
}

impl ClassifierPipeline {
    pub(crate) fn new(feature_transform: ColumnTransformer, classifier: ClassifierKind) -> Self {
        Self {
            feature_transform,
            classifier,
            is_fitted: false,
        }
    }

    /// The composite feature-transform stage
    pub fn feature_transform(&self) -> &ColumnTransformer {
        &self.feature_transform
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fit the pipeline in place on a feature frame and target vector.
    ///
    /// The target must be non-empty and contain exactly two classes; a
    /// missing transform column surfaces here as a data error.
    pub fn fit(&mut self, features: &DataFrame, target: &Array1<f64>) -> Result<&mut Self> {
        if target.is_empty() {
            return Err(TabError::Data("target vector is empty".to_string()));
        }
        let classes: HashSet<i64> = target.iter().map(|&y| y as i64).collect();
        if classes.len() != 2 {
            return Err(TabError::Data(format!(
                "binary classification requires exactly 2 target classes, got {}",
                classes.len()
            )));
        }
        if features.height() != target.len() {
            return Err(TabError::Data(format!(
                "feature rows ({}) and target length ({}) differ",
                features.height(),
                target.len()
            )));
        }

        let x = self.feature_transform.fit_transform(features)?;
        self.classifier.fit(&x, target)?;
        self.is_fitted = true;
        Ok(self)
    }

    /// Class-probability predictions for a feature frame, shape `(n, 2)`,
    /// positive class in column 1
    pub fn predict_probability(&self, features: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(TabError::NotFitted);
        }
        let x = self.feature_transform.transform(features)?;
        self.classifier.predict_probability(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{
        ColumnStage, IdentityTransform, TransformerKind, UnmatchedColumns,
    };
    use crate::training::{LogisticRegression, LogisticRegressionParams};
    use ndarray::array;
    use polars::prelude::*;

    fn simple_pipeline() -> ClassifierPipeline {
        let ct = ColumnTransformer::new(
            vec![ColumnStage {
                name: "raw".to_string(),
                columns: vec!["f".to_string()],
                transformer: TransformerKind::Identity(IdentityTransform::default()),
            }],
            UnmatchedColumns::Drop,
        );
        let cls = ClassifierKind::LogisticRegression(LogisticRegression::new(
            LogisticRegressionParams::default(),
        ));
        ClassifierPipeline::new(ct, cls)
    }

    fn simple_df() -> DataFrame {
        df!("f" => &[0.0, 0.5, 1.0, 5.0, 5.5, 6.0]).unwrap()
    }

    #[test]
    fn test_fit_predict() {
        let mut pipeline = simple_pipeline();
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        pipeline.fit(&simple_df(), &y).unwrap();
        assert!(pipeline.is_fitted());

        let proba = pipeline.predict_probability(&simple_df()).unwrap();
        assert_eq!(proba.shape(), &[6, 2]);
    }

    #[test]
    fn test_empty_target_is_data_error() {
        let mut pipeline = simple_pipeline();
        let empty = df!("f" => &[0.0; 0]).unwrap();
        let err = pipeline.fit(&empty, &array![]).unwrap_err();
        assert!(matches!(err, TabError::Data(_)));
    }

    #[test]
    fn test_single_class_target_is_data_error() {
        let mut pipeline = simple_pipeline();
        let y = array![1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let err = pipeline.fit(&simple_df(), &y).unwrap_err();
        assert!(matches!(err, TabError::Data(_)));
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let pipeline = simple_pipeline();
        assert!(matches!(
            pipeline.predict_probability(&simple_df()),
            Err(TabError::NotFitted)
        ));
    }
}
