//! Column-wise transformer composition

use ndarray::{Array2, Axis};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use super::{Transform, TransformerKind};
use crate::data::columns_to_array2;
use crate::error::{Result, TabError};

/// Policy for input columns not referenced by any stage.
///
/// Unlisted columns never reach the transformed output; the policy is held
/// as an explicit field so the behavior can be asserted directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnmatchedColumns {
    #[default]
    Drop,
}

/// One named transform stage bound to an ordered column subset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStage {
    pub name: String,
    pub columns: Vec<String>,
    pub transformer: TransformerKind,
}

/// Applies each stage's transformer to its column subset and concatenates
/// the results in stage order.
///
/// Construction is schema-agnostic: column existence is only checked against
/// real data at fit/transform time, where a missing column is a data error
/// naming the stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    stages: Vec<ColumnStage>,
    unmatched_columns: UnmatchedColumns,
    is_fitted: bool,
}

impl ColumnTransformer {
    pub fn new(stages: Vec<ColumnStage>, unmatched_columns: UnmatchedColumns) -> Self {
        Self {
            stages,
            unmatched_columns,
            is_fitted: false,
        }
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn unmatched_columns(&self) -> UnmatchedColumns {
        self.unmatched_columns
    }

    /// Fit every stage's transformer on its column subset
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        for stage in &mut self.stages {
            let block = Self::stage_block(&stage.name, &stage.columns, df)?;
            stage.transformer.fit(&block)?;
        }
        self.is_fitted = true;
        Ok(self)
    }

    /// Transform each stage's subset and concatenate in stage order.
    ///
    /// Columns not referenced by any stage are dropped.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(TabError::NotFitted);
        }

        let blocks: Vec<Array2<f64>> = self
            .stages
            .iter()
            .map(|stage| {
                let block = Self::stage_block(&stage.name, &stage.columns, df)?;
                stage.transformer.transform(&block)
            })
            .collect::<Result<Vec<_>>>()?;

        let views: Vec<_> = blocks.iter().map(|b| b.view()).collect();
        ndarray::concatenate(Axis(1), &views).map_err(TabError::from)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    fn stage_block(name: &str, columns: &[String], df: &DataFrame) -> Result<Array2<f64>> {
        columns_to_array2(df, columns).map_err(|e| match e {
            TabError::Data(msg) => TabError::Data(format!("stage '{name}': {msg}")),
            other => other,
        })
    }
}
