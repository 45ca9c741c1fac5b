//! Feature transformation
//!
//! Provides the transformer capability used by pipeline stages:
//! - Feature scaling (StandardScaler, MinMaxScaler)
//! - Identity passthrough
//! - Column-wise composition with an explicit remainder policy

mod column_transform;
mod scaler;
mod transforms;

pub use column_transform::{ColumnStage, ColumnTransformer, UnmatchedColumns};
pub use scaler::{MinMaxScaler, MinMaxScalerParams, StandardScaler, StandardScalerParams};
pub use transforms::{IdentityTransform, IdentityTransformParams};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Capability interface for feature transformers.
///
/// A transformer learns state from a numeric feature block during `fit` and
/// maps blocks of the same width during `transform`.
pub trait Transform {
    /// Learn transformation state from the data
    fn fit(&mut self, x: &Array2<f64>) -> Result<()>;

    /// Apply the learned transformation
    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;
}

/// The transformers constructible through the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransformerKind {
    Identity(IdentityTransform),
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

impl Transform for TransformerKind {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        match self {
            TransformerKind::Identity(t) => t.fit(x),
            TransformerKind::Standard(t) => t.fit(x),
            TransformerKind::MinMax(t) => t.fit(x),
        }
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        match self {
            TransformerKind::Identity(t) => t.transform(x),
            TransformerKind::Standard(t) => t.transform(x),
            TransformerKind::MinMax(t) => t.transform(x),
        }
    }
}
