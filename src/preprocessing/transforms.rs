//! Stateless transformers

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::Transform;
use crate::error::Result;

/// Constructor parameters for [`IdentityTransform`] (none accepted)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityTransformParams {}

/// Passes its column block through unchanged.
///
/// Useful for routing raw columns into the feature matrix while the
/// remainder-drop policy removes everything unlisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityTransform {}

impl IdentityTransform {
    pub fn new(_params: IdentityTransformParams) -> Self {
        Self {}
    }
}

impl Transform for IdentityTransform {
    fn fit(&mut self, _x: &Array2<f64>) -> Result<()> {
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        Ok(x.clone())
    }
}
