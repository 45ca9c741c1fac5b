//! Feature scaling implementations

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::Transform;
use crate::error::{Result, TabError};

/// Constructor parameters for [`StandardScaler`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandardScalerParams {
    /// Center each feature to zero mean
    pub with_mean: bool,
    /// Scale each feature to unit variance
    pub with_std: bool,
}

impl Default for StandardScalerParams {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Standard scaling (z-score normalization): (x - mean) / std
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    with_mean: bool,
    with_std: bool,
    means: Option<Array1<f64>>,
    stds: Option<Array1<f64>>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new(params: StandardScalerParams) -> Self {
        Self {
            with_mean: params.with_mean,
            with_std: params.with_std,
            means: None,
            stds: None,
            is_fitted: false,
        }
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new(StandardScalerParams::default())
    }
}

impl Transform for StandardScaler {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(TabError::Data("cannot fit scaler on empty data".to_string()));
        }

        let means = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(x.ncols()));
        let stds = x.std_axis(Axis(0), 1.0);
        // Constant features keep scale 1.0 so they pass through centered
        let stds = stds.mapv(|s| if s == 0.0 || s.is_nan() { 1.0 } else { s });

        self.means = Some(means);
        self.stds = Some(stds);
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(TabError::NotFitted);
        }
        let means = self.means.as_ref().ok_or(TabError::NotFitted)?;
        let stds = self.stds.as_ref().ok_or(TabError::NotFitted)?;

        if x.ncols() != means.len() {
            return Err(TabError::Data(format!(
                "scaler fitted on {} columns, got {}",
                means.len(),
                x.ncols()
            )));
        }

        let mut result = x.clone();
        if self.with_mean {
            result = result - &means.view().insert_axis(Axis(0));
        }
        if self.with_std {
            result = result / &stds.view().insert_axis(Axis(0));
        }
        Ok(result)
    }
}

/// Constructor parameters for [`MinMaxScaler`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinMaxScalerParams {
    /// Lower bound of the output range
    pub min: f64,
    /// Upper bound of the output range
    pub max: f64,
}

impl Default for MinMaxScalerParams {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

/// Min-Max scaling: (x - min) / (max - min), mapped onto the output range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    range_min: f64,
    range_max: f64,
    mins: Option<Array1<f64>>,
    scales: Option<Array1<f64>>,
    is_fitted: bool,
}

impl MinMaxScaler {
    pub fn new(params: MinMaxScalerParams) -> Self {
        Self {
            range_min: params.min,
            range_max: params.max,
            mins: None,
            scales: None,
            is_fitted: false,
        }
    }
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new(MinMaxScalerParams::default())
    }
}

impl Transform for MinMaxScaler {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(TabError::Data("cannot fit scaler on empty data".to_string()));
        }

        let mins = x.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v));
        let maxs = x.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v));
        let scales = (&maxs - &mins).mapv(|range| if range == 0.0 { 1.0 } else { range });

        self.mins = Some(mins);
        self.scales = Some(scales);
        self.is_fitted = true;
        Ok(())
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(TabError::NotFitted);
        }
        let mins = self.mins.as_ref().ok_or(TabError::NotFitted)?;
        let scales = self.scales.as_ref().ok_or(TabError::NotFitted)?;

        if x.ncols() != mins.len() {
            return Err(TabError::Data(format!(
                "scaler fitted on {} columns, got {}",
                mins.len(),
                x.ncols()
            )));
        }

        let unit = (x - &mins.view().insert_axis(Axis(0))) / &scales.view().insert_axis(Axis(0));
        Ok(unit.mapv(|v| v * (self.range_max - self.range_min) + self.range_min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_standard_scaler() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let mut scaler = StandardScaler::default();
        scaler.fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        // Each column has zero mean after scaling
        let means = scaled.mean_axis(Axis(0)).unwrap();
        assert_relative_eq!(means[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(means[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_standard_scaler_constant_column() {
        let x = array![[5.0], [5.0], [5.0]];
        let mut scaler = StandardScaler::default();
        scaler.fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();
        // Centered, scale falls back to 1.0 rather than dividing by zero
        assert_relative_eq!(scaled[[0, 0]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_min_max_scaler() {
        let x = array![[0.0], [5.0], [10.0]];
        let mut scaler = MinMaxScaler::default();
        scaler.fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();

        assert_relative_eq!(scaled[[0, 0]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(scaled[[1, 0]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(scaled[[2, 0]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let x = array![[1.0]];
        let scaler = StandardScaler::default();
        assert!(matches!(scaler.transform(&x), Err(TabError::NotFitted)));
    }

    #[test]
    fn test_width_mismatch_is_data_error() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let mut scaler = StandardScaler::default();
        scaler.fit(&x).unwrap();
        let narrow = array![[1.0], [2.0]];
        assert!(matches!(scaler.transform(&narrow), Err(TabError::Data(_))));
    }
}
