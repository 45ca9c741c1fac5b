//! Data loading and preparation
//!
//! CSV loading plus the cleaning/splitting collaborators that turn a raw
//! table into a feature frame and a target vector.

mod loader;
mod prepare;

pub use loader::load_csv;
pub use prepare::{clean_data, feature_target_split, prepare_data};

use ndarray::Array2;
use polars::prelude::*;

use crate::error::{Result, TabError};

/// Extract named columns from a DataFrame into a row-major `Array2<f64>`.
///
/// Columns are cast to Float64; a missing column is a data error.
pub(crate) fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let series = df
                .column(col_name)
                .map_err(|_| TabError::Data(format!("column '{col_name}' not found")))?;
            let series_f64 = series
                .cast(&DataType::Float64)
                .map_err(|e| TabError::Data(e.to_string()))?;
            let values: Vec<f64> = series_f64
                .f64()
                .map_err(|e| TabError::Data(e.to_string()))?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect();
            Ok(values)
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
        col_refs[c][r]
    }))
}

/// Select a row subset of a DataFrame by position
pub(crate) fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx: IdxCa = IdxCa::from_vec(
        "idx".into(),
        indices.iter().map(|&i| i as IdxSize).collect(),
    );
    df.take(&idx).map_err(TabError::from)
}
