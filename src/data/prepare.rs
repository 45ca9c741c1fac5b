//! Data cleaning and feature/target splitting

use ndarray::Array1;
use polars::prelude::*;

use crate::error::{Result, TabError};

/// Clean a raw table before it enters the pipeline.
///
/// Non-numeric columns with more distinct values than `unique_values_limit`
/// (id-like columns) are dropped, rows containing nulls are dropped, and
/// numeric columns are cast to Float64.
pub fn clean_data(df: &DataFrame, unique_values_limit: usize) -> Result<DataFrame> {
    let mut keep: Vec<String> = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();
        match col.dtype() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean => keep.push(name),
            _ => {
                let unique = col
                    .n_unique()
                    .map_err(|e| TabError::Data(e.to_string()))?;
                if unique <= unique_values_limit {
                    keep.push(name);
                }
            }
        }
    }

    let selected = df.select(keep)?;
    let cleaned = drop_null_rows(&selected)?;
    cast_numeric_to_f64(&cleaned)
}

/// Drop every row that contains a null in any column
fn drop_null_rows(df: &DataFrame) -> Result<DataFrame> {
    let mut mask: Option<BooleanChunked> = None;
    for col in df.get_columns() {
        let not_null = col.as_materialized_series().is_not_null();
        mask = Some(match mask {
            Some(m) => &m & &not_null,
            None => not_null,
        });
    }
    match mask {
        Some(m) => df.filter(&m).map_err(TabError::from),
        None => Ok(df.clone()),
    }
}

/// Cast all numeric columns to Float64 for consistent downstream processing
fn cast_numeric_to_f64(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();
    for col in df.get_columns() {
        match col.dtype() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Boolean => {
                let casted = col
                    .cast(&DataType::Float64)
                    .map_err(|e| TabError::Data(e.to_string()))?;
                result = result
                    .with_column(casted)
                    .map_err(|e| TabError::Data(e.to_string()))?
                    .clone();
            }
            _ => {}
        }
    }
    Ok(result)
}

/// Split a cleaned table into a feature frame and a target vector.
///
/// Fails with a data error if the target column is absent.
pub fn feature_target_split(df: &DataFrame, target: &str) -> Result<(DataFrame, Array1<f64>)> {
    let target_series = df
        .column(target)
        .map_err(|_| TabError::Data(format!("target column '{target}' not found")))?;

    let target_f64 = target_series
        .cast(&DataType::Float64)
        .map_err(|e| TabError::Data(e.to_string()))?;

    let y: Array1<f64> = target_f64
        .f64()
        .map_err(|e| TabError::Data(e.to_string()))?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();

    let features = df.drop(target)?;
    Ok((features, y))
}

/// Clean, then split: the full preparation step for one table
pub fn prepare_data(
    df: &DataFrame,
    unique_values_limit: usize,
    target: &str,
) -> Result<(DataFrame, Array1<f64>)> {
    let cleaned = clean_data(df, unique_values_limit)?;
    feature_target_split(&cleaned, target)
}
