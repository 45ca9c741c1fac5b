//! Run artifact persistence
//!
//! Writes the metric record and the fitted pipeline. The two writes are
//! independent side effects with their own failure domains; the harness
//! attempts both even when the first fails.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{Result, TabError};
use crate::pipeline::ClassifierPipeline;

/// Key under which the evaluation metric is recorded
pub const METRIC_KEY: &str = "ROC AUC";

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                TabError::Persistence(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
    }
    Ok(())
}

/// Write the metric as a single JSON record, overwriting any existing file
pub fn save_metric(path: &Path, value: f64) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut record = serde_json::Map::new();
    record.insert(METRIC_KEY.to_string(), Value::from(value));
    let content = serde_json::to_string(&Value::Object(record))
        .map_err(|e| TabError::Persistence(e.to_string()))?;

    fs::write(path, content)
        .map_err(|e| TabError::Persistence(format!("cannot write {}: {e}", path.display())))
}

/// Read back a metric record written by [`save_metric`]
pub fn load_metric(path: &Path) -> Result<f64> {
    let content = fs::read_to_string(path)
        .map_err(|e| TabError::Persistence(format!("cannot read {}: {e}", path.display())))?;
    let record: Value = serde_json::from_str(&content)
        .map_err(|e| TabError::Persistence(format!("cannot parse {}: {e}", path.display())))?;
    record
        .get(METRIC_KEY)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            TabError::Persistence(format!("{} has no '{METRIC_KEY}' entry", path.display()))
        })
}

/// Serialize the fitted pipeline as an opaque binary artifact
pub fn save_pipeline(path: &Path, pipeline: &ClassifierPipeline) -> Result<()> {
    ensure_parent_dir(path)?;

    let bytes = bincode::serde::encode_to_vec(pipeline, bincode::config::standard())
        .map_err(|e| TabError::Persistence(format!("cannot serialize pipeline: {e}")))?;

    fs::write(path, bytes)
        .map_err(|e| TabError::Persistence(format!("cannot write {}: {e}", path.display())))
}

/// Restore a pipeline written by [`save_pipeline`]
pub fn load_pipeline(path: &Path) -> Result<ClassifierPipeline> {
    let bytes = fs::read(path)
        .map_err(|e| TabError::Persistence(format!("cannot read {}: {e}", path.display())))?;

    let (pipeline, _) =
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .map_err(|e| TabError::Persistence(format!("cannot deserialize pipeline: {e}")))?;
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_metric_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metrics").join("roc_auc.json");

        save_metric(&path, 0.8731).unwrap();
        assert_eq!(load_metric(&path).unwrap(), 0.8731);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("ROC AUC"));
    }

    #[test]
    fn test_metric_overwrite_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metric.json");

        save_metric(&path, 0.5).unwrap();
        let first = std::fs::read(&path).unwrap();
        save_metric(&path, 0.5).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_metric_missing_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"accuracy": 0.9}"#).unwrap();
        assert!(matches!(
            load_metric(&path),
            Err(TabError::Persistence(_))
        ));
    }
}
