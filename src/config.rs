//! Run configuration
//!
//! Typed configuration structures for a training run, loaded from YAML and
//! validated eagerly. Validation failures carry the exact field path of the
//! offending entry, so a bad config fails at load time rather than deep
//! inside pipeline construction.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{Result, TabError};
use crate::training::Scorer;

/// Input data locations and cleaning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the training CSV
    pub path_to_train: PathBuf,
    /// Path to the held-out test CSV
    pub path_to_test: PathBuf,
    /// Non-numeric columns with more distinct values than this are dropped
    pub unique_values_limit: usize,
    /// Name of the target column
    pub target_variable: String,
}

/// One feature-transform stage: a named transformer bound to a column subset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformSpec {
    /// Stage name, unique within the pipeline
    pub stage_name: String,
    /// Registry key of the transformer to construct
    pub classname: String,
    /// Keyword parameters forwarded to the transformer factory
    #[serde(default)]
    pub params: Value,
    /// Input columns this stage applies to, in order
    pub columns: Vec<String>,
}

/// Ordered list of feature-transform stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTransformConfig {
    pub transformers: Vec<TransformSpec>,
}

/// Terminal classifier stage.
///
/// `classname` selects the registry entry; every other key in the mapping is
/// captured by the flattened `params` and handed to the factory, so the
/// classname never reaches the constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSpec {
    pub classname: String,
    #[serde(flatten)]
    pub params: HashMap<String, Value>,
}

impl ClassifierSpec {
    /// Constructor parameters as a JSON object (classname already stripped)
    pub fn params_value(&self) -> Value {
        Value::Object(self.params.clone().into_iter().collect())
    }
}

/// Cross-validation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValConfig {
    /// Named scoring functions, one result column each
    pub scores: Vec<String>,
    /// Fold count, at least 2
    pub cv: usize,
    /// Fold-shuffling seed; a fixed default keeps reported scores
    /// reproducible run to run
    #[serde(default = "default_cv_seed")]
    pub random_state: u64,
}

fn default_cv_seed() -> u64 {
    42
}

/// Complete configuration for one training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_config: DataConfig,
    pub feature_transform: FeatureTransformConfig,
    pub cls_config: ClassifierSpec,
    pub cross_val: CrossValConfig,
    /// Where the metric record is written
    pub output_metric: PathBuf,
    /// Where the fitted pipeline artifact is written
    pub model_path: PathBuf,
}

impl TrainConfig {
    /// Load and validate a configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TabError::ConfigValidation(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: TrainConfig = serde_yaml::from_str(content)
            .map_err(|e| TabError::ConfigValidation(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Eager required-field and type checks.
    ///
    /// Column existence is not checked here: build is schema-agnostic and a
    /// missing column surfaces as a data error at fit time.
    pub fn validate(&self) -> Result<()> {
        fn fail(path: &str, reason: &str) -> Result<()> {
            Err(TabError::ConfigValidation(format!("{path}: {reason}")))
        }

        if self.data_config.target_variable.is_empty() {
            return fail("data_config.target_variable", "must not be empty");
        }
        if self.data_config.unique_values_limit == 0 {
            return fail("data_config.unique_values_limit", "must be at least 1");
        }

        if self.feature_transform.transformers.is_empty() {
            return fail("feature_transform.transformers", "must not be empty");
        }
        let mut seen = HashSet::new();
        for (i, spec) in self.feature_transform.transformers.iter().enumerate() {
            let path = format!("feature_transform.transformers[{i}]");
            if spec.stage_name.is_empty() {
                return fail(&format!("{path}.stage_name"), "must not be empty");
            }
            if !seen.insert(spec.stage_name.as_str()) {
                return fail(
                    &format!("{path}.stage_name"),
                    &format!("duplicate stage name '{}'", spec.stage_name),
                );
            }
            if spec.classname.is_empty() {
                return fail(&format!("{path}.classname"), "must not be empty");
            }
            if spec.columns.is_empty() {
                return fail(&format!("{path}.columns"), "must not be empty");
            }
            if !(spec.params.is_object() || spec.params.is_null()) {
                return fail(&format!("{path}.params"), "must be a mapping");
            }
        }

        if self.cls_config.classname.is_empty() {
            return fail("cls_config.classname", "must not be empty");
        }

        if self.cross_val.cv < 2 {
            return fail("cross_val.cv", "must be at least 2");
        }
        if self.cross_val.scores.is_empty() {
            return fail("cross_val.scores", "must not be empty");
        }
        for (i, name) in self.cross_val.scores.iter().enumerate() {
            if Scorer::from_name(name).is_err() {
                return fail(
                    &format!("cross_val.scores[{i}]"),
                    &format!("unknown scoring function '{name}'"),
                );
            }
        }

        Ok(())
    }
}
