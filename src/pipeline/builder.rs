//! Pipeline assembly from configuration

use super::ClassifierPipeline;
use crate::config::{ClassifierSpec, FeatureTransformConfig};
use crate::error::Result;
use crate::preprocessing::{ColumnStage, ColumnTransformer, UnmatchedColumns};
use crate::registry::Registry;

/// Builds a [`ClassifierPipeline`] from declarative configuration.
///
/// Each transform spec is resolved through the registry in configured order
/// and bound to its named column subset; the classifier spec becomes the
/// terminal stage, with `classname` stripped before its parameters reach the
/// factory. Building performs no I/O and never validates columns against
/// real data, so the same configuration always produces a structurally
/// identical pipeline.
pub struct PipelineBuilder<'a> {
    registry: &'a Registry,
    unmatched_columns: UnmatchedColumns,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            unmatched_columns: UnmatchedColumns::Drop,
        }
    }

    /// Policy for input columns not referenced by any transform stage
    pub fn with_unmatched_columns(mut self, policy: UnmatchedColumns) -> Self {
        self.unmatched_columns = policy;
        self
    }

    /// Resolve and compose the configured stages into a pipeline
    pub fn build(
        &self,
        feature_transform: &FeatureTransformConfig,
        cls_config: &ClassifierSpec,
    ) -> Result<ClassifierPipeline> {
        let stages = feature_transform
            .transformers
            .iter()
            .map(|spec| {
                let transformer = self
                    .registry
                    .resolve_transformer(&spec.classname, &spec.params)?;
                Ok(ColumnStage {
                    name: spec.stage_name.clone(),
                    columns: spec.columns.clone(),
                    transformer,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let classifier = self
            .registry
            .resolve_classifier(&cls_config.classname, &cls_config.params_value())?;

        Ok(ClassifierPipeline::new(
            ColumnTransformer::new(stages, self.unmatched_columns),
            classifier,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformSpec;
    use crate::error::TabError;
    use serde_json::json;
    use std::collections::HashMap;

    fn transform_config(specs: Vec<(&str, &str, Vec<&str>)>) -> FeatureTransformConfig {
        FeatureTransformConfig {
            transformers: specs
                .into_iter()
                .map(|(stage, class, cols)| TransformSpec {
                    stage_name: stage.to_string(),
                    classname: class.to_string(),
                    params: json!({}),
                    columns: cols.into_iter().map(String::from).collect(),
                })
                .collect(),
        }
    }

    fn logistic_spec() -> ClassifierSpec {
        ClassifierSpec {
            classname: "logistic_regression".to_string(),
            params: HashMap::new(),
        }
    }

    #[test]
    fn test_build_preserves_stage_order() {
        let registry = Registry::with_builtins();
        let cfg = transform_config(vec![
            ("third", "identity", vec!["c"]),
            ("first", "standard_scaler", vec!["a"]),
            ("second", "min_max_scaler", vec!["b"]),
        ]);
        let pipeline = PipelineBuilder::new(&registry)
            .build(&cfg, &logistic_spec())
            .unwrap();
        assert_eq!(
            pipeline.feature_transform().stage_names(),
            vec!["third", "first", "second"]
        );
        assert_eq!(
            pipeline.feature_transform().unmatched_columns(),
            UnmatchedColumns::Drop
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let registry = Registry::with_builtins();
        let cfg = transform_config(vec![("scale", "standard_scaler", vec!["a", "b"])]);
        let builder = PipelineBuilder::new(&registry);
        let a = builder.build(&cfg, &logistic_spec()).unwrap();
        let b = builder.build(&cfg, &logistic_spec()).unwrap();
        // Same configuration => structurally identical pipelines
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_unknown_transformer_is_resolution_error() {
        let registry = Registry::with_builtins();
        let cfg = transform_config(vec![("pca", "pca", vec!["a"])]);
        let err = PipelineBuilder::new(&registry)
            .build(&cfg, &logistic_spec())
            .unwrap_err();
        assert!(matches!(err, TabError::Resolution(_)));
    }

    #[test]
    fn test_bad_classifier_params_is_construction_error() {
        let registry = Registry::with_builtins();
        let cfg = transform_config(vec![("raw", "identity", vec!["a"])]);
        let mut params = HashMap::new();
        params.insert("n_estimators".to_string(), json!(100));
        let spec = ClassifierSpec {
            classname: "logistic_regression".to_string(),
            params,
        };
        let err = PipelineBuilder::new(&registry).build(&cfg, &spec).unwrap_err();
        assert!(matches!(err, TabError::Construction(_)));
    }
}
