//! Estimator registry
//!
//! Maps stable string keys to factory functions for the transformers and
//! classifiers a pipeline may be assembled from. Registration happens once,
//! in [`Registry::with_builtins`]; resolution is pure, so the same name and
//! parameters always construct a structurally identical estimator.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Result, TabError};
use crate::preprocessing::{
    IdentityTransform, IdentityTransformParams, MinMaxScaler, MinMaxScalerParams, StandardScaler,
    StandardScalerParams, TransformerKind,
};
use crate::training::{
    ClassifierKind, GaussianNaiveBayes, GaussianNaiveBayesParams, LogisticRegression,
    LogisticRegressionParams,
};

type TransformerFactory = fn(&Value) -> Result<TransformerKind>;
type ClassifierFactory = fn(&Value) -> Result<ClassifierKind>;

/// Registry of constructible estimators
pub struct Registry {
    transformers: HashMap<String, TransformerFactory>,
    classifiers: HashMap<String, ClassifierFactory>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            transformers: HashMap::new(),
            classifiers: HashMap::new(),
        }
    }

    /// The registry with all built-in estimators registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_transformer("identity", make_identity);
        registry.register_transformer("standard_scaler", make_standard_scaler);
        registry.register_transformer("min_max_scaler", make_min_max_scaler);
        registry.register_classifier("logistic_regression", make_logistic_regression);
        registry.register_classifier("gaussian_nb", make_gaussian_nb);
        registry
    }

    pub fn register_transformer(&mut self, name: &str, factory: TransformerFactory) {
        self.transformers.insert(name.to_string(), factory);
    }

    pub fn register_classifier(&mut self, name: &str, factory: ClassifierFactory) {
        self.classifiers.insert(name.to_string(), factory);
    }

    /// Construct a transformer from its registry key and parameter mapping
    pub fn resolve_transformer(&self, name: &str, params: &Value) -> Result<TransformerKind> {
        let factory = self.transformers.get(name).ok_or_else(|| {
            TabError::Resolution(format!(
                "no transformer named '{name}' (known: {})",
                self.transformer_names().join(", ")
            ))
        })?;
        factory(params)
    }

    /// Construct a classifier from its registry key and parameter mapping
    pub fn resolve_classifier(&self, name: &str, params: &Value) -> Result<ClassifierKind> {
        let factory = self.classifiers.get(name).ok_or_else(|| {
            TabError::Resolution(format!(
                "no classifier named '{name}' (known: {})",
                self.classifier_names().join(", ")
            ))
        })?;
        factory(params)
    }

    /// Registered transformer names, sorted
    pub fn transformer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.transformers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered classifier names, sorted
    pub fn classifier_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classifiers.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Deserialize a factory's parameter struct from the configured mapping.
///
/// An absent/null mapping means defaults; unknown or ill-typed keyword
/// parameters are rejected by serde and surface as construction errors.
fn parse_params<P: serde::de::DeserializeOwned + Default>(name: &str, params: &Value) -> Result<P> {
    if params.is_null() {
        return Ok(P::default());
    }
    serde_json::from_value(params.clone())
        .map_err(|e| TabError::Construction(format!("{name}: {e}")))
}

fn make_identity(params: &Value) -> Result<TransformerKind> {
    let p: IdentityTransformParams = parse_params("identity", params)?;
    Ok(TransformerKind::Identity(IdentityTransform::new(p)))
}

fn make_standard_scaler(params: &Value) -> Result<TransformerKind> {
    let p: StandardScalerParams = parse_params("standard_scaler", params)?;
    Ok(TransformerKind::Standard(StandardScaler::new(p)))
}

fn make_min_max_scaler(params: &Value) -> Result<TransformerKind> {
    let p: MinMaxScalerParams = parse_params("min_max_scaler", params)?;
    Ok(TransformerKind::MinMax(MinMaxScaler::new(p)))
}

fn make_logistic_regression(params: &Value) -> Result<ClassifierKind> {
    let p: LogisticRegressionParams = parse_params("logistic_regression", params)?;
    Ok(ClassifierKind::LogisticRegression(LogisticRegression::new(p)))
}

fn make_gaussian_nb(params: &Value) -> Result<ClassifierKind> {
    let p: GaussianNaiveBayesParams = parse_params("gaussian_nb", params)?;
    Ok(ClassifierKind::GaussianNb(GaussianNaiveBayes::new(p)))
}
