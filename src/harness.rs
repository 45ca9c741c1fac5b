//! Run orchestration
//!
//! Drives one training run through its strictly linear lifecycle: assemble
//! the pipeline from configuration, load the data, cross-validate over the
//! union of train and test, fit on the train split, evaluate ROC-AUC on the
//! test split, and persist the metric and the fitted pipeline. Any error
//! aborts the remaining stages; nothing is retried.

use tracing::info;

use crate::config::TrainConfig;
use crate::data::{load_csv, prepare_data};
use crate::error::Result;
use crate::persist::{save_metric, save_pipeline};
use crate::pipeline::PipelineBuilder;
use crate::registry::Registry;
use crate::training::cross_validation::{cross_validate, CVReport};
use crate::training::metrics::roc_auc_score;

/// Outcome of a completed run
#[derive(Debug)]
pub struct RunSummary {
    /// ROC-AUC on the held-out test split
    pub roc_auc: f64,
    /// Per-fold cross-validation results over train∪test
    pub cv_report: CVReport,
}

/// Execute a run with the built-in estimator registry
pub fn run(cfg: &TrainConfig) -> Result<RunSummary> {
    let registry = Registry::with_builtins();
    run_with_registry(cfg, &registry)
}

/// Execute a run against a caller-supplied registry
pub fn run_with_registry(cfg: &TrainConfig, registry: &Registry) -> Result<RunSummary> {
    cfg.validate()?;

    info!("assemble pipeline");
    let pipeline = PipelineBuilder::new(registry).build(&cfg.feature_transform, &cfg.cls_config)?;

    info!(
        "load train data from {}",
        cfg.data_config.path_to_train.display()
    );
    let train_data = load_csv(&cfg.data_config.path_to_train)?;
    info!(
        "load test data from {}",
        cfg.data_config.path_to_test.display()
    );
    let test_data = load_csv(&cfg.data_config.path_to_test)?;

    info!("union all data and perform cross validation");
    let cv_report = {
        let union_data = train_data.vstack(&test_data)?;
        let (features, target) = prepare_data(
            &union_data,
            cfg.data_config.unique_values_limit,
            &cfg.data_config.target_variable,
        )?;
        cross_validate(&pipeline, &features, &target, &cfg.cross_val)?
        // union data goes out of scope here, before training starts
    };
    info!("cross validation results:\n{cv_report}");

    info!("train classifier");
    let (train_features, train_target) = prepare_data(
        &train_data,
        cfg.data_config.unique_values_limit,
        &cfg.data_config.target_variable,
    )?;
    let mut pipeline = pipeline;
    pipeline.fit(&train_features, &train_target)?;

    let (test_features, test_target) = prepare_data(
        &test_data,
        cfg.data_config.unique_values_limit,
        &cfg.data_config.target_variable,
    )?;
    let proba = pipeline.predict_probability(&test_features)?;
    let roc_auc = roc_auc_score(&test_target, proba.column(1))?;

    info!("ROC AUC score: {roc_auc:.6}");

    // Independent side effects: a metric failure must not prevent the
    // model write attempt, but either failure fails the run
    info!("save metric to {}", cfg.output_metric.display());
    let metric_result = save_metric(&cfg.output_metric, roc_auc);
    info!("save trained model to {}", cfg.model_path.display());
    let model_result = save_pipeline(&cfg.model_path, &pipeline);
    metric_result?;
    model_result?;

    Ok(RunSummary { roc_auc, cv_report })
}
