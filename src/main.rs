//! tabtrain - Main Entry Point
//!
//! Configuration-driven training of tabular binary classifiers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use tabtrain::config::TrainConfig;
use tabtrain::harness;

#[derive(Parser)]
#[command(name = "tabtrain")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Configuration-driven training harness for tabular binary classifiers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full training lifecycle from a YAML configuration
    Train {
        /// Path to the run configuration
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Load and validate a configuration without running it
    Validate {
        /// Path to the run configuration
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabtrain=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Train { config } => TrainConfig::from_yaml_file(&config)
            .and_then(|cfg| harness::run(&cfg))
            .map(|summary| {
                info!("run complete, ROC AUC {:.6}", summary.roc_auc);
            }),
        Commands::Validate { config } => TrainConfig::from_yaml_file(&config).map(|_| {
            info!("configuration is valid");
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("run aborted: {e}");
            ExitCode::FAILURE
        }
    }
}
