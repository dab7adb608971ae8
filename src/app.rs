//! Top-level application orchestration.
//!
//! The binaries in `src/bin/` are intentionally tiny; this module is the
//! "real main" for each of them:
//! - `train`: parse flags, run the pipeline, persist artifacts, print the summary
//! - `serve`: parse flags/env, load artifacts into a `ServiceContext`, serve HTTP

use std::path::Path;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{ServeArgs, TrainArgs};
use crate::domain::{ServeConfig, TrainConfig};
use crate::error::AppError;
use crate::server::ServiceContext;

pub mod pipeline;

/// Entry point for the `loan-train` binary.
pub fn train() -> Result<(), AppError> {
    init_tracing();
    let args = TrainArgs::parse();
    let config = train_config_from_args(&args);

    let run = pipeline::run_training(&config)?;
    pipeline::save_artifacts(&run, &config)?;

    if let Some(path) = &config.export_predictions {
        crate::io::export::write_predictions_csv(path, &run.holdout)?;
        info!(path = %path.display(), "exported holdout predictions");
    }

    println!("{}", crate::report::format_training_summary(&run, &config));
    println!(
        "Model saved as {} (scaler: {})",
        config.model_out.display(),
        config.scaler_out.display()
    );
    Ok(())
}

/// Entry point for the `loan-serve` binary.
pub fn serve() -> Result<(), AppError> {
    init_serve_logging(None);
    let args = ServeArgs::parse();
    let config = serve_config_from_args(&args);

    // Starting: a failure here ends the process before any route exists.
    let ctx = ServiceContext::load(&config.model_path, &config.scaler_path)?;
    info!(
        model = %config.model_path.display(),
        scaler = %config.scaler_path.display(),
        "artifacts loaded"
    );

    actix_web::rt::System::new().block_on(crate::server::serve(ctx, &config.host, config.port))
}

pub fn train_config_from_args(args: &TrainArgs) -> TrainConfig {
    TrainConfig {
        data_path: args.data.clone(),
        model_out: args.model_out.clone(),
        scaler_out: args.scaler_out.clone(),
        test_size: args.test_size,
        seed: args.seed,
        max_iter: args.max_iter,
        c: args.c,
        export_predictions: args.export_predictions.clone(),
    }
}

pub fn serve_config_from_args(args: &ServeArgs) -> ServeConfig {
    ServeConfig {
        host: args.host.clone(),
        port: args.port,
        model_path: args.model.clone(),
        scaler_path: args.scaler.clone(),
    }
}

/// Load `.env` (or `env_file`), then install the subscriber, so a `RUST_LOG`
/// set in the file reaches the filter.
fn init_serve_logging(env_file: Option<&Path>) {
    let _ = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    init_tracing();
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("loan_predictor=info,actix_server=info"))
}

fn init_tracing() {
    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
