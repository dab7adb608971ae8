//! The offline training pipeline.
//!
//! CSV ingest -> cleaning/encoding -> seeded split -> scaler fit -> classifier
//! fit -> holdout scoring. Persisting the results is a separate step
//! ([`save_artifacts`]) so the pipeline itself stays free of side effects and
//! easy to test.

use tracing::{debug, info};

use crate::data::{PreparedData, SplitIndices, prepare, train_test_split};
use crate::domain::{LABEL_COLUMN, TrainConfig};
use crate::error::AppError;
use crate::io::{
    ArtifactFile, ArtifactKind, HoldoutPrediction, ModelBody, RawDataset, encode_artifact,
    load_dataset, write_encoded,
};
use crate::math::StandardScaler;
use crate::models::{LogisticOptions, LogisticRegression};

/// All computed outputs of a single training run.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub rows_loaded: usize,
    pub dropped_id_column: bool,
    pub ignored_columns: Vec<String>,
    pub prepared: PreparedData,
    pub split: SplitIndices,
    pub scaler: StandardScaler,
    pub classifier: LogisticRegression,
    pub accuracy: f64,
    pub holdout: Vec<HoldoutPrediction>,
}

impl TrainingRun {
    /// `(negative, positive)` label counts over the whole dataset.
    pub fn class_balance(&self) -> (usize, usize) {
        let positive = self.prepared.labels.iter().filter(|&&y| y == 1.0).count();
        (self.prepared.len() - positive, positive)
    }
}

/// Load the configured CSV and run the pipeline.
pub fn run_training(config: &TrainConfig) -> Result<TrainingRun, AppError> {
    info!(path = %config.data_path.display(), "loading dataset");
    let raw = load_dataset(&config.data_path)?;
    run_training_on(&raw, config)
}

/// Run the pipeline on an already-ingested dataset.
pub fn run_training_on(raw: &RawDataset, config: &TrainConfig) -> Result<TrainingRun, AppError> {
    let prepared = prepare(raw)?;
    for imp in &prepared.imputations {
        // Medians come from every row, holdout included.
        debug!(
            column = imp.feature.column_name(),
            median = imp.median,
            filled = imp.filled,
            "imputed numeric column"
        );
    }

    let split = train_test_split(prepared.len(), config.test_size, config.seed)?;
    info!(
        rows = prepared.len(),
        train = split.train.len(),
        test = split.test.len(),
        seed = config.seed,
        "split dataset"
    );

    let (x_train, y_train) = prepared.select(&split.train);
    let (x_test, y_test) = prepared.select(&split.test);

    let scaler = StandardScaler::fit(&x_train)?;
    let x_train = scaler.transform_all(&x_train);
    let x_test = scaler.transform_all(&x_test);

    let opts = LogisticOptions {
        c: config.c,
        max_iter: config.max_iter,
        ..LogisticOptions::default()
    };
    let classifier = LogisticRegression::fit(&x_train, &y_train, opts)?;
    info!(
        iterations = classifier.n_iter,
        converged = classifier.converged,
        "fitted logistic regression"
    );

    let accuracy = classifier.score(&x_test, &y_test);

    let label_encoder = prepared.label_encoder();
    let holdout = split
        .test
        .iter()
        .zip(x_test.iter().zip(&y_test))
        .map(|(&row, (x, &label))| HoldoutPrediction {
            row,
            line: raw.records[row].line,
            status: label_encoder
                .and_then(|enc| enc.inverse(label as usize))
                .unwrap_or_default()
                .to_string(),
            label: label as usize,
            predicted: classifier.predict(x),
            probability: classifier.predict_proba(x),
        })
        .collect();

    Ok(TrainingRun {
        rows_loaded: raw.records.len(),
        dropped_id_column: raw.dropped_id_column,
        ignored_columns: raw.ignored_columns.clone(),
        prepared,
        split,
        scaler,
        classifier,
        accuracy,
        holdout,
    })
}

/// Persist the scaler and classifier artifacts.
///
/// Both files are fully encoded before either is written, so a serialization
/// failure leaves nothing on disk.
pub fn save_artifacts(run: &TrainingRun, config: &TrainConfig) -> Result<(), AppError> {
    if !run.prepared.encoders.contains_key(LABEL_COLUMN) {
        return Err(AppError::new(4, "Training run is missing its label encoder."));
    }

    let scaler = ArtifactFile::new(ArtifactKind::Scaler, run.scaler.clone());
    let model = ArtifactFile::new(
        ArtifactKind::Model,
        ModelBody {
            classifier: run.classifier.clone(),
            encoders: run.prepared.encoders.clone(),
            holdout_accuracy: run.accuracy,
            n_train: run.split.train.len(),
            n_test: run.split.test.len(),
        },
    );

    let scaler_json = encode_artifact(&scaler)?;
    let model_json = encode_artifact(&model)?;

    write_encoded(&config.scaler_out, &scaler_json)?;
    if let Err(err) = write_encoded(&config.model_out, &model_json) {
        // Do not leave a scaler behind without its model.
        let _ = std::fs::remove_file(&config.scaler_out);
        return Err(err);
    }

    info!(
        model = %config.model_out.display(),
        scaler = %config.scaler_out.display(),
        "saved artifacts"
    );
    Ok(())
}
