//! Read/write trained artifacts.
//!
//! Both artifacts share one JSON envelope:
//! - `tool`, `kind` and `schema_version` identify the file
//! - `features` records the feature order the parameters were fitted on
//! - `body` holds the fitted parameters
//!
//! Loading checks the envelope against the compiled-in feature schema so a
//! stale or mismatched file fails at startup instead of producing garbage
//! predictions.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::data::CategoryEncoders;
use crate::domain::{FEATURE_SCHEMA_VERSION, Feature};
use crate::error::AppError;
use crate::math::StandardScaler;
use crate::models::LogisticRegression;

const TOOL: &str = "loan-predictor";

/// Artifact discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Scaler,
    Model,
}

/// On-disk envelope shared by every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile<T> {
    pub tool: String,
    pub kind: ArtifactKind,
    pub schema_version: u32,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub body: T,
}

impl<T> ArtifactFile<T> {
    pub fn new(kind: ArtifactKind, body: T) -> Self {
        Self {
            tool: TOOL.to_string(),
            kind,
            schema_version: FEATURE_SCHEMA_VERSION,
            features: Feature::names(),
            created_at: Utc::now(),
            body,
        }
    }
}

/// Scaler artifact body.
pub type ScalerArtifact = ArtifactFile<StandardScaler>;

/// Classifier artifact body plus the training-time context needed to
/// interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBody {
    pub classifier: LogisticRegression,
    /// Label-encoder vocabularies per categorical column (and the label).
    pub encoders: CategoryEncoders,
    pub holdout_accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
}

pub type ModelArtifact = ArtifactFile<ModelBody>;

/// Serialize an artifact to pretty JSON without touching disk.
pub fn encode_artifact<T: Serialize>(artifact: &ArtifactFile<T>) -> Result<String, AppError> {
    serde_json::to_string_pretty(artifact)
        .map_err(|e| AppError::new(4, format!("Failed to serialize {:?} artifact: {e}", artifact.kind)))
}

/// Write pre-encoded artifact JSON atomically (temp file + rename).
pub fn write_encoded(path: &Path, json: &str) -> Result<(), AppError> {
    let tmp = temp_path(path);
    fs::write(&tmp, json)
        .map_err(|e| AppError::new(4, format!("Failed to write artifact '{}': {e}", tmp.display())))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        AppError::new(4, format!("Failed to move artifact into '{}': {e}", path.display()))
    })
}

/// Serialize and write an artifact.
pub fn write_artifact<T: Serialize>(path: &Path, artifact: &ArtifactFile<T>) -> Result<(), AppError> {
    let json = encode_artifact(artifact)?;
    write_encoded(path, &json)
}

/// Read an artifact and check it against the compiled-in schema.
pub fn read_artifact<T: DeserializeOwned>(
    path: &Path,
    expected: ArtifactKind,
) -> Result<ArtifactFile<T>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open artifact '{}': {e}", path.display())))?;
    let artifact: ArtifactFile<T> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid artifact '{}': {e}", path.display())))?;

    check_envelope(&artifact, expected)
        .map_err(|msg| AppError::new(4, format!("Incompatible artifact '{}': {msg}", path.display())))?;
    Ok(artifact)
}

pub fn read_scaler(path: &Path) -> Result<ScalerArtifact, AppError> {
    let artifact: ScalerArtifact = read_artifact(path, ArtifactKind::Scaler)?;
    artifact.body.validate()?;
    Ok(artifact)
}

pub fn read_model(path: &Path) -> Result<ModelArtifact, AppError> {
    let artifact: ModelArtifact = read_artifact(path, ArtifactKind::Model)?;
    artifact.body.classifier.validate()?;
    Ok(artifact)
}

fn check_envelope<T>(artifact: &ArtifactFile<T>, expected: ArtifactKind) -> Result<(), String> {
    if artifact.tool != TOOL {
        return Err(format!("produced by `{}`, expected `{TOOL}`", artifact.tool));
    }
    if artifact.kind != expected {
        return Err(format!("is a {:?} artifact, expected {expected:?}", artifact.kind));
    }
    if artifact.schema_version != FEATURE_SCHEMA_VERSION {
        return Err(format!(
            "schema version {} does not match {FEATURE_SCHEMA_VERSION}",
            artifact.schema_version
        ));
    }
    if artifact.features != Feature::names() {
        return Err(format!("feature order {:?} does not match", artifact.features));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::N_FEATURES;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("loan-predictor-artifact-{}-{name}", std::process::id()))
    }

    fn scaler() -> StandardScaler {
        StandardScaler {
            mean: vec![1.0; N_FEATURES],
            var: vec![4.0; N_FEATURES],
            scale: vec![2.0; N_FEATURES],
            n_samples_seen: 10,
        }
    }

    #[test]
    fn scaler_round_trip() {
        let path = scratch("scaler.json");
        write_artifact(&path, &ArtifactFile::new(ArtifactKind::Scaler, scaler())).unwrap();

        let loaded = read_scaler(&path).unwrap();
        assert_eq!(loaded.body, scaler());
        assert_eq!(loaded.schema_version, FEATURE_SCHEMA_VERSION);
        assert!(!temp_path(&path).exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let path = scratch("kind.json");
        write_artifact(&path, &ArtifactFile::new(ArtifactKind::Scaler, scaler())).unwrap();

        let err = read_artifact::<StandardScaler>(&path, ArtifactKind::Model).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn schema_mismatch_is_rejected() {
        let path = scratch("schema.json");
        let mut artifact = ArtifactFile::new(ArtifactKind::Scaler, scaler());
        artifact.schema_version = FEATURE_SCHEMA_VERSION + 1;
        write_artifact(&path, &artifact).unwrap();
        assert_eq!(read_scaler(&path).unwrap_err().exit_code(), 4);

        artifact.schema_version = FEATURE_SCHEMA_VERSION;
        artifact.features.swap(0, 1);
        write_artifact(&path, &artifact).unwrap();
        assert!(read_scaler(&path).unwrap_err().message().contains("feature order"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_or_corrupt_file_is_rejected() {
        let missing = scratch("does-not-exist.json");
        assert_eq!(read_scaler(&missing).unwrap_err().exit_code(), 2);

        let corrupt = scratch("corrupt.json");
        fs::write(&corrupt, "{ not json").unwrap();
        assert_eq!(read_model(&corrupt).unwrap_err().exit_code(), 2);
        let _ = fs::remove_file(&corrupt);
    }
}
