//! The read-only state shared by every request handler.

use std::path::Path;

use serde::Serialize;

use crate::data::CategoryEncoders;
use crate::domain::{Applicant, FEATURE_SCHEMA_VERSION, Feature, LoanStatus};
use crate::error::AppError;
use crate::io::{read_model, read_scaler};
use crate::math::StandardScaler;
use crate::models::LogisticRegression;

/// Loaded artifacts. Built once at startup, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    scaler: StandardScaler,
    classifier: LogisticRegression,
    encoders: CategoryEncoders,
}

/// Payload of `GET /schema`.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaInfo<'a> {
    pub schema_version: u32,
    pub features: Vec<String>,
    pub categories: &'a CategoryEncoders,
}

impl ServiceContext {
    pub fn new(
        scaler: StandardScaler,
        classifier: LogisticRegression,
        encoders: CategoryEncoders,
    ) -> Result<Self, AppError> {
        scaler.validate()?;
        classifier.validate()?;
        Ok(Self {
            scaler,
            classifier,
            encoders,
        })
    }

    /// Load both artifacts; any failure is fatal for the service.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, AppError> {
        let scaler = read_scaler(scaler_path)?;
        let model = read_model(model_path)?;
        Self::new(scaler.body, model.body.classifier, model.body.encoders)
    }

    /// Encode -> scale -> classify.
    pub fn predict(&self, applicant: &Applicant) -> LoanStatus {
        let x = self.scaler.transform(&applicant.to_features());
        LoanStatus::from_class(self.classifier.predict(&x))
    }

    pub fn schema(&self) -> SchemaInfo<'_> {
        SchemaInfo {
            schema_version: FEATURE_SCHEMA_VERSION,
            features: Feature::names(),
            categories: &self.encoders,
        }
    }
}
