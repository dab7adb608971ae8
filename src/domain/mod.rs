//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the versioned feature order (`Feature`, `FEATURE_SCHEMA_VERSION`)
//! - the applicant record accepted over HTTP (`Applicant`)
//! - run configuration (`TrainConfig`, `ServeConfig`)

pub mod types;

pub use types::*;
