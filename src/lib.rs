//! `loan-predictor` library crate.
//!
//! The binaries (`loan-train`, `loan-serve`) are thin wrappers around this
//! library so that:
//!
//! - the training pipeline and HTTP handlers are testable without spawning processes
//! - both ends share one definition of the feature order and artifact format

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod server;
