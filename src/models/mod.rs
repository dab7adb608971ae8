//! Classifier implementations.
//!
//! Only binary logistic regression is supported; the fitted struct is also
//! the persisted model artifact body.

pub mod logistic;

pub use logistic::*;
