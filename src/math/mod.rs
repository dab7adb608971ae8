//! Numeric building blocks: feature standardization and linear solves.

pub mod linalg;
pub mod scaler;

pub use linalg::*;
pub use scaler::*;
