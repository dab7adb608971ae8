//! Input/output helpers.
//!
//! - training CSV ingest (`ingest`)
//! - artifact JSON read/write (`artifact`)
//! - holdout prediction export (`export`)

pub mod artifact;
pub mod export;
pub mod ingest;

pub use artifact::*;
pub use export::*;
pub use ingest::*;
