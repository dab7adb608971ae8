//! Reporting utilities: run summaries for the terminal.

pub mod format;

pub use format::*;
