//! Label encoding for categorical columns.
//!
//! Codes are assigned by sorting the distinct string values lexicographically
//! and numbering them `0..k-1`. Missing cells are encoded as the literal string
//! `"nan"`, so they get a code of their own like any other category.

use serde::{Deserialize, Serialize};

/// Placeholder used for missing categorical cells.
pub const MISSING_CATEGORY: &str = "nan";

/// A fitted label encoder for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Distinct values in code order.
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut classes: Vec<String> = values
            .into_iter()
            .map(|v| v.unwrap_or(MISSING_CATEGORY).to_string())
            .collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Code for a value, or `None` if it was not seen during fitting.
    pub fn transform(&self, value: Option<&str>) -> Option<usize> {
        let value = value.unwrap_or(MISSING_CATEGORY);
        self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    pub fn inverse(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
