//! Export holdout predictions to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts when inspecting where the classifier goes wrong.

use std::path::Path;

use crate::error::AppError;

/// One holdout row as scored by the trained classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutPrediction {
    /// Index of the row in the cleaned dataset (0-based, header excluded).
    pub row: usize,
    /// CSV line the row came from.
    pub line: usize,
    /// Label as written in the dataset (`Y` / `N`).
    pub status: String,
    pub label: usize,
    pub predicted: usize,
    pub probability: f64,
}

/// Write holdout predictions to a CSV file.
pub fn write_predictions_csv(path: &Path, rows: &[HoldoutPrediction]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writer
        .write_record([
            "row",
            "line",
            "loan_status",
            "label",
            "predicted",
            "p_approved",
            "correct",
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        writer
            .write_record([
                r.row.to_string(),
                r.line.to_string(),
                r.status.clone(),
                r.label.to_string(),
                r.predicted.to_string(),
                format!("{:.6}", r.probability),
                (r.label == r.predicted).to_string(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
