//! Formatted terminal output for training runs.
//!
//! Formatting lives here so the pipeline code stays free of presentation
//! concerns and output changes are localized.

use crate::app::pipeline::TrainingRun;
use crate::domain::{LABEL_COLUMN, TrainConfig};

/// Format the full run summary (dataset, cleaning, split, solver, accuracy).
pub fn format_training_summary(run: &TrainingRun, config: &TrainConfig) -> String {
    let mut out = String::new();

    out.push_str("=== loan-train - Loan Approval Classifier ===\n");
    out.push_str(&format!("Data: {}\n", config.data_path.display()));
    out.push_str(&format!(
        "Rows: {}{}\n",
        run.rows_loaded,
        if run.dropped_id_column { " (identifier column dropped)" } else { "" }
    ));
    if !run.ignored_columns.is_empty() {
        out.push_str(&format!("Ignored columns: {}\n", run.ignored_columns.join(", ")));
    }

    out.push_str("\nImputation (median over all rows):\n");
    for imp in &run.prepared.imputations {
        out.push_str(&format!(
            "  {:<18} median={:<10} filled={}\n",
            imp.feature.column_name(),
            fmt_num(imp.median),
            imp.filled
        ));
    }

    out.push_str("\nCategory codes:\n");
    for (column, encoder) in &run.prepared.encoders {
        let codes: Vec<String> = encoder
            .classes
            .iter()
            .enumerate()
            .map(|(code, value)| format!("{code}={value}"))
            .collect();
        out.push_str(&format!("  {:<18} {}\n", column, codes.join(" ")));
    }

    let (neg, pos) = run.class_balance();
    out.push_str(&format!(
        "\nSplit: train={} holdout={} (test_size={}, seed={})\n",
        run.split.train.len(),
        run.split.test.len(),
        config.test_size,
        config.seed
    ));
    out.push_str(&format!("{LABEL_COLUMN}: positive={pos} negative={neg}\n"));
    out.push_str(&format!(
        "Solver: iterations={} converged={} (C={}, max_iter={})\n",
        run.classifier.n_iter, run.classifier.converged, config.c, config.max_iter
    ));
    out.push('\n');
    out.push_str(&format_accuracy(run.accuracy));

    out
}

/// The one-line metric printed at the end of every run.
pub fn format_accuracy(accuracy: f64) -> String {
    format!("Test Accuracy: {:.2}%", accuracy * 100.0)
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_has_two_decimals() {
        assert_eq!(format_accuracy(0.7886178861788617), "Test Accuracy: 78.86%");
        assert_eq!(format_accuracy(1.0), "Test Accuracy: 100.00%");
    }

    #[test]
    fn numbers_drop_trailing_zeros_when_integral() {
        assert_eq!(fmt_num(128.0), "128");
        assert_eq!(fmt_num(2.5), "2.500");
    }
}
