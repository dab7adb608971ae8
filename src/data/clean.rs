//! Numeric coercion and median imputation.
//!
//! Policy:
//! - `Dependents`: `"3+"` means `3`; anything else that is not a number becomes missing.
//! - Other numeric columns: unparseable or non-finite cells become missing.
//! - Missing values are filled with the column median over the *full* dataset
//!   (train and holdout rows alike). Artifacts stay compatible with reference
//!   runs that impute the same way.

use crate::domain::Feature;
use crate::error::AppError;
use crate::io::ingest::RawRecord;

/// Per-column imputation summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Imputation {
    pub feature: Feature,
    pub median: f64,
    /// Number of cells that were missing (or unparseable) and got the median.
    pub filled: usize,
}

/// Parse a `Dependents` cell. `"3+"` and `"3"` map to the same value.
pub fn parse_dependents(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    let raw = if raw == "3+" { "3" } else { raw };
    parse_numeric(Some(raw))
}

/// Coerce a cell to a finite `f64`, or `None`.
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    let v = raw?.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Median of the present values; `None` when every value is missing.
///
/// Even-length inputs average the two middle values.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_by(|a, b| a.total_cmp(b));

    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Coerce a numeric column across all records and fill gaps with its median.
pub fn impute_numeric_column(
    records: &[RawRecord],
    feature: Feature,
) -> Result<(Vec<f64>, Imputation), AppError> {
    let parsed: Vec<Option<f64>> = records
        .iter()
        .map(|r| match feature {
            Feature::Dependents => parse_dependents(r.cell(feature)),
            _ => parse_numeric(r.cell(feature)),
        })
        .collect();

    let median = median(&parsed).ok_or_else(|| {
        AppError::new(
            3,
            format!(
                "Column `{}` has no numeric values to impute from.",
                feature.column_name()
            ),
        )
    })?;

    let filled = parsed.iter().filter(|v| v.is_none()).count();
    let values = parsed.into_iter().map(|v| v.unwrap_or(median)).collect();

    Ok((
        values,
        Imputation {
            feature,
            median,
            filled,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::N_FEATURES;

    fn record(line: usize, dependents: Option<&str>, loan_amount: Option<&str>) -> RawRecord {
        let mut features: [Option<String>; N_FEATURES] = Default::default();
        features[Feature::Dependents.index()] = dependents.map(str::to_string);
        features[Feature::LoanAmount.index()] = loan_amount.map(str::to_string);
        RawRecord {
            line,
            features,
            label: Some("Y".to_string()),
        }
    }

    #[test]
    fn three_plus_matches_three() {
        assert_eq!(parse_dependents(Some("3+")), Some(3.0));
        assert_eq!(parse_dependents(Some("3+")), parse_dependents(Some("3")));
        assert_eq!(parse_dependents(Some("two")), None);
        assert_eq!(parse_dependents(None), None);
    }

    #[test]
    fn numeric_coercion_rejects_garbage() {
        assert_eq!(parse_numeric(Some("128.5")), Some(128.5));
        assert_eq!(parse_numeric(Some("abc")), None);
        assert_eq!(parse_numeric(Some("inf")), None);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[Some(3.0), None, Some(1.0), Some(2.0)]), Some(2.0));
        assert_eq!(median(&[Some(4.0), Some(1.0), Some(3.0), Some(2.0)]), Some(2.5));
        assert_eq!(median(&[None, None]), None);
    }

    #[test]
    fn imputes_missing_and_unparseable_cells() {
        let records = vec![
            record(2, Some("0"), Some("100")),
            record(3, Some("3+"), None),
            record(4, Some("x"), Some("300")),
            record(5, Some("1"), Some("bad")),
        ];

        let (deps, imp) = impute_numeric_column(&records, Feature::Dependents).unwrap();
        // Present values: 0, 3, 1 -> median 1.
        assert_eq!(deps, vec![0.0, 3.0, 1.0, 1.0]);
        assert_eq!(imp.filled, 1);

        let (amounts, imp) = impute_numeric_column(&records, Feature::LoanAmount).unwrap();
        assert_eq!(imp.median, 200.0);
        assert_eq!(amounts, vec![100.0, 200.0, 300.0, 200.0]);
        assert_eq!(imp.filled, 2);
    }

    #[test]
    fn all_missing_column_aborts() {
        let records = vec![record(2, None, None), record(3, None, None)];
        let err = impute_numeric_column(&records, Feature::LoanAmount).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
