//! CSV ingest for the training dataset.
//!
//! This module only turns the CSV into raw, optional string cells keyed by the
//! schema columns. Cleaning, imputation and encoding live in `crate::data`.
//!
//! Design goals:
//! - **Strict schema**: every feature column and the label must be present (exit code 2)
//! - **All-or-nothing**: a record the CSV reader cannot parse aborts the run (exit code 3)
//! - **Common missing markers**: `NA`, `NaN`, `null`, empty cells, ...

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Feature, ID_COLUMN, LABEL_COLUMN, N_FEATURES};
use crate::error::AppError;

/// Cell values read as missing, matching common dataframe-library defaults.
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One dataset row with raw (trimmed) cells; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based CSV line number (header is line 1).
    pub line: usize,
    /// Cells in [`Feature::ALL`] order.
    pub features: [Option<String>; N_FEATURES],
    pub label: Option<String>,
}

impl RawRecord {
    pub fn cell(&self, feature: Feature) -> Option<&str> {
        self.features[feature.index()].as_deref()
    }
}

/// Ingest output.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub records: Vec<RawRecord>,
    /// Whether the identifier column was present (and dropped).
    pub dropped_id_column: bool,
    /// Columns present in the file but not used by the model.
    pub ignored_columns: Vec<String>,
}

/// Load the training CSV from disk.
pub fn load_dataset(path: &Path) -> Result<RawDataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_dataset(file)
}

/// Parse a training CSV from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<RawDataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    let mut feature_idx = [0usize; N_FEATURES];
    for feature in Feature::ALL {
        feature_idx[feature.index()] = column_index(&header_map, feature.column_name())?;
    }
    let label_idx = column_index(&header_map, LABEL_COLUMN)?;
    let dropped_id_column = header_map.contains_key(&normalize_header_name(ID_COLUMN));

    let ignored_columns = headers
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .filter(|h| {
            let norm = normalize_header_name(h);
            norm != normalize_header_name(ID_COLUMN)
                && norm != normalize_header_name(LABEL_COLUMN)
                && !Feature::ALL
                    .iter()
                    .any(|f| normalize_header_name(f.column_name()) == norm)
        })
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::new(3, format!("CSV parse error on line {line}: {e}")))?;

        let features = std::array::from_fn(|i| cell(&record, feature_idx[i]));
        records.push(RawRecord {
            line,
            features,
            label: cell(&record, label_idx),
        });
    }

    if records.is_empty() {
        return Err(AppError::new(3, "Dataset contains no data rows."));
    }

    Ok(RawDataset {
        records,
        dropped_id_column,
        ignored_columns,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn column_index(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(&normalize_header_name(name))
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
}

fn cell(record: &StringRecord, idx: usize) -> Option<String> {
    let value = record.get(idx)?.trim();
    if is_missing(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Whether a raw cell counts as missing.
pub fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Loan_ID,Gender,Married,Dependents,Education,Self_Employed,ApplicantIncome,CoapplicantIncome,LoanAmount,Loan_Amount_Term,Credit_History,Property_Area,Loan_Status";

    #[test]
    fn reads_rows_and_drops_identifier() {
        let csv = format!(
            "{HEADER}\nLP001002,Male,No,0,Graduate,No,5849,0,,360,1,Urban,Y\nLP001003,Male,Yes,3+,Graduate,No,4583,1508,128,360,1,Rural,N\n"
        );
        let data = read_dataset(csv.as_bytes()).unwrap();

        assert!(data.dropped_id_column);
        assert!(data.ignored_columns.is_empty());
        assert_eq!(data.records.len(), 2);

        let first = &data.records[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.cell(Feature::Gender), Some("Male"));
        assert_eq!(first.cell(Feature::LoanAmount), None);
        assert_eq!(first.label.as_deref(), Some("Y"));
        assert_eq!(data.records[1].cell(Feature::Dependents), Some("3+"));
    }

    #[test]
    fn common_missing_markers_are_missing() {
        let csv = format!(
            "{HEADER}\nLP1,NA,No,0,Graduate,NaN,5849,0,null,360,1,Urban,Y\n"
        );
        let data = read_dataset(csv.as_bytes()).unwrap();
        let row = &data.records[0];
        assert_eq!(row.cell(Feature::Gender), None);
        assert_eq!(row.cell(Feature::SelfEmployed), None);
        assert_eq!(row.cell(Feature::LoanAmount), None);
    }

    #[test]
    fn missing_column_is_rejected() {
        let csv = "Gender,Married\nMale,No\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Dependents"), "{err}");
    }

    #[test]
    fn ragged_record_aborts() {
        let csv = format!("{HEADER}\nLP1,Male,No\n");
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("line 2"), "{err}");
    }

    #[test]
    fn bom_prefixed_header_is_accepted() {
        let csv = format!("\u{feff}{}\nMale,No,0,Graduate,No,1,0,100,360,1,Urban,Y\n", &HEADER[8..]);
        let data = read_dataset(csv.as_bytes()).unwrap();
        assert!(!data.dropped_id_column);
        assert_eq!(data.records[0].cell(Feature::Gender), Some("Male"));
    }
}
