//! Dataset preparation: cleaning, imputation, label encoding and splitting.
//!
//! Pipeline order:
//! raw CSV cells -> numeric coercion + median fill -> per-column label encoding
//! -> fixed-order feature vectors + binary labels

use std::collections::BTreeMap;

use crate::domain::{Feature, FeatureKind, FeatureVector, LABEL_COLUMN, N_FEATURES};
use crate::error::AppError;
use crate::io::ingest::RawDataset;

pub mod clean;
pub mod encode;
pub mod split;

pub use clean::{Imputation, impute_numeric_column, parse_dependents};
pub use encode::LabelEncoder;
pub use split::{SplitIndices, train_test_split};

/// Label encoders keyed by column name (features and label).
pub type CategoryEncoders = BTreeMap<String, LabelEncoder>;

/// Model-ready dataset.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub features: Vec<FeatureVector>,
    /// Encoded label: `1` for the positive (approved) class.
    pub labels: Vec<f64>,
    pub encoders: CategoryEncoders,
    pub imputations: Vec<Imputation>,
}

impl PreparedData {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Copy out the rows at `indices`.
    pub fn select(&self, indices: &[usize]) -> (Vec<FeatureVector>, Vec<f64>) {
        let x = indices.iter().map(|&i| self.features[i]).collect();
        let y = indices.iter().map(|&i| self.labels[i]).collect();
        (x, y)
    }

    pub fn label_encoder(&self) -> Option<&LabelEncoder> {
        self.encoders.get(LABEL_COLUMN)
    }
}

/// Clean and encode a raw dataset.
///
/// Medians and encoder vocabularies are computed over every row, before any
/// split happens.
pub fn prepare(raw: &RawDataset) -> Result<PreparedData, AppError> {
    let records = &raw.records;
    let n = records.len();
    let mut features = vec![[0.0; N_FEATURES]; n];
    let mut encoders = CategoryEncoders::new();
    let mut imputations = Vec::new();

    for feature in Feature::ALL {
        let col = feature.index();
        match feature.kind() {
            FeatureKind::Numeric => {
                let (values, imputation) = impute_numeric_column(records, feature)?;
                for (row, v) in features.iter_mut().zip(values) {
                    row[col] = v;
                }
                imputations.push(imputation);
            }
            FeatureKind::Categorical => {
                let encoder = LabelEncoder::fit(records.iter().map(|r| r.cell(feature)));
                for (row, record) in features.iter_mut().zip(records) {
                    // Every value was seen while fitting, so the lookup cannot miss.
                    let code = encoder.transform(record.cell(feature)).unwrap_or_default();
                    row[col] = code as f64;
                }
                encoders.insert(feature.column_name().to_string(), encoder);
            }
        }
    }

    let label_encoder = LabelEncoder::fit(records.iter().map(|r| r.label.as_deref()));
    if label_encoder.len() != 2 {
        return Err(AppError::new(
            3,
            format!(
                "`{LABEL_COLUMN}` must have exactly two classes, found {:?}.",
                label_encoder.classes
            ),
        ));
    }
    let labels = records
        .iter()
        .map(|r| {
            label_encoder
                .transform(r.label.as_deref())
                .map(|code| code as f64)
                .unwrap_or_default()
        })
        .collect();
    encoders.insert(LABEL_COLUMN.to_string(), label_encoder);

    Ok(PreparedData {
        features,
        labels,
        encoders,
        imputations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_dataset;

    const CSV: &str = "\
Loan_ID,Gender,Married,Dependents,Education,Self_Employed,ApplicantIncome,CoapplicantIncome,LoanAmount,Loan_Amount_Term,Credit_History,Property_Area,Loan_Status
LP1,Male,No,0,Graduate,No,5849,0,,360,1,Urban,Y
LP2,Male,Yes,1,Graduate,No,4583,1508,128,360,1,Rural,N
LP3,,Yes,3+,Not Graduate,Yes,3000,0,66,360,,Urban,Y
LP4,Female,No,3,Graduate,No,2583,2358,120,360,0,Semiurban,N
";

    #[test]
    fn prepare_encodes_and_imputes() {
        let raw = read_dataset(CSV.as_bytes()).unwrap();
        let data = prepare(&raw).unwrap();

        assert_eq!(data.len(), 4);
        assert_eq!(data.labels, vec![1.0, 0.0, 1.0, 0.0]);

        let gender = &data.encoders["Gender"];
        assert_eq!(gender.classes, vec!["Female", "Male", "nan"]);
        assert_eq!(data.features[2][Feature::Gender.index()], 2.0);

        // "3+" and "3" land on the same value.
        assert_eq!(
            data.features[2][Feature::Dependents.index()],
            data.features[3][Feature::Dependents.index()]
        );

        // LoanAmount median over 128, 66, 120 is 120.
        assert_eq!(data.features[0][Feature::LoanAmount.index()], 120.0);
        // Credit_History median over 1, 1, 0 is 1.
        assert_eq!(data.features[2][Feature::CreditHistory.index()], 1.0);

        assert_eq!(data.features[1][Feature::PropertyArea.index()], 0.0);
        assert_eq!(data.label_encoder().unwrap().classes, vec!["N", "Y"]);
    }

    #[test]
    fn non_binary_label_aborts() {
        let csv = CSV.replace(",N\n", ",Maybe\n").replacen(",Maybe\n", ",N\n", 1);
        let raw = read_dataset(csv.as_bytes()).unwrap();
        let err = prepare(&raw).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
