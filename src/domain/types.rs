//! Shared domain types.
//!
//! The feature order declared by [`Feature::ALL`] is the contract between the
//! training pipeline and the inference service: the scaler and classifier are
//! fitted on vectors in this order, and requests are converted into vectors in
//! the same order. Any change to the order or encoding must bump
//! [`FEATURE_SCHEMA_VERSION`] so stale artifacts are rejected at load time.

use std::path::PathBuf;

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

/// Version of the feature order / encoding contract stored in every artifact.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Number of model input features.
pub const N_FEATURES: usize = 11;

/// Identifier column dropped during ingest (no predictive signal).
pub const ID_COLUMN: &str = "Loan_ID";

/// Label column.
pub const LABEL_COLUMN: &str = "Loan_Status";

/// A fixed-order numeric feature vector.
pub type FeatureVector = [f64; N_FEATURES];

/// How a dataset column is cleaned before it becomes a model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Label-encoded from its distinct string values.
    Categorical,
    /// Coerced to `f64` and median-imputed.
    Numeric,
}

/// Model input features, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Gender,
    Married,
    Dependents,
    Education,
    SelfEmployed,
    ApplicantIncome,
    CoapplicantIncome,
    LoanAmount,
    LoanAmountTerm,
    CreditHistory,
    PropertyArea,
}

impl Feature {
    pub const ALL: [Feature; N_FEATURES] = [
        Feature::Gender,
        Feature::Married,
        Feature::Dependents,
        Feature::Education,
        Feature::SelfEmployed,
        Feature::ApplicantIncome,
        Feature::CoapplicantIncome,
        Feature::LoanAmount,
        Feature::LoanAmountTerm,
        Feature::CreditHistory,
        Feature::PropertyArea,
    ];

    /// Column name in the dataset CSV and field name in the HTTP payload.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::Gender => "Gender",
            Feature::Married => "Married",
            Feature::Dependents => "Dependents",
            Feature::Education => "Education",
            Feature::SelfEmployed => "Self_Employed",
            Feature::ApplicantIncome => "ApplicantIncome",
            Feature::CoapplicantIncome => "CoapplicantIncome",
            Feature::LoanAmount => "LoanAmount",
            Feature::LoanAmountTerm => "Loan_Amount_Term",
            Feature::CreditHistory => "Credit_History",
            Feature::PropertyArea => "Property_Area",
        }
    }

    pub fn kind(self) -> FeatureKind {
        match self {
            Feature::Gender
            | Feature::Married
            | Feature::Education
            | Feature::SelfEmployed
            | Feature::PropertyArea => FeatureKind::Categorical,
            Feature::Dependents
            | Feature::ApplicantIncome
            | Feature::CoapplicantIncome
            | Feature::LoanAmount
            | Feature::LoanAmountTerm
            | Feature::CreditHistory => FeatureKind::Numeric,
        }
    }

    /// Position of this feature in a [`FeatureVector`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Ordered feature names, as stored in artifacts.
    pub fn names() -> Vec<String> {
        Feature::ALL.iter().map(|f| f.column_name().to_string()).collect()
    }
}

/// Final loan decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Approved,
    Rejected,
}

impl LoanStatus {
    /// Map the classifier's binary output (`1` = approved).
    pub fn from_class(class: usize) -> Self {
        if class == 1 {
            LoanStatus::Approved
        } else {
            LoanStatus::Rejected
        }
    }
}

/// An applicant record as accepted by `POST /predict`.
///
/// Categorical fields carry the integer codes produced by the training-time
/// label encoders (see `GET /schema`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Applicant {
    #[serde(rename = "Gender", deserialize_with = "integral")]
    pub gender: i64,
    #[serde(rename = "Married", deserialize_with = "integral")]
    pub married: i64,
    #[serde(rename = "Dependents", deserialize_with = "integral")]
    pub dependents: i64,
    #[serde(rename = "Education", deserialize_with = "integral")]
    pub education: i64,
    #[serde(rename = "Self_Employed", deserialize_with = "integral")]
    pub self_employed: i64,
    #[serde(rename = "ApplicantIncome")]
    pub applicant_income: f64,
    #[serde(rename = "CoapplicantIncome")]
    pub coapplicant_income: f64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Amount_Term")]
    pub loan_amount_term: f64,
    #[serde(rename = "Credit_History", deserialize_with = "integral")]
    pub credit_history: i64,
    #[serde(rename = "Property_Area", deserialize_with = "integral")]
    pub property_area: i64,
}

impl Applicant {
    /// Build the model input vector in schema order.
    pub fn to_features(&self) -> FeatureVector {
        let mut out = [0.0; N_FEATURES];
        for feature in Feature::ALL {
            out[feature.index()] = match feature {
                Feature::Gender => self.gender as f64,
                Feature::Married => self.married as f64,
                Feature::Dependents => self.dependents as f64,
                Feature::Education => self.education as f64,
                Feature::SelfEmployed => self.self_employed as f64,
                Feature::ApplicantIncome => self.applicant_income,
                Feature::CoapplicantIncome => self.coapplicant_income,
                Feature::LoanAmount => self.loan_amount,
                Feature::LoanAmountTerm => self.loan_amount_term,
                Feature::CreditHistory => self.credit_history as f64,
                Feature::PropertyArea => self.property_area as f64,
            };
        }
        out
    }
}

/// Accept any JSON number without a fractional part (`1` or `1.0`).
fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    // i64::MAX as f64 rounds up to 2^63, which is out of range.
    if !value.is_finite()
        || value.fract() != 0.0
        || value < i64::MIN as f64
        || value >= i64::MAX as f64
    {
        return Err(de::Error::invalid_value(Unexpected::Float(value), &"an integer"));
    }
    Ok(value as i64)
}

/// Training run configuration, derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub data_path: PathBuf,
    pub model_out: PathBuf,
    pub scaler_out: PathBuf,
    /// Fraction of rows withheld for the holdout split.
    pub test_size: f64,
    pub seed: u64,
    /// Solver iteration budget.
    pub max_iter: usize,
    /// Inverse L2 regularization strength.
    pub c: f64,
    pub export_predictions: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("loan_data.csv"),
            model_out: PathBuf::from("model.json"),
            scaler_out: PathBuf::from("scaler.json"),
            test_size: 0.2,
            seed: 42,
            max_iter: 2000,
            c: 1.0,
            export_predictions: None,
        }
    }
}

/// Inference service configuration.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_index_matches_schema_order() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
        assert_eq!(Feature::names()[2], "Dependents");
        assert_eq!(Feature::names()[10], "Property_Area");
    }

    #[test]
    fn applicant_vector_follows_feature_order() {
        let applicant = Applicant {
            gender: 1,
            married: 0,
            dependents: 3,
            education: 1,
            self_employed: 0,
            applicant_income: 5000.0,
            coapplicant_income: 1500.0,
            loan_amount: 128.0,
            loan_amount_term: 360.0,
            credit_history: 1,
            property_area: 2,
        };
        let v = applicant.to_features();
        assert_eq!(v[Feature::Dependents.index()], 3.0);
        assert_eq!(v[Feature::ApplicantIncome.index()], 5000.0);
        assert_eq!(v[Feature::LoanAmountTerm.index()], 360.0);
        assert_eq!(v[Feature::PropertyArea.index()], 2.0);
    }

    #[test]
    fn loan_status_from_class() {
        assert_eq!(LoanStatus::from_class(1), LoanStatus::Approved);
        assert_eq!(LoanStatus::from_class(0), LoanStatus::Rejected);
    }

    #[test]
    fn integer_fields_accept_whole_floats_only() {
        let body = |credit_history: serde_json::Value| {
            serde_json::json!({
                "Gender": 1.0,
                "Married": 0,
                "Dependents": 3,
                "Education": 0,
                "Self_Employed": 0,
                "ApplicantIncome": 5000,
                "CoapplicantIncome": 0.0,
                "LoanAmount": 128.0,
                "Loan_Amount_Term": 360.0,
                "Credit_History": credit_history,
                "Property_Area": 2
            })
        };

        let applicant: Applicant = serde_json::from_value(body(serde_json::json!(1.0))).unwrap();
        assert_eq!(applicant.credit_history, 1);
        assert_eq!(applicant.gender, 1);

        for bad in [serde_json::json!(0.5), serde_json::json!("1"), serde_json::json!(1e300)] {
            assert!(serde_json::from_value::<Applicant>(body(bad)).is_err());
        }
    }
}
