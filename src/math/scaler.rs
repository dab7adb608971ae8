//! Per-feature standardization.
//!
//! `z = (x - mean) / scale`, where `scale` is the population standard deviation
//! of the training split. Features with (near) zero variance keep `scale = 1`
//! so they pass through centered instead of blowing up.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, N_FEATURES};
use crate::error::AppError;

/// A fitted standard scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub var: Vec<f64>,
    pub scale: Vec<f64>,
    pub n_samples_seen: usize,
}

impl StandardScaler {
    pub fn fit(rows: &[FeatureVector]) -> Result<Self, AppError> {
        if rows.is_empty() {
            return Err(AppError::new(3, "Cannot fit scaler on an empty training split."));
        }
        let n = rows.len() as f64;

        let mut mean = vec![0.0; N_FEATURES];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; N_FEATURES];
        for row in rows {
            for ((v, m), x) in var.iter_mut().zip(&mean).zip(row) {
                let d = x - m;
                *v += d * d;
            }
        }
        var.iter_mut().for_each(|v| *v /= n);

        let scale = var
            .iter()
            .map(|v| {
                let s = v.sqrt();
                if s < 10.0 * f64::EPSILON { 1.0 } else { s }
            })
            .collect();

        Ok(Self {
            mean,
            var,
            scale,
            n_samples_seen: rows.len(),
        })
    }

    pub fn transform(&self, row: &FeatureVector) -> FeatureVector {
        let mut out = *row;
        for (i, x) in out.iter_mut().enumerate() {
            *x = (*x - self.mean[i]) / self.scale[i];
        }
        out
    }

    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    /// Check that the parameter vectors match the feature count.
    pub fn validate(&self) -> Result<(), AppError> {
        let ok = self.mean.len() == N_FEATURES
            && self.var.len() == N_FEATURES
            && self.scale.len() == N_FEATURES
            && self.scale.iter().all(|s| s.is_finite() && *s > 0.0)
            && self.mean.iter().all(|m| m.is_finite());
        if ok {
            Ok(())
        } else {
            Err(AppError::new(
                4,
                format!("Scaler parameters do not describe {N_FEATURES} finite features."),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(a: f64, b: f64) -> FeatureVector {
        let mut r = [7.0; N_FEATURES];
        r[0] = a;
        r[1] = b;
        r
    }

    #[test]
    fn standardizes_to_zero_mean_unit_variance() {
        let rows = vec![row(1.0, 10.0), row(2.0, 20.0), row(3.0, 30.0), row(4.0, 40.0)];
        let scaler = StandardScaler::fit(&rows).unwrap();

        assert!((scaler.mean[0] - 2.5).abs() < 1e-12);
        assert!((scaler.var[0] - 1.25).abs() < 1e-12);

        let z = scaler.transform_all(&rows);
        let mean0: f64 = z.iter().map(|r| r[0]).sum::<f64>() / 4.0;
        let var1: f64 = z.iter().map(|r| r[1] * r[1]).sum::<f64>() / 4.0;
        assert!(mean0.abs() < 1e-12);
        assert!((var1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_feature_keeps_unit_scale() {
        let rows = vec![row(1.0, 1.0), row(2.0, 1.0)];
        let scaler = StandardScaler::fit(&rows).unwrap();
        assert_eq!(scaler.scale[2], 1.0);
        assert_eq!(scaler.transform(&rows[0])[2], 0.0);
        scaler.validate().unwrap();
    }
}
