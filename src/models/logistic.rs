//! L2-regularized binary logistic regression.
//!
//! Objective (intercept not penalized):
//!
//! ```text
//! minimize  C * Σ log(1 + exp(-s_i (w·x_i + b)))  +  ½ ||w||²      s_i ∈ {-1, +1}
//! ```
//!
//! Solved with damped Newton iterations: each step solves the regularized
//! Hessian system and halves the step until the objective decreases. The loop
//! stops when the largest gradient component drops below `tol` or the
//! iteration budget runs out.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, N_FEATURES};
use crate::error::AppError;
use crate::math::solve_spd;

/// Maximum number of step halvings per Newton iteration.
const MAX_BACKTRACK: usize = 40;

/// Solver settings.
#[derive(Debug, Clone, Copy)]
pub struct LogisticOptions {
    /// Inverse regularization strength.
    pub c: f64,
    pub max_iter: usize,
    /// Convergence threshold on the max-abs gradient.
    pub tol: f64,
}

impl Default for LogisticOptions {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 2000,
            tol: 1e-4,
        }
    }
}

/// A fitted classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
    /// Newton iterations actually run.
    pub n_iter: usize,
    pub converged: bool,
}

impl LogisticRegression {
    /// Fit on standardized rows with labels in `{0, 1}`.
    pub fn fit(x: &[FeatureVector], y: &[f64], opts: LogisticOptions) -> Result<Self, AppError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(AppError::new(
                4,
                format!("Invalid training data: {} rows, {} labels.", x.len(), y.len()),
            ));
        }
        if !(opts.c.is_finite() && opts.c > 0.0) {
            return Err(AppError::new(2, format!("Invalid C={}: must be finite and > 0.", opts.c)));
        }

        let n = x.len();
        let d = N_FEATURES + 1;

        // Design matrix with a trailing column of ones for the intercept.
        let a = DMatrix::from_fn(n, d, |i, j| if j < N_FEATURES { x[i][j] } else { 1.0 });
        let y = DVector::from_column_slice(y);

        let mut theta = DVector::<f64>::zeros(d);
        let mut loss = objective(&a, &y, &theta, opts.c);
        let mut converged = false;
        let mut n_iter = 0;

        for _ in 0..opts.max_iter {
            let (grad, hess) = gradient_and_hessian(&a, &y, &theta, opts.c);
            if grad.amax() <= opts.tol {
                converged = true;
                break;
            }
            n_iter += 1;

            let step = solve_spd(&hess, &grad)
                .ok_or_else(|| AppError::new(4, "Logistic regression Hessian is singular."))?;

            let mut t = 1.0;
            let mut accepted = false;
            for _ in 0..MAX_BACKTRACK {
                let candidate = &theta - &step * t;
                let candidate_loss = objective(&a, &y, &candidate, opts.c);
                if candidate_loss.is_finite() && candidate_loss <= loss {
                    theta = candidate;
                    loss = candidate_loss;
                    accepted = true;
                    break;
                }
                t *= 0.5;
            }
            if !accepted {
                // No descent left at machine precision: treat as converged.
                converged = true;
                break;
            }
        }

        if !converged {
            let (grad, _) = gradient_and_hessian(&a, &y, &theta, opts.c);
            converged = grad.amax() <= opts.tol;
        }

        if theta.iter().any(|v| !v.is_finite()) {
            return Err(AppError::new(4, "Logistic regression produced non-finite weights."));
        }

        Ok(Self {
            coef: theta.rows(0, N_FEATURES).iter().copied().collect(),
            intercept: theta[N_FEATURES],
            n_iter,
            converged,
        })
    }

    /// Raw score `w·x + b` on a standardized row.
    pub fn decision_function(&self, x: &FeatureVector) -> f64 {
        self.coef.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + self.intercept
    }

    /// Probability of the positive class.
    pub fn predict_proba(&self, x: &FeatureVector) -> f64 {
        sigmoid(self.decision_function(x))
    }

    /// Predicted class (`1` when the score is strictly positive).
    pub fn predict(&self, x: &FeatureVector) -> usize {
        usize::from(self.decision_function(x) > 0.0)
    }

    /// Fraction of rows classified correctly.
    pub fn score(&self, x: &[FeatureVector], y: &[f64]) -> f64 {
        if x.is_empty() {
            return 0.0;
        }
        let correct = x
            .iter()
            .zip(y)
            .filter(|(row, label)| self.predict(row) as f64 == **label)
            .count();
        correct as f64 / x.len() as f64
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.coef.len() != N_FEATURES
            || !self.coef.iter().all(|w| w.is_finite())
            || !self.intercept.is_finite()
        {
            return Err(AppError::new(
                4,
                format!("Model weights do not describe {N_FEATURES} finite features."),
            ));
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `log(1 + exp(z))` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

fn objective(a: &DMatrix<f64>, y: &DVector<f64>, theta: &DVector<f64>, c: f64) -> f64 {
    let z = a * theta;
    // log(1 + e^z) - y z is the per-row negative log-likelihood.
    let nll: f64 = z.iter().zip(y.iter()).map(|(zi, yi)| softplus(*zi) - yi * zi).sum();
    let penalty: f64 = theta.rows(0, N_FEATURES).norm_squared();
    c * nll + 0.5 * penalty
}

fn gradient_and_hessian(
    a: &DMatrix<f64>,
    y: &DVector<f64>,
    theta: &DVector<f64>,
    c: f64,
) -> (DVector<f64>, DMatrix<f64>) {
    let z = a * theta;
    let p = z.map(sigmoid);
    let residual = &p - y;

    let mut grad = a.tr_mul(&residual) * c;
    for j in 0..N_FEATURES {
        grad[j] += theta[j];
    }

    // H = C * Aᵀ S A + diag(1, ..., 1, 0)
    let s = p.map(|pi| pi * (1.0 - pi));
    let mut weighted = a.clone();
    for (i, mut row) in weighted.row_iter_mut().enumerate() {
        row *= s[i];
    }
    let mut hess = a.tr_mul(&weighted) * c;
    for j in 0..N_FEATURES {
        hess[(j, j)] += 1.0;
    }

    (grad, hess)
}
