//! Small dense linear solves.
//!
//! The logistic-regression solver repeatedly solves the Newton system
//! `H Δ = g` where `H` is the (regularized) Hessian. `H` is symmetric positive
//! definite in exact arithmetic, so Cholesky is tried first; LU is the fallback
//! when rounding makes it numerically indefinite.

use nalgebra::{DMatrix, DVector};

/// Solve `a x = b` for a symmetric positive (semi-)definite `a`.
///
/// Returns `None` if the system is singular or the solution is not finite.
pub fn solve_spd(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if let Some(chol) = a.clone().cholesky() {
        let x = chol.solve(b);
        if x.iter().all(|v| v.is_finite()) {
            return Some(x);
        }
    }

    let x = a.clone().lu().solve(b)?;
    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_spd_system() {
        // [[4, 1], [1, 3]] x = [1, 2] -> x = [1/11, 7/11]
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);

        let x = solve_spd(&a, &b).unwrap();
        assert!((x[0] - 1.0 / 11.0).abs() < 1e-12);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn singular_system_returns_none() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_row_slice(&[1.0, 1.0]);
        assert!(solve_spd(&a, &b).is_none());
    }
}
