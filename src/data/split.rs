//! Seeded train/holdout split.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::AppError;

/// Row indices for each side of the split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded RNG and cut off `ceil(n * test_size)` holdout rows.
///
/// The same `(n, test_size, seed)` always yields the same split.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<SplitIndices, AppError> {
    if !(test_size.is_finite() && test_size > 0.0 && test_size < 1.0) {
        return Err(AppError::new(
            2,
            format!("Invalid test size {test_size}: expected a fraction in (0, 1)."),
        ));
    }

    let n_test = (n as f64 * test_size).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(AppError::new(
            3,
            format!("Cannot split {n} rows with test size {test_size}: one side would be empty."),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);

    let train = order.split_off(n_test);
    Ok(SplitIndices { train, test: order })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_sizes_and_coverage() {
        let split = train_test_split(614, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 123);
        assert_eq!(split.train.len(), 491);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..614).collect::<Vec<_>>());
    }

    #[test]
    fn split_is_reproducible() {
        let a = train_test_split(100, 0.2, 42).unwrap();
        let b = train_test_split(100, 0.2, 42).unwrap();
        let c = train_test_split(100, 0.2, 7).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn degenerate_splits_are_rejected() {
        assert_eq!(train_test_split(1, 0.2, 42).unwrap_err().exit_code(), 3);
        assert_eq!(train_test_split(10, 1.5, 42).unwrap_err().exit_code(), 2);
    }
}
