//! Deterministic fixtures for the demos.
//!
//! The largest entry is checked against `i32` before anything is
//! allocated, so an oversized fixture is an error rather than a matrix of
//! wrapped values.

use super::Matrix;
use crate::error::{MatmulError, Result};

/// `m[i][j] = i + j`
pub fn sum_pattern(dim: usize) -> Result<Matrix> {
    let last = dim.saturating_sub(1);
    check_fits("sum_pattern", dim, last.checked_add(last))?;
    Matrix::from_fn(dim, |i, j| (i + j) as i32)
}

/// `m[i][j] = i * j`
pub fn product_pattern(dim: usize) -> Result<Matrix> {
    let last = dim.saturating_sub(1);
    check_fits("product_pattern", dim, last.checked_mul(last))?;
    Matrix::from_fn(dim, |i, j| (i * j) as i32)
}

fn check_fits(name: &str, dim: usize, max: Option<usize>) -> Result<()> {
    match max.map(i32::try_from) {
        Some(Ok(_)) => Ok(()),
        _ => Err(MatmulError::invalid(format!(
            "{}({}) has entries beyond i32::MAX",
            name, dim
        ))),
    }
}
