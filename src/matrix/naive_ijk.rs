use super::{Matrix, check_operands, dot, narrow};
use crate::error::Result;

/// Naive matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple loop. The innermost loop walks `right`
/// down a column (stride N), so every step of the dot product touches a
/// new cache line once N is large.
///
/// Use this as a correctness baseline, not for performance.
///
/// # Errors
///
/// `InvalidConfiguration` if the operands differ in dimension,
/// `OutOfMemory` if the product cannot be allocated.
pub fn multiply_naive_ijk(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    let n = check_operands(left, right)?;
    let mut product = Matrix::zeros(n)?;

    let (a, b) = (left.as_slice(), right.as_slice());
    let c = product.as_mut_slice();
    for i in 0..n {
        for j in 0..n {
            c[i * n + j] = narrow(dot(a, b, n, i, j));
        }
    }
    Ok(product)
}
