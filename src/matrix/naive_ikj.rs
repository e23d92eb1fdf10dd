use super::{Matrix, check_operands, narrow};
use crate::error::Result;

/// Cache-friendly matrix multiplication using i-k-j loop order.
///
/// Swapping the j and k loops makes the innermost loop walk both `right`
/// and the accumulator row sequentially (stride 1). Each output row is
/// accumulated in an `f64` scratch row and narrowed once at the end, so
/// every cell still sums its terms in increasing k and matches
/// [`multiply_naive_ijk`](super::naive_ijk::multiply_naive_ijk) exactly.
pub fn multiply_naive_ikj(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    let n = check_operands(left, right)?;
    let mut product = Matrix::zeros(n)?;

    let (a, b) = (left.as_slice(), right.as_slice());
    let mut acc = vec![0.0f64; n];
    let c = product.as_mut_slice();
    for i in 0..n {
        acc.fill(0.0);
        for k in 0..n {
            let a_ik = a[i * n + k] as f64;
            let b_row = &b[k * n..(k + 1) * n];
            for (sum, &b_kj) in acc.iter_mut().zip(b_row) {
                *sum += a_ik * b_kj as f64;
            }
        }
        for (cell, &sum) in c[i * n..(i + 1) * n].iter_mut().zip(&acc) {
            *cell = narrow(sum);
        }
    }
    Ok(product)
}
