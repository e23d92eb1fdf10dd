//! Tiled multiply over the output dimensions.

use std::ops::Range;

use log::debug;

use super::tiling::{BlockRanges, BlockSize, RemainderPolicy};
use crate::error::Result;
use crate::matrix::{Matrix, check_operands, dot, narrow};

/// Cache-blocked matrix multiplication: `left * right`.
///
/// Walks the output in B×B tiles (block-row, then block-column), and
/// inside each tile computes every cell's full dot product over 0..N.
/// A B that does not divide N is handled by clipping the last tile.
///
/// ```
/// use tiled_matmul::{BlockSize, Matrix, multiply_blocked};
///
/// let a = Matrix::from_fn(5, |i, j| (i + j) as i32).unwrap();
/// let id = Matrix::identity(5).unwrap();
///
/// let c = multiply_blocked(&a, &id, BlockSize::new(2).unwrap()).unwrap();
/// assert_eq!(c, a);
/// ```
///
/// # Errors
///
/// `InvalidConfiguration` if the operands differ in dimension,
/// `OutOfMemory` if the product cannot be allocated.
pub fn multiply_blocked(left: &Matrix, right: &Matrix, block: BlockSize) -> Result<Matrix> {
    multiply_blocked_with(left, right, block, RemainderPolicy::Clip)
}

/// Same as [`multiply_blocked`] with an explicit remainder policy.
///
/// Under [`RemainderPolicy::RequireDivisible`] an N that is not a
/// multiple of B is rejected before anything is allocated.
pub fn multiply_blocked_with(
    left: &Matrix,
    right: &Matrix,
    block: BlockSize,
    policy: RemainderPolicy,
) -> Result<Matrix> {
    let n = check_operands(left, right)?;
    policy.check(n, block)?;
    debug!("blocked multiply: n={} block={} policy={:?}", n, block.get(), policy);

    let mut product = Matrix::zeros(n)?;
    let (a, b) = (left.as_slice(), right.as_slice());
    let stripes = product.as_mut_slice().chunks_mut(block.get().min(n) * n);
    for (rows, stripe) in BlockRanges::new(n, block).zip(stripes) {
        compute_stripe(a, b, n, block, rows, stripe);
    }
    Ok(product)
}

/// Fill one block-row stripe of the product.
///
/// `stripe` holds output rows `rows.start..rows.end`, each N wide. The
/// stripe is visited one B-wide column block at a time.
pub(crate) fn compute_stripe(
    a: &[i32],
    b: &[i32],
    n: usize,
    block: BlockSize,
    rows: Range<usize>,
    stripe: &mut [i32],
) {
    debug_assert_eq!(stripe.len(), rows.len() * n);
    for cols in BlockRanges::new(n, block) {
        for i in rows.clone() {
            let out_row = &mut stripe[(i - rows.start) * n..(i - rows.start + 1) * n];
            for j in cols.clone() {
                out_row[j] = narrow(dot(a, b, n, i, j));
            }
        }
    }
}

/// A blocked multiply with its tiling settings fixed up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockedMultiplier {
    pub block: BlockSize,
    pub policy: RemainderPolicy,
}

impl BlockedMultiplier {
    pub fn new(block: BlockSize) -> Self {
        Self {
            block,
            policy: RemainderPolicy::Clip,
        }
    }

    pub fn with_policy(mut self, policy: RemainderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn multiply(&self, left: &Matrix, right: &Matrix) -> Result<Matrix> {
        multiply_blocked_with(left, right, self.block, self.policy)
    }
}
