//! Square integer matrices and the naive reference multiplies.
//!
//! [`Matrix`] is the only data type the multipliers work on: a dense,
//! row-major N×N grid of `i32` on the heap. The naive loops here are the
//! correctness baselines the blocked and threaded versions are checked
//! against.

pub mod generate;
pub mod naive_ijk;
pub mod naive_ikj;
pub mod transpose;

use std::ops::{Index, IndexMut};

use crate::error::{MatmulError, Result};

/// Dense square matrix of `i32`, stored row-major.
///
/// The dimension is fixed at construction. Constructors allocate
/// fallibly so a huge dimension surfaces as [`MatmulError::OutOfMemory`]
/// instead of aborting.
///
/// ```
/// use tiled_matmul::Matrix;
///
/// let m = Matrix::from_fn(3, |i, j| (i * 3 + j) as i32).unwrap();
/// assert_eq!(m.dim(), 3);
/// assert_eq!(m[(1, 2)], 5);
/// assert_eq!(m.row(2), &[6, 7, 8]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    data: Vec<i32>,
    dim: usize,
}

impl Matrix {
    /// Allocate an N×N matrix of zeros.
    pub fn zeros(dim: usize) -> Result<Self> {
        let elements = element_count(dim)?;
        let mut data = Vec::new();
        data.try_reserve_exact(elements)
            .map_err(|_| MatmulError::OutOfMemory { elements })?;
        data.resize(elements, 0);
        Ok(Self { data, dim })
    }

    /// Identity matrix: ones on the diagonal, zeros elsewhere.
    pub fn identity(dim: usize) -> Result<Self> {
        let mut m = Self::zeros(dim)?;
        for i in 0..dim {
            m[(i, i)] = 1;
        }
        Ok(m)
    }

    /// Build a matrix by calling `f(row, col)` for every cell.
    pub fn from_fn<F>(dim: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> i32,
    {
        let mut m = Self::zeros(dim)?;
        for (idx, cell) in m.data.iter_mut().enumerate() {
            *cell = f(idx / dim, idx % dim);
        }
        Ok(m)
    }

    /// Wrap row-major data. `data.len()` must be `dim * dim`.
    pub fn from_vec(dim: usize, data: Vec<i32>) -> Result<Self> {
        let elements = element_count(dim)?;
        if data.len() != elements {
            return Err(MatmulError::invalid(format!(
                "data length {} != {}x{}={}",
                data.len(),
                dim,
                dim,
                elements
            )));
        }
        Ok(Self { data, dim })
    }

    /// Side length N.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element at (row, col), or `None` if out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row < self.dim && col < self.dim {
            Some(self.data[row * self.dim + col])
        } else {
            None
        }
    }

    /// One row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.dim..(row + 1) * self.dim]
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.data
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = i32;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &i32 {
        debug_assert!(row < self.dim && col < self.dim);
        &self.data[row * self.dim + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut i32 {
        debug_assert!(row < self.dim && col < self.dim);
        &mut self.data[row * self.dim + col]
    }
}

fn element_count(dim: usize) -> Result<usize> {
    if dim == 0 {
        return Err(MatmulError::invalid("matrix dimension must be > 0"));
    }
    dim.checked_mul(dim)
        .ok_or_else(|| MatmulError::invalid(format!("dimension {} overflows usize", dim)))
}

/// Check that two operands can be multiplied together.
pub(crate) fn check_operands(left: &Matrix, right: &Matrix) -> Result<usize> {
    if left.dim() != right.dim() {
        return Err(MatmulError::invalid(format!(
            "dimension mismatch: left is {}x{}, right is {}x{}",
            left.dim(),
            left.dim(),
            right.dim(),
            right.dim()
        )));
    }
    Ok(left.dim())
}

/// Dot product of row `i` of `left` with column `j` of `right`.
///
/// Terms are widened to `f64` and summed in increasing `k`, so every
/// loop order that calls this produces bit-identical sums.
#[inline]
pub(crate) fn dot(left: &[i32], right: &[i32], n: usize, i: usize, j: usize) -> f64 {
    let mut sum = 0.0f64;
    for k in 0..n {
        sum += left[i * n + k] as f64 * right[k * n + j] as f64;
    }
    sum
}

/// Store a widened sum back into the integer result.
///
/// `as` truncates toward zero and saturates at the `i32` bounds.
#[inline]
pub(crate) fn narrow(sum: f64) -> i32 {
    sum as i32
}
