//! Naive vs cache-blocked matrix multiplication.
//!
//! I built this to see how much loop order alone matters. Same O(N³)
//! multiply-adds, same result, very different cache behavior. The crate
//! has the textbook i-j-k loop, a loop-interchanged i-k-j version, a
//! tiled version that walks the output block by block, and a threaded
//! tiled version.
//!
//! ## Usage
//!
//! ```
//! use tiled_matmul::{BlockSize, multiply};
//! use tiled_matmul::matrix::generate::{product_pattern, sum_pattern};
//!
//! let a = sum_pattern(100).unwrap();      // a[i][j] = i + j
//! let b = product_pattern(100).unwrap();  // b[i][j] = i * j
//!
//! let c = multiply(&a, &b, BlockSize::new(40).unwrap()).unwrap();
//! assert_eq!(c[(0, 0)], 0);
//! ```
//!
//! All variants accumulate each cell in `f64` and truncate toward zero
//! when storing back into the `i32` product, so they agree exactly.
//!
//! ## What's inside
//!
//! - `matrix`: the `Matrix` type, fixtures, naive i-j-k / i-k-j
//! - `blocked`: tiled multiply with clipped or strict remainder handling
//! - `threaded`: tiled multiply over a rayon pool
//! - `cachesim`: parse and tabulate cache simulator reports

pub mod blocked;
pub mod cachesim;
pub mod config;
pub mod error;
pub mod logging;
pub mod matrix;
pub mod threaded;

pub use blocked::{BlockSize, BlockedMultiplier, RemainderPolicy, multiply_blocked};
pub use error::{MatmulError, Result};
pub use matrix::Matrix;
pub use matrix::naive_ijk::multiply_naive_ijk;
pub use matrix::naive_ikj::multiply_naive_ikj;
pub use threaded::multiply_blocked_parallel;

/// Matrix multiply: `left * right`, tiled over the output.
///
/// The tiled multiply with remainder clipping, i.e. any positive block
/// size works with any dimension.
///
/// # Errors
///
/// `InvalidConfiguration` if the operands differ in dimension,
/// `OutOfMemory` if the product cannot be allocated.
pub fn multiply(left: &Matrix, right: &Matrix, block: BlockSize) -> Result<Matrix> {
    multiply_blocked(left, right, block)
}

/// Same as [`multiply`] but uses multiple threads.
///
/// Thread count adapts to matrix size - small matrices use fewer threads
/// because the overhead isn't worth it.
pub fn multiply_parallel(
    left: &Matrix,
    right: &Matrix,
    block: BlockSize,
    num_threads: usize,
) -> Result<Matrix> {
    multiply_blocked_parallel(left, right, block, num_threads)
}
