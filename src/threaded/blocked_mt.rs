//! Multi-threaded blocked GEMM.

use log::debug;
use rayon::prelude::*;

use crate::blocked::tiled::{compute_stripe, multiply_blocked};
use crate::blocked::tiling::BlockSize;
use crate::error::{MatmulError, Result};
use crate::matrix::{Matrix, check_operands};

/// Blocked multiply with block-row stripes spread over a rayon pool.
///
/// Each stripe is a disjoint `&mut` chunk of the product, so workers
/// only ever share the read-only inputs. The result is bit-identical to
/// [`multiply_blocked`]. Thread count adapts to matrix size:
/// - < 10M multiply-adds: 1 thread
/// - < 50M multiply-adds: 2 threads
/// - Otherwise: up to `num_threads`
///
/// and never more than there are stripes.
///
/// # Errors
///
/// `InvalidConfiguration` if `num_threads` is zero or the operands differ
/// in dimension, `ThreadPool` if the worker pool cannot be built.
pub fn multiply_blocked_parallel(
    left: &Matrix,
    right: &Matrix,
    block: BlockSize,
    num_threads: usize,
) -> Result<Matrix> {
    if num_threads == 0 {
        return Err(MatmulError::invalid("thread count must be > 0"));
    }
    let n = check_operands(left, right)?;
    let effective_threads = choose_thread_count(n, block, num_threads);
    debug!(
        "parallel blocked multiply: n={} block={} threads={}/{}",
        n,
        block.get(),
        effective_threads,
        num_threads
    );

    if effective_threads == 1 {
        return multiply_blocked(left, right, block);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_threads)
        .build()
        .map_err(|e| MatmulError::ThreadPool(e.to_string()))?;

    let mut product = Matrix::zeros(n)?;
    let (a, b) = (left.as_slice(), right.as_slice());
    let bs = block.get().min(n);
    pool.install(|| {
        product
            .as_mut_slice()
            .par_chunks_mut(bs * n)
            .enumerate()
            .for_each(|(idx, stripe)| {
                let start = idx * bs;
                let rows = start..(start + bs).min(n);
                compute_stripe(a, b, n, block, rows, stripe);
            });
    });
    Ok(product)
}

fn choose_thread_count(n: usize, block: BlockSize, max_threads: usize) -> usize {
    let work = (n as f64).powi(3);

    const SINGLE_THREAD_THRESHOLD: f64 = 10_000_000.0;
    const TWO_THREAD_THRESHOLD: f64 = 50_000_000.0;

    let optimal_threads = if work < SINGLE_THREAD_THRESHOLD {
        1
    } else if work < TWO_THREAD_THRESHOLD {
        2
    } else {
        max_threads
    };

    let stripes = n.div_ceil(block.get());

    optimal_threads.min(stripes).min(max_threads).max(1)
}
