//! Demo driver: the naive and the tiled multiply, then an optional timing comparison.

use std::process::ExitCode;
use std::time::Instant;

use log::{error, info};
use tiled_matmul::config::DemoConfig;
use tiled_matmul::matrix::generate::{product_pattern, sum_pattern};
use tiled_matmul::{
    BlockSize, Matrix, Result, logging, multiply_blocked, multiply_blocked_parallel,
    multiply_naive_ijk, multiply_naive_ikj,
};

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cfg = DemoConfig::from_env()?;
    info!("{:?}", cfg);

    // Naive i-j-k
    let a = sum_pattern(cfg.simple_dim)?;
    let b = product_pattern(cfg.simple_dim)?;
    let c = multiply_naive_ijk(&a, &b)?;
    println!("Matrix multiplication complete");
    info!("naive {}x{}: c[0][0] = {}", c.dim(), c.dim(), c[(0, 0)]);

    // Tiled
    let a = sum_pattern(cfg.tiled_dim)?;
    let b = product_pattern(cfg.tiled_dim)?;
    let c = multiply_blocked(&a, &b, cfg.block_size)?;
    println!("Tiled matrix multiplication complete");
    info!(
        "tiled {}x{} (block {}): c[0][0] = {}",
        c.dim(),
        c.dim(),
        cfg.block_size.get(),
        c[(0, 0)]
    );

    if cfg.compare {
        compare(&cfg, &a, &b)?;
    }
    Ok(())
}

/// Time every variant on the tiled demo's inputs.
fn compare(cfg: &DemoConfig, a: &Matrix, b: &Matrix) -> Result<()> {
    let n = a.dim();
    let block = cfg.block_size;
    let threads = cfg.threads;
    let iterations = cfg.iterations;

    println!("\n=== {}×{}, block {} ===", n, n, block.get());
    println!("{}", "-".repeat(50));

    let mut results: Vec<(String, f64)> = vec![
        (
            "Naive (i-j-k)".to_string(),
            bench_fn(a, b, iterations, multiply_naive_ijk)?,
        ),
        (
            "Scalar (i-k-j)".to_string(),
            bench_fn(a, b, iterations, multiply_naive_ikj)?,
        ),
    ];

    for size in block_sizes(n, block) {
        results.push((
            format!("Tiled B={}", size.get()),
            bench_fn(a, b, iterations, |a, b| multiply_blocked(a, b, size))?,
        ));
    }
    results.push((
        format!("Tiled B={} MT", block.get()),
        bench_fn(a, b, iterations, |a, b| {
            multiply_blocked_parallel(a, b, block, threads)
        })?,
    ));

    let baseline_time = results[0].1;
    for (i, (name, time_ms)) in results.iter().enumerate() {
        let gflops = 2.0 * (n * n * n) as f64 / (time_ms / 1000.0) / 1e9;
        println!(
            "{}. {:16} {:8.2} ms  {:6.2} GFLOPS  ({:.1}×)",
            i + 1,
            name,
            time_ms,
            gflops,
            baseline_time / time_ms
        );
    }
    println!("\nSpeedup relative to Naive (i-j-k). Higher is better.");
    Ok(())
}

/// The configured block size plus a few powers of two below N.
fn block_sizes(n: usize, configured: BlockSize) -> Vec<BlockSize> {
    let mut sizes: Vec<BlockSize> = [8, 16, 32, 64]
        .into_iter()
        .filter(|&s| s < n)
        .filter_map(|s| BlockSize::new(s).ok())
        .collect();
    if !sizes.contains(&configured) {
        sizes.push(configured);
    }
    sizes.sort_by_key(|s| s.get());
    sizes
}

/// Average wall time of `f` in milliseconds, after one warmup run.
fn bench_fn<F>(a: &Matrix, b: &Matrix, iterations: usize, f: F) -> Result<f64>
where
    F: Fn(&Matrix, &Matrix) -> Result<Matrix>,
{
    // Warmup
    f(a, b)?;

    let mut total = 0.0;
    for _ in 0..iterations {
        let start = Instant::now();
        let c = f(a, b)?;
        total += start.elapsed().as_secs_f64();
        std::hint::black_box(c);
    }

    Ok(total / iterations as f64 * 1000.0)
}
