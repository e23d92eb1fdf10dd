//! Settings for the demo driver.

use crate::blocked::BlockSize;
use crate::error::{MatmulError, Result};

/// Dimensions and run counts for the two demos.
///
/// The defaults are the sizes the demos were written for: a 64×64 naive
/// multiply and a 100×100 tiled multiply with 40×40 blocks (so the last
/// block in each direction is clipped to 20).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoConfig {
    pub simple_dim: usize,
    pub tiled_dim: usize,
    pub block_size: BlockSize,
    pub threads: usize,
    pub iterations: usize,
    /// Time every variant after the demos.
    pub compare: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            simple_dim: 64,
            tiled_dim: 100,
            block_size: BlockSize::DEFAULT,
            threads: 4,
            iterations: 3,
            compare: false,
        }
    }
}

impl DemoConfig {
    /// Defaults overridden by `MATMUL_SIMPLE_DIM`, `MATMUL_DIM`,
    /// `MATMUL_BLOCK`, `MATMUL_THREADS`, `MATMUL_ITERATIONS` and
    /// `MATMUL_COMPARE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = positive(&lookup, "MATMUL_SIMPLE_DIM")? {
            cfg.simple_dim = v;
        }
        if let Some(v) = positive(&lookup, "MATMUL_DIM")? {
            cfg.tiled_dim = v;
        }
        if let Some(v) = positive(&lookup, "MATMUL_BLOCK")? {
            cfg.block_size = BlockSize::new(v)?;
        }
        if let Some(v) = positive(&lookup, "MATMUL_THREADS")? {
            cfg.threads = v;
        }
        if let Some(v) = positive(&lookup, "MATMUL_ITERATIONS")? {
            cfg.iterations = v;
        }
        if let Some(v) = flag(&lookup, "MATMUL_COMPARE")? {
            cfg.compare = v;
        }
        Ok(cfg)
    }
}

fn positive<F>(lookup: &F, key: &str) -> Result<Option<usize>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(MatmulError::invalid(format!("{} must be > 0", key))),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(MatmulError::invalid(format!(
            "{} must be a positive integer, got {:?}",
            key, raw
        ))),
    }
}

fn flag<F>(lookup: &F, key: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" | "" => Ok(Some(false)),
        _ => Err(MatmulError::invalid(format!(
            "{} must be a boolean, got {:?}",
            key, raw
        ))),
    }
}
