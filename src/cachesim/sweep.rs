//! Sweeps the simulator over a grid of cache configurations.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use super::report::CacheSimReport;

/// One L1 data-cache geometry to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub cache_size_kb: u64,
    pub line_size_b: u64,
    pub associativity: u64,
}

/// What to run and over which configurations.
///
/// Loaded from JSON. Only the simulator paths are required:
///
/// ```
/// use tiled_matmul::cachesim::SweepPlan;
///
/// let plan: SweepPlan = serde_json::from_str(
///     r#"{ "pin_root": "/opt/pin", "tool": "/opt/pin/cache.so",
///          "associativities": [1, 2, 4] }"#,
/// ).unwrap();
///
/// assert_eq!(plan.cache_sizes_kb, vec![256]);
/// assert_eq!(plan.configurations().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Directory holding the `pin` launcher.
    pub pin_root: PathBuf,
    /// The cache simulator pintool (`cache.so`).
    pub tool: PathBuf,
    /// Program to run under the simulator.
    #[serde(default = "default_target")]
    pub target: PathBuf,
    #[serde(default = "default_cache_sizes")]
    pub cache_sizes_kb: Vec<u64>,
    #[serde(default = "default_line_sizes")]
    pub line_sizes_b: Vec<u64>,
    #[serde(default = "default_associativities")]
    pub associativities: Vec<u64>,
}

fn default_target() -> PathBuf {
    PathBuf::from("./matrixMultSimple")
}

fn default_cache_sizes() -> Vec<u64> {
    vec![256]
}

fn default_line_sizes() -> Vec<u64> {
    vec![64]
}

fn default_associativities() -> Vec<u64> {
    vec![1]
}

impl SweepPlan {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Cartesian product of the configured values. Cache size varies
    /// slowest, associativity fastest.
    pub fn configurations(&self) -> Vec<SimConfig> {
        let mut configs = Vec::with_capacity(
            self.cache_sizes_kb.len() * self.line_sizes_b.len() * self.associativities.len(),
        );
        for &cache_size_kb in &self.cache_sizes_kb {
            for &line_size_b in &self.line_sizes_b {
                for &associativity in &self.associativities {
                    configs.push(SimConfig {
                        cache_size_kb,
                        line_size_b,
                        associativity,
                    });
                }
            }
        }
        configs
    }

    /// `<pin_root>/pin -t <tool> -dl1_c <kb> -b <line> -dl1_a <assoc> -- <target>`
    pub fn command_for(&self, config: &SimConfig) -> Command {
        let mut cmd = Command::new(self.pin_root.join("pin"));
        cmd.arg("-t")
            .arg(&self.tool)
            .arg("-dl1_c")
            .arg(config.cache_size_kb.to_string())
            .arg("-b")
            .arg(config.line_size_b.to_string())
            .arg("-dl1_a")
            .arg(config.associativity.to_string())
            .arg("--")
            .arg(&self.target);
        cmd
    }
}

/// Run the simulator once and parse its report.
///
/// The simulator prints its statistics on stderr, so stderr is parsed
/// ahead of stdout.
pub fn run_one(plan: &SweepPlan, config: &SimConfig) -> Result<CacheSimReport, ReportError> {
    let mut cmd = plan.command_for(config);
    let output = cmd.output().map_err(|source| ReportError::Launch {
        program: cmd.get_program().to_string_lossy().into_owned(),
        source,
    })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(ReportError::SimulatorFailed {
            status: output.status.to_string(),
            stderr: stderr.into_owned(),
        });
    }

    let text = format!("{}{}", stderr, String::from_utf8_lossy(&output.stdout));
    CacheSimReport::parse(&text)
}

/// Run every configuration in the plan.
///
/// A run that fails to launch, exits non-zero, or produces an unreadable
/// report is logged and skipped.
pub fn run_sweep(plan: &SweepPlan) -> Vec<CacheSimReport> {
    let mut reports = Vec::new();
    for config in plan.configurations() {
        info!(
            "Running cacheSim with Cache Size: {}KB, Block Size: {}B, Associativity: {}",
            config.cache_size_kb, config.line_size_b, config.associativity
        );
        match run_one(plan, &config) {
            Ok(report) => reports.push(report),
            Err(e) => warn!("Skipping {:?}: {}", config, e),
        }
    }
    reports
}
