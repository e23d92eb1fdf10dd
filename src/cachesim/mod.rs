//! Tooling for L1 data-cache simulator runs.
//!
//! The demos are meant to be run under a Pin-based cache simulator. This
//! module turns the simulator's text report into a [`CacheSimReport`],
//! tabulates reports as CSV, charts them, and drives a sweep over cache
//! configurations.
//!
//! - `report`: report parsing
//! - `csv`: CSV rendering and append-to-file
//! - `sweep`: configuration sweep and simulator invocation
//! - `analysis`: per-axis metric series and the HTML report

pub mod analysis;
pub mod csv;
pub mod error;
pub mod report;
pub mod sweep;

pub use analysis::{Axis, AxisSection, Metric, Series, render_html};
pub use csv::{CSV_HEADER, append_csv, read_csv};
pub use error::ReportError;
pub use report::{CacheSimReport, MissBreakdown};
pub use sweep::{SimConfig, SweepPlan, run_one, run_sweep};
