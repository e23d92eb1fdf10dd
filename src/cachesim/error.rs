//! Error types for the cache simulator tooling.

use thiserror::Error;

/// Errors from parsing, storing or producing simulator reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required report line was not found.
    #[error("Missing report line: {0}")]
    MissingLine(&'static str),

    /// A line was found but a `Key:` field on it was not.
    #[error("Missing field {field:?} on {line} line")]
    MissingField {
        line: &'static str,
        field: &'static str,
    },

    /// A field value did not parse as a number.
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// The miss breakdown row was not five integers.
    #[error("Bad miss breakdown row: {0:?}")]
    BadBreakdown(String),

    /// A results CSV row could not be read back.
    #[error("CSV line {line}: {reason}")]
    Csv { line: usize, reason: String },

    /// No single configuration axis varies across a set of results.
    #[error("Cannot tell which axis {0} sweeps")]
    NoSweepAxis(String),

    /// The simulator could not be started.
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The simulator ran but exited unsuccessfully.
    #[error("Simulator exited with {status}: {stderr}")]
    SimulatorFailed { status: String, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
