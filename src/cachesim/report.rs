//! Parsing of the simulator's L1 data-cache report.
//!
//! The report looks like this (the program's own output sits in between):
//!
//! ```text
//! L1 Data (config)         Size: 32(KB)    Line size: 64(B)        Associativity: 8        Num sets: 64
//! Matrix multiplication complete
//! L1 Data (hit/miss)       Instructions: 53572514  References: 15264597    Miss rate: 0.0044       MPKI: 1.2592
//!       Total         Cold     Capacity      Mapping  Replacement
//!       67456         3170        16022         2057        46207
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ReportError;

const CONFIG_PREFIX: &str = "L1 Data (config)";
const HIT_MISS_PREFIX: &str = "L1 Data (hit/miss)";
const BREAKDOWN_COLUMNS: [&str; 5] = ["Total", "Cold", "Capacity", "Mapping", "Replacement"];

/// Misses split by cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissBreakdown {
    pub total: u64,
    pub cold: u64,
    pub capacity: u64,
    pub mapping: u64,
    pub replacement: u64,
}

/// One simulator run: cache geometry plus hit/miss statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSimReport {
    pub cache_size_kb: u64,
    pub line_size_b: u64,
    pub associativity: u64,
    pub num_sets: u64,
    pub instructions: u64,
    pub references: u64,
    pub miss_rate: f64,
    pub mpki: f64,
    pub misses: MissBreakdown,
}

impl CacheSimReport {
    /// Parse a full simulator report (stderr and stdout concatenated).
    pub fn parse(text: &str) -> Result<Self, ReportError> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        let (config_idx, config) = find_line(&lines, 0, CONFIG_PREFIX, "config")?;
        let (hit_idx, hit_miss) = find_line(&lines, config_idx + 1, HIT_MISS_PREFIX, "hit/miss")?;

        // The breakdown follows the hit/miss line; program output may
        // precede it, so only an exact column-name header counts.
        let header_idx = (hit_idx + 1..lines.len())
            .find(|&i| lines[i].split_whitespace().eq(BREAKDOWN_COLUMNS))
            .ok_or(ReportError::MissingLine("miss breakdown header"))?;
        let row = lines[header_idx + 1..]
            .iter()
            .find(|l| !l.is_empty())
            .ok_or(ReportError::MissingLine("miss breakdown row"))?;

        Ok(Self {
            cache_size_kb: field(config, "config", "Size")?,
            line_size_b: field(config, "config", "Line size")?,
            associativity: field(config, "config", "Associativity")?,
            num_sets: field(config, "config", "Num sets")?,
            instructions: field(hit_miss, "hit/miss", "Instructions")?,
            references: field(hit_miss, "hit/miss", "References")?,
            miss_rate: field(hit_miss, "hit/miss", "Miss rate")?,
            mpki: field(hit_miss, "hit/miss", "MPKI")?,
            misses: parse_breakdown(row)?,
        })
    }
}

/// First line at or after `from` that starts with `prefix`.
fn find_line<'a>(
    lines: &[&'a str],
    from: usize,
    prefix: &str,
    name: &'static str,
) -> Result<(usize, &'a str), ReportError> {
    (from..lines.len())
        .find(|&i| lines[i].starts_with(prefix))
        .map(|i| (i, lines[i]))
        .ok_or(ReportError::MissingLine(name))
}

/// Read the number that follows `key:` on `text`.
///
/// Only the leading digits and dots are taken, so `32(KB)` reads as 32.
fn field<T: FromStr>(text: &str, line: &'static str, key: &'static str) -> Result<T, ReportError> {
    let missing = || ReportError::MissingField { line, field: key };

    let label = format!("{}:", key);
    let start = text.find(&label).ok_or_else(missing)? + label.len();
    let rest = text[start..].trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let value = &rest[..end];
    if value.is_empty() {
        return Err(missing());
    }

    value.parse().map_err(|_| ReportError::InvalidNumber {
        field: key,
        value: value.to_string(),
    })
}

fn parse_breakdown(row: &str) -> Result<MissBreakdown, ReportError> {
    let bad = || ReportError::BadBreakdown(row.to_string());
    let values = row
        .split_whitespace()
        .map(|v| v.parse::<u64>().map_err(|_| bad()))
        .collect::<Result<Vec<_>, _>>()?;

    match values[..] {
        [total, cold, capacity, mapping, replacement] => Ok(MissBreakdown {
            total,
            cold,
            capacity,
            mapping,
            replacement,
        }),
        _ => Err(bad()),
    }
}
