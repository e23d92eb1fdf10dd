use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::error::ReportError;
use super::report::{CacheSimReport, MissBreakdown};

/// Column names, in row order.
pub const CSV_HEADER: [&str; 13] = [
    "Cache Size (KB)",
    "Block Size (B)",
    "Associativity",
    "Num Sets",
    "Instructions",
    "References",
    "Miss Rate",
    "MPKI",
    "Total",
    "Cold",
    "Capacity",
    "Mapping",
    "Replacement",
];

impl CacheSimReport {
    /// One CSV row matching [`CSV_HEADER`]. All fields are numeric, so
    /// nothing needs quoting.
    pub fn to_csv_row(&self) -> String {
        let m = &self.misses;
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.cache_size_kb,
            self.line_size_b,
            self.associativity,
            self.num_sets,
            self.instructions,
            self.references,
            self.miss_rate,
            self.mpki,
            m.total,
            m.cold,
            m.capacity,
            m.mapping,
            m.replacement
        )
    }
}

/// Append reports to a CSV file, creating it if needed.
///
/// The header is written only when the file is new or empty, so repeated
/// sweeps accumulate into one table.
pub fn append_csv(path: impl AsRef<Path>, reports: &[CacheSimReport]) -> Result<(), ReportError> {
    let path = path.as_ref();
    let write_header = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => return Err(e.into()),
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    if write_header {
        writeln!(out, "{}", CSV_HEADER.join(","))?;
    }
    for report in reports {
        writeln!(out, "{}", report.to_csv_row())?;
    }
    out.flush()?;
    Ok(())
}

impl CacheSimReport {
    /// Inverse of [`to_csv_row`](Self::to_csv_row).
    pub fn from_csv_row(row: &str) -> Result<Self, String> {
        let cells: Vec<&str> = row.split(',').map(str::trim).collect();
        if cells.len() != CSV_HEADER.len() {
            return Err(format!(
                "expected {} columns, found {}",
                CSV_HEADER.len(),
                cells.len()
            ));
        }

        fn cell<T: std::str::FromStr>(cells: &[&str], idx: usize) -> Result<T, String> {
            cells[idx]
                .parse()
                .map_err(|_| format!("bad {} value {:?}", CSV_HEADER[idx], cells[idx]))
        }

        Ok(Self {
            cache_size_kb: cell(&cells, 0)?,
            line_size_b: cell(&cells, 1)?,
            associativity: cell(&cells, 2)?,
            num_sets: cell(&cells, 3)?,
            instructions: cell(&cells, 4)?,
            references: cell(&cells, 5)?,
            miss_rate: cell(&cells, 6)?,
            mpki: cell(&cells, 7)?,
            misses: MissBreakdown {
                total: cell(&cells, 8)?,
                cold: cell(&cells, 9)?,
                capacity: cell(&cells, 10)?,
                mapping: cell(&cells, 11)?,
                replacement: cell(&cells, 12)?,
            },
        })
    }
}

/// Read a results file written by [`append_csv`].
///
/// The first non-blank line must be [`CSV_HEADER`]; blank lines are skipped.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<CacheSimReport>, ReportError> {
    let text = std::fs::read_to_string(path)?;
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, l)| (idx + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    match lines.next() {
        Some((_, header)) if header.split(',').map(str::trim).eq(CSV_HEADER) => {}
        Some((line, _)) => {
            return Err(ReportError::Csv {
                line,
                reason: "unexpected header".to_string(),
            });
        }
        None => return Ok(Vec::new()),
    }

    lines
        .map(|(line, row)| {
            CacheSimReport::from_csv_row(row).map_err(|reason| ReportError::Csv { line, reason })
        })
        .collect()
}
