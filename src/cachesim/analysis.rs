//! Per-axis metric series from sweep results, and an HTML report of them.
//!
//! A sweep file normally varies one cache parameter (block size, cache
//! size or associativity) and holds the others fixed. Each metric is
//! plotted against that parameter, one line chart per metric.

use std::fmt::Write;

use serde::Serialize;

use super::error::ReportError;
use super::report::CacheSimReport;

/// The cache parameter a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    BlockSize,
    CacheSize,
    Associativity,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::BlockSize, Axis::CacheSize, Axis::Associativity];

    /// CSV column name, used as the x-axis title.
    pub fn column(self) -> &'static str {
        match self {
            Axis::BlockSize => "Block Size (B)",
            Axis::CacheSize => "Cache Size (KB)",
            Axis::Associativity => "Associativity",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Axis::BlockSize => "Varying Block Size",
            Axis::CacheSize => "Varying Cache Size",
            Axis::Associativity => "Varying Associativity",
        }
    }

    pub fn value(self, report: &CacheSimReport) -> u64 {
        match self {
            Axis::BlockSize => report.line_size_b,
            Axis::CacheSize => report.cache_size_kb,
            Axis::Associativity => report.associativity,
        }
    }

    /// The single axis whose value differs across `reports`.
    ///
    /// `None` when nothing varies or more than one axis does.
    pub fn detect(reports: &[CacheSimReport]) -> Option<Axis> {
        let mut varying = Axis::ALL.into_iter().filter(|axis| {
            reports
                .first()
                .is_some_and(|first| reports.iter().any(|r| axis.value(r) != axis.value(first)))
        });
        match (varying.next(), varying.next()) {
            (Some(axis), None) => Some(axis),
            _ => None,
        }
    }
}

/// A plotted quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Total,
    Capacity,
    Cold,
    MissRate,
    Mpki,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Total,
        Metric::Capacity,
        Metric::Cold,
        Metric::MissRate,
        Metric::Mpki,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Metric::Total => "Total Misses",
            Metric::Capacity => "Capacity Misses",
            Metric::Cold => "Cold Misses",
            Metric::MissRate => "Overall Miss Rate",
            Metric::Mpki => "MPKI (Misses Per Kilo Instruction)",
        }
    }

    pub fn value(self, report: &CacheSimReport) -> f64 {
        match self {
            Metric::Total => report.misses.total as f64,
            Metric::Capacity => report.misses.capacity as f64,
            Metric::Cold => report.misses.cold as f64,
            Metric::MissRate => report.miss_rate,
            Metric::Mpki => report.mpki,
        }
    }
}

/// One metric against one axis, points in the order the runs were recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub axis: Axis,
    pub metric: Metric,
    pub points: Vec<(u64, f64)>,
}

impl Series {
    pub fn title(&self) -> String {
        format!(
            "{}: {} vs. {}",
            self.axis.title(),
            self.metric.title(),
            self.axis.column()
        )
    }
}

/// All metric series of one sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSection {
    pub axis: Axis,
    pub series: Vec<Series>,
}

impl AxisSection {
    pub fn new(axis: Axis, reports: &[CacheSimReport]) -> Self {
        let series = Metric::ALL
            .into_iter()
            .map(|metric| Series {
                axis,
                metric,
                points: reports
                    .iter()
                    .map(|r| (axis.value(r), metric.value(r)))
                    .collect(),
            })
            .collect();
        Self { axis, series }
    }

    /// Build a section for a sweep file, detecting its axis unless given.
    pub fn from_reports(
        name: &str,
        reports: &[CacheSimReport],
        axis: Option<Axis>,
    ) -> Result<Self, ReportError> {
        let axis = axis
            .or_else(|| Axis::detect(reports))
            .ok_or_else(|| ReportError::NoSweepAxis(name.to_string()))?;
        Ok(Self::new(axis, reports))
    }
}

const CHART_W: f64 = 640.0;
const CHART_H: f64 = 360.0;
const MARGIN: f64 = 60.0;

/// A standalone HTML page with one SVG line chart per series.
pub fn render_html(sections: &[AxisSection]) -> String {
    let mut html = String::new();
    html.push_str("<html><head><title>Cache Simulation Analysis</title></head><body>\n");
    html.push_str("<h1 style=\"text-align:center;\">Cache Performance Analysis</h1>\n");
    for section in sections {
        let _ = writeln!(html, "<hr><h2>Analysis for {}</h2>", section.axis.title());
        for series in &section.series {
            html.push_str(&render_svg(series));
        }
    }
    html.push_str("</body></html>\n");
    html
}

fn render_svg(series: &Series) -> String {
    let (x_min, x_max) = bounds(series.points.iter().map(|&(x, _)| x as f64));
    let (y_min, y_max) = bounds(series.points.iter().map(|&(_, y)| y));
    let sx = |x: f64| MARGIN + (x - x_min) / (x_max - x_min) * (CHART_W - 2.0 * MARGIN);
    let sy = |y: f64| CHART_H - MARGIN - (y - y_min) / (y_max - y_min) * (CHART_H - 2.0 * MARGIN);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = CHART_W,
        h = CHART_H
    );
    let _ = writeln!(
        svg,
        "<text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"14\">{}</text>",
        CHART_W / 2.0,
        series.title()
    );
    let _ = writeln!(
        svg,
        "<line x1=\"{m}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"black\"/>\
         <line x1=\"{m}\" y1=\"{m}\" x2=\"{m}\" y2=\"{b}\" stroke=\"black\"/>",
        m = MARGIN,
        b = CHART_H - MARGIN,
        r = CHART_W - MARGIN
    );
    let _ = writeln!(
        svg,
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\">{}</text>",
        CHART_W / 2.0,
        CHART_H - 15.0,
        series.axis.column()
    );
    let _ = writeln!(
        svg,
        "<text x=\"{m}\" y=\"{}\" font-size=\"10\">{}</text>\
         <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\">{}</text>",
        CHART_H - MARGIN + 15.0,
        x_min,
        CHART_W - MARGIN,
        CHART_H - MARGIN + 15.0,
        x_max,
        m = MARGIN
    );
    let _ = writeln!(
        svg,
        "<text x=\"{x}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\">{}</text>\
         <text x=\"{x}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\">{}</text>",
        CHART_H - MARGIN,
        y_min,
        MARGIN,
        y_max,
        x = MARGIN - 5.0
    );

    let path: Vec<String> = series
        .points
        .iter()
        .map(|&(x, y)| format!("{:.1},{:.1}", sx(x as f64), sy(y)))
        .collect();
    let _ = writeln!(
        svg,
        "<polyline fill=\"none\" stroke=\"steelblue\" stroke-width=\"2\" points=\"{}\"/>",
        path.join(" ")
    );
    for &(x, y) in &series.points {
        let _ = writeln!(
            svg,
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"steelblue\"><title>{}: {}</title></circle>",
            sx(x as f64),
            sy(y),
            x,
            y
        );
    }
    svg.push_str("</svg>\n");
    svg
}

/// Min and max of `values`, widened so the range is never empty.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}
