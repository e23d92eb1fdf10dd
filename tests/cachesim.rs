use std::path::PathBuf;

use tiled_matmul::cachesim::{
    Axis, AxisSection, CSV_HEADER, CacheSimReport, Metric, MissBreakdown, ReportError, SimConfig,
    SweepPlan, append_csv, read_csv, render_html, run_one, run_sweep,
};

const SAMPLE_REPORT: &str = "\
L1 Data (config)         Size: 32(KB)    Line size: 64(B)        Associativity: 8        Num sets: 64
Matrix multiplication complete
L1 Data (hit/miss)       Instructions: 53572514  References: 15264597    Miss rate: 0.0044       MPKI: 1.2592

      Total         Cold     Capacity      Mapping  Replacement
      67456         3170        16022         2057        46207
";

fn sample() -> CacheSimReport {
    CacheSimReport::parse(SAMPLE_REPORT).unwrap()
}

fn temp_csv(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "tiled_matmul_{}_{}.csv",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn plan() -> SweepPlan {
    serde_json::from_str(
        r#"{
            "pin_root": "/opt/pin",
            "tool": "/opt/pin/obj-intel64/cache.so",
            "target": "./matrixBlocked",
            "cache_sizes_kb": [32, 256],
            "line_sizes_b": [32, 64],
            "associativities": [1, 8]
        }"#,
    )
    .unwrap()
}

// ============================================================
// Report parsing
// ============================================================

#[test]
fn test_parse_sample_report() {
    let report = sample();

    assert_eq!(report.cache_size_kb, 32);
    assert_eq!(report.line_size_b, 64);
    assert_eq!(report.associativity, 8);
    assert_eq!(report.num_sets, 64);
    assert_eq!(report.instructions, 53_572_514);
    assert_eq!(report.references, 15_264_597);
    assert!((report.miss_rate - 0.0044).abs() < 1e-12);
    assert!((report.mpki - 1.2592).abs() < 1e-12);
    assert_eq!(
        report.misses,
        MissBreakdown {
            total: 67456,
            cold: 3170,
            capacity: 16022,
            mapping: 2057,
            replacement: 46207,
        }
    );
}

#[test]
fn test_parse_tolerates_extra_program_output() {
    let text = format!("pin: warming up\n{}\nbye\n", SAMPLE_REPORT);
    assert_eq!(CacheSimReport::parse(&text).unwrap(), sample());
}

#[test]
fn test_parse_ignores_total_like_program_output() {
    let text = SAMPLE_REPORT
        .replace(
            "Matrix multiplication complete",
            "Totals computed\nTotal Cold Capacity Mapping Replacement",
        )
        .replace("\n\n", "\nTotals computed\n");
    assert_eq!(CacheSimReport::parse(&text).unwrap(), sample());
}

#[test]
fn test_parse_requires_exact_breakdown_header() {
    let text = SAMPLE_REPORT.replace("Total         Cold", "Total Warm");
    assert!(matches!(
        CacheSimReport::parse(&text),
        Err(ReportError::MissingLine("miss breakdown header"))
    ));
}

#[test]
fn test_parse_missing_hit_miss_line() {
    let text: String = SAMPLE_REPORT
        .lines()
        .filter(|l| !l.contains("hit/miss"))
        .map(|l| format!("{}\n", l))
        .collect();

    assert!(matches!(
        CacheSimReport::parse(&text),
        Err(ReportError::MissingLine("hit/miss"))
    ));
}

#[test]
fn test_parse_missing_field() {
    let text = SAMPLE_REPORT.replace("MPKI: 1.2592", "");
    assert!(matches!(
        CacheSimReport::parse(&text),
        Err(ReportError::MissingField { field: "MPKI", .. })
    ));
}

#[test]
fn test_parse_bad_number() {
    let text = SAMPLE_REPORT.replace("Instructions: 53572514", "Instructions: 1.2.3");
    assert!(matches!(
        CacheSimReport::parse(&text),
        Err(ReportError::InvalidNumber { field: "Instructions", .. })
    ));
}

#[test]
fn test_parse_short_breakdown_row() {
    let text = SAMPLE_REPORT.replace("2057        46207", "2057");
    assert!(matches!(
        CacheSimReport::parse(&text),
        Err(ReportError::BadBreakdown(_))
    ));
}

#[test]
fn test_parse_empty_input() {
    assert!(matches!(
        CacheSimReport::parse(""),
        Err(ReportError::MissingLine("config"))
    ));
}

// ============================================================
// CSV output
// ============================================================

#[test]
fn test_csv_row_matches_header() {
    let row = sample().to_csv_row();

    assert_eq!(
        row,
        "32,64,8,64,53572514,15264597,0.0044,1.2592,67456,3170,16022,2057,46207"
    );
    assert_eq!(row.split(',').count(), CSV_HEADER.len());
}

#[test]
fn test_append_csv_writes_header_once() {
    let path = temp_csv("header_once");
    let report = sample();

    append_csv(&path, &[report.clone()]).unwrap();
    append_csv(&path, &[report.clone(), report]).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], CSV_HEADER.join(","));
    assert!(lines[1..].iter().all(|l| l.starts_with("32,64,8,64,")));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_append_csv_empty_file_gets_header() {
    let path = temp_csv("empty_file");
    std::fs::write(&path, "").unwrap();

    append_csv(&path, &[]).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, format!("{}\n", CSV_HEADER.join(",")));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_report_json_roundtrip() {
    let report = sample();
    let json = serde_json::to_string(&report).unwrap();
    let back: CacheSimReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

// ============================================================
// Sweep planning
// ============================================================

#[test]
fn test_configurations_cartesian_order() {
    let configs = plan().configurations();

    assert_eq!(configs.len(), 8);
    assert_eq!(
        configs[0],
        SimConfig {
            cache_size_kb: 32,
            line_size_b: 32,
            associativity: 1
        }
    );
    assert_eq!(configs[1].associativity, 8);
    assert_eq!(configs[2].line_size_b, 64);
    assert_eq!(configs[4].cache_size_kb, 256);
    assert_eq!(
        configs[7],
        SimConfig {
            cache_size_kb: 256,
            line_size_b: 64,
            associativity: 8
        }
    );
}

#[test]
fn test_command_for_builds_pin_argv() {
    let plan = plan();
    let cmd = plan.command_for(&SimConfig {
        cache_size_kb: 256,
        line_size_b: 64,
        associativity: 1,
    });

    assert_eq!(cmd.get_program(), "/opt/pin/pin");
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(
        args,
        vec![
            "-t",
            "/opt/pin/obj-intel64/cache.so",
            "-dl1_c",
            "256",
            "-b",
            "64",
            "-dl1_a",
            "1",
            "--",
            "./matrixBlocked",
        ]
    );
}

#[test]
fn test_plan_defaults() {
    let plan: SweepPlan =
        serde_json::from_str(r#"{ "pin_root": "/opt/pin", "tool": "cache.so" }"#).unwrap();

    assert_eq!(plan.target, PathBuf::from("./matrixMultSimple"));
    assert_eq!(
        plan.configurations(),
        vec![SimConfig {
            cache_size_kb: 256,
            line_size_b: 64,
            associativity: 1
        }]
    );
}

#[test]
fn test_plan_missing_paths_rejected() {
    assert!(serde_json::from_str::<SweepPlan>(r#"{ "tool": "cache.so" }"#).is_err());
}

#[test]
fn test_unlaunchable_simulator_is_skipped() {
    let plan: SweepPlan = serde_json::from_str(
        r#"{ "pin_root": "/nonexistent/tiled_matmul/pin", "tool": "cache.so" }"#,
    )
    .unwrap();

    let err = run_one(&plan, &plan.configurations()[0]).unwrap_err();
    assert!(matches!(err, ReportError::Launch { .. }));
    assert!(run_sweep(&plan).is_empty());
}

// ============================================================
// Simulator runs (stand-in pin launcher)
// ============================================================

/// Echoes a report for the geometry it was asked to simulate.
#[cfg(unix)]
const PIN_OK: &str = r#"#!/bin/sh
cat >&2 <<REPORT
L1 Data (config)         Size: $4(KB)    Line size: $6(B)        Associativity: $8        Num sets: 64
L1 Data (hit/miss)       Instructions: 53572514  References: 15264597    Miss rate: 0.0044       MPKI: 1.2592
      Total         Cold     Capacity      Mapping  Replacement
      67456         3170        16022         2057        46207
REPORT
echo "Matrix multiplication complete"
"#;

#[cfg(unix)]
const PIN_FAIL: &str = "#!/bin/sh\necho 'pin: cannot load tool' >&2\nexit 1\n";

#[cfg(unix)]
fn pin_root(name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let root = std::env::temp_dir().join(format!(
        "tiled_matmul_pin_{}_{}",
        name,
        std::process::id()
    ));
    std::fs::create_dir_all(&root).unwrap();
    let pin = root.join("pin");
    std::fs::write(&pin, script).unwrap();
    std::fs::set_permissions(&pin, std::fs::Permissions::from_mode(0o755)).unwrap();
    root
}

#[cfg(unix)]
fn pin_plan(root: &std::path::Path) -> SweepPlan {
    SweepPlan {
        pin_root: root.to_path_buf(),
        tool: PathBuf::from("cache.so"),
        target: PathBuf::from("./matrixBlocked"),
        cache_sizes_kb: vec![32, 256],
        line_sizes_b: vec![64],
        associativities: vec![1, 4],
    }
}

#[cfg(unix)]
#[test]
fn test_simulator_runs() {
    // Both scripts are written before anything is spawned.
    let ok_root = pin_root("ok", PIN_OK);
    let fail_root = pin_root("fail", PIN_FAIL);
    let config = SimConfig {
        cache_size_kb: 256,
        line_size_b: 64,
        associativity: 4,
    };

    let plan = pin_plan(&ok_root);
    let report = run_one(&plan, &config).unwrap();
    assert_eq!(report.cache_size_kb, 256);
    assert_eq!(report.line_size_b, 64);
    assert_eq!(report.associativity, 4);
    assert_eq!(report.instructions, 53_572_514);
    assert_eq!(report.misses, sample().misses);

    let reports = run_sweep(&plan);
    assert_eq!(reports.len(), plan.configurations().len());
    let geometry: Vec<_> = reports
        .iter()
        .map(|r| (r.cache_size_kb, r.associativity))
        .collect();
    assert_eq!(geometry, vec![(32, 1), (32, 4), (256, 1), (256, 4)]);

    let plan = pin_plan(&fail_root);
    match run_one(&plan, &config) {
        Err(ReportError::SimulatorFailed { stderr, .. }) => {
            assert!(stderr.contains("cannot load tool"), "stderr: {}", stderr)
        }
        other => panic!("expected SimulatorFailed, got {:?}", other),
    }
    assert!(run_sweep(&plan).is_empty());

    std::fs::remove_dir_all(&ok_root).unwrap();
    std::fs::remove_dir_all(&fail_root).unwrap();
}

// ============================================================
// Reading results back and charting them
// ============================================================

fn with_geometry(
    cache_size_kb: u64,
    line_size_b: u64,
    associativity: u64,
    total: u64,
) -> CacheSimReport {
    let mut report = sample();
    report.cache_size_kb = cache_size_kb;
    report.line_size_b = line_size_b;
    report.associativity = associativity;
    report.misses.total = total;
    report
}

#[test]
fn test_read_csv_returns_appended_reports() {
    let path = temp_csv("read_back");
    let reports = vec![with_geometry(32, 64, 1, 100), with_geometry(32, 64, 2, 90)];

    append_csv(&path, &reports[..1]).unwrap();
    append_csv(&path, &reports[1..]).unwrap();

    assert_eq!(read_csv(&path).unwrap(), reports);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_read_csv_rejects_bad_rows() {
    let path = temp_csv("bad_rows");

    std::fs::write(&path, format!("{}\n1,2,3\n", CSV_HEADER.join(","))).unwrap();
    assert!(matches!(read_csv(&path), Err(ReportError::Csv { line: 2, .. })));

    std::fs::write(&path, "a,b,c\n").unwrap();
    assert!(matches!(read_csv(&path), Err(ReportError::Csv { line: 1, .. })));

    std::fs::write(&path, "").unwrap();
    assert!(read_csv(&path).unwrap().is_empty());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_axis_detection() {
    let by_assoc = [with_geometry(32, 64, 1, 10), with_geometry(32, 64, 8, 5)];
    let by_line = [with_geometry(32, 16, 1, 10), with_geometry(32, 64, 1, 5)];
    let by_cache = [with_geometry(8, 64, 1, 10), with_geometry(64, 64, 1, 5)];
    let mixed = [with_geometry(8, 64, 1, 10), with_geometry(64, 64, 2, 5)];

    assert_eq!(Axis::detect(&by_assoc), Some(Axis::Associativity));
    assert_eq!(Axis::detect(&by_line), Some(Axis::BlockSize));
    assert_eq!(Axis::detect(&by_cache), Some(Axis::CacheSize));
    assert_eq!(Axis::detect(&mixed), None);
    assert_eq!(Axis::detect(&by_assoc[..1]), None);
    assert_eq!(Axis::detect(&[]), None);
}

#[test]
fn test_section_has_series_per_metric() {
    let reports = [
        with_geometry(16, 64, 1, 300),
        with_geometry(32, 64, 1, 200),
        with_geometry(64, 64, 1, 100),
    ];

    let section = AxisSection::from_reports("cache.csv", &reports, None).unwrap();

    assert_eq!(section.axis, Axis::CacheSize);
    let metrics: Vec<_> = section.series.iter().map(|s| s.metric).collect();
    assert_eq!(metrics, Metric::ALL.to_vec());

    let total = &section.series[0];
    assert_eq!(total.points, vec![(16, 300.0), (32, 200.0), (64, 100.0)]);
    assert_eq!(
        total.title(),
        "Varying Cache Size: Total Misses vs. Cache Size (KB)"
    );

    let miss_rate = section
        .series
        .iter()
        .find(|s| s.metric == Metric::MissRate)
        .unwrap();
    assert!(miss_rate.points.iter().all(|&(_, y)| (y - 0.0044).abs() < 1e-12));
}

#[test]
fn test_section_axis_override() {
    let mixed = [with_geometry(8, 64, 1, 10), with_geometry(64, 64, 2, 5)];

    assert!(matches!(
        AxisSection::from_reports("mixed.csv", &mixed, None),
        Err(ReportError::NoSweepAxis(name)) if name == "mixed.csv"
    ));
    let forced =
        AxisSection::from_reports("mixed.csv", &mixed, Some(Axis::Associativity)).unwrap();
    assert_eq!(forced.series[0].points, vec![(1, 10.0), (2, 5.0)]);
}

#[test]
fn test_render_html_one_chart_per_series() {
    let block = AxisSection::new(
        Axis::BlockSize,
        &[with_geometry(32, 16, 1, 9), with_geometry(32, 64, 1, 3)],
    );
    let assoc = AxisSection::new(Axis::Associativity, &[with_geometry(32, 64, 1, 9)]);

    let html = render_html(&[block, assoc]);

    assert!(html.starts_with("<html>"));
    assert!(html.contains("<h2>Analysis for Varying Block Size</h2>"));
    assert!(html.contains("<h2>Analysis for Varying Associativity</h2>"));
    assert_eq!(html.matches("<svg").count(), 2 * Metric::ALL.len());
    assert!(html.contains(
        "Varying Associativity: MPKI (Misses Per Kilo Instruction) vs. Associativity"
    ));
    assert!(!html.contains("NaN"));
}
