//! Run the cache simulator over a configuration sweep, or chart the results.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use tiled_matmul::cachesim::{
    Axis, AxisSection, ReportError, SweepPlan, append_csv, read_csv, render_html, run_sweep,
};
use tiled_matmul::logging;

const DEFAULT_CSV: &str = "cache_simulation_results.csv";
const DEFAULT_HTML: &str = "cache_analysis.html";

#[derive(Parser)]
#[command(name = "cache_sweep", about = "L1 cache simulator sweeps for the matmul demos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every configuration of a plan and append the results to a CSV file
    Run(RunArgs),
    /// Chart one or more results files as an HTML report
    Report(ReportArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Sweep plan (JSON)
    plan: PathBuf,
    /// Results file to append to
    #[arg(default_value = DEFAULT_CSV)]
    csv: PathBuf,
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Results files, one sweep per file
    #[arg(required = true)]
    csv: Vec<PathBuf>,
    /// Swept axis for every file (detected per file if not specified)
    #[arg(long, value_enum)]
    axis: Option<AxisArg>,
    /// Where to write the HTML report
    #[arg(long, default_value = DEFAULT_HTML)]
    out: PathBuf,
    /// Print the series as JSON instead of writing HTML
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    BlockSize,
    CacheSize,
    Associativity,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::BlockSize => Axis::BlockSize,
            AxisArg::CacheSize => Axis::CacheSize,
            AxisArg::Associativity => Axis::Associativity,
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => run(&args),
        Command::Report(args) => report(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RunArgs) -> Result<(), ReportError> {
    let plan = SweepPlan::from_path(&args.plan)?;
    let reports = run_sweep(&plan);

    append_csv(&args.csv, &reports)?;
    info!("{} results written to {}", reports.len(), args.csv.display());

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn report(args: &ReportArgs) -> Result<(), ReportError> {
    let sections = args
        .csv
        .iter()
        .map(|path| section_for(path, args.axis.map(Axis::from)))
        .collect::<Result<Vec<_>, _>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    std::fs::write(&args.out, render_html(&sections))?;
    info!("Successfully generated the HTML file: {}", args.out.display());
    Ok(())
}

fn section_for(path: &Path, axis: Option<Axis>) -> Result<AxisSection, ReportError> {
    let reports = read_csv(path)?;
    let section = AxisSection::from_reports(&path.display().to_string(), &reports, axis)?;
    info!(
        "{}: {} runs, {}",
        path.display(),
        reports.len(),
        section.axis.title()
    );
    Ok(section)
}
