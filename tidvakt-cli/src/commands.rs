use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use tidvakt_config::TidvaktConfig;
use tidvakt_core::SchedulerKind;
use tidvakt_telemetry::{EventLogger, MetricsRecorder};

use crate::error::CliError;
use crate::workload::{run_workload, WorkloadReport};

#[derive(Parser, Debug)]
#[command(name = "tidvakt", version, about)]
pub struct Cli {
    /// Configuration file; `config/tidvakt.yaml` is used when present otherwise
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the seeded workload on one backend and print its report
    Run(RunArgs),
    /// Run the same workload on every backend and check the traces agree
    Compare(CompareArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Event store backend (heap, map, list, calendar)
    #[arg(short, long)]
    pub scheduler: Option<SchedulerKind>,
    /// Number of root events
    #[arg(long)]
    pub events: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Absolute stop time in ticks
    #[arg(long)]
    pub stop_at: Option<i64>,
    /// Print Prometheus metrics after the report
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
    /// Fail unless the trace digest equals this hex string
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(long)]
    pub events: Option<usize>,
    /// First seed; later iterations use consecutive seeds
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    pub iterations: u64,
}

/// Loads configuration and applies command line overrides.
fn load_config(path: Option<&PathBuf>) -> Result<TidvaktConfig, CliError> {
    Ok(match path {
        Some(path) => TidvaktConfig::load_from_path(path)?,
        None => TidvaktConfig::load()?,
    })
}

pub fn run_command(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_ref())?;
    if let Err(err) = EventLogger::init(&config.telemetry.log_level) {
        eprintln!("{err}");
    }

    match cli.command {
        Commands::Run(args) => run_single(config, args),
        Commands::Compare(args) => run_compare(config, args),
    }
}

fn print_report(report: &WorkloadReport) -> Result<(), CliError> {
    print!("{}", serde_yaml::to_string(report)?);
    Ok(())
}

fn run_single(mut config: TidvaktConfig, args: RunArgs) -> Result<(), CliError> {
    if let Some(kind) = args.scheduler {
        config.simulator.scheduler = kind;
    }
    if let Some(events) = args.events {
        config.workload.events = events;
    }
    if let Some(seed) = args.seed {
        config.workload.seed = seed;
    }
    if args.stop_at.is_some() {
        config.simulator.stop_at = args.stop_at;
    }
    let stop_at = config.simulator.stop_time();

    let report = run_workload(&config.workload, config.simulator.options(), stop_at)?;
    EventLogger::log_run(report.scheduler, &report.stats, report.wall(), &report.digest);
    print_report(&report)?;

    if args.metrics || config.telemetry.metrics {
        let metrics = MetricsRecorder::new()?;
        metrics.record_run(report.scheduler, &report.stats, report.wall());
        print!("{}", metrics.gather_metrics()?);
    }

    if let Some(expected) = args.validate_hash {
        if !expected.eq_ignore_ascii_case(&report.digest) {
            return Err(CliError::DigestMismatch {
                expected,
                actual: report.digest,
            });
        }
        info!("Trace digest validated");
    }
    Ok(())
}

fn run_compare(mut config: TidvaktConfig, args: CompareArgs) -> Result<(), CliError> {
    if let Some(events) = args.events {
        config.workload.events = events;
    }
    let first_seed = args.seed.unwrap_or(config.workload.seed);

    for seed in first_seed..first_seed.saturating_add(args.iterations) {
        config.workload.seed = seed;
        let mut reports = Vec::with_capacity(SchedulerKind::ALL.len());
        for kind in SchedulerKind::ALL {
            let mut options = config.simulator.options();
            options.scheduler = kind;
            let report = run_workload(&config.workload, options, config.simulator.stop_time())?;
            EventLogger::log_run(kind, &report.stats, report.wall(), &report.digest);
            reports.push(report);
        }

        let reference = &reports[0];
        let mismatched: Vec<String> = reports[1..]
            .iter()
            .filter(|report| report.fingerprint() != reference.fingerprint())
            .map(|report| {
                format!(
                    "{} produced {} ({} invocations), {} produced {} ({} invocations)",
                    reference.scheduler,
                    reference.digest,
                    reference.invocations,
                    report.scheduler,
                    report.digest,
                    report.invocations
                )
            })
            .collect();
        if !mismatched.is_empty() {
            warn!(seed, "Backend traces diverged");
            return Err(CliError::BackendMismatch {
                seed,
                details: mismatched.join("; "),
            });
        }

        println!(
            "seed {seed}: {} backends agree on {} ({} invocations)",
            reports.len(),
            reference.digest,
            reference.invocations
        );
    }
    Ok(())
}
