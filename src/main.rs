use flowstat::prelude::*;
use flowstat::metrics::report::write_reports;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{Level, info};

#[derive(Parser)]
#[command(author, version, about = "Flow completion and deadline metrics for simulator runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute deadline miss ratio and AFCT for one or more runs
    Analyze {
        /// flow-info file, repeat once per run
        #[arg(long = "info", required = true)]
        info: Vec<PathBuf>,
        /// flow-result file, paired with the --info at the same position
        #[arg(long = "result", required = true)]
        result: Vec<PathBuf>,
        /// Run label, defaults to the run's position
        #[arg(long)]
        label: Vec<String>,
        #[arg(long, default_value_t = flowstat::analysis::STOP_TIME)]
        stop_time: f64,
        #[arg(long, default_value_t = flowstat::analysis::DEADLINE_DELTA, allow_hyphen_values = true)]
        deadline_delta: f64,
        #[arg(long, default_value = "100000..200000")]
        deadline_range: FlowRange,
        #[arg(long, default_value = "200000..300000")]
        afct_range: FlowRange,
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// Load a single run and report how many records matched
    Check {
        #[arg(long = "info")]
        info: PathBuf,
        #[arg(long = "result")]
        result: PathBuf,
        #[arg(long, default_value = "0..18446744073709551615")]
        range: FlowRange,
    },
}

fn main() -> Result<()> {
    let program_start = Instant::now();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            info,
            result,
            label,
            stop_time,
            deadline_delta,
            deadline_range,
            afct_range,
            format,
        } => {
            let config = AnalysisConfig::default()
                .with_stop_time(stop_time)
                .with_deadline_delta(deadline_delta)
                .with_ranges(deadline_range, afct_range);
            let inputs = pair_inputs(info, result, label)?;
            analyze(config, &inputs, format)?;
        }

        Commands::Check { info, result, range } => {
            check(info, result, range)?;
        }
    }

    info!("Total runtime: {:.2}s", program_start.elapsed().as_secs_f64());

    Ok(())
}

fn pair_inputs(info: Vec<PathBuf>, result: Vec<PathBuf>, labels: Vec<String>) -> Result<Vec<RunInput>> {
    if info.len() != result.len() {
        bail!(
            "Got {} --info files but {} --result files; they must pair up",
            info.len(),
            result.len()
        );
    }
    if !labels.is_empty() && labels.len() != info.len() {
        bail!("Got {} --label values for {} runs", labels.len(), info.len());
    }

    let inputs = info
        .into_iter()
        .zip(result)
        .enumerate()
        .map(|(i, (spec_path, outcome_path))| {
            let label = labels.get(i).cloned().unwrap_or_else(|| (i + 1).to_string());
            RunInput::new(label, spec_path, outcome_path)
        })
        .collect();

    Ok(inputs)
}

fn analyze(config: AnalysisConfig, inputs: &[RunInput], format: ReportFormat) -> Result<()> {
    info!("Deadline range: {}, AFCT range: {}", config.deadline_range, config.afct_range);
    info!("Stop time: {}s, deadline delta: {}s", config.stop_time, config.deadline_delta);

    let mut analysis = Analysis::new(config);

    let reports = if inputs.len() > 1 {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.orange/yellow} {pos}/{len} runs {msg}")?
                .progress_chars("█▓░"),
        );
        let reports = analysis.run_all_with(inputs, |report| {
            pb.set_message(report.label.clone());
            pb.inc(1);
        })?;
        pb.finish_and_clear();
        reports
    } else {
        analysis.run_all(inputs)?
    };

    write_reports(&reports, format, std::io::stdout().lock())?;

    Ok(())
}

fn check(info: PathBuf, result: PathBuf, range: FlowRange) -> Result<()> {
    let mut store = RecordStore::new();
    let specs = store.load_flow_specs(&info)?;
    let outcomes = store.load_flow_outcomes(&result)?;
    let matched = store.matched_in(range).count();

    println!("flow specs:    {} lines, {} distinct ids", specs, store.spec_count());
    println!("flow outcomes: {} lines, {} distinct ids", outcomes, store.outcome_count());
    println!("matched in {}: {}", range, matched);
    println!("outcomes without spec: {}", store.orphan_outcomes());

    Ok(())
}
