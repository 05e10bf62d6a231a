use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::prelude::*;
use sched_model::{
    JobIdGen, SweepRow,
    config::SweepConfig,
    fixture,
    sim::{Sweep, SweepError},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Compare FCFS, SJF and round-robin scheduling by average turnaround time
#[derive(Parser)]
#[command(name = "sched_model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average the policies over random workloads of increasing size
    Sweep {
        #[command(flatten)]
        config: SweepConfig,

        /// Write the resulting series as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Trace every scheduling run at info level
        #[arg(long)]
        log: bool,
    },
    /// Check a regression fixture file
    Check { file: PathBuf },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Sweep {
            config,
            output,
            log,
        } => sweep(&config, output, log),
        Commands::Check { file } => check(&file),
    }
}

fn sweep(config: &SweepConfig, output: Option<PathBuf>, log: bool) -> Result<ExitCode> {
    let mut sweep = Sweep::new(config)?;
    let result = match config.seed {
        Some(seed) => sweep.run(&mut StdRng::seed_from_u64(seed), log),
        None => sweep.run(&mut rand::rng(), log),
    };

    let (rows, failure) = match result {
        Ok(rows) => (rows, None),
        Err(SweepError {
            num_jobs,
            completed,
            source,
        }) => {
            error!(num_jobs, %source, "sweep aborted");
            (completed, Some(source))
        }
    };

    print_table(&rows);
    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&rows)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), rows = rows.len(), "wrote series");
    }

    match failure {
        Some(source) => Err(source.into()),
        None => Ok(ExitCode::SUCCESS),
    }
}

fn print_table(rows: &[SweepRow]) {
    println!("{:>6} {:>10} {:>10} {:>10} {:>10}", "jobs", "FCFS", "SJF", "RR(2)", "RR(5)");
    for row in rows {
        let a = &row.averages;
        println!(
            "{:>6} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            row.num_jobs, a.fcfs, a.sjf, a.rr2, a.rr5
        );
    }
}

fn check(file: &Path) -> Result<ExitCode> {
    let input = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let cases = fixture::parse(&input).with_context(|| format!("loading {}", file.display()))?;

    let mut ids = JobIdGen::new();
    let mut failed = 0;
    for case in &cases {
        let outcome = case
            .check(&mut ids)
            .with_context(|| format!("case at line {}", case.line))?;
        if outcome.passed() {
            info!(line = case.line, jobs = case.jobs.len(), "case passed");
        } else {
            failed += 1;
            warn!(
                line = case.line,
                expected = ?outcome.expected,
                actual = ?outcome.actual.rounded(3),
                "case failed"
            );
        }
    }

    info!(cases = cases.len(), failed, "fixture checked");
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
