// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! CLI tool to run the benchmark suite and report latency statistics.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gridmark_benchmark::{BenchConfig, BenchReport, JsonReporter, Orchestrator};
use gridmark_store::MemoryStore;

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Run Gridmark store benchmarks and report latency statistics")]
struct Args {
    /// Benchmark configuration file (YAML); runs the built-in suite when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for JSON report data
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Skip writing the JSON report
    #[arg(long)]
    no_json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BenchConfig::load_file(path)?,
        None => BenchConfig::default_suite()?,
    };

    let default_filter = if args.verbose {
        "debug"
    } else {
        config.store.log_level.as_filter()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("Gridmark Benchmark Suite");
    println!("========================");
    println!("Region: {}", config.store.region);
    println!("Scenarios: {}", config.scenarios.len());
    println!();

    let results = Orchestrator::new(config).run(MemoryStore::connect)?;

    if !args.no_json {
        let reporter = JsonReporter::new(&args.output)?;
        let path = reporter.save(&BenchReport::new(results))?;
        println!();
        println!("Benchmark report saved to: {:?}", path);
    }

    Ok(())
}
