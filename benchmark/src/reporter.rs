// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Rendering and persistence of benchmark results.
//!
//! The console reporter prints one fixed-order line per scenario, in the
//! order the scenarios were configured. The JSON reporter additionally saves
//! the full run (host info, timestamp, every scenario summary) to a
//! timestamped file for later comparison; it layers on top of the same
//! `LatencySummary` values without changing their contract.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use thiserror::Error;

use crate::runner::OperationKind;
use crate::stats::LatencySummary;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("failed to create output directory: {0}")]
    DirectoryCreation(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One scenario's aggregated outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub label: String,
    pub operation: OperationKind,
    pub dataset_size: usize,
    pub summary: LatencySummary,
}

/// Fixed-order console rendering.
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Render one line per scenario, preserving configured order:
    /// label, mean, standard deviation, p95, throughput.
    pub fn render(results: &[ScenarioReport]) -> String {
        let mut out = String::new();
        for result in results {
            out.push_str(&Self::render_line(result));
            out.push('\n');
        }
        out
    }

    fn render_line(result: &ScenarioReport) -> String {
        let s = &result.summary;
        format!(
            "{}: {:.0} (± {:.0}) usec/op  p95 {:.0} usec  {:.0} ops/sec",
            result.label,
            s.mean_ms * 1_000.0,
            s.std_dev_ms * 1_000.0,
            s.p95_ms * 1_000.0,
            s.ops_per_sec
        )
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    pub cpu_cores: usize,
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Complete benchmark run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub benchmark_suite: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub results: Vec<ScenarioReport>,
}

impl BenchReport {
    /// Build a report around the given scenario results.
    pub fn new(results: Vec<ScenarioReport>) -> Self {
        Self {
            benchmark_suite: "gridmark".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            results,
        }
    }
}

/// JSON reporter writing timestamped run files.
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a new JSON reporter with the specified output directory.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Save a benchmark report to a JSON file.
    ///
    /// Returns the path to the created file.
    pub fn save(&self, report: &BenchReport) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%SZ");
        let filename = format!("gridmark_{}.json", timestamp);
        let filepath = self.output_dir.join(&filename);

        let file = File::create(&filepath)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        Ok(filepath)
    }

    /// List all existing benchmark files in the output directory.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>, ReporterError> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }

    /// Load an existing benchmark report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchReport, ReporterError> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}
