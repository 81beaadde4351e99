// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Top-level error type for the benchmark harness.
//!
//! Every variant is fatal: a skewed or partially-completed benchmark run is
//! worse than no run, so nothing is retried and partial statistics are never
//! reported as complete. Each variant carries the scenario label, operation
//! kind, or underlying cause needed to diagnose without re-running.

use gridmark_store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::orchestrator::PhaseError;
use crate::reporter::ReporterError;
use crate::stats::AggregationError;

/// Errors that abort a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid scenario parameters or unreadable fixture. Raised before any
    /// timing begins.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The store client could not be created.
    #[error("failed to connect to store: {source}")]
    Connection {
        #[source]
        source: StoreError,
    },

    /// The sentinel put/get round trip returned the wrong value. Signals a
    /// broken environment rather than a benchmark failure.
    #[error("smoke test failed: put {expected}, got back {actual}")]
    SmokeTest { expected: String, actual: String },

    /// A store operation failed during warm-up or measurement.
    #[error("store failure in scenario '{scenario}' during {operation}: {source}")]
    Store {
        scenario: String,
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// A payload could not be converted to or from the store representation.
    #[error("payload conversion failed in scenario '{scenario}': {reason}")]
    Payload { scenario: String, reason: String },

    /// Empty sample sequence or zero-mean throughput. A harness logic defect.
    #[error("aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// The orchestrator attempted an illegal phase transition. A harness
    /// logic defect.
    #[error("benchmark phase error: {0}")]
    Phase(#[from] PhaseError),

    /// Report output could not be written.
    #[error("report output error: {0}")]
    Report(#[from] ReporterError),
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;
