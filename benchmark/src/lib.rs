// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Gridmark benchmarking harness
//!
//! Measures per-operation latency and derived throughput of a store client
//! under varying payload shapes (raw strings, small JSON documents, large
//! JSON documents) and operation types (put, get, predicate query).
//!
//! # Pipeline
//!
//! Workload generation → warm-up pass (discarded) → measured pass (one
//! latency sample per operation) → statistical aggregation → report.
//!
//! Scenarios run strictly sequentially on a single logical thread so each
//! sample reflects exactly one in-flight operation.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod reporter;
pub mod runner;
pub mod stats;
pub mod timing;
pub mod workload;

pub use config::{BenchConfig, QueryConfig, ScenarioSpec, WorkloadConfig};
pub use error::BenchError;
pub use orchestrator::{BenchPhase, Orchestrator};
pub use reporter::{BenchReport, ConsoleReporter, JsonReporter, ScenarioReport, SystemInfo};
pub use runner::OperationKind;
pub use stats::{AggregationError, LatencySummary};
pub use timing::Timer;
pub use workload::{Dataset, Payload, ValueKind};
