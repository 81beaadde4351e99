// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Statistical aggregation of latency samples.
//!
//! Consumes the ordered nanosecond samples of one scenario and produces
//! descriptive statistics in milliseconds. Percentiles use linear
//! interpolation over the sorted samples (rank = p/100 x (N-1)); standard
//! deviation uses the sample form (N-1 denominator).

use serde::{Deserialize, Serialize};
use thiserror::Error;

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Errors from aggregating a sample sequence.
///
/// Both variants signal a harness logic defect, not a store failure:
/// a measured pass always yields at least one sample, and no real operation
/// completes in exactly zero time at nanosecond resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("cannot aggregate an empty sample sequence")]
    Empty,

    #[error("mean latency is zero; throughput is undefined")]
    ZeroMean,
}

/// Descriptive statistics over one scenario's latency samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Number of samples aggregated.
    pub count: usize,
    /// Arithmetic mean latency in milliseconds.
    pub mean_ms: f64,
    /// Sample standard deviation in milliseconds.
    pub std_dev_ms: f64,
    /// Minimum observed latency in milliseconds.
    pub min_ms: f64,
    /// Maximum observed latency in milliseconds.
    pub max_ms: f64,
    /// 95th percentile latency in milliseconds.
    pub p95_ms: f64,
    /// 99th percentile latency in milliseconds.
    pub p99_ms: f64,
    /// Derived throughput: 1000 / mean_ms operations per second.
    pub ops_per_sec: f64,
}

impl LatencySummary {
    /// Aggregate a non-empty sequence of nanosecond latency samples.
    pub fn from_samples(samples: &[u64]) -> Result<Self, AggregationError> {
        if samples.is_empty() {
            return Err(AggregationError::Empty);
        }

        let count = samples.len();
        let sum: u128 = samples.iter().map(|&s| s as u128).sum();
        let mean_ns = sum as f64 / count as f64;

        let std_dev_ns = if count < 2 {
            0.0
        } else {
            let variance: f64 = samples
                .iter()
                .map(|&s| {
                    let diff = s as f64 - mean_ns;
                    diff * diff
                })
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        };

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let mean_ms = mean_ns / NANOS_PER_MILLI;
        if mean_ms == 0.0 {
            return Err(AggregationError::ZeroMean);
        }

        Ok(Self {
            count,
            mean_ms,
            std_dev_ms: std_dev_ns / NANOS_PER_MILLI,
            min_ms: sorted[0] as f64 / NANOS_PER_MILLI,
            max_ms: sorted[count - 1] as f64 / NANOS_PER_MILLI,
            p95_ms: percentile_ns(&sorted, 95.0) / NANOS_PER_MILLI,
            p99_ms: percentile_ns(&sorted, 99.0) / NANOS_PER_MILLI,
            ops_per_sec: 1000.0 / mean_ms,
        })
    }
}

/// Linear-interpolation percentile over sorted nanosecond samples.
///
/// rank = p/100 x (N-1); fractional ranks interpolate between the two
/// adjacent sorted samples. `sorted` must be non-empty and ascending.
fn percentile_ns(sorted: &[u64], p: f64) -> f64 {
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let fraction = rank - lower as f64;

    if lower + 1 >= sorted.len() {
        return sorted[sorted.len() - 1] as f64;
    }

    let low = sorted[lower] as f64;
    let high = sorted[lower + 1] as f64;
    low + fraction * (high - low)
}
