// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Monotonic timing for individual operations.
//!
//! `std::time::Instant` is monotonic, so elapsed times are unaffected by
//! wall-clock adjustments and never negative. What falls inside a timed
//! window is decided by the caller per operation kind: put-object counts
//! JSON-to-document conversion, get counts retrieval plus document
//! re-serialization.

use std::time::{Duration, Instant};

/// Timer for measuring a single operation.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds.
    pub fn stop(self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    /// Stop the timer and return elapsed duration.
    pub fn elapsed(self) -> Duration {
        self.start.elapsed()
    }
}

/// Measure the execution time of a closure.
///
/// Returns the closure's result and the elapsed nanoseconds.
pub fn measure<F, T>(f: F) -> (T, u64)
where
    F: FnOnce() -> T,
{
    let timer = Timer::start();
    let result = f();
    let elapsed = timer.stop();
    (result, elapsed)
}
