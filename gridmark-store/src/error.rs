// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Error types for store client operations.
//!
//! Explicit enum variants only - no catch-all or generic handling. The
//! harness never retries: every variant is terminal for the run that hit it.

use thiserror::Error;

/// Errors surfaced by a store client implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The client could not be created or attached to its region.
    #[error("failed to connect to region '{region}': {reason}")]
    Connection { region: String, reason: String },

    /// A put/get/clear call failed inside the store.
    #[error("{operation} failed for key '{key}': {reason}")]
    Operation {
        operation: &'static str,
        key: String,
        reason: String,
    },

    /// A get for a key that holds no entry.
    #[error("no entry for key '{key}'")]
    KeyNotFound { key: String },

    /// Query compilation or execution failed.
    #[error("query execution failed: {reason}")]
    Query { reason: String },

    /// An operation was issued after `close`.
    #[error("store client is closed")]
    Closed,
}
