// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! The store client interface the benchmark harness measures against.
//!
//! Implementations are external collaborators: the harness only ever drives
//! them through `StoreClient` and treats query text as opaque. All calls
//! block until they complete or fail; the harness applies no timeouts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::RegionName;

/// A value as handed to or returned from the store.
///
/// Stores hold either plain text or a structured document. Conversion
/// between JSON source text and `Document` is the responsibility of the
/// caller, so that the harness can choose which side of the timed window
/// the conversion lands on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    /// Raw string payload.
    Text(String),
    /// Structured document payload.
    Document(serde_json::Value),
}

impl StoreValue {
    /// Payload kind name for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Document(_) => "document",
        }
    }

    /// Borrow the document, if this value is one.
    pub fn as_document(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Text(_) => None,
        }
    }
}

/// Logging verbosity requested from the store client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_filter(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_filter())
    }
}

/// Connection configuration for a store client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Region (collection/namespace) the client operates on.
    pub region: RegionName,
    /// Logging verbosity passed through to the client.
    #[serde(default)]
    pub log_level: LogLevel,
}

/// A connected key-value/document store client.
///
/// The harness drives exactly one client from a single logical thread, so
/// methods take `&mut self` and no internal locking is assumed.
pub trait StoreClient {
    /// Store `value` under `key`, overwriting any prior entry.
    fn put(&mut self, key: &str, value: &StoreValue) -> Result<(), StoreError>;

    /// Retrieve the value stored under `key`.
    fn get(&mut self, key: &str) -> Result<StoreValue, StoreError>;

    /// Remove all entries in the active region.
    fn clear(&mut self) -> Result<(), StoreError>;

    /// Execute a predicate query and return the matching values.
    fn execute_query(&mut self, query: &str) -> Result<Vec<StoreValue>, StoreError>;

    /// Release the client. Consumes the client; no further calls possible.
    fn close(self)
    where
        Self: Sized;
}
