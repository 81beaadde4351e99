// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Gridmark store abstraction
//!
//! The narrow interface the benchmark harness uses to talk to a
//! key-value/document store: a `StoreClient` trait, a uniform `StoreValue`,
//! and the connection configuration. Also ships `MemoryStore`, an in-memory
//! reference implementation equivalent to benchmarking against a local
//! in-process region.

pub mod client;
pub mod error;
pub mod memory;
pub mod types;

// Re-export commonly used types
pub use client::{LogLevel, StoreClient, StoreConfig, StoreValue};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use types::RegionName;
