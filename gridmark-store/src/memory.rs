// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! In-memory reference store.
//!
//! Equivalent to benchmarking against a local in-process region: no network,
//! no persistence. Used as the default target of the bundled benchmark suite
//! and as a deterministic fixture in harness tests.
//!
//! Query support is deliberately minimal: `execute_query` matches documents
//! containing every single-quoted literal of the query text and projects
//! their `name` field. That is the full surface the bundled predicate query
//! exercises; this is not a query engine.

use std::collections::HashMap;

use crate::client::{StoreClient, StoreConfig, StoreValue};
use crate::error::StoreError;
use crate::types::RegionName;

/// HashMap-backed store client scoped to a single region.
#[derive(Debug)]
pub struct MemoryStore {
    region: RegionName,
    entries: HashMap<String, StoreValue>,
}

impl MemoryStore {
    /// Connect to (create) an in-memory region.
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        tracing::info!(
            region = %config.region,
            log_level = %config.log_level,
            "attached in-memory region"
        );

        Ok(Self {
            region: config.region.clone(),
            entries: HashMap::new(),
        })
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the region holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Single-quoted literals embedded in the query text.
    fn query_literals(query: &str) -> Vec<&str> {
        query
            .split('\'')
            .enumerate()
            .filter(|(i, _)| i % 2 == 1)
            .map(|(_, literal)| literal)
            .collect()
    }
}

impl StoreClient for MemoryStore {
    fn put(&mut self, key: &str, value: &StoreValue) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<StoreValue, StoreError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        tracing::debug!(region = %self.region, entries = self.entries.len(), "clearing region");
        self.entries.clear();
        Ok(())
    }

    fn execute_query(&mut self, query: &str) -> Result<Vec<StoreValue>, StoreError> {
        let literals = Self::query_literals(query);
        if literals.is_empty() {
            return Err(StoreError::Query {
                reason: "query contains no literal predicate".to_string(),
            });
        }

        let mut results = Vec::new();
        for value in self.entries.values() {
            let doc = match value.as_document() {
                Some(doc) => doc,
                None => continue,
            };

            let serialized = doc.to_string();
            if literals.iter().all(|literal| serialized.contains(literal)) {
                match doc.get("name") {
                    Some(name) => results.push(StoreValue::Document(name.clone())),
                    None => results.push(value.clone()),
                }
            }
        }

        Ok(results)
    }

    fn close(self) {
        tracing::info!(region = %self.region, "closed in-memory region");
    }
}
