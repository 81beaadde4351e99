// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Per-scenario operation execution and timing.
//!
//! A scenario pass has two halves: an untimed `prepare` step that stages the
//! region (clear, plus preloading for get/query scenarios), and a timed
//! `measure` step producing one latency sample per operation in dataset
//! order. The warm-up and measured passes run both halves identically.
//!
//! Cost boundaries per operation kind:
//! - put-string: the put call only; the string value is built beforehand.
//! - put-object: JSON-to-document conversion plus the put call.
//! - get: the get call plus, for document values, re-serialization to JSON.
//! - query: one round-trip execution of the opaque query text.
//!
//! Any store failure aborts the scenario; no partial sample sequence
//! survives.

use serde::{Deserialize, Serialize};

use gridmark_store::{StoreClient, StoreError, StoreValue};

use crate::config::{QueryConfig, ScenarioSpec};
use crate::error::BenchError;
use crate::timing::Timer;
use crate::workload::{Dataset, Payload};

/// Key the needle document is staged under for query scenarios.
const NEEDLE_KEY: &str = "needle";

/// Operation a scenario measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    /// Store a precomputed string under each key.
    PutString,
    /// Convert a JSON document to the store representation, then store it.
    PutObject,
    /// Retrieve each key's value, converting documents back to JSON text.
    Get,
    /// Execute the configured predicate query a fixed number of times.
    Query,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PutString => write!(f, "put-string"),
            Self::PutObject => write!(f, "put-object"),
            Self::Get => write!(f, "get"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// Everything one scenario pass needs: the scenario itself, its dataset
/// (absent for query scenarios), and the query material.
pub struct ScenarioPlan<'a> {
    pub spec: &'a ScenarioSpec,
    pub dataset: Option<&'a Dataset>,
    pub query: &'a QueryConfig,
}

/// Stage the region for a scenario pass. Untimed.
pub fn prepare<C: StoreClient>(client: &mut C, plan: &ScenarioPlan<'_>) -> Result<(), BenchError> {
    let spec = plan.spec;

    client
        .clear()
        .map_err(|e| store_failure(spec, "clear", e))?;

    match spec.operation {
        // Puts measure fresh inserts; a cleared region is all they need.
        OperationKind::PutString | OperationKind::PutObject => Ok(()),

        OperationKind::Get => {
            let dataset = require_dataset(plan)?;
            for (key, payload) in dataset.entries() {
                let value = to_store_value(spec, payload)?;
                client
                    .put(key, &value)
                    .map_err(|e| store_failure(spec, "preload put", e))?;
            }
            Ok(())
        }

        OperationKind::Query => {
            let needle = StoreValue::Document(plan.query.needle.clone());
            client
                .put(NEEDLE_KEY, &needle)
                .map_err(|e| store_failure(spec, "preload put", e))?;

            let haystack = StoreValue::Document(plan.query.haystack.clone());
            for i in 0..spec.dataset_size.saturating_sub(1) {
                client
                    .put(&format!("haystack_{}", i), &haystack)
                    .map_err(|e| store_failure(spec, "preload put", e))?;
            }
            Ok(())
        }
    }
}

/// Run the timed pass, one sample per operation in dataset order.
pub fn measure<C: StoreClient>(
    client: &mut C,
    plan: &ScenarioPlan<'_>,
) -> Result<Vec<u64>, BenchError> {
    let spec = plan.spec;
    tracing::debug!(scenario = %spec.label, operation = %spec.operation, "measuring");

    match spec.operation {
        OperationKind::PutString => {
            let dataset = require_dataset(plan)?;
            // The string value is built once, outside every timed window.
            let value = to_store_value(spec, dataset.payload())?;

            let mut samples = Vec::with_capacity(dataset.len());
            for (key, _) in dataset.entries() {
                let timer = Timer::start();
                client
                    .put(key, &value)
                    .map_err(|e| store_failure(spec, "put", e))?;
                samples.push(timer.stop());
            }
            Ok(samples)
        }

        OperationKind::PutObject => {
            let dataset = require_dataset(plan)?;

            let mut samples = Vec::with_capacity(dataset.len());
            for (key, payload) in dataset.entries() {
                let Payload::Json(text) = payload else {
                    return Err(payload_failure(spec, "put-object requires a JSON payload"));
                };

                // Conversion to the store representation is part of the
                // measured put cost.
                let timer = Timer::start();
                let doc: serde_json::Value = serde_json::from_str(text)
                    .map_err(|e| payload_failure(spec, &e.to_string()))?;
                client
                    .put(key, &StoreValue::Document(doc))
                    .map_err(|e| store_failure(spec, "put", e))?;
                samples.push(timer.stop());
            }
            Ok(samples)
        }

        OperationKind::Get => {
            let dataset = require_dataset(plan)?;

            let mut samples = Vec::with_capacity(dataset.len());
            for (key, _) in dataset.entries() {
                // Retrieval and document-to-JSON conversion are both inside
                // the timed window.
                let timer = Timer::start();
                let value = client
                    .get(key)
                    .map_err(|e| store_failure(spec, "get", e))?;
                if let StoreValue::Document(doc) = &value {
                    serde_json::to_string(doc)
                        .map_err(|e| payload_failure(spec, &e.to_string()))?;
                }
                samples.push(timer.stop());
            }
            Ok(samples)
        }

        OperationKind::Query => {
            let mut samples = Vec::with_capacity(plan.query.repetitions);
            for _ in 0..plan.query.repetitions {
                let timer = Timer::start();
                client
                    .execute_query(&plan.query.text)
                    .map_err(|e| store_failure(spec, "query", e))?;
                samples.push(timer.stop());
            }
            Ok(samples)
        }
    }
}

/// Convert a payload to its store representation, outside any timed window.
fn to_store_value(spec: &ScenarioSpec, payload: &Payload) -> Result<StoreValue, BenchError> {
    match payload {
        Payload::Text(text) => Ok(StoreValue::Text(text.clone())),
        Payload::Json(text) => {
            let doc = serde_json::from_str(text)
                .map_err(|e| payload_failure(spec, &e.to_string()))?;
            Ok(StoreValue::Document(doc))
        }
    }
}

fn require_dataset<'a>(plan: &ScenarioPlan<'a>) -> Result<&'a Dataset, BenchError> {
    plan.dataset
        .ok_or_else(|| payload_failure(plan.spec, "scenario has no dataset"))
}

fn store_failure(spec: &ScenarioSpec, operation: &'static str, source: StoreError) -> BenchError {
    BenchError::Store {
        scenario: spec.label.clone(),
        operation,
        source,
    }
}

fn payload_failure(spec: &ScenarioSpec, reason: &str) -> BenchError {
    BenchError::Payload {
        scenario: spec.label.clone(),
        reason: reason.to_string(),
    }
}
