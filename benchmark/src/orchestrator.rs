// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Benchmark run orchestration.
//!
//! A run walks a fixed phase chain: Initializing → Connecting → SmokeTesting
//! → GeneratingData → WarmingUp → Clearing → Measuring → Reporting → Closing
//! → Terminated. No phase may be skipped; a failure in any phase goes
//! directly to Terminated with a fatal error. There is no resume or retry.
//!
//! Scenarios run strictly sequentially in configured order, for both the
//! discarded warm-up pass and the measured pass, over the same datasets in
//! the same iteration order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gridmark_store::{StoreClient, StoreConfig, StoreError, StoreValue};

use crate::config::BenchConfig;
use crate::error::{BenchError, BenchResult};
use crate::reporter::{ConsoleReporter, ScenarioReport};
use crate::runner::{self, OperationKind, ScenarioPlan};
use crate::stats::LatencySummary;
use crate::workload::Dataset;

/// Key used for the startup connectivity check.
const SMOKE_KEY: &str = "smoke";

/// Errors from the benchmark phase machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    #[error("cannot transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Benchmark run lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchPhase {
    /// Configuration accepted, nothing touched yet.
    Initializing,
    /// Acquiring the external store client.
    Connecting,
    /// Sentinel put/get round trip.
    SmokeTesting,
    /// Generating datasets for every scenario.
    GeneratingData,
    /// One full discarded pass per scenario, in order.
    WarmingUp,
    /// Region cleared before the measured passes.
    Clearing,
    /// One full timed pass per scenario, in order.
    Measuring,
    /// Emitting statistics in configured order.
    Reporting,
    /// Releasing the store client.
    Closing,
    /// Terminal. Reached from Closing on success or from any phase on error.
    Terminated,
}

impl BenchPhase {
    /// Phase name for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Connecting => "Connecting",
            Self::SmokeTesting => "SmokeTesting",
            Self::GeneratingData => "GeneratingData",
            Self::WarmingUp => "WarmingUp",
            Self::Clearing => "Clearing",
            Self::Measuring => "Measuring",
            Self::Reporting => "Reporting",
            Self::Closing => "Closing",
            Self::Terminated => "Terminated",
        }
    }

    /// The phase that follows this one on the success path.
    pub const fn successor(&self) -> Option<BenchPhase> {
        match self {
            Self::Initializing => Some(Self::Connecting),
            Self::Connecting => Some(Self::SmokeTesting),
            Self::SmokeTesting => Some(Self::GeneratingData),
            Self::GeneratingData => Some(Self::WarmingUp),
            Self::WarmingUp => Some(Self::Clearing),
            Self::Clearing => Some(Self::Measuring),
            Self::Measuring => Some(Self::Reporting),
            Self::Reporting => Some(Self::Closing),
            Self::Closing => Some(Self::Terminated),
            Self::Terminated => None,
        }
    }

    /// Check if transition to the target phase is valid: the next phase in
    /// the chain, or Terminated from anywhere (the failure path).
    pub fn can_transition_to(&self, target: BenchPhase) -> bool {
        if *self == Self::Terminated {
            return false;
        }
        if target == Self::Terminated {
            return true;
        }
        self.successor() == Some(target)
    }
}

impl std::fmt::Display for BenchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Phase machine for one benchmark run. Enforces the phase chain.
#[derive(Debug)]
pub struct PhaseMachine {
    current: BenchPhase,
    transitions: u64,
}

impl PhaseMachine {
    /// Create a machine in the Initializing phase.
    pub fn new() -> Self {
        Self {
            current: BenchPhase::Initializing,
            transitions: 0,
        }
    }

    /// Get the current phase.
    pub fn phase(&self) -> BenchPhase {
        self.current
    }

    /// Total number of transitions taken.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Attempt to transition to the target phase.
    pub fn transition_to(&mut self, target: BenchPhase) -> Result<(), PhaseError> {
        if !self.current.can_transition_to(target) {
            return Err(PhaseError::InvalidTransition {
                from: self.current.name(),
                to: target.name(),
            });
        }

        tracing::debug!(from = self.current.name(), to = target.name(), "phase transition");

        self.current = target;
        self.transitions += 1;
        Ok(())
    }

    /// Failure path: jump directly to Terminated from any phase.
    pub fn terminate(&mut self) {
        if self.current != BenchPhase::Terminated {
            tracing::debug!(from = self.current.name(), "terminating");
            self.current = BenchPhase::Terminated;
            self.transitions += 1;
        }
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a full benchmark run against one store client.
pub struct Orchestrator {
    config: BenchConfig,
}

impl Orchestrator {
    /// Create an orchestrator for the given configuration.
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    /// Execute the run: connect, smoke test, generate, warm up, measure,
    /// report, close. Returns the scenario reports in configured order.
    pub fn run<C, F>(&self, connect: F) -> BenchResult<Vec<ScenarioReport>>
    where
        C: StoreClient,
        F: FnOnce(&StoreConfig) -> Result<C, StoreError>,
    {
        let mut phases = PhaseMachine::new();
        let result = self.drive(&mut phases, connect);
        if result.is_err() {
            phases.terminate();
        }
        result
    }

    fn drive<C, F>(&self, phases: &mut PhaseMachine, connect: F) -> BenchResult<Vec<ScenarioReport>>
    where
        C: StoreClient,
        F: FnOnce(&StoreConfig) -> Result<C, StoreError>,
    {
        tracing::info!(
            region = %self.config.store.region,
            scenarios = self.config.scenarios.len(),
            "starting benchmark run"
        );

        phases.transition_to(BenchPhase::Connecting)?;
        let mut client =
            connect(&self.config.store).map_err(|source| BenchError::Connection { source })?;

        phases.transition_to(BenchPhase::SmokeTesting)?;
        self.smoke_test(&mut client)?;

        phases.transition_to(BenchPhase::GeneratingData)?;
        let datasets = self.generate_datasets()?;

        phases.transition_to(BenchPhase::WarmingUp)?;
        for (spec, dataset) in self.config.scenarios.iter().zip(&datasets) {
            let plan = ScenarioPlan {
                spec,
                dataset: dataset.as_ref(),
                query: &self.config.query,
            };
            runner::prepare(&mut client, &plan)?;
            let discarded = runner::measure(&mut client, &plan)?;
            tracing::debug!(
                scenario = %spec.label,
                samples = discarded.len(),
                "warm-up pass discarded"
            );
        }

        phases.transition_to(BenchPhase::Clearing)?;
        client.clear().map_err(|source| BenchError::Store {
            scenario: "between passes".to_string(),
            operation: "clear",
            source,
        })?;

        phases.transition_to(BenchPhase::Measuring)?;
        let mut results = Vec::with_capacity(self.config.scenarios.len());
        for (spec, dataset) in self.config.scenarios.iter().zip(&datasets) {
            let plan = ScenarioPlan {
                spec,
                dataset: dataset.as_ref(),
                query: &self.config.query,
            };
            runner::prepare(&mut client, &plan)?;
            let samples = runner::measure(&mut client, &plan)?;
            let summary = LatencySummary::from_samples(&samples)?;

            tracing::info!(
                scenario = %spec.label,
                mean_ms = summary.mean_ms,
                ops_per_sec = summary.ops_per_sec,
                "scenario measured"
            );

            results.push(ScenarioReport {
                label: spec.label.clone(),
                operation: spec.operation,
                dataset_size: spec.dataset_size,
                summary,
            });
        }

        phases.transition_to(BenchPhase::Reporting)?;
        print!("{}", ConsoleReporter::render(&results));

        phases.transition_to(BenchPhase::Closing)?;
        client.close();

        phases.transition_to(BenchPhase::Terminated)?;
        tracing::info!(scenarios = results.len(), "benchmark run complete");

        Ok(results)
    }

    /// Sentinel put/get round trip. A mismatch means a broken environment,
    /// not a benchmark failure.
    fn smoke_test<C: StoreClient>(&self, client: &mut C) -> BenchResult<()> {
        let sentinel = StoreValue::Document(serde_json::json!({ "test": "value" }));

        client
            .put(SMOKE_KEY, &sentinel)
            .map_err(|source| BenchError::Store {
                scenario: "smoke test".to_string(),
                operation: "put",
                source,
            })?;

        let returned = client.get(SMOKE_KEY).map_err(|source| BenchError::Store {
            scenario: "smoke test".to_string(),
            operation: "get",
            source,
        })?;

        if returned != sentinel {
            return Err(BenchError::SmokeTest {
                expected: format!("{:?}", sentinel),
                actual: format!("{:?}", returned),
            });
        }

        tracing::debug!("smoke test passed");
        Ok(())
    }

    /// Generate every scenario's dataset up front, before any timing.
    /// Query scenarios stage their documents from the query configuration
    /// instead.
    fn generate_datasets(&self) -> BenchResult<Vec<Option<Dataset>>> {
        self.config
            .scenarios
            .iter()
            .map(|spec| {
                if spec.operation == OperationKind::Query {
                    Ok(None)
                } else {
                    Dataset::generate(spec, &self.config.workload, self.config.fixture.as_deref())
                        .map(Some)
                        .map_err(BenchError::from)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{QueryConfig, ScenarioSpec, WorkloadConfig};
    use crate::workload::ValueKind;
    use gridmark_store::{LogLevel, MemoryStore, RegionName};
    use std::collections::HashMap;

    fn test_config(scenarios: Vec<ScenarioSpec>) -> BenchConfig {
        BenchConfig {
            store: StoreConfig {
                region: RegionName::new("testRegion").unwrap(),
                log_level: LogLevel::Warning,
            },
            workload: WorkloadConfig {
                key_length: 8,
                value_size: 64,
            },
            query: QueryConfig {
                text: "SELECT name WHERE '212-987-5440'".to_string(),
                needle: serde_json::json!({"name": "Jane Doe", "number": "212-987-5440"}),
                haystack: serde_json::json!({"name": "Jane Doe", "number": "555-555-1212"}),
                repetitions: 4,
            },
            scenarios,
            fixture: None,
        }
    }

    fn spec(label: &str, operation: OperationKind, size: usize) -> ScenarioSpec {
        let value_kind = match operation {
            OperationKind::PutObject => ValueKind::SimpleJson,
            _ => ValueKind::RawString,
        };
        ScenarioSpec {
            label: label.to_string(),
            operation,
            value_kind,
            dataset_size: size,
        }
    }

    // ---- phase machine ----

    #[test]
    fn test_phase_chain_is_legal() {
        let mut machine = PhaseMachine::new();
        let chain = [
            BenchPhase::Connecting,
            BenchPhase::SmokeTesting,
            BenchPhase::GeneratingData,
            BenchPhase::WarmingUp,
            BenchPhase::Clearing,
            BenchPhase::Measuring,
            BenchPhase::Reporting,
            BenchPhase::Closing,
            BenchPhase::Terminated,
        ];
        for phase in chain {
            machine.transition_to(phase).unwrap();
        }
        assert_eq!(machine.phase(), BenchPhase::Terminated);
        assert_eq!(machine.transitions(), 9);
    }

    #[test]
    fn test_skipping_a_phase_is_illegal() {
        let mut machine = PhaseMachine::new();
        let result = machine.transition_to(BenchPhase::SmokeTesting);
        assert_eq!(
            result,
            Err(PhaseError::InvalidTransition {
                from: "Initializing",
                to: "SmokeTesting",
            })
        );
        // The machine stays where it was
        assert_eq!(machine.phase(), BenchPhase::Initializing);
    }

    #[test]
    fn test_any_phase_may_fail_to_terminated() {
        for phase in [
            BenchPhase::Initializing,
            BenchPhase::Connecting,
            BenchPhase::Measuring,
            BenchPhase::Closing,
        ] {
            assert!(phase.can_transition_to(BenchPhase::Terminated));
        }
    }

    #[test]
    fn test_terminated_is_terminal() {
        assert!(!BenchPhase::Terminated.can_transition_to(BenchPhase::Initializing));
        assert!(!BenchPhase::Terminated.can_transition_to(BenchPhase::Terminated));
    }

    // ---- orchestrated runs ----

    #[test]
    fn test_full_run_reports_in_configured_order() {
        let config = test_config(vec![
            spec("String put", OperationKind::PutString, 50),
            spec("Simple object put", OperationKind::PutObject, 30),
            spec("String get", OperationKind::Get, 40),
            spec("OQL query", OperationKind::Query, 20),
        ]);

        let orchestrator = Orchestrator::new(config);
        let results = orchestrator.run(MemoryStore::connect).unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].label, "String put");
        assert_eq!(results[0].summary.count, 50);
        assert_eq!(results[1].label, "Simple object put");
        assert_eq!(results[1].summary.count, 30);
        assert_eq!(results[2].label, "String get");
        assert_eq!(results[2].summary.count, 40);
        // Query samples follow the repetition count, not the dataset size
        assert_eq!(results[3].label, "OQL query");
        assert_eq!(results[3].summary.count, 4);
    }

    /// Store double whose get always returns the wrong sentinel.
    struct LyingStore;

    impl StoreClient for LyingStore {
        fn put(&mut self, _key: &str, _value: &StoreValue) -> Result<(), StoreError> {
            Ok(())
        }

        fn get(&mut self, _key: &str) -> Result<StoreValue, StoreError> {
            Ok(StoreValue::Document(serde_json::json!({ "test": "wrong" })))
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            Ok(())
        }

        fn execute_query(&mut self, _query: &str) -> Result<Vec<StoreValue>, StoreError> {
            Ok(Vec::new())
        }

        fn close(self) {}
    }

    #[test]
    fn test_smoke_test_mismatch_is_fatal() {
        let config = test_config(vec![spec("unreached", OperationKind::PutString, 10)]);
        let orchestrator = Orchestrator::new(config);

        let result = orchestrator.run(|_| Ok(LyingStore));
        assert!(matches!(result, Err(BenchError::SmokeTest { .. })));
    }

    #[test]
    fn test_connection_failure_is_fatal() {
        let config = test_config(vec![spec("unreached", OperationKind::PutString, 10)]);
        let orchestrator = Orchestrator::new(config);

        let result = orchestrator.run(|config: &StoreConfig| -> Result<MemoryStore, StoreError> {
            Err(StoreError::Connection {
                region: config.region.to_string(),
                reason: "server unreachable".to_string(),
            })
        });
        assert!(matches!(result, Err(BenchError::Connection { .. })));
    }

    /// Store double counting puts to make the warm-up pass observable.
    struct CountingStore {
        entries: HashMap<String, StoreValue>,
        puts: usize,
    }

    impl StoreClient for CountingStore {
        fn put(&mut self, key: &str, value: &StoreValue) -> Result<(), StoreError> {
            self.puts += 1;
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
            self.entries.clear();
            Ok(())
        }

        fn execute_query(&mut self, _query: &str) -> Result<Vec<StoreValue>, StoreError> {
            Ok(Vec::new())
        }

        fn close(self) {}
    }

    #[test]
    fn test_warm_up_pass_runs_before_measurement() {
        let config = test_config(vec![spec("String put", OperationKind::PutString, 10)]);
        let orchestrator = Orchestrator::new(config);

        // Observing through the run isn't possible once the client is moved,
        // so count with a shared cell.
        use std::cell::Cell;
        use std::rc::Rc;

        struct SharedCountStore {
            inner: CountingStore,
            counter: Rc<Cell<usize>>,
        }

        impl StoreClient for SharedCountStore {
            fn put(&mut self, key: &str, value: &StoreValue) -> Result<(), StoreError> {
                self.inner.put(key, value)?;
                self.counter.set(self.counter.get() + 1);
                Ok(())
            }
            fn get(&mut self, key: &str) -> Result<StoreValue, StoreError> {
                self.inner.get(key)
            }
            fn clear(&mut self) -> Result<(), StoreError> {
                self.inner.clear()
            }
            fn execute_query(&mut self, query: &str) -> Result<Vec<StoreValue>, StoreError> {
                self.inner.execute_query(query)
            }
            fn close(self) {}
        }

        let counter = Rc::new(Cell::new(0));
        let counter_clone = Rc::clone(&counter);

        orchestrator
            .run(move |_| {
                Ok(SharedCountStore {
                    inner: CountingStore {
                        entries: HashMap::new(),
                        puts: 0,
                    },
                    counter: counter_clone,
                })
            })
            .unwrap();

        // 1 smoke put + 10 warm-up puts + 10 measured puts
        assert_eq!(counter.get(), 21);
    }

    #[test]
    fn test_complex_scenario_without_fixture_fails_in_generation() {
        let mut config = test_config(vec![ScenarioSpec {
            label: "Complex object put".to_string(),
            operation: OperationKind::PutObject,
            value_kind: ValueKind::ComplexJson,
            dataset_size: 10,
        }]);
        config.fixture = None;

        let orchestrator = Orchestrator::new(config);
        let result = orchestrator.run(MemoryStore::connect);
        assert!(matches!(result, Err(BenchError::Configuration(_))));
    }
}
