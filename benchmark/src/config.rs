// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! YAML benchmark configuration with strict validation.
//!
//! A run is described by a store section, workload parameters, the predicate
//! query material, and an ordered scenario list. The query text and
//! needle/haystack documents are configuration data, not logic. Any invalid
//! field fails the run before a single operation is timed.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use gridmark_store::{LogLevel, RegionName, StoreConfig};

use crate::runner::OperationKind;
use crate::workload::ValueKind;

/// Configuration errors. All fatal, all raised before timing begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration parse error: {message}")]
    Parse { message: String },

    #[error("invalid field value: {field} = {value} - {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("no scenarios configured")]
    NoScenarios,

    #[error("duplicate scenario label: {label}")]
    DuplicateLabel { label: String },

    #[error("fixture file not found: {path}")]
    FixtureNotFound { path: PathBuf },

    #[error("fixture file {path} is not valid JSON: {reason}")]
    FixtureInvalid { path: PathBuf, reason: String },

    #[error("a {value_kind} payload requires a fixture file, but none is configured")]
    FixtureRequired { value_kind: String },
}

/// One configured benchmark scenario.
#[derive(Debug, Clone)]
pub struct ScenarioSpec {
    /// Label used in reports and error context.
    pub label: String,
    /// Operation being measured.
    pub operation: OperationKind,
    /// Payload shape of the scenario's values.
    pub value_kind: ValueKind,
    /// Number of dataset entries (for query scenarios: the document count
    /// the collection is staged with).
    pub dataset_size: usize,
}

/// Workload generation parameters shared by all scenarios.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Length of generated keys.
    pub key_length: usize,
    /// Length of generated string payloads.
    pub value_size: usize,
}

/// Predicate query material for query scenarios.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Query text, treated as opaque by the harness.
    pub text: String,
    /// The one document the query is expected to match.
    pub needle: serde_json::Value,
    /// The document staged N-1 times that the query must reject.
    pub haystack: serde_json::Value,
    /// Timed executions per query scenario.
    pub repetitions: usize,
}

/// Complete validated benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub store: StoreConfig,
    pub workload: WorkloadConfig,
    pub query: QueryConfig,
    pub scenarios: Vec<ScenarioSpec>,
    /// Complex-JSON fixture text, loaded once. Present whenever a scenario
    /// needs it.
    pub fixture: Option<String>,
}

// ---------------------------------------------------------------------------
// Raw (pre-validation) representation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStoreSection {
    #[serde(default = "default_region")]
    region: String,
    #[serde(default)]
    log_level: LogLevel,
}

fn default_region() -> String {
    "benchmarkRegion".to_string()
}

impl Default for RawStoreSection {
    fn default() -> Self {
        Self {
            region: default_region(),
            log_level: LogLevel::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawWorkloadSection {
    #[serde(default = "default_key_length")]
    key_length: usize,
    #[serde(default = "default_value_size")]
    value_size: usize,
    #[serde(default)]
    fixture_path: Option<PathBuf>,
}

fn default_key_length() -> usize {
    8
}

fn default_value_size() -> usize {
    15 * 1024
}

impl Default for RawWorkloadSection {
    fn default() -> Self {
        Self {
            key_length: default_key_length(),
            value_size: default_value_size(),
            fixture_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawQuerySection {
    #[serde(default = "default_query_text")]
    text: String,
    #[serde(default = "default_needle")]
    needle: serde_json::Value,
    #[serde(default = "default_haystack")]
    haystack: serde_json::Value,
    #[serde(default = "default_repetitions")]
    repetitions: usize,
}

fn default_query_text() -> String {
    "SELECT person.name \
     FROM (SELECT * FROM /benchmarkRegion jr WHERE is_defined(jr.addresses)) person, \
          (SELECT * FROM person.addresses) a \
     WHERE is_defined(a.phoneNumbers) \
       AND '212-987-5440' IN (SELECT n.number FROM a.phoneNumbers n)"
        .to_string()
}

fn default_needle() -> serde_json::Value {
    serde_json::json!({
        "name": "Jane Doe",
        "addresses": [
            { "phoneNumbers": [
                { "number": "212-987-5440" },
                { "number": "717-734-2230" }
            ]},
            { "city": "New York" }
        ]
    })
}

fn default_haystack() -> serde_json::Value {
    serde_json::json!({
        "name": "Jane Doe",
        "addresses": [
            { "phoneNumbers": [
                { "number": "555-555-1212" },
                { "number": "415-77-PIVOT" }
            ]},
            { "city": "New York" }
        ]
    })
}

fn default_repetitions() -> usize {
    10
}

impl Default for RawQuerySection {
    fn default() -> Self {
        Self {
            text: default_query_text(),
            needle: default_needle(),
            haystack: default_haystack(),
            repetitions: default_repetitions(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawScenario {
    label: String,
    operation: OperationKind,
    #[serde(default)]
    value_kind: ValueKind,
    dataset_size: usize,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    store: RawStoreSection,
    #[serde(default)]
    workload: RawWorkloadSection,
    #[serde(default)]
    query: RawQuerySection,
    scenarios: Vec<RawScenario>,
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl BenchConfig {
    /// Load and validate a configuration file. Relative fixture paths are
    /// resolved against the config file's directory.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            context: "reading configuration file",
            source: e,
        })?;

        Self::load_str(&content, path.parent())
    }

    /// Load and validate configuration from YAML text.
    pub fn load_str(content: &str, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            message: format!("YAML parse error: {}", e),
        })?;

        Self::validate(raw, base_dir)
    }

    /// The built-in suite, mirroring the historical harness variants:
    /// string put, simple/complex object put, complex object get, and a
    /// predicate query over a staged document collection.
    pub fn default_suite() -> Result<Self, ConfigError> {
        let raw = RawConfig {
            store: RawStoreSection::default(),
            workload: RawWorkloadSection {
                fixture_path: Some(default_fixture_path()),
                ..RawWorkloadSection::default()
            },
            query: RawQuerySection::default(),
            scenarios: vec![
                RawScenario {
                    label: "String put".to_string(),
                    operation: OperationKind::PutString,
                    value_kind: ValueKind::RawString,
                    dataset_size: 10_000,
                },
                RawScenario {
                    label: "Simple object put".to_string(),
                    operation: OperationKind::PutObject,
                    value_kind: ValueKind::SimpleJson,
                    dataset_size: 5_000,
                },
                RawScenario {
                    label: "Complex object put".to_string(),
                    operation: OperationKind::PutObject,
                    value_kind: ValueKind::ComplexJson,
                    dataset_size: 2_000,
                },
                RawScenario {
                    label: "Complex object get".to_string(),
                    operation: OperationKind::Get,
                    value_kind: ValueKind::ComplexJson,
                    dataset_size: 2_000,
                },
                RawScenario {
                    label: "OQL query (5000 entries)".to_string(),
                    operation: OperationKind::Query,
                    value_kind: ValueKind::default(),
                    dataset_size: 5_000,
                },
            ],
        };

        Self::validate(raw, None)
    }

    fn validate(raw: RawConfig, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let region = RegionName::new(raw.store.region.clone()).map_err(|e| {
            ConfigError::InvalidField {
                field: "store.region",
                value: raw.store.region,
                reason: e.to_string(),
            }
        })?;
        let store = StoreConfig {
            region,
            log_level: raw.store.log_level,
        };

        if raw.workload.key_length == 0 {
            return Err(ConfigError::InvalidField {
                field: "workload.key_length",
                value: "0".to_string(),
                reason: "key length must be at least 1".to_string(),
            });
        }

        if raw.workload.value_size == 0 {
            return Err(ConfigError::InvalidField {
                field: "workload.value_size",
                value: "0".to_string(),
                reason: "value size must be at least 1".to_string(),
            });
        }

        if raw.query.repetitions == 0 {
            return Err(ConfigError::InvalidField {
                field: "query.repetitions",
                value: "0".to_string(),
                reason: "query repetitions must be at least 1".to_string(),
            });
        }

        if !raw.query.needle.is_object() || !raw.query.haystack.is_object() {
            return Err(ConfigError::InvalidField {
                field: "query.needle",
                value: "(document)".to_string(),
                reason: "needle and haystack must be JSON objects".to_string(),
            });
        }

        if raw.scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }

        let mut scenarios = Vec::with_capacity(raw.scenarios.len());
        let mut seen_labels = std::collections::HashSet::new();

        for raw_scenario in raw.scenarios {
            let scenario = Self::validate_scenario(raw_scenario)?;

            if !seen_labels.insert(scenario.label.clone()) {
                return Err(ConfigError::DuplicateLabel {
                    label: scenario.label,
                });
            }

            scenarios.push(scenario);
        }

        let fixture = Self::load_fixture(&raw.workload, &scenarios, base_dir)?;

        Ok(Self {
            store,
            workload: WorkloadConfig {
                key_length: raw.workload.key_length,
                value_size: raw.workload.value_size,
            },
            query: QueryConfig {
                text: raw.query.text,
                needle: raw.query.needle,
                haystack: raw.query.haystack,
                repetitions: raw.query.repetitions,
            },
            scenarios,
            fixture,
        })
    }

    fn validate_scenario(raw: RawScenario) -> Result<ScenarioSpec, ConfigError> {
        if raw.label.is_empty() {
            return Err(ConfigError::InvalidField {
                field: "scenarios.label",
                value: raw.label,
                reason: "scenario label cannot be empty".to_string(),
            });
        }

        if raw.dataset_size == 0 {
            return Err(ConfigError::InvalidField {
                field: "scenarios.dataset_size",
                value: "0".to_string(),
                reason: format!("scenario '{}' must have at least one entry", raw.label),
            });
        }

        let compatible = match raw.operation {
            OperationKind::PutString => raw.value_kind == ValueKind::RawString,
            OperationKind::PutObject => raw.value_kind != ValueKind::RawString,
            // Gets work over any payload; queries ignore the value kind
            // entirely (documents come from the query section).
            OperationKind::Get | OperationKind::Query => true,
        };
        if !compatible {
            return Err(ConfigError::InvalidField {
                field: "scenarios.value_kind",
                value: raw.value_kind.to_string(),
                reason: format!(
                    "scenario '{}': {} cannot measure {} payloads",
                    raw.label, raw.operation, raw.value_kind
                ),
            });
        }

        Ok(ScenarioSpec {
            label: raw.label,
            operation: raw.operation,
            value_kind: raw.value_kind,
            dataset_size: raw.dataset_size,
        })
    }

    /// Read and sanity-check the complex-JSON fixture if any scenario uses
    /// it. Failure is fatal: no partial results.
    fn load_fixture(
        workload: &RawWorkloadSection,
        scenarios: &[ScenarioSpec],
        base_dir: Option<&Path>,
    ) -> Result<Option<String>, ConfigError> {
        let needs_fixture = scenarios.iter().any(|s| {
            s.value_kind == ValueKind::ComplexJson && s.operation != OperationKind::Query
        });
        if !needs_fixture {
            return Ok(None);
        }

        let path = workload
            .fixture_path
            .clone()
            .unwrap_or_else(default_fixture_path);
        let path = match base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        };

        if !path.exists() {
            return Err(ConfigError::FixtureNotFound { path });
        }

        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            context: "reading fixture file",
            source: e,
        })?;

        if let Err(e) = serde_json::from_str::<serde_json::Value>(&text) {
            return Err(ConfigError::FixtureInvalid {
                path,
                reason: e.to_string(),
            });
        }

        Ok(Some(text))
    }
}

fn default_fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/complex_document.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
store:
  region: exampleRegion
  log_level: info

workload:
  key_length: 8
  value_size: 1024

scenarios:
  - label: String put
    operation: put-string
    dataset_size: 2000
  - label: Simple object put
    operation: put-object
    value_kind: simple-json
    dataset_size: 2000
"#;

    #[test]
    fn test_valid_config() {
        let config = BenchConfig::load_str(VALID_CONFIG, None).unwrap();
        assert_eq!(config.store.region.as_str(), "exampleRegion");
        assert_eq!(config.workload.value_size, 1024);
        assert_eq!(config.scenarios.len(), 2);
        assert_eq!(config.scenarios[0].operation, OperationKind::PutString);
        assert_eq!(config.scenarios[0].value_kind, ValueKind::RawString);
        assert!(config.fixture.is_none());
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
scenarios:
  - label: only
    operation: put-string
    dataset_size: 100
"#;
        let config = BenchConfig::load_str(yaml, None).unwrap();
        assert_eq!(config.workload.key_length, 8);
        assert_eq!(config.workload.value_size, 15 * 1024);
        assert_eq!(config.query.repetitions, 10);
        assert_eq!(config.store.region.as_str(), "benchmarkRegion");
        assert!(config.query.text.contains("212-987-5440"));
    }

    #[test]
    fn test_no_scenarios_rejected() {
        let result = BenchConfig::load_str("scenarios: []", None);
        assert!(matches!(result, Err(ConfigError::NoScenarios)));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let yaml = r#"
scenarios:
  - label: same
    operation: put-string
    dataset_size: 10
  - label: same
    operation: get
    dataset_size: 10
"#;
        let result = BenchConfig::load_str(yaml, None);
        assert!(matches!(result, Err(ConfigError::DuplicateLabel { .. })));
    }

    #[test]
    fn test_zero_dataset_size_rejected() {
        let yaml = r#"
scenarios:
  - label: empty
    operation: put-string
    dataset_size: 0
"#;
        let result = BenchConfig::load_str(yaml, None);
        assert!(matches!(result, Err(ConfigError::InvalidField { .. })));
    }

    #[test]
    fn test_incompatible_operation_and_value_kind() {
        let yaml = r#"
scenarios:
  - label: mismatch
    operation: put-string
    value_kind: simple-json
    dataset_size: 10
"#;
        let result = BenchConfig::load_str(yaml, None);
        assert!(matches!(result, Err(ConfigError::InvalidField { .. })));
    }

    #[test]
    fn test_missing_fixture_is_fatal() {
        let yaml = r#"
workload:
  fixture_path: /nonexistent/fixture.json
scenarios:
  - label: complex
    operation: put-object
    value_kind: complex-json
    dataset_size: 10
"#;
        let result = BenchConfig::load_str(yaml, None);
        assert!(matches!(result, Err(ConfigError::FixtureNotFound { .. })));
    }

    #[test]
    fn test_invalid_fixture_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("broken.json");
        std::fs::write(&fixture, "{ not json").unwrap();

        let yaml = format!(
            r#"
workload:
  fixture_path: {}
scenarios:
  - label: complex
    operation: put-object
    value_kind: complex-json
    dataset_size: 10
"#,
            fixture.display()
        );
        let result = BenchConfig::load_str(&yaml, None);
        assert!(matches!(result, Err(ConfigError::FixtureInvalid { .. })));
    }

    #[test]
    fn test_relative_fixture_resolved_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.json"), r#"{"ok": true}"#).unwrap();

        let yaml = r#"
workload:
  fixture_path: doc.json
scenarios:
  - label: complex
    operation: put-object
    value_kind: complex-json
    dataset_size: 10
"#;
        let config = BenchConfig::load_str(yaml, Some(dir.path())).unwrap();
        assert_eq!(config.fixture.as_deref(), Some(r#"{"ok": true}"#));
    }

    #[test]
    fn test_default_suite_shape() {
        let config = BenchConfig::default_suite().unwrap();
        assert_eq!(config.scenarios.len(), 5);
        assert!(config.fixture.is_some());
        // Scenario order is the report order
        assert_eq!(config.scenarios[0].label, "String put");
        assert_eq!(config.scenarios[4].operation, OperationKind::Query);
    }

    #[test]
    fn test_invalid_region_rejected() {
        let yaml = r#"
store:
  region: "bad region name"
scenarios:
  - label: s
    operation: put-string
    dataset_size: 10
"#;
        let result = BenchConfig::load_str(yaml, None);
        assert!(result.is_err());
    }
}
