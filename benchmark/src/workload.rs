// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Synthetic workload generation.
//!
//! Produces the keys and payloads a scenario is measured over. Generation
//! always happens before timing begins, so its cost never lands inside a
//! latency sample. Randomness is implicitly seeded; runs are not
//! bit-reproducible and do not need to be.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ScenarioSpec, WorkloadConfig};

/// Payload shape of a scenario's values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// Random alphanumeric string.
    #[default]
    RawString,
    /// Small JSON document wrapping one random string field.
    SimpleJson,
    /// Large JSON document loaded from the fixture file, reused verbatim
    /// across all keys.
    ComplexJson,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RawString => write!(f, "raw-string"),
            Self::SimpleJson => write!(f, "simple-json"),
            Self::ComplexJson => write!(f, "complex-json"),
        }
    }
}

/// A value as generated, before any store-representation conversion.
///
/// `Json` holds source text: parsing it into the store's structured
/// representation is left to the operation runner so the conversion cost can
/// be attributed to the correct side of the timed window.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(String),
}

/// Random alphanumeric string of the given length.
pub fn random_alphanumeric(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generate `count` random keys of `key_length` characters each.
///
/// Uniqueness is not enforced; a colliding key simply overwrites the prior
/// entry in the store.
pub fn generate_keys(count: usize, key_length: usize) -> Vec<String> {
    (0..count)
        .map(|_| random_alphanumeric(key_length))
        .collect()
}

/// Generate one payload of the requested kind.
pub fn generate_payload(
    kind: ValueKind,
    config: &WorkloadConfig,
    fixture: Option<&str>,
) -> Result<Payload, ConfigError> {
    match kind {
        ValueKind::RawString => Ok(Payload::Text(random_alphanumeric(config.value_size))),
        ValueKind::SimpleJson => {
            let doc = serde_json::json!({ "foo": random_alphanumeric(config.value_size) });
            Ok(Payload::Json(doc.to_string()))
        }
        ValueKind::ComplexJson => match fixture {
            Some(text) => Ok(Payload::Json(text.to_string())),
            None => Err(ConfigError::FixtureRequired {
                value_kind: kind.to_string(),
            }),
        },
    }
}

/// The ordered key set of one scenario, every key mapping to the scenario's
/// payload.
///
/// The original harness generates one payload per scenario and reuses it
/// across all keys; iteration order is insertion order and is shared by the
/// warm-up and measured passes.
#[derive(Debug, Clone)]
pub struct Dataset {
    keys: Vec<String>,
    payload: Payload,
}

impl Dataset {
    /// Generate the dataset for a scenario.
    pub fn generate(
        spec: &ScenarioSpec,
        config: &WorkloadConfig,
        fixture: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let keys = generate_keys(spec.dataset_size, config.key_length);
        let payload = generate_payload(spec.value_kind, config, fixture)?;

        tracing::debug!(
            scenario = %spec.label,
            keys = keys.len(),
            value_kind = %spec.value_kind,
            "generated dataset"
        );

        Ok(Self { keys, payload })
    }

    /// Iterate (key, payload) pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Payload)> {
        self.keys.iter().map(move |k| (k.as_str(), &self.payload))
    }

    /// The shared scenario payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the dataset holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
