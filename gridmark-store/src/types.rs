// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Gridmark contributors

//! Newtype wrappers for validated store inputs.
//!
//! Invariants are checked at construction time so that every `RegionName`
//! in circulation is usable as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Validated region (collection/namespace) name.
/// Must be non-empty, alphanumeric with hyphens/underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionName(String);

impl RegionName {
    /// Create a new RegionName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();

        if name.is_empty() {
            return Err(StoreError::Connection {
                region: name,
                reason: "region name cannot be empty".to_string(),
            });
        }

        if name.len() > 64 {
            return Err(StoreError::Connection {
                region: name.clone(),
                reason: format!("region name too long: {} chars (max 64)", name.len()),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StoreError::Connection {
                region: name,
                reason: "region name must contain only alphanumeric characters, hyphens, and underscores".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RegionName {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegionName> for String {
    fn from(name: RegionName) -> Self {
        name.0
    }
}
