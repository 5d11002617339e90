// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Settings document.
//!
//! The JSON shape supplied by the host at start-up. Field descriptors mirror
//! what users write in their settings:
//!
//! ```json
//! {
//!   "split_separator": ";",
//!   "daily_entries": ["Daily"],
//!   "databases": [{
//!     "database": "Exercise",
//!     "type": "Type",
//!     "params": ["Duration", "Equipment", "Description"],
//!     "fields": {
//!       "Type": { "allowed": "fixed", "values": { "_ALL": ["Run", "Swim"] } },
//!       "Equipment": { "allowed": "history-type", "multi": "," }
//!     }
//!   }]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Default separator between parameter segments.
pub const DEFAULT_SPLIT_SEPARATOR: &str = ";";

/// Default name of the type field when a definition omits it.
pub const DEFAULT_TYPE_FIELD: &str = "Type";

fn default_split_separator() -> String {
    DEFAULT_SPLIT_SEPARATOR.to_string()
}

fn default_type_field() -> String {
    DEFAULT_TYPE_FIELD.to_string()
}

/// Where a field draws its allowed values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowedKind {
    /// Closed, enumerated list.
    Fixed,
    /// Accumulated history shared by every type.
    History,
    /// Accumulated history kept separately per type value.
    HistoryType,
}

/// Per-field descriptor as written in the settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Value policy. Absent means free text, unless `values` is non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<AllowedKind>,
    /// Allowed values keyed by `_ALL` or by a type value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, Vec<String>>,
    /// Separator for multi-valued fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi: Option<String>,
}

/// One database definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database name, the first token after the tag prefix.
    pub database: String,
    /// Name of the type field (the value after `/`).
    #[serde(default = "default_type_field", alias = "type")]
    pub type_field: String,
    /// Ordered positional parameters.
    #[serde(default)]
    pub params: Vec<String>,
    /// Field descriptors keyed by field name.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldConfig>,
}

/// Top-level settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PojoSettings {
    /// Separator between parameter segments.
    #[serde(default = "default_split_separator")]
    pub split_separator: String,
    /// Literal lines that are schema-less daily entries.
    #[serde(default)]
    pub daily_entries: Vec<String>,
    /// Database definitions in display order.
    #[serde(default)]
    pub databases: Vec<DatabaseConfig>,
}

impl Default for PojoSettings {
    fn default() -> Self {
        Self {
            split_separator: default_split_separator(),
            daily_entries: Vec::new(),
            databases: Vec::new(),
        }
    }
}

impl PojoSettings {
    /// Parse a settings document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a settings document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
