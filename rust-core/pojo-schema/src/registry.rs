// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Schema registry.
//!
//! Built once from [`PojoSettings`] and queried on every keystroke. Lookups
//! are case-insensitive; a miss is logged and reported as `None`, never as an
//! error, because callers treat it as "nothing to do for this line".

use std::collections::HashMap;

use tracing::debug;

use crate::config::PojoSettings;
use crate::error::SchemaError;
use crate::schema::DatabaseSchema;

/// Immutable set of database definitions plus the line-level settings.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    databases: Vec<DatabaseSchema>,
    index: HashMap<String, usize>,
    split_separator: String,
    daily_entries: Vec<String>,
}

impl SchemaRegistry {
    /// Validate a settings document into a registry.
    pub fn from_settings(settings: &PojoSettings) -> Result<Self, SchemaError> {
        if settings.split_separator.is_empty() {
            return Err(SchemaError::EmptySeparator);
        }

        let mut databases = Vec::with_capacity(settings.databases.len());
        let mut index = HashMap::with_capacity(settings.databases.len());
        for (position, config) in settings.databases.iter().enumerate() {
            let schema = DatabaseSchema::from_config(position, config)?;
            let key = schema.name().to_lowercase();
            if index.contains_key(&key) {
                return Err(SchemaError::DuplicateDatabase(schema.name().to_string()));
            }
            index.insert(key, databases.len());
            databases.push(schema);
        }

        debug!(
            databases = databases.len(),
            daily_entries = settings.daily_entries.len(),
            "schema registry built"
        );

        Ok(Self {
            databases,
            index,
            split_separator: settings.split_separator.clone(),
            daily_entries: settings
                .daily_entries
                .iter()
                .map(|entry| entry.trim().to_string())
                .filter(|entry| !entry.is_empty())
                .collect(),
        })
    }

    /// Parse and validate a JSON settings document in one step.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Self::from_settings(&PojoSettings::from_json_str(text)?)
    }

    /// Database names in settings order.
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.iter().map(DatabaseSchema::name).collect()
    }

    /// Look up a database by name, ignoring case.
    pub fn database(&self, name: &str) -> Option<&DatabaseSchema> {
        let found = self
            .index
            .get(&name.trim().to_lowercase())
            .map(|&position| &self.databases[position]);
        if found.is_none() {
            debug!(database = name, "unknown database");
        }
        found
    }

    /// All definitions in settings order.
    pub fn databases(&self) -> &[DatabaseSchema] {
        &self.databases
    }

    /// Separator between parameter segments.
    pub fn split_separator(&self) -> &str {
        &self.split_separator
    }

    /// Configured daily-entry markers.
    pub fn daily_entries(&self) -> &[String] {
        &self.daily_entries
    }

    /// The daily-entry marker equal to `line`, if any.
    pub fn daily_entry(&self, line: &str) -> Option<&str> {
        self.daily_entries
            .iter()
            .find(|entry| entry.as_str() == line)
            .map(String::as_str)
    }

    /// Number of databases.
    pub fn len(&self) -> usize {
        self.databases.len()
    }

    /// True when no database is defined.
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self {
            databases: Vec::new(),
            index: HashMap::new(),
            split_separator: crate::config::DEFAULT_SPLIT_SEPARATOR.to_string(),
            daily_entries: Vec::new(),
        }
    }
}
