// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// History store.
//
// Maps database -> field key -> ordered set of values. Database names and
// keys keep the casing they were first written with and are matched
// case-insensitively. Buckets keep insertion order and never hold the same
// value twice.
//
// Mutation happens in memory; persistence is explicit (`save`, `load`,
// `delete_history`) and takes `&mut self`, so two persistence operations on
// one store can never overlap.

use std::collections::BTreeMap;

use pojo_parser::ParsedRecord;
use pojo_schema::{eq_ignore_case, normalize, DatabaseSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::backend::HistoryBackend;
use crate::error::HistoryError;

/// The persisted shape: database -> key -> values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryDocument(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl HistoryDocument {
    /// Values for a bucket, matched case-insensitively.
    pub fn bucket(&self, database: &str, key: &str) -> Option<&[String]> {
        find_ci(&self.0, database)
            .and_then(|(_, keys)| find_ci(keys, key))
            .map(|(_, values)| values.as_slice())
    }

    fn bucket_mut(&mut self, database: &str, key: &str) -> &mut Vec<String> {
        let db_key = find_ci(&self.0, database)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| database.to_string());
        let keys = self.0.entry(db_key).or_default();
        let bucket_key = find_ci(keys, key)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| key.to_string());
        keys.entry(bucket_key).or_default()
    }

    fn contains(&self, database: &str, key: &str, value: &str) -> bool {
        self.bucket(database, key)
            .is_some_and(|values| values.iter().any(|v| eq_ignore_case(v, value)))
    }

    /// Database names in the document.
    pub fn databases(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Bucket keys of one database.
    pub fn keys(&self, database: &str) -> Vec<&str> {
        find_ci(&self.0, database)
            .map(|(_, keys)| keys.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Total number of stored values.
    pub fn value_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|keys| keys.values())
            .map(Vec::len)
            .sum()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.value_count() == 0
    }

    /// Drop repeated values inside each bucket, keeping the first occurrence.
    /// Values that differ only in case count as repeats.
    fn dedup(&mut self) -> usize {
        let mut removed = 0;
        for values in self.0.values_mut().flat_map(|keys| keys.values_mut()) {
            let before = values.len();
            let mut seen: Vec<String> = Vec::with_capacity(before);
            values.retain(|value| {
                let folded = value.to_lowercase();
                if seen.contains(&folded) {
                    false
                } else {
                    seen.push(folded);
                    true
                }
            });
            removed += before - values.len();
        }
        removed
    }
}

impl From<BTreeMap<String, BTreeMap<String, Vec<String>>>> for HistoryDocument {
    fn from(map: BTreeMap<String, BTreeMap<String, Vec<String>>>) -> Self {
        let mut document = Self(map);
        document.dedup();
        document
    }
}

fn find_ci<'m, V>(map: &'m BTreeMap<String, V>, name: &str) -> Option<(&'m String, &'m V)> {
    map.get_key_value(name)
        .or_else(|| map.iter().find(|(key, _)| eq_ignore_case(key, name)))
}

/// One value a record adds to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub database: String,
    pub key: String,
    pub value: String,
}

/// The values a record adds to history, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryDelta {
    entries: Vec<HistoryEntry>,
}

impl HistoryDelta {
    /// True when at least one bucket grows.
    pub fn changed(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Fold another delta in, skipping entries already present.
    pub fn merge(&mut self, other: HistoryDelta) {
        for entry in other.entries {
            if !self.entries.contains(&entry) {
                self.entries.push(entry);
            }
        }
    }
}

/// Per-field history backed by a [`HistoryBackend`].
pub struct HistoryStore<B: HistoryBackend> {
    backend: B,
    document: HistoryDocument,
    dirty: bool,
}

impl<B: HistoryBackend> HistoryStore<B> {
    /// An empty store; call [`load`](Self::load) to read persisted history.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            document: HistoryDocument::default(),
            dirty: false,
        }
    }

    /// Create a store and load whatever the backend holds.
    pub async fn open(backend: B) -> Result<Self, HistoryError> {
        let mut store = Self::new(backend);
        store.load().await?;
        Ok(store)
    }

    /// Replace the in-memory history with the persisted one.
    ///
    /// Nothing persisted yet gives an empty history. A blob that does not
    /// decode is an error and leaves the in-memory history untouched.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn load(&mut self) -> Result<(), HistoryError> {
        let Some(bytes) = self.backend.read().await? else {
            info!("no persisted history, starting empty");
            self.document = HistoryDocument::default();
            self.dirty = false;
            return Ok(());
        };

        let mut document: HistoryDocument = serde_json::from_slice(&bytes)
            .map_err(|err| HistoryError::Corrupted(err.to_string()))?;
        let removed = document.dedup();
        if removed > 0 {
            debug!(removed, "dropped repeated history values");
        }

        info!(values = document.value_count(), "history loaded");
        self.document = document;
        self.dirty = removed > 0;
        Ok(())
    }

    /// Persist the whole history.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn save(&mut self) -> Result<(), HistoryError> {
        let bytes = serde_json::to_vec_pretty(&self.document)
            .map_err(|err| HistoryError::SerializationError(err.to_string()))?;
        self.backend.write(&bytes).await?;
        self.dirty = false;
        debug!(values = self.document.value_count(), "history saved");
        Ok(())
    }

    /// Forget everything and persist the empty history immediately.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn delete_history(&mut self) -> Result<(), HistoryError> {
        self.document = HistoryDocument::default();
        self.dirty = true;
        self.save().await?;
        info!("history deleted");
        Ok(())
    }

    /// Values recorded for a bucket, oldest first.
    pub fn values(&self, database: &str, key: &str) -> &[String] {
        self.document.bucket(database, key).unwrap_or(&[])
    }

    /// What [`add_to_history`](Self::add_to_history) would add, without
    /// changing anything.
    pub fn diff(&self, schema: &DatabaseSchema, record: &ParsedRecord) -> HistoryDelta {
        let mut delta = HistoryDelta::default();
        if record.daily_entry {
            return delta;
        }

        let type_field = schema.type_field();
        let type_value = record.type_value.as_deref();
        for spec in schema.fields().iter().filter(|f| f.policy.records_history()) {
            let Some(key) = spec.history_key(type_field, type_value) else {
                continue;
            };
            for raw in record.values_of(&spec.name, type_field) {
                let value = normalize(raw);
                if value.is_empty() || self.document.contains(schema.name(), &key, &value) {
                    continue;
                }
                let entry = HistoryEntry {
                    database: schema.name().to_string(),
                    key: key.clone(),
                    value,
                };
                if !delta.entries.contains(&entry) {
                    delta.entries.push(entry);
                }
            }
        }
        delta
    }

    /// Insert the entries of `delta`. Returns whether any bucket grew.
    pub fn apply(&mut self, delta: &HistoryDelta) -> bool {
        let mut grew = false;
        for entry in &delta.entries {
            let bucket = self.document.bucket_mut(&entry.database, &entry.key);
            if !bucket.iter().any(|v| eq_ignore_case(v, &entry.value)) {
                bucket.push(entry.value.clone());
                grew = true;
            }
        }
        if grew {
            self.dirty = true;
        }
        grew
    }

    /// Record every history-tracked value of `record`.
    ///
    /// The returned delta lists what was added; `delta.changed()` is false
    /// when every value was already known.
    pub fn add_to_history(&mut self, schema: &DatabaseSchema, record: &ParsedRecord) -> HistoryDelta {
        let delta = self.diff(schema, record);
        self.apply(&delta);
        if delta.changed() {
            debug!(database = schema.name(), added = delta.len(), "history updated");
        }
        delta
    }

    /// Remove one value from a bucket. Returns whether it was present.
    pub fn remove_value(&mut self, database: &str, key: &str, value: &str) -> bool {
        let Some(values) = self.document.bucket(database, key) else {
            return false;
        };
        let Some(position) = values.iter().position(|v| eq_ignore_case(v, value)) else {
            return false;
        };
        self.document.bucket_mut(database, key).remove(position);
        self.dirty = true;
        true
    }

    /// The whole in-memory history.
    pub fn document(&self) -> &HistoryDocument {
        &self.document
    }

    /// True when the in-memory history differs from what was last persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The persistence backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
