// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Validated database definitions.
//!
//! A [`DatabaseSchema`] is the typed form of a [`DatabaseConfig`]: every
//! field gets a [`FieldSpec`] whose [`FieldPolicy`] says where its allowed
//! values come from and how its history is keyed.

use std::collections::BTreeMap;

use crate::config::{AllowedKind, DatabaseConfig, FieldConfig};
use crate::error::SchemaError;
use crate::normalize::eq_ignore_case;

/// Key in a `values` map that applies to every type.
pub const ALL_TYPES_KEY: &str = "_ALL";

/// Reserved free-text parameter that accumulates one entry per segment.
pub const DESCRIPTION_FIELD: &str = "Description";

/// Allowed values, either global or scoped to a type value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedValues {
    all: Vec<String>,
    by_type: Vec<(String, Vec<String>)>,
}

impl AllowedValues {
    fn from_config(values: &BTreeMap<String, Vec<String>>) -> Self {
        let mut allowed = Self::default();
        for (key, list) in values {
            if key == ALL_TYPES_KEY {
                allowed.all = list.clone();
            } else {
                allowed.by_type.push((key.clone(), list.clone()));
            }
        }
        allowed
    }

    /// Values that apply to `type_value`.
    ///
    /// A list scoped to the type wins over the global `_ALL` list.
    pub fn for_type(&self, type_value: Option<&str>) -> &[String] {
        type_value
            .and_then(|ty| {
                self.by_type
                    .iter()
                    .find(|(key, _)| eq_ignore_case(key, ty))
            })
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&self.all)
    }

    /// True when no value is declared for any type.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.by_type.iter().all(|(_, list)| list.is_empty())
    }
}

/// Where a field's values come from and how they are remembered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Anything goes, nothing is remembered.
    Free,
    /// Values must come from a closed list.
    Fixed(AllowedValues),
    /// Suggested from a global history bucket, optionally seeded.
    History(AllowedValues),
    /// Suggested from a history bucket kept per type value.
    HistoryByType(AllowedValues),
}

impl FieldPolicy {
    fn from_config(config: &FieldConfig) -> Self {
        let values = AllowedValues::from_config(&config.values);
        match config.allowed {
            Some(AllowedKind::Fixed) => FieldPolicy::Fixed(values),
            Some(AllowedKind::History) => FieldPolicy::History(values),
            Some(AllowedKind::HistoryType) => FieldPolicy::HistoryByType(values),
            None if !values.is_empty() => FieldPolicy::Fixed(values),
            None => FieldPolicy::Free,
        }
    }

    /// Declared values, whatever the policy.
    pub fn values(&self) -> Option<&AllowedValues> {
        match self {
            FieldPolicy::Free => None,
            FieldPolicy::Fixed(values)
            | FieldPolicy::History(values)
            | FieldPolicy::HistoryByType(values) => Some(values),
        }
    }

    /// True for policies that record history.
    pub fn records_history(&self) -> bool {
        matches!(self, FieldPolicy::History(_) | FieldPolicy::HistoryByType(_))
    }
}

/// One field of a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as declared.
    pub name: String,
    /// Value policy.
    pub policy: FieldPolicy,
    /// Separator when the field holds several values.
    pub multi: Option<String>,
}

impl FieldSpec {
    fn free(name: &str) -> Self {
        Self {
            name: name.to_string(),
            policy: FieldPolicy::Free,
            multi: None,
        }
    }

    /// Values offered or enforced for the given type.
    pub fn allowed_values(&self, type_value: Option<&str>) -> &[String] {
        self.policy
            .values()
            .map(|values| values.for_type(type_value))
            .unwrap_or(&[])
    }

    /// True when values outside the allowed list are flagged.
    pub fn is_fixed(&self) -> bool {
        matches!(self.policy, FieldPolicy::Fixed(_))
    }

    /// The canonical spelling of `value` in the fixed list for `type_value`.
    ///
    /// `None` for non-fixed fields, an empty list, or no case-insensitive match.
    pub fn canonical<'a>(&'a self, value: &str, type_value: Option<&str>) -> Option<&'a str> {
        if !self.is_fixed() {
            return None;
        }
        let value = value.trim();
        self.allowed_values(type_value)
            .iter()
            .find(|allowed| eq_ignore_case(allowed, value))
            .map(String::as_str)
    }

    /// History bucket key for this field, if it records history.
    ///
    /// Per-type fields use `{type}-{field}`, except the type field itself
    /// which is keyed by its own name. A per-type field without a type value
    /// has no bucket.
    pub fn history_key(&self, type_field: &str, type_value: Option<&str>) -> Option<String> {
        match &self.policy {
            FieldPolicy::History(_) => Some(self.name.clone()),
            FieldPolicy::HistoryByType(_) if eq_ignore_case(&self.name, type_field) => {
                Some(self.name.clone())
            }
            FieldPolicy::HistoryByType(_) => type_value
                .filter(|ty| !ty.is_empty())
                .map(|ty| format!("{ty}-{}", self.name)),
            _ => None,
        }
    }

    /// True for multi-valued fields.
    pub fn is_multi(&self) -> bool {
        self.multi.is_some()
    }
}

/// A validated database definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSchema {
    name: String,
    type_field: String,
    params: Vec<String>,
    fields: Vec<FieldSpec>,
}

impl DatabaseSchema {
    /// Validate one definition.
    pub fn from_config(index: usize, config: &DatabaseConfig) -> Result<Self, SchemaError> {
        let name = config.database.trim();
        if name.is_empty() {
            return Err(SchemaError::EmptyDatabaseName { index });
        }
        if name.contains('/') || name.contains(char::is_whitespace) {
            return Err(SchemaError::InvalidDatabaseName(name.to_string()));
        }
        let type_field = config.type_field.trim();
        if type_field.is_empty() {
            return Err(SchemaError::EmptyTypeField(name.to_string()));
        }

        let mut params: Vec<String> = Vec::with_capacity(config.params.len());
        for param in &config.params {
            let param = param.trim();
            if eq_ignore_case(param, type_field)
                || params.iter().any(|p| eq_ignore_case(p, param))
            {
                return Err(SchemaError::DuplicateParameter {
                    database: name.to_string(),
                    parameter: param.to_string(),
                });
            }
            params.push(param.to_string());
        }

        let declared = std::iter::once(type_field).chain(params.iter().map(String::as_str));
        let mut fields = Vec::with_capacity(params.len() + 1);
        for field_name in declared {
            let config_entry = config
                .fields
                .iter()
                .find(|(key, _)| eq_ignore_case(key.trim(), field_name));
            let spec = match config_entry {
                Some((_, field_config)) => {
                    if field_config.multi.as_deref() == Some("") {
                        return Err(SchemaError::EmptyMultiSeparator {
                            database: name.to_string(),
                            field: field_name.to_string(),
                        });
                    }
                    FieldSpec {
                        name: field_name.to_string(),
                        policy: FieldPolicy::from_config(field_config),
                        multi: field_config.multi.clone(),
                    }
                }
                None => FieldSpec::free(field_name),
            };
            fields.push(spec);
        }

        for key in config.fields.keys() {
            if !fields.iter().any(|f| eq_ignore_case(&f.name, key.trim())) {
                tracing::warn!(database = name, field = %key, "field descriptor has no matching parameter");
            }
        }

        Ok(Self {
            name: name.to_string(),
            type_field: type_field.to_string(),
            params,
            fields,
        })
    }

    /// Database name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the type field.
    pub fn type_field(&self) -> &str {
        &self.type_field
    }

    /// Ordered positional parameters.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Descriptor for the type field.
    pub fn type_spec(&self) -> &FieldSpec {
        // The type field is always the first entry.
        &self.fields[0]
    }

    /// Descriptor for a field, matched case-insensitively.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| eq_ignore_case(&f.name, name))
    }

    /// All field descriptors, type field first.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}
