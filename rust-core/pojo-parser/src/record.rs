// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Parsed tag-line records.

use std::fmt;

use pojo_schema::eq_ignore_case;
use serde::Serialize;

/// The logical field the cursor sits in, with the raw text typed so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CursorLocation {
    /// Still typing the database name.
    Database { partial: String },
    /// Typing the value after `/`.
    Type { partial: String },
    /// Typing a positional parameter.
    Parameter { name: String, partial: String },
}

impl CursorLocation {
    /// Raw text typed in the current field.
    pub fn partial(&self) -> &str {
        match self {
            CursorLocation::Database { partial }
            | CursorLocation::Type { partial }
            | CursorLocation::Parameter { partial, .. } => partial,
        }
    }
}

/// A parameter value: one value, or several split on the field separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multi(Vec<String>),
}

impl FieldValue {
    /// Every value, in order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(value) => vec![value.as_str()],
            FieldValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// True when nothing non-empty was entered.
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|value| value.is_empty())
    }
}

/// A named parameter of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub value: FieldValue,
}

/// One parsed tag line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedRecord {
    /// Canonical database name, or the daily-entry marker.
    pub database: String,
    /// Type value: canonical when matched, otherwise normalized as typed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_value: Option<String>,
    /// Parameters in schema order; empty segments are absent.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Parameter>,
    /// Free-text `Description` entries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    /// Where the cursor is, for suggestions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<CursorLocation>,
    /// Schema-less daily entry.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub daily_entry: bool,
}

impl ParsedRecord {
    pub(crate) fn new(database: &str) -> Self {
        Self {
            database: database.to_string(),
            ..Self::default()
        }
    }

    /// Value of a parameter, matched case-insensitively.
    pub fn param(&self, name: &str) -> Option<&FieldValue> {
        self.params
            .iter()
            .find(|param| eq_ignore_case(&param.name, name))
            .map(|param| &param.value)
    }

    /// All values entered for `field`, whether it is the type field, the
    /// description or a parameter.
    pub fn values_of(&self, field: &str, type_field: &str) -> Vec<&str> {
        if eq_ignore_case(field, type_field) {
            return self.type_value.as_deref().into_iter().collect();
        }
        if let Some(value) = self.param(field) {
            return value.values();
        }
        if eq_ignore_case(field, pojo_schema::DESCRIPTION_FIELD) {
            return self.description.iter().map(String::as_str).collect();
        }
        Vec::new()
    }
}

/// Why a value was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// The type is not in the fixed type list.
    UnknownType,
    /// A parameter value is not in its fixed list.
    ValueNotAllowed,
}

/// A soft validation problem. The record keeps the value as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub kind: WarningKind,
    pub database: String,
    pub field: String,
    pub value: String,
    pub allowed: Vec<String>,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::UnknownType => "type",
            WarningKind::ValueNotAllowed => "value",
        };
        write!(
            f,
            "{}: '{}' is not an allowed {} for {} (expected one of: {})",
            self.database,
            self.value,
            what,
            self.field,
            self.allowed.join(", ")
        )
    }
}

/// A record plus the soft problems found while building it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub record: ParsedRecord,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
    /// True when nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
