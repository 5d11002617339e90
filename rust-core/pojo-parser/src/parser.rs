// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Tag-line parser.
//!
//! Grammar of a stripped tag line:
//!
//! ```text
//! line   := daily | head [ws params]
//! head   := database ["/" type]
//! params := segment (sep segment)*      ; sep defaults to ';'
//! ```
//!
//! Segments map positionally onto the database's parameters. The last
//! segment is where the cursor is assumed to be, since callers hand in the
//! line truncated at the cursor.

use pojo_schema::{
    eq_ignore_case, normalize, DatabaseSchema, FieldSpec, SchemaRegistry, DESCRIPTION_FIELD,
};
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::record::{
    CursorLocation, FieldValue, Parameter, ParseOutcome, ParseWarning, ParsedRecord, WarningKind,
};

/// Parser bound to a schema registry.
#[derive(Debug, Clone, Copy)]
pub struct LineParser<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> LineParser<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Parse a line whose tag prefix has already been stripped.
    pub fn parse(&self, line: &str) -> Result<ParseOutcome, ParseError> {
        let trimmed = line.trim_end();
        let trailing_space = trimmed.len() < line.len();
        let trimmed = trimmed.trim_start();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        if let Some(entry) = self.registry.daily_entry(trimmed) {
            let mut record = ParsedRecord::new(entry);
            record.daily_entry = true;
            return Ok(ParseOutcome {
                record,
                warnings: Vec::new(),
            });
        }

        let (head, rest) = match trimmed.find(char::is_whitespace) {
            Some(split) => (&trimmed[..split], Some(trimmed[split..].trim_start())),
            None => (trimmed, None),
        };
        let (database, type_raw) = match head.split_once('/') {
            Some((database, type_raw)) => (database, Some(type_raw)),
            None => (head, None),
        };

        let schema = self
            .registry
            .database(database)
            .ok_or_else(|| ParseError::UnknownDatabase(database.to_string()))?;

        let mut state = ParseState {
            schema,
            record: ParsedRecord::new(schema.name()),
            warnings: Vec::new(),
        };

        if let Some(raw) = type_raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            let value = state.check(schema.type_spec(), raw, None, WarningKind::UnknownType);
            state.record.type_value = Some(value);
        }

        match rest {
            None => {
                state.record.location = if !head.contains('/') {
                    Some(CursorLocation::Database {
                        partial: head.to_string(),
                    })
                } else if !trailing_space {
                    Some(CursorLocation::Type {
                        partial: type_raw.unwrap_or_default().to_string(),
                    })
                } else {
                    schema.params().first().map(|name| CursorLocation::Parameter {
                        name: name.clone(),
                        partial: String::new(),
                    })
                };
            }
            Some(rest) => self.parse_params(&mut state, rest)?,
        }

        debug!(
            database = schema.name(),
            params = state.record.params.len(),
            warnings = state.warnings.len(),
            "parsed tag line"
        );

        Ok(ParseOutcome {
            record: state.record,
            warnings: state.warnings,
        })
    }

    fn parse_params(&self, state: &mut ParseState<'_>, rest: &str) -> Result<(), ParseError> {
        let schema = state.schema;
        let segments: Vec<&str> = rest.split(self.registry.split_separator()).collect();
        if segments.len() > schema.params().len() {
            warn!(
                database = schema.name(),
                expected = schema.params().len(),
                found = segments.len(),
                "too many parameters"
            );
            return Err(ParseError::TooManyParameters {
                database: schema.name().to_string(),
                expected: schema.params().len(),
                found: segments.len(),
            });
        }

        let type_value = state.record.type_value.clone();
        for (segment, name) in segments.iter().zip(schema.params()) {
            state.record.location = Some(CursorLocation::Parameter {
                name: name.clone(),
                partial: (*segment).to_string(),
            });

            let text = segment.trim();
            if text.is_empty() {
                continue;
            }
            if eq_ignore_case(name, DESCRIPTION_FIELD) {
                state.record.description.push(text.to_string());
                continue;
            }

            let Some(spec) = schema.field(name) else {
                continue;
            };
            let ty = type_value.as_deref();
            let value = match spec.multi.as_deref() {
                Some(separator) => FieldValue::Multi(
                    text.split(separator)
                        .map(str::trim)
                        .filter(|piece| !piece.is_empty())
                        .map(|piece| state.check(spec, piece, ty, WarningKind::ValueNotAllowed))
                        .collect(),
                ),
                None => FieldValue::Single(state.check(spec, text, ty, WarningKind::ValueNotAllowed)),
            };
            if !value.is_empty() {
                state.record.params.push(Parameter {
                    name: name.clone(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Accumulates the record and warnings for one parse call.
struct ParseState<'s> {
    schema: &'s DatabaseSchema,
    record: ParsedRecord,
    warnings: Vec<ParseWarning>,
}

impl ParseState<'_> {
    /// Canonical value for fixed fields, otherwise the normalized input.
    ///
    /// A value missing from a non-empty fixed list is kept (normalized) and
    /// flagged.
    fn check(
        &mut self,
        spec: &FieldSpec,
        raw: &str,
        type_value: Option<&str>,
        kind: WarningKind,
    ) -> String {
        if !spec.is_fixed() {
            return normalize(raw);
        }
        let allowed = spec.allowed_values(type_value);
        if allowed.is_empty() {
            return normalize(raw);
        }
        if let Some(canonical) = spec.canonical(raw, type_value) {
            return canonical.to_string();
        }

        let value = normalize(raw);
        warn!(
            database = self.schema.name(),
            field = %spec.name,
            value = %value,
            "value is not in the allowed list"
        );
        self.warnings.push(ParseWarning {
            kind,
            database: self.schema.name().to_string(),
            field: spec.name.clone(),
            value: value.clone(),
            allowed: allowed.to_vec(),
        });
        value
    }
}

/// Parse a stripped line against `registry`.
pub fn parse_line(registry: &SchemaRegistry, line: &str) -> Result<ParseOutcome, ParseError> {
    LineParser::new(registry).parse(line)
}

/// The database-name prefix being typed, if the line is still inside it.
///
/// Unlike [`LineParser::parse`] this does not require the prefix to name a
/// known database, so completion works while the name is incomplete.
pub fn database_prefix(line: &str) -> Option<&str> {
    let head = line.trim();
    if head.contains(char::is_whitespace) || head.contains('/') {
        return None;
    }
    Some(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_json_str(
            r#"{
            "daily_entries": ["Daily"],
            "databases": [{
                "database": "Exercise",
                "type": "Type",
                "params": ["Duration", "Description"],
                "fields": {
                    "Type": { "allowed": "fixed", "values": { "_ALL": ["Run", "Swim"] } },
                    "Duration": { "allowed": "history" }
                }
            }]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_daily_entry() {
        let registry = registry();
        let outcome = parse_line(&registry, "Daily  ").unwrap();
        assert!(outcome.record.daily_entry);
        assert_eq!(outcome.record.database, "Daily");
        assert!(outcome.record.location.is_none());
    }

    #[test]
    fn test_database_location() {
        let registry = registry();
        let outcome = parse_line(&registry, "exercise").unwrap();
        assert_eq!(outcome.record.database, "Exercise");
        assert_eq!(
            outcome.record.location,
            Some(CursorLocation::Database {
                partial: "exercise".to_string()
            })
        );
    }

    #[test]
    fn test_type_location() {
        let registry = registry();
        let outcome = parse_line(&registry, "Exercise/ru").unwrap();
        assert_eq!(
            outcome.record.location,
            Some(CursorLocation::Type {
                partial: "ru".to_string()
            })
        );
        // Partial input is still validated, softly.
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_empty_type_location() {
        let registry = registry();
        let outcome = parse_line(&registry, "Exercise/").unwrap();
        assert_eq!(outcome.record.type_value, None);
        assert_eq!(
            outcome.record.location,
            Some(CursorLocation::Type {
                partial: String::new()
            })
        );
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_first_parameter_after_trailing_space() {
        let registry = registry();
        let outcome = parse_line(&registry, "Exercise/Run ").unwrap();
        assert_eq!(
            outcome.record.location,
            Some(CursorLocation::Parameter {
                name: "Duration".to_string(),
                partial: String::new()
            })
        );
    }

    #[test]
    fn test_database_prefix() {
        assert_eq!(database_prefix("Exer"), Some("Exer"));
        assert_eq!(database_prefix(""), Some(""));
        assert_eq!(database_prefix("Exercise/"), None);
        assert_eq!(database_prefix("Exercise 30"), None);
    }
}
