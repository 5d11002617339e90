// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Completion candidates for the field under the cursor.
//!
//! Candidates come from the schema (database names, fixed value lists) and
//! from the history document. Schema values are listed first; history values
//! follow, minus anything already offered. Matching is a case-insensitive
//! prefix test against the text typed in the current field.

use pojo_history::HistoryDocument;
use pojo_parser::{CursorLocation, ParsedRecord};
use pojo_schema::{DatabaseSchema, FieldSpec, SchemaRegistry};
use serde::Serialize;
use tracing::debug;

/// Provider tag attached to every suggestion.
pub const PROVIDER: &str = "pojo";

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    /// A configured database name.
    Database,
    /// A value declared in the schema.
    Fixed,
    /// A value remembered from earlier entries.
    History,
}

impl SuggestionSource {
    /// Marker shown next to the candidate in a completion menu.
    pub fn icon(self) -> &'static str {
        match self {
            SuggestionSource::Database => "#",
            SuggestionSource::Fixed => "*",
            SuggestionSource::History => "~",
        }
    }
}

/// Byte range of the line a suggestion replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplaceSpan {
    pub start: usize,
    pub end: usize,
}

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Text shown in the menu.
    pub display: String,
    /// Text inserted when accepted.
    pub replacement: String,
    /// Span replaced on accept; `None` until placed on a concrete line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_span: Option<ReplaceSpan>,
    pub icon: Option<String>,
    pub source: SuggestionSource,
    pub provider: &'static str,
}

impl Suggestion {
    fn new(value: &str, source: SuggestionSource) -> Self {
        Self {
            display: value.to_string(),
            replacement: value.to_string(),
            replace_span: None,
            icon: Some(source.icon().to_string()),
            source,
            provider: PROVIDER,
        }
    }

    /// Attach the replaced span.
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.replace_span = Some(ReplaceSpan { start, end });
        self
    }
}

/// Suggestion engine over a registry and a history snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Suggester<'a> {
    registry: &'a SchemaRegistry,
    history: &'a HistoryDocument,
}

impl<'a> Suggester<'a> {
    pub fn new(registry: &'a SchemaRegistry, history: &'a HistoryDocument) -> Self {
        Self { registry, history }
    }

    /// Candidates for the record's cursor location.
    ///
    /// `None` when there is nothing to complete: no location, a daily entry,
    /// or a database that is not defined.
    pub fn suggest(&self, record: &ParsedRecord) -> Option<Vec<Suggestion>> {
        if record.daily_entry {
            return None;
        }
        let (schema, suggestions) = match record.location.as_ref()? {
            CursorLocation::Database { partial } => return Some(self.suggest_databases(partial)),
            CursorLocation::Type { partial } => {
                let schema = self.registry.database(&record.database)?;
                (schema, self.suggest_type(schema, partial))
            }
            CursorLocation::Parameter { name, partial } => {
                let schema = self.registry.database(&record.database)?;
                let suggestions = match schema.field(name) {
                    Some(spec) => {
                        self.suggest_field(schema, spec, record.type_value.as_deref(), partial)
                    }
                    None => Vec::new(),
                };
                (schema, suggestions)
            }
        };

        debug!(
            database = schema.name(),
            count = suggestions.len(),
            "suggestions ready"
        );
        Some(suggestions)
    }

    /// Database names starting with `partial`.
    pub fn suggest_databases(&self, partial: &str) -> Vec<Suggestion> {
        filter_candidates(self.registry.database_names(), partial.trim_start())
            .into_iter()
            .map(|name| Suggestion::new(name, SuggestionSource::Database))
            .collect()
    }

    /// The text the candidates are matched against for this record.
    ///
    /// For multi-valued fields this is only the piece after the last
    /// separator.
    pub fn match_text<'r>(&self, record: &'r ParsedRecord) -> Option<&'r str> {
        let location = record.location.as_ref()?;
        let partial = location.partial();
        let CursorLocation::Parameter { name, .. } = location else {
            return Some(partial.trim_start());
        };
        let separator = self
            .registry
            .database(&record.database)
            .and_then(|schema| schema.field(name))
            .and_then(|spec| spec.multi.as_deref());
        Some(current_piece(partial, separator))
    }

    fn suggest_type(&self, schema: &DatabaseSchema, partial: &str) -> Vec<Suggestion> {
        let spec = schema.type_spec();
        let history = spec
            .history_key(schema.type_field(), None)
            .map(|key| self.history_values(schema, &key))
            .unwrap_or_default();
        merge(spec.allowed_values(None), history, partial.trim_start())
    }

    fn suggest_field(
        &self,
        schema: &DatabaseSchema,
        spec: &FieldSpec,
        type_value: Option<&str>,
        partial: &str,
    ) -> Vec<Suggestion> {
        let history = spec
            .history_key(schema.type_field(), type_value)
            .map(|key| self.history_values(schema, &key))
            .unwrap_or_default();
        let partial = current_piece(partial, spec.multi.as_deref());
        merge(spec.allowed_values(type_value), history, partial)
    }

    fn history_values(&self, schema: &DatabaseSchema, key: &str) -> &'a [String] {
        self.history.bucket(schema.name(), key).unwrap_or(&[])
    }
}

/// Keep the candidates that start with `partial`, ignoring case.
///
/// An empty partial keeps everything. Order is preserved.
pub fn filter_candidates<'c, I>(candidates: I, partial: &str) -> Vec<&'c str>
where
    I: IntoIterator<Item = &'c str>,
{
    let needle = partial.to_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
        .collect()
}

/// The value being typed inside a (possibly multi-valued) field.
fn current_piece<'p>(partial: &'p str, separator: Option<&str>) -> &'p str {
    let piece = match separator {
        Some(separator) if !separator.is_empty() => partial
            .rsplit_once(separator)
            .map_or(partial, |(_, last)| last),
        _ => partial,
    };
    piece.trim_start()
}

/// Schema values first, then history values not already listed.
fn merge(fixed: &[String], history: &[String], partial: &str) -> Vec<Suggestion> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();

    let tagged = fixed
        .iter()
        .map(|value| (value, SuggestionSource::Fixed))
        .chain(history.iter().map(|value| (value, SuggestionSource::History)));
    for (value, source) in tagged {
        let key = value.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        if filter_candidates([value.as_str()], partial).is_empty() {
            continue;
        }
        out.push(Suggestion::new(value, source));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pojo_parser::parse_line;
    use std::collections::BTreeMap;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_json_str(
            r#"{
            "daily_entries": ["Daily"],
            "databases": [
                {
                    "database": "Exercise",
                    "type": "Type",
                    "params": ["Duration", "Gear", "Description"],
                    "fields": {
                        "Type": { "allowed": "history", "values": { "_ALL": ["Run", "Swim"] } },
                        "Duration": { "allowed": "history" },
                        "Gear": { "allowed": "history-type", "multi": "," }
                    }
                },
                { "database": "Exam" }
            ]
        }"#,
        )
        .unwrap()
    }

    fn history() -> HistoryDocument {
        let mut exercise = BTreeMap::new();
        exercise.insert(
            "Type".to_string(),
            vec!["Ride".to_string(), "run".to_string()],
        );
        exercise.insert(
            "Duration".to_string(),
            vec!["30".to_string(), "45".to_string()],
        );
        exercise.insert(
            "Run-Gear".to_string(),
            vec!["Shoes".to_string(), "Watch".to_string()],
        );
        let mut map = BTreeMap::new();
        map.insert("Exercise".to_string(), exercise);
        HistoryDocument::from(map)
    }

    fn displays(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.display.as_str()).collect()
    }

    #[test]
    fn test_prefix_filter_keeps_order() {
        let candidates = ["Run", "Swim", "Ride"];
        assert_eq!(filter_candidates(candidates, "R"), vec!["Run", "Ride"]);
        assert_eq!(filter_candidates(candidates, "r"), vec!["Run", "Ride"]);
        assert_eq!(filter_candidates(candidates, ""), vec!["Run", "Swim", "Ride"]);
        assert!(filter_candidates(candidates, "x").is_empty());
    }

    #[test]
    fn test_database_names() {
        let registry = registry();
        let history = history();
        let suggester = Suggester::new(&registry, &history);

        let record = parse_line(&registry, "exercise").unwrap().record;
        let suggestions = suggester.suggest(&record).unwrap();
        assert_eq!(displays(&suggestions), vec!["Exercise"]);
        assert_eq!(suggestions[0].source, SuggestionSource::Database);

        assert_eq!(
            displays(&suggester.suggest_databases("ex")),
            vec!["Exercise", "Exam"]
        );
    }

    #[test]
    fn test_type_values_fixed_then_history() {
        let registry = registry();
        let history = history();
        let suggester = Suggester::new(&registry, &history);

        let record = parse_line(&registry, "Exercise/").unwrap().record;
        let suggestions = suggester.suggest(&record).unwrap();
        // "run" from history duplicates the declared "Run".
        assert_eq!(displays(&suggestions), vec!["Run", "Swim", "Ride"]);
        assert_eq!(suggestions[0].source, SuggestionSource::Fixed);
        assert_eq!(suggestions[2].source, SuggestionSource::History);

        let record = parse_line(&registry, "Exercise/r").unwrap().record;
        let suggestions = suggester.suggest(&record).unwrap();
        assert_eq!(displays(&suggestions), vec!["Run", "Ride"]);
    }

    #[test]
    fn test_parameter_history() {
        let registry = registry();
        let history = history();
        let suggester = Suggester::new(&registry, &history);

        let record = parse_line(&registry, "Exercise/Run 4").unwrap().record;
        assert_eq!(displays(&suggester.suggest(&record).unwrap()), vec!["45"]);
    }

    #[test]
    fn test_multi_value_matches_last_piece() {
        let registry = registry();
        let history = history();
        let suggester = Suggester::new(&registry, &history);

        let record = parse_line(&registry, "Exercise/Run 30;shoes, w").unwrap().record;
        assert_eq!(suggester.match_text(&record), Some("w"));
        assert_eq!(displays(&suggester.suggest(&record).unwrap()), vec!["Watch"]);
    }

    #[test]
    fn test_per_type_field_without_type_has_no_history() {
        let registry = registry();
        let history = history();
        let suggester = Suggester::new(&registry, &history);

        let record = parse_line(&registry, "Exercise 30;").unwrap().record;
        assert_eq!(suggester.suggest(&record), Some(Vec::new()));
    }

    #[test]
    fn test_nothing_for_daily_or_unknown() {
        let registry = registry();
        let history = history();
        let suggester = Suggester::new(&registry, &history);

        let daily = parse_line(&registry, "Daily").unwrap().record;
        assert_eq!(suggester.suggest(&daily), None);

        let unknown = ParsedRecord {
            database: "Movie".to_string(),
            location: Some(CursorLocation::Type {
                partial: String::new(),
            }),
            ..ParsedRecord::default()
        };
        assert_eq!(suggester.suggest(&unknown), None);
    }

    #[test]
    fn test_suggestion_shape() {
        let suggestion = Suggestion::new("Run", SuggestionSource::History).with_span(3, 5);
        assert_eq!(suggestion.provider, "pojo");
        assert_eq!(suggestion.icon.as_deref(), Some("~"));
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["replace_span"]["start"], 3);
        assert_eq!(json["source"], "history");
    }
}
