// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Output formatters for parse results, suggestions, scans and history.
//!
//! - **Table**: human-readable output using `comfy-table`.
//! - **JSON**: pretty-printed JSON for scripts.

use std::fmt;

use comfy_table::{Cell, ContentArrangement, Table};
use pojo_history::HistoryDocument;
use pojo_parser::ParseOutcome;
use pojo_schema::eq_ignore_case;
use pojo_session::ScanReport;
use pojo_suggest::Suggestion;
use serde::Serialize;
use serde_json::{Map, Value};

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Unknown format '{other}'. Valid formats: table, json"
            )),
        }
    }
}

/// A parsed line as a Field | Value table, warnings listed last.
pub fn format_outcome(outcome: &ParseOutcome, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(outcome);
    }
    let record = &outcome.record;
    let mut table = new_table(&["Field", "Value"]);
    table.add_row(vec![Cell::new("Database"), Cell::new(&record.database)]);
    if record.daily_entry {
        table.add_row(vec![Cell::new("Daily entry"), Cell::new("yes")]);
    }
    if let Some(type_value) = &record.type_value {
        table.add_row(vec![Cell::new("Type"), Cell::new(type_value)]);
    }
    for param in &record.params {
        table.add_row(vec![
            Cell::new(&param.name),
            Cell::new(param.value.values().join(", ")),
        ]);
    }
    for description in &record.description {
        table.add_row(vec![Cell::new("Description"), Cell::new(description)]);
    }
    for warning in &outcome.warnings {
        table.add_row(vec![Cell::new("Warning"), Cell::new(warning.to_string())]);
    }
    table.to_string()
}

/// Suggestions as Source | Suggestion | Replaces.
pub fn format_suggestions(suggestions: &[Suggestion], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(&suggestions);
    }
    if suggestions.is_empty() {
        return "(no suggestions)".to_string();
    }
    let mut table = new_table(&["", "Suggestion", "Source", "Replaces"]);
    for suggestion in suggestions {
        let span = suggestion
            .replace_span
            .map(|span| format!("{}..{}", span.start, span.end))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(suggestion.icon.as_deref().unwrap_or_default()),
            Cell::new(&suggestion.display),
            Cell::new(format!("{:?}", suggestion.source).to_lowercase()),
            Cell::new(span),
        ]);
    }
    table.to_string()
}

/// Scan totals.
pub fn format_report(report: &ScanReport, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    let mut table = new_table(&["Field", "Value"]);
    for (name, value) in [
        ("Files scanned", report.files_scanned),
        ("Files failed", report.files_failed),
        ("Tag lines", report.lines_parsed),
        ("Values added", report.values_added),
    ] {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    table.to_string()
}

/// History buckets, optionally narrowed to one database and/or key.
///
/// Filters match case-insensitively.
pub fn format_history(
    document: &HistoryDocument,
    database: Option<&str>,
    key: Option<&str>,
    format: OutputFormat,
) -> String {
    let rows = history_rows(document, database, key);
    match format {
        OutputFormat::Json => {
            let mut root = Map::new();
            for (db, bucket, values) in rows {
                let entry = root
                    .entry(db.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(keys) = entry {
                    keys.insert(bucket.to_string(), Value::from(values.to_vec()));
                }
            }
            to_json(&Value::Object(root))
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                return "(no history)".to_string();
            }
            let mut table = new_table(&["Database", "Key", "Values"]);
            let row_count = rows.len();
            for (db, bucket, values) in rows {
                table.add_row(vec![
                    Cell::new(db),
                    Cell::new(bucket),
                    Cell::new(values.join(", ")),
                ]);
            }
            format!("{table}\n({row_count} key{})", if row_count == 1 { "" } else { "s" })
        }
    }
}

fn history_rows<'d>(
    document: &'d HistoryDocument,
    database: Option<&str>,
    key: Option<&str>,
) -> Vec<(&'d str, &'d str, &'d [String])> {
    let keep = |filter: Option<&str>, name: &str| {
        filter.map_or(true, |wanted| eq_ignore_case(wanted, name))
    };
    let mut rows = Vec::new();
    for db in document.databases().filter(|db| keep(database, db)) {
        for bucket in document.keys(db).into_iter().filter(|k| keep(key, k)) {
            if let Some(values) = document.bucket(db, bucket) {
                rows.push((db, bucket, values));
            }
        }
    }
    rows
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.iter().map(Cell::new));
    table
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"error\": \"{err}\"}}"))
}
