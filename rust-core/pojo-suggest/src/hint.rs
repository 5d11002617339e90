// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Field template hints.
//!
//! Shows the shape of the entry being typed, e.g.
//! `Exercise/Run Duration; Description`, so the user knows which field comes
//! next.

use pojo_parser::ParsedRecord;
use pojo_schema::SchemaRegistry;

/// Render the template for `record`'s database.
///
/// `None` when the database is not defined (daily entries included). A
/// missing type shows as `<TypeField>`.
pub fn generate_hint(registry: &SchemaRegistry, record: &ParsedRecord) -> Option<String> {
    if record.daily_entry {
        return None;
    }
    let schema = registry.database(&record.database)?;

    let type_value = record
        .type_value
        .clone()
        .unwrap_or_else(|| format!("<{}>", schema.type_field()));
    let mut hint = format!("{}/{}", schema.name(), type_value);

    if !schema.params().is_empty() {
        let joiner = format!("{} ", registry.split_separator());
        hint.push(' ');
        hint.push_str(&schema.params().join(&joiner));
    }
    Some(hint)
}
