// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Value normalizer.
//!
//! Every raw string that becomes a stored or compared value passes through
//! [`normalize`], so `exercise-run`, `EXERCISE-RUN` and `Exercise-run` all land
//! in the same history bucket as `Exercise-Run`.

/// Values with more words than this are free text and left alone.
const MAX_VOCABULARY_WORDS: usize = 3;

/// Canonicalize a raw token.
///
/// - empty input gives an empty string;
/// - the value is trimmed;
/// - free text (more than three words) and numbers are returned as-is;
/// - otherwise every comma part, word and hyphen segment is title-cased and
///   rejoined with `,`, ` ` and `-` respectively.
pub fn normalize(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }
    if value.split_whitespace().count() > MAX_VOCABULARY_WORDS || is_numeric(value) {
        return value.to_string();
    }

    value
        .split(',')
        .map(|part| {
            part.split_whitespace()
                .map(|word| {
                    word.split('-')
                        .map(title_case)
                        .collect::<Vec<_>>()
                        .join("-")
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Normalize every element, dropping the ones that end up empty.
pub fn normalize_all<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .map(normalize)
        .filter(|value| !value.is_empty())
        .collect()
}

/// Unicode case-insensitive equality, used for every name and value lookup.
///
/// Folds with [`str::to_lowercase`], the same rule the registry index and the
/// suggestion merge use.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// True when the value reads as a number (`42`, `-3.5`, `1e3`).
fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().is_ok() && value.chars().any(|c| c.is_ascii_digit())
}

/// Upper-case the first character, lower-case the rest.
///
/// A first character whose upper-case form is not a single character is kept
/// as typed, which keeps the function idempotent.
fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let head = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };

    let mut out = String::with_capacity(segment.len());
    out.push(head);
    out.push_str(&chars.as_str().to_lowercase());
    out
}
