// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! pojo-suggest: completion candidates and field hints.
//!
//! [`Suggester`] turns a parsed record's cursor location into a list of
//! [`Suggestion`]s drawn from the schema and the history document.
//! [`generate_hint`] renders the record's field template.

pub mod hint;
pub mod suggest;

pub use hint::generate_hint;
pub use suggest::{
    filter_candidates, ReplaceSpan, Suggester, Suggestion, SuggestionSource, PROVIDER,
};
