// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! The session context.
//!
//! A [`PojoSession`] owns the schema registry and the history store for one
//! editor or shell. Per-keystroke calls (`suggest`, `hint`, `parse`) are
//! synchronous and read-only; anything that persists goes through `&mut self`
//! so two writes against the same store never overlap.

use std::path::Path;

use pojo_history::{FileBackend, HistoryBackend, HistoryDelta, HistoryStore};
use pojo_parser::{
    database_prefix, prefix_len, strip_leading, LineParser, ParseError, ParseOutcome, ParsedRecord,
};
use pojo_schema::{PojoSettings, SchemaRegistry};
use pojo_suggest::{generate_hint, Suggester, Suggestion};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::SessionError;

/// A line the user finished, with the history additions it would make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedLine {
    /// The line as typed.
    pub line: String,
    pub record: ParsedRecord,
    /// Values not yet in history; pass to [`PojoSession::commit`] to keep them.
    pub delta: HistoryDelta,
}

/// Registry, history and line-completion state for one user.
pub struct PojoSession<B: HistoryBackend> {
    pub(crate) registry: SchemaRegistry,
    pub(crate) history: HistoryStore<B>,
    last_line: Option<String>,
}

impl<B: HistoryBackend> PojoSession<B> {
    /// Open a session, loading persisted history from `backend`.
    ///
    /// A corrupted history store is an error; a missing one is empty.
    pub async fn open(registry: SchemaRegistry, backend: B) -> Result<Self, SessionError> {
        let history = HistoryStore::open(backend).await?;
        info!(
            databases = registry.len(),
            values = history.document().value_count(),
            "session opened"
        );
        Ok(Self::with_history(registry, history))
    }

    /// Build a session around an already loaded store.
    pub fn with_history(registry: SchemaRegistry, history: HistoryStore<B>) -> Self {
        Self {
            registry,
            history,
            last_line: None,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryStore<B> {
        &self.history
    }

    /// Swap in new settings. On error the current registry stays in place.
    pub fn reload_settings(&mut self, settings: &PojoSettings) -> Result<(), SessionError> {
        let registry = SchemaRegistry::from_settings(settings)?;
        info!(databases = registry.len(), "settings reloaded");
        self.registry = registry;
        Ok(())
    }

    /// Parse a full line, tag prefix included.
    pub fn parse(&self, line: &str) -> Result<ParseOutcome, SessionError> {
        let body = strip_leading(line).ok_or(ParseError::NotTagLine)?;
        Ok(LineParser::new(&self.registry).parse(body)?)
    }

    /// Suggestions for `line` with the cursor at character offset `cursor`.
    ///
    /// Only the text before the cursor is considered. Each suggestion carries
    /// the byte span of `line` it replaces.
    pub fn suggest(&self, line: &str, cursor: usize) -> Option<Vec<Suggestion>> {
        let cursor = char_to_byte(line, cursor);
        let before = &line[..cursor];
        let prefix = prefix_len(before)?;
        let body = &before[prefix..];
        let text_end = prefix + body.trim_end().len();
        let suggester = Suggester::new(&self.registry, self.history.document());

        if self.registry.daily_entry(body.trim()).is_none() {
            if let Some(partial) = database_prefix(body) {
                let start = text_end - partial.len();
                return Some(
                    suggester
                        .suggest_databases(partial)
                        .into_iter()
                        .map(|s| s.with_span(start, text_end))
                        .collect(),
                );
            }
        }

        let outcome = match LineParser::new(&self.registry).parse(body) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(error = %err, "no suggestions for line");
                return None;
            }
        };
        let record = outcome.record;
        let suggestions = suggester.suggest(&record)?;
        let matched = suggester.match_text(&record).unwrap_or_default();
        let (start, end) = if matched.is_empty() {
            (cursor, cursor)
        } else {
            (text_end - matched.len(), text_end)
        };
        Some(
            suggestions
                .into_iter()
                .map(|s| s.with_span(start, end))
                .collect(),
        )
    }

    /// Field template for the line, e.g. `Exercise/Run Duration; Description`.
    pub fn hint(&self, line: &str) -> Option<String> {
        let outcome = self.parse(line).ok()?;
        generate_hint(&self.registry, &outcome.record)
    }

    /// Feed the line the cursor is on.
    ///
    /// An empty line after a non-empty one completes the earlier line. If that
    /// line was a valid tag line, the pending history additions are returned
    /// for confirmation; nothing is stored until [`commit`](Self::commit).
    pub fn observe_line(&mut self, line: &str) -> Option<CompletedLine> {
        if !line.trim().is_empty() {
            self.last_line = Some(line.to_string());
            return None;
        }
        let previous = self.last_line.take()?;
        let outcome = self.parse(&previous).ok()?;
        let delta = self.pending_delta(&outcome.record);
        debug!(line = %previous, pending = delta.len(), "line completed");
        Some(CompletedLine {
            line: previous,
            record: outcome.record,
            delta,
        })
    }

    /// Apply a confirmed delta and persist it. Returns whether history grew.
    #[instrument(skip(self, delta), fields(entries = delta.len()))]
    pub async fn commit(&mut self, delta: &HistoryDelta) -> Result<bool, SessionError> {
        let grew = self.history.apply(delta);
        if grew {
            self.history.save().await?;
        }
        Ok(grew)
    }

    /// Parse a line and record its values straight away.
    pub async fn record_line(&mut self, line: &str) -> Result<HistoryDelta, SessionError> {
        let outcome = self.parse(line)?;
        let delta = self.pending_delta(&outcome.record);
        self.commit(&delta).await?;
        Ok(delta)
    }

    /// Remove one remembered value and persist. Returns whether it existed.
    pub async fn forget(
        &mut self,
        database: &str,
        key: &str,
        value: &str,
    ) -> Result<bool, SessionError> {
        let removed = self.history.remove_value(database, key, value);
        if removed {
            self.history.save().await?;
        }
        Ok(removed)
    }

    /// Drop all history and persist the empty store.
    pub async fn delete_history(&mut self) -> Result<(), SessionError> {
        self.history.delete_history().await?;
        self.last_line = None;
        Ok(())
    }

    fn pending_delta(&self, record: &ParsedRecord) -> HistoryDelta {
        self.registry
            .database(&record.database)
            .map(|schema| self.history.diff(schema, record))
            .unwrap_or_default()
    }
}

impl PojoSession<FileBackend> {
    /// Open a session from a settings file and a history file.
    pub async fn open_files(
        settings: impl AsRef<Path>,
        history: impl AsRef<Path>,
    ) -> Result<Self, SessionError> {
        let settings = PojoSettings::from_path(settings)?;
        let registry = SchemaRegistry::from_settings(&settings)?;
        Self::open(registry, FileBackend::new(history.as_ref())).await
    }
}

/// Byte offset of character `cursor`, clamped to the end of the line.
fn char_to_byte(line: &str, cursor: usize) -> usize {
    line.char_indices()
        .nth(cursor)
        .map_or(line.len(), |(index, _)| index)
}
