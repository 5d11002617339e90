// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Tab-completion and inline hints for the POJO shell.
//!
//! Both read the shared session: completion asks it for suggestions at the
//! cursor, hinting shows the field template of the line being typed.

use std::cell::RefCell;
use std::rc::Rc;

use pojo_history::{FileBackend, HistoryBackend};
use pojo_session::PojoSession;
use pojo_suggest::Suggestion;
use rustyline::completion::{Completer, Pair};
use rustyline::hint::Hinter;
use rustyline::Context;

/// Session handle shared between the REPL loop and the editor helper.
pub type SharedSession = Rc<RefCell<PojoSession<FileBackend>>>;

/// Meta-commands starting with backslash.
pub const META_COMMANDS: &[&str] = &[
    "\\history",
    "\\forget",
    "\\scan",
    "\\reload",
    "\\confirm",
    "\\format",
    "\\delete-history",
    "\\help",
    "\\quit",
    "\\q",
];

/// Completes database names, types and field values of tag lines.
pub struct TagCompleter {
    pub session: SharedSession,
}

impl Completer for TagCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if line.starts_with('\\') {
            return Ok(complete_meta(line, pos));
        }
        // The loop holds the session mutably only while the editor is idle.
        let Ok(session) = self.session.try_borrow() else {
            return Ok((pos, Vec::new()));
        };
        Ok(complete_tag(&session, line, pos))
    }
}

/// Shows `Database/Type Param; Param` after the cursor.
pub struct TagHinter {
    pub session: SharedSession,
}

impl Hinter for TagHinter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let session = self.session.try_borrow().ok()?;
        tag_hint(&session, line)
    }
}

/// Candidates for a tag line with the cursor at byte `pos`.
pub fn complete_tag<B: HistoryBackend>(
    session: &PojoSession<B>,
    line: &str,
    pos: usize,
) -> (usize, Vec<Pair>) {
    let cursor = line[..pos].chars().count();
    match session.suggest(line, cursor) {
        Some(suggestions) => to_pairs(suggestions, pos),
        None => (pos, Vec::new()),
    }
}

/// Hint text for a tag line, padded away from the input.
pub fn tag_hint<B: HistoryBackend>(session: &PojoSession<B>, line: &str) -> Option<String> {
    session.hint(line).map(|hint| format!("   {hint}"))
}

fn to_pairs(suggestions: Vec<Suggestion>, pos: usize) -> (usize, Vec<Pair>) {
    let start = suggestions
        .first()
        .and_then(|s| s.replace_span)
        .map_or(pos, |span| span.start.min(pos));
    let pairs = suggestions
        .into_iter()
        .map(|s| Pair {
            display: match &s.icon {
                Some(icon) => format!("{icon} {}", s.display),
                None => s.display,
            },
            replacement: s.replacement,
        })
        .collect();
    (start, pairs)
}

fn complete_meta(line: &str, pos: usize) -> (usize, Vec<Pair>) {
    let prefix = &line[..pos];
    if prefix.contains(char::is_whitespace) {
        return (pos, Vec::new());
    }
    let prefix = prefix.to_lowercase();
    let pairs = META_COMMANDS
        .iter()
        .filter(|cmd| cmd.starts_with(&prefix))
        .map(|cmd| Pair {
            display: cmd.to_string(),
            replacement: cmd.to_string(),
        })
        .collect();
    (0, pairs)
}
