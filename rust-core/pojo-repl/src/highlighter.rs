// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Tag-line colouring for the interactive shell.
//!
//! The tag prefix is dimmed, the database name is cyan and the type green.
//! Parameters and non-tag lines are left as typed.

use std::borrow::Cow;

use colored::Colorize;
use pojo_parser::prefix_len;
use rustyline::highlight::{CmdKind, Highlighter};

pub struct TagHighlighter;

impl Highlighter for TagHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if prefix_len(line).is_none() {
            return Cow::Borrowed(line);
        }
        Cow::Owned(highlight_line(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Borrowed(prompt)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

/// Colour the prefix, database and type of a tag line.
fn highlight_line(line: &str) -> String {
    let Some(prefix) = prefix_len(line) else {
        return line.to_string();
    };
    let (tag, body) = line.split_at(prefix);
    let head_end = body.find(char::is_whitespace).unwrap_or(body.len());
    let (head, rest) = body.split_at(head_end);

    let mut out = String::with_capacity(line.len() * 2);
    out.push_str(&tag.bright_black().to_string());
    match head.split_once('/') {
        Some((database, type_value)) => {
            out.push_str(&database.bright_cyan().bold().to_string());
            out.push('/');
            out.push_str(&type_value.green().to_string());
        }
        None => out.push_str(&head.bright_cyan().bold().to_string()),
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        let h = TagHighlighter;
        assert!(matches!(h.highlight("just a note", 0), Cow::Borrowed(_)));
        assert!(matches!(h.highlight("## heading", 0), Cow::Borrowed(_)));
    }

    #[test]
    fn test_highlight_preserves_text() {
        for line in ["#Exercise/Run 30; easy", "### Book", "#", "#Meal/"] {
            assert_eq!(strip_ansi(&highlight_line(line)), line);
        }
    }

    #[test]
    fn test_highlight_char_always_true() {
        assert!(TagHighlighter.highlight_char("#E", 2, CmdKind::Other));
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}
