// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Tag prefix recognition.
//!
//! A tag line starts either with a single `#` (`#Exercise/Run`) or with a
//! level-three heading (`### Exercise/Run`). Deeper or doubled hashes are
//! ordinary markdown and out of scope.

/// Heading form that also introduces a tag line.
const HEADING_PREFIX: &str = "### ";

/// Strip the tag prefix and any whitespace that follows it.
///
/// Returns `None` when the line is not a tag line.
pub fn strip_leading(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix(HEADING_PREFIX) {
        return Some(rest.trim_start());
    }
    let rest = line.strip_prefix('#')?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest.trim_start())
}

/// Byte length of the prefix [`strip_leading`] removes, including the
/// whitespace after it.
pub fn prefix_len(line: &str) -> Option<usize> {
    strip_leading(line).map(|rest| line.len() - rest.len())
}
