// SPDX-License-Identifier: PMPL-1.0-or-later
//! Session error types.

use pojo_history::HistoryError;
use pojo_parser::ParseError;
use pojo_schema::SchemaError;
use thiserror::Error;

/// Errors surfaced by [`PojoSession`](crate::PojoSession).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("settings error: {0}")]
    Schema(#[from] SchemaError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("history error: {0}")]
    History(#[from] HistoryError),
}

impl SessionError {
    /// True for line-level problems that leave the session usable.
    pub fn is_line_error(&self) -> bool {
        matches!(self, SessionError::Parse(_))
    }
}
