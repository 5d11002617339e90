// SPDX-License-Identifier: PMPL-1.0-or-later
//! Parser error types.
//!
//! These are the hard failures: the line produces no record at all. Values
//! outside an allowed list are soft and reported as
//! [`ParseWarning`](crate::record::ParseWarning) instead.

use thiserror::Error;

/// Errors that abort parsing of a line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line does not start with a tag prefix")]
    NotTagLine,

    #[error("tag line is empty")]
    Empty,

    #[error("unknown database: {0}")]
    UnknownDatabase(String),

    #[error("database '{database}' takes {expected} parameters, found {found}")]
    TooManyParameters {
        database: String,
        expected: usize,
        found: usize,
    },
}
