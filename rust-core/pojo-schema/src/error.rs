// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schema error types.
//
// Every failure mode of turning a settings document into a usable
// `SchemaRegistry`: unreadable files, malformed JSON, and definitions that
// violate the registry invariants.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading settings or building the schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The settings file could not be read.
    #[error("failed to read settings from {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON or has the wrong shape.
    #[error("invalid settings document: {0}")]
    Json(#[from] serde_json::Error),

    /// The parameter split separator is empty.
    #[error("split separator must not be empty")]
    EmptySeparator,

    /// A database definition has an empty name.
    #[error("database definition #{index} has an empty name")]
    EmptyDatabaseName {
        /// Position of the definition in the settings document.
        index: usize,
    },

    /// A database name contains characters that can never appear in a tag head.
    #[error("database name '{0}' must not contain '/' or whitespace")]
    InvalidDatabaseName(String),

    /// Two database definitions share a name (compared case-insensitively).
    #[error("database '{0}' is defined more than once")]
    DuplicateDatabase(String),

    /// A database has an empty type-field name.
    #[error("database '{0}' has an empty type field")]
    EmptyTypeField(String),

    /// A parameter name appears twice in one database.
    #[error("parameter '{parameter}' is listed twice in database '{database}'")]
    DuplicateParameter {
        /// Database being validated.
        database: String,
        /// Repeated parameter name.
        parameter: String,
    },

    /// A multi-valued field declares an empty separator.
    #[error("field '{field}' of database '{database}' has an empty multi-value separator")]
    EmptyMultiSeparator {
        /// Database being validated.
        database: String,
        /// Field with the empty separator.
        field: String,
    },
}
