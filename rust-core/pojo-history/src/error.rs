// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// History store error types.
//
// A missing history blob is not an error (it reads as `None`); a blob that
// exists but cannot be decoded is, so user data is never silently replaced
// by an empty store.

use thiserror::Error;

/// Errors that can occur while loading or persisting history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// An I/O error occurred in the underlying storage layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted history exists but is not a valid history document.
    #[error("corrupted history: {0}")]
    Corrupted(String),

    /// The in-memory history could not be encoded.
    #[error("serialization error: {0}")]
    SerializationError(String),
}
