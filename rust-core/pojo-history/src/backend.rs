// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Persistence backend trait for the history store.
//
// The history is persisted as a single blob, read once at start-up and
// rewritten wholesale on save. Backends only move bytes; encoding and
// decoding live in `HistoryStore`.

use async_trait::async_trait;

use crate::error::HistoryError;

/// Where the history blob lives.
///
/// Implementations must be safe to share across threads and tokio tasks.
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Read the whole blob.
    ///
    /// Returns `Ok(None)` if nothing has been persisted yet, rather than an
    /// error.
    async fn read(&self) -> Result<Option<Vec<u8>>, HistoryError>;

    /// Replace the whole blob.
    async fn write(&self, bytes: &[u8]) -> Result<(), HistoryError>;

    /// A human-readable name for this backend, used in logging.
    fn name(&self) -> &str;
}
