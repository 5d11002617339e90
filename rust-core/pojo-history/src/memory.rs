// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory history backend.
//
// Holds the blob behind a tokio `RwLock`. Clones share the same blob, so a
// test can keep one handle and inspect what the store wrote through another.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::HistoryBackend;
use crate::error::HistoryError;

/// A history backend that keeps the blob in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    blob: Arc<RwLock<Option<Vec<u8>>>>,
}

impl InMemoryBackend {
    /// Create an empty backend (reads as "nothing persisted").
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds `bytes`.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Arc::new(RwLock::new(Some(bytes.into()))),
        }
    }

    /// A copy of the current blob.
    pub async fn contents(&self) -> Option<Vec<u8>> {
        self.blob.read().await.clone()
    }
}

#[async_trait]
impl HistoryBackend for InMemoryBackend {
    async fn read(&self) -> Result<Option<Vec<u8>>, HistoryError> {
        Ok(self.blob.read().await.clone())
    }

    async fn write(&self, bytes: &[u8]) -> Result<(), HistoryError> {
        *self.blob.write().await = Some(bytes.to_vec());
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
