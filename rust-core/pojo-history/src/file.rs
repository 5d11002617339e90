// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File-backed history backend.
//
// The blob lives in one JSON file. Writes go to a sibling temporary file
// that is renamed over the target, so a crash mid-write leaves the previous
// history intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::backend::HistoryBackend;
use crate::error::HistoryError;

/// Default file name of the persisted history.
pub const HISTORY_FILE_NAME: &str = "pojo-history.json";

/// A history backend that stores the blob in a single file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Back the history with the file at `path`. Nothing is touched until
    /// the first read or write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Back the history with [`HISTORY_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(HISTORY_FILE_NAME))
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl HistoryBackend for FileBackend {
    async fn read(&self) -> Result<Option<Vec<u8>>, HistoryError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, bytes: &[u8]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "history file written");
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
