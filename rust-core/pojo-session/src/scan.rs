// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Bulk history import from existing notes.
//!
//! Files are read one after another; every tag line found is recorded in
//! memory and the store is written once when the batch ends. An unreadable
//! file is logged and counted, not fatal.

use std::path::Path;

use pojo_history::HistoryBackend;
use pojo_parser::strip_leading;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::SessionError;
use crate::session::PojoSession;

/// Totals for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub files_failed: usize,
    /// Tag lines that parsed successfully.
    pub lines_parsed: usize,
    /// Values newly added to history.
    pub values_added: usize,
}

impl ScanReport {
    fn absorb(&mut self, other: ScanReport) {
        self.files_scanned += other.files_scanned;
        self.files_failed += other.files_failed;
        self.lines_parsed += other.lines_parsed;
        self.values_added += other.values_added;
    }
}

impl<B: HistoryBackend> PojoSession<B> {
    /// Record every tag line of `text`, then persist once.
    pub async fn scan_text(&mut self, text: &str) -> Result<ScanReport, SessionError> {
        let report = self.ingest(text);
        self.history.save().await?;
        Ok(report)
    }

    /// Record every tag line of every file, then persist once.
    #[instrument(skip_all)]
    pub async fn scan_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
    ) -> Result<ScanReport, SessionError> {
        let mut report = ScanReport::default();
        for path in paths {
            let path = path.as_ref();
            match tokio::fs::read_to_string(path).await {
                Ok(text) => {
                    let mut file_report = self.ingest(&text);
                    file_report.files_scanned = 1;
                    debug!(
                        path = %path.display(),
                        lines = file_report.lines_parsed,
                        added = file_report.values_added,
                        "file scanned"
                    );
                    report.absorb(file_report);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable file");
                    report.files_failed += 1;
                }
            }
        }

        self.history.save().await?;
        info!(
            files = report.files_scanned,
            failed = report.files_failed,
            added = report.values_added,
            "scan finished"
        );
        Ok(report)
    }

    /// Record tag lines in memory without persisting.
    fn ingest(&mut self, text: &str) -> ScanReport {
        let mut report = ScanReport::default();
        for line in text.lines() {
            if strip_leading(line).is_none() {
                continue;
            }
            let outcome = match self.parse(line) {
                Ok(outcome) => outcome,
                Err(err) => {
                    debug!(error = %err, "skipping line");
                    continue;
                }
            };
            report.lines_parsed += 1;
            if let Some(schema) = self.registry.database(&outcome.record.database) {
                let delta = self.history.add_to_history(schema, &outcome.record);
                report.values_added += delta.len();
            }
        }
        report
    }
}
