// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// POJO History Store
//
// Remembers the values entered for history-tracked fields so later
// suggestions can offer them again.
//
// # Modules
//
// - [`backend`] -- The `HistoryBackend` trait: where the blob is persisted.
// - [`error`] -- The `HistoryError` enum.
// - [`memory`] -- An in-memory backend for tests and ephemeral sessions.
// - [`file`] -- A single-file JSON backend with atomic replacement.
// - [`store`] -- `HistoryStore`, `HistoryDocument` and `HistoryDelta`.
//
// # Example
//
// ```rust,ignore
// use pojo_history::{HistoryStore, InMemoryBackend};
// use pojo_parser::parse_line;
// use pojo_schema::SchemaRegistry;
//
// let registry = SchemaRegistry::from_json_str(r#"{ "databases": [{
//     "database": "Book", "params": ["Author"],
//     "fields": { "Author": { "allowed": "history" } } }] }"#).unwrap();
// let schema = registry.database("Book").unwrap();
// let record = parse_line(&registry, "Book/Novel le guin").unwrap().record;
//
// let mut store = HistoryStore::open(InMemoryBackend::new()).await.unwrap();
// assert!(store.add_to_history(schema, &record).changed());
// assert_eq!(store.values("Book", "Author"), ["Le Guin"]);
// store.save().await.unwrap();
// ```

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use backend::HistoryBackend;
pub use error::HistoryError;
pub use file::{FileBackend, HISTORY_FILE_NAME};
pub use memory::InMemoryBackend;
pub use store::{HistoryDelta, HistoryDocument, HistoryEntry, HistoryStore};
