// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for history persistence

use std::collections::BTreeMap;

use pojo_history::{HistoryDocument, HistoryStore, InMemoryBackend};
use proptest::prelude::*;

/// Nested database -> key -> values maps with distinct values per bucket
fn arb_document() -> impl Strategy<Value = HistoryDocument> {
    prop::collection::btree_map(
        "[A-Z][a-z]{2,8}",
        prop::collection::btree_map(
            "[A-Z][a-z]{2,8}(-[A-Z][a-z]{2,8})?",
            prop::collection::vec("[A-Za-z0-9 ]{1,12}", 0..6),
            0..4,
        ),
        0..4,
    )
    .prop_map(|map: BTreeMap<String, BTreeMap<String, Vec<String>>>| HistoryDocument::from(map))
}

proptest! {
    #[test]
    fn test_save_then_load_round_trips(document in arb_document()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let json = serde_json::to_vec(&document).unwrap();
            let backend = InMemoryBackend::with_contents(json);

            let mut store = HistoryStore::open(backend.clone()).await.unwrap();
            prop_assert_eq!(store.document(), &document);

            store.save().await.unwrap();
            let reloaded = HistoryStore::open(backend).await.unwrap();
            prop_assert_eq!(reloaded.document(), &document);

            Ok(())
        })?;
    }
}
