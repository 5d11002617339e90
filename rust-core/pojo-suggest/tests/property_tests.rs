// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for candidate filtering and suggestion lookup

use std::collections::BTreeMap;

use pojo_history::HistoryDocument;
use pojo_parser::parse_line;
use pojo_schema::SchemaRegistry;
use pojo_suggest::{filter_candidates, Suggester};
use proptest::prelude::*;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_json_str(
        r#"{ "databases": [{
            "database": "Exercise",
            "params": ["Duration", "Description"],
            "fields": {
                "Type": { "allowed": "fixed", "values": { "_ALL": ["Run", "Swim", "Ride"] } },
                "Duration": { "allowed": "history" }
            }
        }] }"#,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_filtered_candidates_share_prefix(
        candidates in prop::collection::vec("[A-Za-z]{1,8}", 0..12),
        partial in "[A-Za-z]{0,3}",
    ) {
        let kept = filter_candidates(candidates.iter().map(String::as_str), &partial);
        prop_assert!(kept.len() <= candidates.len());
        for value in &kept {
            prop_assert!(value.to_lowercase().starts_with(&partial.to_lowercase()));
        }
    }

    #[test]
    fn test_empty_partial_keeps_everything(
        candidates in prop::collection::vec("[A-Za-z]{1,8}", 0..12),
    ) {
        let kept = filter_candidates(candidates.iter().map(String::as_str), "");
        prop_assert_eq!(kept.len(), candidates.len());
    }

    #[test]
    fn test_history_values_are_offered(values in prop::collection::btree_set("[1-9][0-9]{0,3}", 1..8)) {
        let registry = registry();
        let mut buckets = BTreeMap::new();
        buckets.insert("Duration".to_string(), values.iter().cloned().collect::<Vec<_>>());
        let mut map = BTreeMap::new();
        map.insert("Exercise".to_string(), buckets);
        let history = HistoryDocument::from(map);

        let record = parse_line(&registry, "Exercise/Run ").unwrap().record;
        let suggestions = Suggester::new(&registry, &history).suggest(&record).unwrap();
        prop_assert_eq!(suggestions.len(), values.len());
    }

    #[test]
    fn test_suggest_never_panics(line in "\\PC{0,40}") {
        let registry = registry();
        let history = HistoryDocument::default();
        if let Ok(outcome) = parse_line(&registry, &line) {
            let _ = Suggester::new(&registry, &history).suggest(&outcome.record);
        }
    }
}
