// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for tag prefix stripping and line parsing

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use pojo_parser::{parse_line, prefix_len, strip_leading};
use pojo_schema::SchemaRegistry;

fn registry() -> Option<&'static SchemaRegistry> {
    static REGISTRY: OnceLock<Option<SchemaRegistry>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| {
            SchemaRegistry::from_json_str(
                r#"{
                "daily_entries": ["Daily"],
                "databases": [{
                    "database": "Exercise",
                    "params": ["Duration", "Gear", "Description"],
                    "fields": {
                        "Type": { "allowed": "fixed", "values": { "_ALL": ["Run"], "Swim": ["Pool"] } },
                        "Gear": { "allowed": "history-type", "multi": "," }
                    }
                }]
            }"#,
            )
            .ok()
        })
        .as_ref()
}

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    let Some(registry) = registry() else {
        return;
    };

    // Stripping and the reported prefix length must agree.
    if let (Some(body), Some(len)) = (strip_leading(line), prefix_len(line)) {
        assert_eq!(&line[len..], body);
        let _ = parse_line(registry, body);
    }
    let _ = parse_line(registry, line);
});
