// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for value normalization

#![no_main]

use libfuzzer_sys::fuzz_target;
use pojo_schema::normalize;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "normalize is not idempotent for {s:?}");
    }
});
