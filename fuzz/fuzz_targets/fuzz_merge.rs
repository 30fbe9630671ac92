#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for JSON Merge Patch
//!
//! Tests:
//! - Merging never panics
//! - Merging a patch twice is the same as merging it once
//! - merge_diff round trips whenever the target holds no null members

use libfuzzer_sys::fuzz_target;
use ogham::{Value, from_str, json_merge_diff, json_merge_patch};

fn holds_null_member(value: &Value) -> bool {
    match value {
        Value::Object(object) => object
            .iter()
            .any(|(_, member)| member.is_null() || holds_null_member(member)),
        Value::Array(array) => array.iter().any(holds_null_member),
        _ => false,
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 || data.len() < 2 {
        return;
    }

    let mid = data.len() / 2;
    let (Ok(str_a), Ok(str_b)) = (
        std::str::from_utf8(&data[..mid]),
        std::str::from_utf8(&data[mid..]),
    ) else {
        return;
    };
    let (Ok(target), Ok(patch)) = (from_str(str_a), from_str(str_b)) else {
        return;
    };

    let once = json_merge_patch(&target, &patch);
    let twice = json_merge_patch(&once, &patch);
    assert_eq!(once, twice, "merge patch is idempotent");

    if !holds_null_member(&patch) {
        let diff = json_merge_diff(&target, &patch);
        assert_eq!(json_merge_patch(&target, &diff), patch);
    }
});
