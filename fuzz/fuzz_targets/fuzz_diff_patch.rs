#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for diff and patch
//!
//! Tests:
//! - json_diff output applied to the source yields the target
//! - A patch survives conversion to and from its JSON form
//! - Arbitrary patch documents never panic when applied

use libfuzzer_sys::fuzz_target;
use ogham::{JsonPatch, from_str, json_diff};

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
    let (Ok(source), Ok(target)) = (from_str(str_a), from_str(str_b)) else {
        return;
    };

    let patch = json_diff(&source, &target);
    let patched = patch.apply(&source).expect("generated patch must apply");
    assert_eq!(patched, target);

    let reread = JsonPatch::from_value(&patch.to_value()).expect("patch JSON must re-read");
    assert_eq!(reread, patch);

    // Treat the second half as a hand-written patch
    if let Ok(foreign) = JsonPatch::from_value(&target) {
        let _ = foreign.apply(&source);
    }
});
