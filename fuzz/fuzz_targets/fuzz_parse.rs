#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for the reader and generator
//!
//! Tests:
//! - Arbitrary bytes never panic the reader, in any encoding
//! - Whatever parses re-parses from its own output to an equal value
//! - Pretty and compact output agree

use libfuzzer_sys::fuzz_target;
use ogham::{from_slice, from_str, to_string, to_string_pretty};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(value) = from_slice(data) else {
        return;
    };

    let compact = to_string(&value);
    let reparsed = from_str(&compact).expect("generated output must parse");
    assert_eq!(value, reparsed, "compact round trip changed the value");
    assert_eq!(value.structural_hash(), reparsed.structural_hash());

    let pretty = to_string_pretty(&value, 2).expect("pretty output must generate");
    let reparsed = from_str(&pretty).expect("pretty output must parse");
    assert_eq!(value, reparsed, "pretty round trip changed the value");
});
