#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for JSON Pointer parsing and resolution
//!
//! Input layout: first line is the pointer, the rest is the document.

use libfuzzer_sys::fuzz_target;
use ogham::{JsonPointer, Value, from_str};

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (pointer, document) = text.split_once('\n').unwrap_or((text, "null"));

    let Ok(pointer) = JsonPointer::parse(pointer) else {
        return;
    };
    // Text form is stable
    let again = JsonPointer::parse(&pointer.to_string()).expect("rendered pointer must parse");
    assert_eq!(pointer, again);

    let Ok(doc) = from_str(document) else {
        return;
    };

    if let Ok(found) = pointer.resolve(&doc) {
        let found = found.clone();
        let replaced = pointer
            .replace(&doc, Value::Null)
            .expect("replace succeeds where resolve does");
        assert_eq!(pointer.resolve(&replaced).ok(), Some(&Value::Null));
        let restored = pointer
            .replace(&replaced, found)
            .expect("replace succeeds on the same path");
        assert_eq!(restored, doc);
    }

    // Mutations either fail or leave the original untouched
    let before = doc.clone();
    let _ = pointer.add(&doc, Value::from(1));
    let _ = pointer.remove(&doc);
    assert_eq!(doc, before);
});
