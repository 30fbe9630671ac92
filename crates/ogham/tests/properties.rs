// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property tests across the parse, generate, pointer, patch and merge layers

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use ogham::{
    Config, Encoding, JsonObject, JsonPatch, JsonPointer, JsonProvider, Value, from_slice,
    from_str, json_diff, json_merge_diff, json_merge_patch, to_string,
};
use proptest::prelude::*;

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof!["[a-d]{1,2}", "[a/~ é]{0,3}"]
}

fn arb_leaf() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6..1.0e6_f64).prop_map(|f| Value::try_from(f).unwrap()),
        "\\PC{0,6}".prop_map(Value::from),
    ]
    .boxed()
}

fn arb_value_from(leaf: BoxedStrategy<Value>) -> impl Strategy<Value = Value> {
    leaf.prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::from),
            prop::collection::vec((arb_key(), inner), 0..5)
                .prop_map(|members| Value::from(members.into_iter().collect::<JsonObject>())),
        ]
    })
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_value_from(arb_leaf())
}

fn arb_null_free() -> impl Strategy<Value = Value> {
    arb_value_from(arb_leaf().prop_filter("no nulls", |v| !v.is_null()).boxed())
}

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Every pointer to an existing location in `value`
fn pointers(value: &Value, at: &JsonPointer, out: &mut Vec<JsonPointer>) {
    out.push(at.clone());
    match value {
        Value::Object(members) => {
            for (key, member) in members.iter() {
                pointers(member, &at.child(key), out);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                pointers(item, &at.child(index.to_string()), out);
            }
        }
        _ => {}
    }
}

proptest! {
    #[test]
    fn prop_generate_parse_round_trip(value in arb_value()) {
        prop_assert_eq!(from_str(&to_string(&value)).unwrap(), value.clone());
        let pretty = JsonProvider::new(Config::default().with_pretty(true));
        prop_assert_eq!(pretty.parse(&pretty.render(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn prop_round_trip_in_every_encoding(value in arb_value()) {
        let text = to_string(&value);
        for encoding in Encoding::ALL {
            prop_assert_eq!(&from_slice(&encoding.encode(&text)).unwrap(), &value);
        }
    }

    #[test]
    fn prop_object_equality_ignores_order(members in prop::collection::btree_map(arb_key(), arb_value(), 0..6)) {
        let forward: JsonObject = members.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        let backward: JsonObject = members.iter().rev().map(|(k, v)| (k.as_str(), v.clone())).collect();
        let (forward, backward) = (Value::from(forward), Value::from(backward));
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(hash_of(&forward), hash_of(&backward));
    }

    #[test]
    fn prop_pointer_text_is_idempotent(value in arb_value()) {
        let mut all = Vec::new();
        pointers(&value, &JsonPointer::root(), &mut all);
        for pointer in all {
            let text = pointer.to_string();
            let reparsed: JsonPointer = text.parse().unwrap();
            prop_assert_eq!(&reparsed, &pointer);
            prop_assert_eq!(reparsed.to_string(), text);
            prop_assert!(std::ptr::eq(
                reparsed.resolve(&value).unwrap(),
                pointer.resolve(&value).unwrap()
            ));
        }
    }

    #[test]
    fn prop_diff_round_trip(source in arb_value(), target in arb_value()) {
        let patch = json_diff(&source, &target);
        prop_assert_eq!(patch.apply(&source).unwrap(), target);
        let reparsed = JsonPatch::from_value(&patch.to_value()).unwrap();
        prop_assert_eq!(reparsed, patch);
    }

    #[test]
    fn prop_merge_diff_round_trip(source in arb_value(), target in arb_null_free()) {
        let diff = json_merge_diff(&source, &target);
        prop_assert_eq!(json_merge_patch(&source, &diff), target);
    }

    #[test]
    fn prop_failing_patch_returns_nothing(value in arb_value(), depth in 0_usize..4) {
        let doc = Value::from(vec![value]);
        let mut patch = JsonPatch::new();
        for i in 0..depth {
            patch = patch.add("/-".parse().unwrap(), Value::from(i));
        }
        let missing: JsonPointer = "/does-not-exist".parse().unwrap();
        let patch = patch.test(missing, Value::Null).add("/-".parse().unwrap(), true);
        let before = doc.clone();
        let result = patch.apply(&doc);
        prop_assert!(result.is_err());
        prop_assert_eq!(result.unwrap_err().index(), Some(depth));
        prop_assert_eq!(doc, before);
    }
}
