// SPDX-License-Identifier: MIT OR Apache-2.0
// Benchmarks: missing_docs - criterion_group! macro generates undocumentable code
#![allow(missing_docs)]
// Benchmarks: clippy lints relaxed for benchmark code (not production)
#![allow(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Benchmarks for JSON diff/patch/merge with baseline comparisons.
//!
//! Compares ogham against:
//! - json-patch crate (RFC 6902 / RFC 7396 baseline over serde_json)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ogham::{JsonPointer, Value, json_diff, json_merge_diff, json_merge_patch, merge_many};
use serde_json::json;
use std::hint::black_box;

// =============================================================================
// Test Data Generation
// =============================================================================

/// Generate source and target pairs, as serde_json values for the baseline
fn generate_diff_pairs(scenario: &str) -> (serde_json::Value, serde_json::Value) {
    match scenario {
        "identical_medium" => {
            let doc = json!({
                "users": (0..100).map(|i| json!({
                    "id": i,
                    "name": format!("User{}", i),
                    "active": i % 2 == 0
                })).collect::<Vec<_>>()
            });
            (doc.clone(), doc)
        }
        "small_field_change" => (
            json!({"name": "Alice", "age": 30, "active": true}),
            json!({"name": "Alice", "age": 31, "active": true}),
        ),
        "medium_field_add" => (
            json!({
                "users": (0..50).map(|i| json!({"id": i, "name": format!("User{}", i)})).collect::<Vec<_>>()
            }),
            json!({
                "users": (0..50).map(|i| json!({
                    "id": i,
                    "name": format!("User{}", i),
                    "email": format!("user{}@example.com", i)
                })).collect::<Vec<_>>()
            }),
        ),
        "array_append" => (
            json!({"items": (0..100).collect::<Vec<_>>()}),
            json!({"items": (0..105).collect::<Vec<_>>()}),
        ),
        "array_truncate" => (
            json!({"items": (0..100).collect::<Vec<_>>()}),
            json!({"items": (0..50).collect::<Vec<_>>()}),
        ),
        _ => unreachable!(),
    }
}

const SCENARIOS: [&str; 5] = [
    "identical_medium",
    "small_field_change",
    "medium_field_add",
    "array_append",
    "array_truncate",
];

fn convert(pair: &(serde_json::Value, serde_json::Value)) -> (Value, Value) {
    (Value::from(&pair.0), Value::from(&pair.1))
}

// =============================================================================
// JSON Diff Benchmarks
// =============================================================================

fn bench_json_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_diff");

    for scenario in SCENARIOS {
        let pair = generate_diff_pairs(scenario);
        let (source, target) = convert(&pair);

        group.bench_with_input(
            BenchmarkId::new("ogham", scenario),
            &(&source, &target),
            |b, (src, tgt)| {
                b.iter(|| json_diff(black_box(*src), black_box(*tgt)));
            },
        );

        // Baseline: json-patch crate
        group.bench_with_input(
            BenchmarkId::new("json_patch_crate", scenario),
            &(&pair.0, &pair.1),
            |b, (src, tgt)| {
                b.iter(|| json_patch::diff(black_box(*src), black_box(*tgt)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// JSON Patch Benchmarks
// =============================================================================

fn bench_apply_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_patch");

    for scenario in SCENARIOS {
        let pair = generate_diff_pairs(scenario);
        let (source, target) = convert(&pair);
        let patch = json_diff(&source, &target);
        let baseline_patch = json_patch::diff(&pair.0, &pair.1);

        group.bench_with_input(
            BenchmarkId::new("ogham", scenario),
            &(&source, &patch),
            |b, (src, patch)| {
                b.iter(|| patch.apply(black_box(*src)).unwrap());
            },
        );

        // Baseline: json-patch crate mutates in place, so clone per iteration
        group.bench_with_input(
            BenchmarkId::new("json_patch_crate", scenario),
            &(&pair.0, &baseline_patch),
            |b, (src, patch)| {
                b.iter(|| {
                    let mut doc = (*src).clone();
                    json_patch::patch(&mut doc, black_box(patch)).unwrap();
                    doc
                });
            },
        );
    }

    group.finish();
}

fn bench_pointer_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer_updates");
    let (source, _) = convert(&generate_diff_pairs("medium_field_add"));

    for depth in ["/users", "/users/25", "/users/25/name"] {
        let pointer: JsonPointer = depth.parse().unwrap();
        group.bench_with_input(BenchmarkId::new("resolve", depth), &pointer, |b, pointer| {
            b.iter(|| pointer.resolve(black_box(&source)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("replace", depth), &pointer, |b, pointer| {
            b.iter(|| pointer.replace(black_box(&source), Value::Null).unwrap());
        });
    }

    group.finish();
}

// =============================================================================
// JSON Merge Patch Benchmarks
// =============================================================================

fn generate_merge_data(scenario: &str) -> (serde_json::Value, serde_json::Value) {
    match scenario {
        "simple_merge" => (json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4})),
        "nested_merge" => (
            json!({"config": {"server": {"host": "localhost", "port": 8080}, "debug": false}}),
            json!({"config": {"server": {"port": 9090}, "debug": true}}),
        ),
        "delete_fields" => (
            json!({"a": 1, "b": 2, "c": 3, "d": 4}),
            json!({"b": null, "d": null}),
        ),
        "large_merge" => {
            let target: serde_json::Map<String, serde_json::Value> =
                (0..500).map(|i| (format!("key{i}"), json!(i))).collect();
            let patch: serde_json::Map<String, serde_json::Value> = (250..750)
                .map(|i| (format!("key{i}"), if i % 3 == 0 { json!(null) } else { json!(-i) }))
                .collect();
            (target.into(), patch.into())
        }
        _ => unreachable!(),
    }
}

fn bench_merge_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_patch");

    for scenario in ["simple_merge", "nested_merge", "delete_fields", "large_merge"] {
        let pair = generate_merge_data(scenario);
        let (target, patch) = convert(&pair);
        let size = serde_json::to_string(&pair.0).unwrap().len()
            + serde_json::to_string(&pair.1).unwrap().len();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            BenchmarkId::new("ogham", scenario),
            &(&target, &patch),
            |b, (tgt, pch)| {
                b.iter(|| json_merge_patch(black_box(*tgt), black_box(*pch)));
            },
        );

        // Baseline: json-patch crate merge
        group.bench_with_input(
            BenchmarkId::new("json_patch_crate", scenario),
            &(&pair.0, &pair.1),
            |b, (tgt, pch)| {
                b.iter(|| {
                    let mut doc = (*tgt).clone();
                    json_patch::merge(&mut doc, black_box(*pch));
                    doc
                });
            },
        );
    }

    group.finish();
}

fn bench_merge_diff_and_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_diff");
    let (target, patch) = convert(&generate_merge_data("large_merge"));
    let merged = json_merge_patch(&target, &patch);

    group.bench_function("merge_diff", |b| {
        b.iter(|| json_merge_diff(black_box(&target), black_box(&merged)));
    });

    let patches: Vec<Value> = (0..20)
        .map(|i| Value::from(&json!({format!("key{i}"): i, "shared": {"n": i}})))
        .collect();
    group.bench_function("merge_many_20", |b| {
        b.iter(|| merge_many(black_box(&target), black_box(&patches)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_json_diff,
    bench_apply_patch,
    bench_pointer_updates,
    bench_merge_patch,
    bench_merge_diff_and_many,
);

criterion_main!(benches);
