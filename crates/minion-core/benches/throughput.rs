//! MINION vs JSON throughput.
//!
//! Run with: cargo bench --bench throughput
//!
//! Each group compares the MINION codec against `serde_json` on the same
//! document, in both directions:
//! - `header`: a single two-field record (the original motivating case)
//! - `rows`: an array of uniform records, where shape dedup pays off
//! - `order`: nested records inside arrays

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use minion_core::{decode, encode, Value};

fn header_doc() -> serde_json::Value {
    serde_json::json!({
        "Content-Type": "application/json",
        "Content-Length": 123
    })
}

fn rows_doc(n: usize) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "name": format!("user-{i}"),
                "score": i as f64 * 1.5,
                "active": i % 2 == 0
            })
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn order_doc() -> serde_json::Value {
    serde_json::json!({
        "index": "ord-123",
        "items": [
            {"index": 1, "name": "Widget", "price": 19.99, "quantity": 2},
            {"index": 2, "name": "Gadget", "price": 29.99, "quantity": 1},
            {"index": 3, "name": "Gizmo", "price": 39.99, "quantity": 1}
        ],
        "total": 109.96
    })
}

fn bench_codecs(c: &mut Criterion) {
    let docs = [
        ("header", header_doc()),
        ("rows", rows_doc(100)),
        ("order", order_doc()),
    ];

    for (label, json) in docs {
        let value = Value::from(json.clone());
        let minion_text = encode(&value).expect("bench document must encode");
        let json_text = serde_json::to_string(&json).expect("bench document must serialize");

        let mut group = c.benchmark_group(label);
        group.bench_function(BenchmarkId::new("encode", "minion"), |b| {
            b.iter(|| encode(black_box(&value)))
        });
        group.bench_function(BenchmarkId::new("encode", "json"), |b| {
            b.iter(|| serde_json::to_string(black_box(&json)))
        });
        group.bench_function(BenchmarkId::new("decode", "minion"), |b| {
            b.iter(|| decode(black_box(&minion_text)))
        });
        group.bench_function(BenchmarkId::new("decode", "json"), |b| {
            b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(&json_text)))
        });
        group.finish();
    }
}

criterion_group!(benches, bench_codecs);
criterion_main!(benches);
