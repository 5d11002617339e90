// SPDX-License-Identifier: PMPL-1.0-or-later
//! Per-keystroke and persistence benchmarks for POJO tag lines

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;

use pojo_history::{HistoryStore, InMemoryBackend};
use pojo_parser::parse_line;
use pojo_schema::{normalize, SchemaRegistry};
use pojo_session::PojoSession;
use pojo_suggest::Suggester;

const SETTINGS: &str = r#"{
    "daily_entries": ["Daily"],
    "databases": [
        {
            "database": "Exercise",
            "type": "Type",
            "params": ["Duration", "Gear", "Description"],
            "fields": {
                "Type": { "allowed": "history-type", "values": { "_ALL": ["Run", "Swim", "Ride", "Row"] } },
                "Duration": { "allowed": "history" },
                "Gear": { "allowed": "history-type", "multi": "," }
            }
        },
        {
            "database": "Meal",
            "params": ["Food", "Description"],
            "fields": { "Food": { "allowed": "history", "multi": "," } }
        }
    ]
}"#;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_json_str(SETTINGS).unwrap()
}

/// A store with `n` remembered durations and meals.
fn populated_store(rt: &Runtime, registry: &SchemaRegistry, n: usize) -> HistoryStore<InMemoryBackend> {
    rt.block_on(async {
        let mut store = HistoryStore::open(InMemoryBackend::new()).await.unwrap();
        let exercise = registry.database("Exercise").unwrap();
        let meal = registry.database("Meal").unwrap();
        for i in 0..n {
            let record = parse_line(registry, &format!("Exercise/Run {i}; shoes, watch")).unwrap().record;
            store.add_to_history(exercise, &record);
            let record = parse_line(registry, &format!("Meal/Lunch food{i}")).unwrap().record;
            store.add_to_history(meal, &record);
        }
        store
    })
}

// ============================================================================
// Normalizer
// ============================================================================

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for input in ["exercise-run", "new york city", "12345", "felt really quite great today"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| black_box(normalize(input)))
        });
    }
    group.finish();
}

// ============================================================================
// Parser
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("parse");

    for line in [
        "Exercise",
        "Exercise/Run",
        "Exercise/run 30; shoes, watch; easy pace",
        "Meal/Lunch soup, bread, cheese",
    ] {
        group.throughput(Throughput::Bytes(line.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(line), line, |b, line| {
            b.iter(|| black_box(parse_line(&registry, line).ok()))
        });
    }
    group.finish();
}

// ============================================================================
// Suggestions
// ============================================================================

fn bench_suggest(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let registry = registry();
    let mut group = c.benchmark_group("suggest");

    for size in [10, 100, 1000] {
        let store = populated_store(&rt, &registry, size);
        let suggester = Suggester::new(&registry, store.document());
        let record = parse_line(&registry, "Exercise/Run 1").unwrap().record;

        group.bench_with_input(BenchmarkId::new("history_prefix", size), &size, |b, _| {
            b.iter(|| black_box(suggester.suggest(&record)))
        });
    }
    group.finish();
}

fn bench_session_keystroke(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let session = rt.block_on(async {
        let mut session = PojoSession::open(registry(), InMemoryBackend::new()).await.unwrap();
        for i in 0..200 {
            session
                .record_line(&format!("#Meal/Dinner dish{i}, bread"))
                .await
                .unwrap();
        }
        session
    });

    let line = "#Meal/Dinner soup, di";
    let cursor = line.chars().count();
    c.bench_function("session_suggest_multi", |b| {
        b.iter(|| black_box(session.suggest(line, cursor)))
    });
    c.bench_function("session_hint", |b| b.iter(|| black_box(session.hint(line))));
}

// ============================================================================
// Persistence
// ============================================================================

fn bench_history_save(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let registry = registry();
    let mut group = c.benchmark_group("history");

    for size in [100, 1000] {
        let store = populated_store(&rt, &registry, size);
        let bytes = serde_json_bytes(&rt, store);

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("load", size), &bytes, |b, bytes| {
            b.to_async(&rt).iter(|| async {
                let backend = InMemoryBackend::with_contents(bytes.clone());
                black_box(HistoryStore::open(backend).await.unwrap())
            });
        });
    }
    group.finish();
}

/// Persist a store and return the written blob.
fn serde_json_bytes(rt: &Runtime, mut store: HistoryStore<InMemoryBackend>) -> Vec<u8> {
    rt.block_on(async {
        store.save().await.unwrap();
        store.backend().contents().await.unwrap()
    })
}

criterion_group!(
    benches,
    bench_normalize,
    bench_parse,
    bench_suggest,
    bench_session_keystroke,
    bench_history_save,
);
criterion_main!(benches);
