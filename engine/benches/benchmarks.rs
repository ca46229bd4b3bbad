//! Performance benchmarks for sdkbase-engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sdkbase_engine::{
    record_from_value, Collector, CollectorConfig, FnGateway, Record, RecordStore,
    TransportError,
};
use serde_json::json;
use tempfile::TempDir;

fn create_records(size: usize) -> Vec<Record> {
    (0..size)
        .map(|i| {
            record_from_value(json!({
                "id": i,
                "name": format!("User {}", i),
                "email": format!("user{}@test.com", i),
                "group": i % 7,
            }))
            .unwrap()
        })
        .collect()
}

fn bench_store_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_search");

    for size in [100, 1000, 10000].iter() {
        let mut store = RecordStore::new();
        store.set_records(create_records(*size));

        group.bench_with_input(BenchmarkId::new("search_item_last", size), size, |b, &size| {
            let fields = record_from_value(json!({"id": size - 1})).unwrap();
            b.iter(|| store.search_item(black_box(&fields)))
        });

        group.bench_with_input(BenchmarkId::new("search_all", size), size, |b, _| {
            let fields = record_from_value(json!({"group": 3})).unwrap();
            b.iter(|| store.search_all(black_box(&fields)).len())
        });
    }

    group.finish();
}

fn bench_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("save", size), size, |b, &size| {
            let dir = TempDir::new().unwrap();
            let mut store = RecordStore::with_path(dir.path().join("bench.json")).unwrap();
            store.set_records(create_records(size));

            b.iter(|| store.save())
        });

        group.bench_with_input(BenchmarkId::new("load", size), size, |b, &size| {
            let dir = TempDir::new().unwrap();
            let mut store = RecordStore::with_path(dir.path().join("bench.json")).unwrap();
            store.replace(create_records(size)).unwrap();

            b.iter(|| store.load())
        });
    }

    group.finish();
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("collector");

    // One full batch over a large list, checkpoint write included
    group.bench_function("collect_one_batch", |b| {
        let list = create_records(5000);

        b.iter_with_setup(
            || {
                let dir = TempDir::new().unwrap();
                let list = list.clone();
                let gateway = FnGateway::new(
                    move || -> Result<Vec<Record>, TransportError> { Ok(list.clone()) },
                    |item: &Record| -> Result<Record, TransportError> { Ok(item.clone()) },
                );
                let config = CollectorConfig::in_dir(dir.path(), "bench");
                let collector = Collector::open(&config, gateway).unwrap();
                (dir, collector)
            },
            |(dir, mut collector)| (collector.collect(), dir),
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_store_search,
    bench_persistence,
    bench_collect,
);
criterion_main!(benches);
