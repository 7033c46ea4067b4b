//! Performance benchmarks for store-backed streams.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use store_stream::{state_stream, PipeThrough, ReducerStore, Store};

fn create_store() -> Arc<ReducerStore<u64, u64>> {
    Arc::new(ReducerStore::new(0, |state: &u64, delta: &u64| state + delta))
}

/// Benchmark piping action sequences of varying length
fn bench_pipe_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipe_through");

    for len in [10, 100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("actions", len), &len, |b, &len| {
            b.iter(|| {
                let store = create_store();
                let stream = state_stream(store).unwrap();
                let last = (0..len as u64)
                    .map(|_| 1)
                    .pipe_through(stream)
                    .map(|state| state.unwrap())
                    .last();
                black_box(last);
            });
        });
    }

    group.finish();
}

/// Benchmark dispatch cost with many streams observing one store
fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");

    for streams in [1, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("streams", streams),
            &streams,
            |b, &streams| {
                let store = create_store();
                let observers: Vec<_> = (0..streams)
                    .map(|_| state_stream(Arc::clone(&store)).unwrap())
                    .collect();

                b.iter(|| {
                    store.dispatch(black_box(1)).unwrap();
                    for observer in &observers {
                        black_box(observer.drain());
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_pipe_through, bench_fan_out);

criterion_main!(benches);
