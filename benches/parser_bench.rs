use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use hocon::{ConfigOptions, document};
use std::fs;
use std::path::Path;

fn criterion_benchmark(c: &mut Criterion) {
    let path = Path::new("benches/reference.conf");
    let data = fs::read_to_string(path).expect("failed to read benchmark fixture");

    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("parse_string", |b| {
        b.iter_batched(
            || data.clone(),
            |data| {
                document::parse_string(&data, ConfigOptions::default()).unwrap();
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("parse_and_resolve", |b| {
        b.iter_batched(
            || data.clone(),
            |data| {
                let doc = document::parse_string(&data, ConfigOptions::default()).unwrap();
                document::resolve(doc).unwrap();
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();

    c.bench_function("load_config", |b| {
        b.iter(|| document::load(path, ConfigOptions::default()).unwrap());
    });
}

fn custom_criterion() -> Criterion {
    Criterion::default()
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
}

criterion_group! {
    name = benches;
    config = custom_criterion();
    targets = criterion_benchmark
}
criterion_main!(benches);
