use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use pathgraph::{
    PathQuery, ResultSet, build_response,
    bench_utils::{generate_flat_segments, generate_tree_rows},
    reconstruct,
};

const TREE_SEED: u64 = 0xD44F;
const FLAT_SEED: u64 = 0xE550;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

fn bench_scale() -> usize {
    #[cfg(feature = "bench-ci")]
    {
        5_000
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        50_000
    }
}

fn bench_tree(c: &mut Criterion) {
    let tree = generate_tree_rows(bench_scale(), TREE_SEED);
    let query = PathQuery::cheapest("n0", tree.deepest.as_str());
    let mut group = c.benchmark_group("tree_decode");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    group.bench_function("deepest", |b| {
        b.iter(|| reconstruct(&query, &tree.rows).expect("decode"));
    });
    group.finish();
}

fn bench_flat(c: &mut Criterion) {
    let rows = generate_flat_segments(bench_scale() / 10, 20, FLAT_SEED);
    let mut group = c.benchmark_group("flat_decode");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    group.bench_function("paths", |b| {
        b.iter(|| reconstruct(&PathQuery::paths("s", "t"), &rows).expect("decode"));
    });
    group.bench_function("cheapest", |b| {
        b.iter(|| reconstruct(&PathQuery::cheapest("s", "t"), &rows).expect("decode"));
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let scale = bench_scale() / 100;
    let mut queries = Vec::new();
    let mut results = Vec::new();
    for idx in 0..64u64 {
        if idx % 2 == 0 {
            let tree = generate_tree_rows(scale, TREE_SEED + idx);
            queries.push(PathQuery::cheapest("n0", tree.deepest));
            results.push(ResultSet::new(tree.rows));
        } else {
            queries.push(PathQuery::paths("s", "t"));
            results.push(ResultSet::new(generate_flat_segments(8, 10, FLAT_SEED + idx)));
        }
    }
    let mut group = c.benchmark_group("batch");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    group.bench_function("mixed_64", |b| {
        b.iter(|| build_response(&queries, &results).expect("response"));
    });
    group.finish();
}

criterion_group!(
    name = reconstruct_benches;
    config = Criterion::default();
    targets = bench_tree, bench_flat, bench_batch
);
criterion_main!(reconstruct_benches);
