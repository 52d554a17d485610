use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dsm_core::services::metrics::DsmMetricEngine;
use dsm_core::{CanonicalPath, Config, IncludeGraph};
use std::hint::black_box;

fn chain_graph(n: usize) -> IncludeGraph {
    let mut g = IncludeGraph::new();
    for i in 0..n.saturating_sub(1) {
        let from = CanonicalPath::new(format!("h{i}.h"));
        let to = CanonicalPath::new(format!("h{}.h", i + 1));
        g.add_edge(&from, &to);
    }
    g
}

fn fan_graph(n: usize) -> IncludeGraph {
    let mut g = IncludeGraph::new();
    let hub = CanonicalPath::new("hub.h");
    for i in 0..n {
        let leaf = CanonicalPath::new(format!("leaf{i}.h"));
        g.add_edge(&hub, &leaf);
    }
    g
}

fn cyclic_graph(n: usize) -> IncludeGraph {
    let mut g = IncludeGraph::new();
    for i in 0..n {
        let from = CanonicalPath::new(format!("h{i}.h"));
        let to = CanonicalPath::new(format!("h{}.h", (i + 1) % n));
        g.add_edge(&from, &to);
    }
    g
}

fn benchmark_metric_engine(c: &mut Criterion) {
    let config = Config::default();
    let mut group = c.benchmark_group("dsm_metric_engine");

    for size in [50usize, 200, 500] {
        let chain = chain_graph(size);
        group.bench_with_input(BenchmarkId::new("chain", size), &chain, |b, g| {
            b.iter(|| black_box(DsmMetricEngine::new(&config).compute(black_box(g)).unwrap()));
        });

        let fan = fan_graph(size);
        group.bench_with_input(BenchmarkId::new("fan_out_hub", size), &fan, |b, g| {
            b.iter(|| black_box(DsmMetricEngine::new(&config).compute(black_box(g)).unwrap()));
        });

        let cycle = cyclic_graph(size);
        group.bench_with_input(BenchmarkId::new("single_large_cycle", size), &cycle, |b, g| {
            b.iter(|| black_box(DsmMetricEngine::new(&config).compute(black_box(g)).unwrap()));
        });
    }
    group.finish();
}

fn benchmark_betweenness_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("betweenness_sampling_threshold");

    let graph = fan_graph(600);
    let mut sampled_config = Config::default();
    sampled_config.betweenness_sampling_threshold = 100;
    sampled_config.betweenness_sample_size = 50;

    let mut exact_config = Config::default();
    exact_config.betweenness_sampling_threshold = 10_000;

    group.bench_function("sampled", |b| {
        b.iter(|| {
            black_box(
                DsmMetricEngine::new(&sampled_config)
                    .compute(black_box(&graph))
                    .unwrap(),
            )
        });
    });

    group.bench_function("exact", |b| {
        b.iter(|| {
            black_box(
                DsmMetricEngine::new(&exact_config)
                    .compute(black_box(&graph))
                    .unwrap(),
            )
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_metric_engine,
    benchmark_betweenness_sampling
);
criterion_main!(benches);
