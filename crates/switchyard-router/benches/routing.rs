//! Routing benchmarks.
//!
//! Run with: `cargo bench -p switchyard-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;
use switchyard_router::Router;

fn build_router(num_routes: usize) -> Router<usize> {
    let mut router = Router::new();

    for i in 0..num_routes / 3 {
        router
            .insert(&format!("GET /api/v1/resource{i}"), i)
            .expect("static pattern");
    }

    for i in 0..num_routes / 3 {
        router
            .insert(&format!("GET /api/v1/resource{i}/{{id}}"), i)
            .expect("param pattern");
    }

    for i in 0..num_routes / 3 {
        router
            .insert(&format!("/mounted/app{i}/"), i)
            .expect("subtree pattern");
    }

    router
}

fn bench_static_match(c: &mut Criterion) {
    let router = build_router(99);

    c.bench_function("static_match", |b| {
        b.iter(|| black_box(router.at(&Method::GET, "/api/v1/resource20")));
    });
}

fn bench_param_match(c: &mut Criterion) {
    let router = build_router(99);

    c.bench_function("param_match", |b| {
        b.iter(|| black_box(router.at(&Method::GET, "/api/v1/resource25/12345")));
    });
}

fn bench_subtree_match(c: &mut Criterion) {
    let router = build_router(99);

    c.bench_function("subtree_match", |b| {
        b.iter(|| black_box(router.at(&Method::POST, "/mounted/app10/deep/nested/path")));
    });
}

fn bench_miss(c: &mut Criterion) {
    let router = build_router(99);

    c.bench_function("miss", |b| {
        b.iter(|| black_box(router.at(&Method::GET, "/api/v1/nonexistent/path")));
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [30, 300, 3000] {
        let router = build_router(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &router, |b, router| {
            b.iter(|| black_box(router.at(&Method::GET, "/api/v1/resource5/1")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_static_match,
    bench_param_match,
    bench_subtree_match,
    bench_miss,
    bench_scaling
);
criterion_main!(benches);
