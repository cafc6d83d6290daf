//! Criterion benchmarks for the Gamma sampler and distribution functions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gv_core::{GammaVariate, NumericalGamma, RngSource, ThreadRngSource};

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");

    // Boosted small shape, the a == 1 edge, and the plain rejection path.
    for a in [0.3, 1.0, 2.5, 100.0] {
        let source = RngSource::seeded(42);
        let variate = GammaVariate::new(&source, &source, NumericalGamma);
        group.bench_with_input(BenchmarkId::new("seeded", a), &a, |bench, &a| {
            bench.iter(|| black_box(variate.sample(black_box(a), 2.0)));
        });
    }

    let variate = GammaVariate::new(ThreadRngSource, ThreadRngSource, NumericalGamma);
    group.bench_function("thread_rng", |bench| {
        bench.iter(|| black_box(variate.sample(black_box(2.5), 2.0)));
    });

    group.finish();
}

fn bench_closure(c: &mut Criterion) {
    let source = RngSource::seeded(7);
    let variate = GammaVariate::new(&source, &source, NumericalGamma);
    let Ok(draw) = variate.density_closure(4.0, 1.5) else {
        return;
    };
    c.bench_function("density_closure", |bench| {
        bench.iter(|| black_box(draw()));
    });
}

fn bench_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribution");
    let variate = GammaVariate::thread_local();

    for (name, x) in [("body", 5.0), ("tail", 40.0)] {
        group.bench_with_input(BenchmarkId::new("pdf", name), &x, |bench, &x| {
            bench.iter(|| black_box(variate.pdf(black_box(x), 3.0, 2.0)));
        });
        group.bench_with_input(BenchmarkId::new("cdf", name), &x, |bench, &x| {
            bench.iter(|| black_box(variate.cdf(black_box(x), 3.0, 2.0)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sample, bench_closure, bench_distribution);
criterion_main!(benches);
