use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use xmeans::cluster::{Clustering, Kmeans, RandomCentroids, SquaredEuclidean, XMeans};

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    // Generate synthetic data
    let mut rng = StdRng::seed_from_u64(42);
    let n = 1000;
    let d = 16;
    let k = 10;

    let data: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f64>()).collect())
        .collect();

    group.bench_function("fit_n1000_d16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new(k).with_max_iter(10).with_seed(42);
            model
                .fit(black_box(&data), &RandomCentroids, &SquaredEuclidean)
                .unwrap();
        })
    });

    group.finish();
}

fn bench_xmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("xmeans");

    // Five separated blobs of 100 points each.
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<Vec<f64>> = (0..500)
        .map(|i| {
            let center = (i % 5) as f64 * 25.0;
            vec![center + rng.random::<f64>(), center + rng.random::<f64>()]
        })
        .collect();

    group.bench_function("fit_n500_blobs5", |b| {
        b.iter(|| {
            let model = XMeans::new().with_seed(42);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_xmeans);
criterion_main!(benches);
