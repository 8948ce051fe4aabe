use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geocluster::cluster::{AnalyzerConfig, Round, RoundAnalyzer};
use geocluster::{FarthestPointSampler, Point};
use rand::prelude::*;

fn random_points(rng: &mut StdRng, n: usize) -> Vec<Point> {
    (0..n)
        .map(|_| {
            Point::new(
                -37.8 + rng.random::<f64>() * 0.05,
                144.9 + rng.random::<f64>() * 0.05,
            )
        })
        .collect()
}

fn bench_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("rounds");

    let mut rng = StdRng::seed_from_u64(42);
    let rounds: Vec<Round> = (0..100)
        .map(|id| Round::new(id, random_points(&mut rng, 5)))
        .collect();

    group.bench_function("analyze_100_rounds_n5", |b| {
        let analyzer = RoundAnalyzer::new(AnalyzerConfig::default());
        b.iter(|| {
            analyzer.analyze(black_box(&rounds)).unwrap();
        })
    });

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("farthest_point");
    group.sample_size(20);

    let mut rng = StdRng::seed_from_u64(42);
    let pool = random_points(&mut rng, 1000);

    group.bench_function("sample_m1000_k100", |b| {
        b.iter(|| {
            FarthestPointSampler::new(100)
                .with_seed(42)
                .sample(black_box(&pool))
                .unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_rounds, bench_sampling);
criterion_main!(benches);
