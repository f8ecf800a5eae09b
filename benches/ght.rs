use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ght_index::metric::EuclideanPoint;
use ght_index::tree::{HyperplaneTree, HyperplaneTreeBuilder, SplitStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STRATEGIES: [(&str, SplitStrategy); 4] = [
    ("generic", SplitStrategy::Generic),
    ("leanest", SplitStrategy::Leanest),
    ("monotonous", SplitStrategy::Monotonous),
    ("permutation", SplitStrategy::Permutation),
];

fn generate_points(n: usize) -> Vec<EuclideanPoint> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            EuclideanPoint::new(vec![
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            ])
        })
        .collect()
}

fn build_tree(strategy: SplitStrategy, points: &[EuclideanPoint]) -> HyperplaneTree<EuclideanPoint> {
    let mut tree = HyperplaneTreeBuilder::new_with_bucket_capacity(strategy, 16)
        .finish()
        .unwrap();
    for point in points {
        tree.insert(point.clone()).unwrap();
    }
    tree
}

fn benchmark_insert(c: &mut Criterion) {
    let points = generate_points(1000);

    let mut group = c.benchmark_group("insert");
    for (name, strategy) in STRATEGIES {
        group.bench_with_input(BenchmarkId::new("1000_points", name), &strategy, |b, &strategy| {
            b.iter(|| build_tree(strategy, &points))
        });
    }
    group.finish();
}

fn benchmark_range_search(c: &mut Criterion) {
    let points = generate_points(1000);
    let query = EuclideanPoint::new(vec![0.0, 0.0]);

    let mut group = c.benchmark_group("range_search");
    for (name, strategy) in STRATEGIES {
        let tree = build_tree(strategy, &points);
        group.bench_with_input(BenchmarkId::new("radius_20", name), &tree, |b, tree| {
            b.iter(|| tree.range_search(&query, 20.0).unwrap())
        });
    }
    group.finish();
}

fn benchmark_knn(c: &mut Criterion) {
    let points = generate_points(1000);
    let query = EuclideanPoint::new(vec![0.0, 0.0]);

    let mut group = c.benchmark_group("nearest_neighbor_search");
    for (name, strategy) in STRATEGIES {
        let tree = build_tree(strategy, &points);
        group.bench_with_input(BenchmarkId::new("k_10", name), &tree, |b, tree| {
            b.iter(|| tree.nearest_neighbor_search(&query, 10).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_range_search,
    benchmark_knn
);
criterion_main!(benches);
