use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use point_quadtree::quadtree::Quadtree;
use point_quadtree::Point;
use rand::seq::SliceRandom;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn get_rand() -> SmallRng {
    SmallRng::seed_from_u64(0xdeadbeef)
}

// uniform on a 1000 by 1000 region, three decimal digits
fn random_point(rng: &mut impl Rng) -> Point {
    let x = (rng.gen_range(0.0, 1000.0) * 1000.0f64).round() / 1000.0;
    let y = (rng.gen_range(0.0, 1000.0) * 1000.0f64).round() / 1000.0;
    Point::new(x, y)
}

/// Tree plus a shuffled full-deletion order, so both strategies get the same
/// input per size.
fn make_workload(size: usize) -> (Quadtree, Vec<Point>) {
    let mut rng = get_rand();
    let mut qt = Quadtree::new();
    let mut points = Vec::with_capacity(size);
    for _ in 0..size {
        let p = random_point(&mut rng);
        points.push(p);
        qt.insert(p);
    }
    points.shuffle(&mut rng);
    (qt, points)
}

fn delete_all_full(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree delete_full all points");
    for size in 4..13 {
        let size: usize = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (qt, points) = make_workload(size);
            b.iter_batched(
                || qt.clone(),
                |mut qt| {
                    for p in &points {
                        qt.delete_full(p);
                    }
                    qt
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn delete_all_partial(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree delete_partial all points");
    for size in 4..13 {
        let size: usize = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (qt, points) = make_workload(size);
            b.iter_batched(
                || qt.clone(),
                |mut qt| {
                    for p in &points {
                        qt.delete_partial(p);
                    }
                    qt
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree build");
    for size in 4..13 {
        let size: usize = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();
            b.iter(|| {
                let mut qt = Quadtree::new();
                for _ in 0..size {
                    qt.insert(random_point(&mut rng));
                }
                qt
            });
        });
    }
    group.finish();
}

criterion_group!(deletion_benches, build_tree, delete_all_full, delete_all_partial);

criterion_main!(deletion_benches);
