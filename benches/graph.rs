use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rggpath::{ExperimentDriver, GeometricGraph, KdTree, LinearScan, Point, SpatialIndex, UniformGrid, sample};

const SIZES: [usize; 4] = [100, 1000, 5000, 20_000];

/// Threshold giving an average degree of about 10 in the unit square.
fn eps_for(n: usize) -> f64 {
    (10.0 / (std::f64::consts::PI * n as f64)).sqrt()
}

fn benchmark_radius_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("radius_pairs");
    group.sample_size(10);

    for &size in &SIZES {
        let points = sample(&mut StdRng::seed_from_u64(123456789), size, 1.0, 1.0).unwrap();
        let eps = eps_for(size);

        group.bench_with_input(BenchmarkId::new("kdtree", size), &points, |b, p| {
            b.iter(|| KdTree::build(p.clone()).radius_pairs(eps).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("grid", size), &points, |b, p| {
            b.iter(|| UniformGrid::build(p.clone()).radius_pairs(eps).unwrap())
        });

        // quadratic baseline
        if size <= 5000 {
            group.bench_with_input(BenchmarkId::new("linear", size), &points, |b, p| {
                b.iter(|| LinearScan::build(p.clone()).radius_pairs(eps).unwrap())
            });
        }
    }
    group.finish();
}

fn benchmark_shortest_path(c: &mut Criterion) {
    let points = sample(&mut StdRng::seed_from_u64(123456789), 5000, 1.0, 1.0).unwrap();
    let graph: GeometricGraph = GeometricGraph::build(points, eps_for(5000)).unwrap();
    let (start, end) = (Point::new(0.0, 0.0), Point::new(1.0, 1.0));

    c.bench_function("shortest_path_5000", |b| {
        b.iter(|| black_box(graph.shortest_path(black_box(start), black_box(end)).ok()))
    });
}

fn benchmark_sweep(c: &mut Criterion) {
    let (start, end) = (Point::new(0.0, 0.0), Point::new(1.0, 1.0));
    let mut group = c.benchmark_group("sweep_1000x20");
    group.sample_size(10);

    group.bench_function("sequential", |b| {
        let mut driver: ExperimentDriver = ExperimentDriver::from_seed(1);
        b.iter(|| driver.single_sweep(start, end, 20, 1000, eps_for(1000)).unwrap())
    });

    group.bench_function("parallel", |b| {
        let mut driver: ExperimentDriver = ExperimentDriver::from_seed(1);
        b.iter(|| driver.par_single_sweep(start, end, 20, 1000, eps_for(1000)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, benchmark_radius_pairs, benchmark_shortest_path, benchmark_sweep);
criterion_main!(benches);
