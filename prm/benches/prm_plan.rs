use std::time::Duration;
use criterion::{Criterion, BenchmarkId, SamplingMode, criterion_group, criterion_main};

use nalgebra as na;
use rand::prelude::*;

use prm::{PRMBuilder, Point3};

fn point3(x: f32, y: f32, z: f32) -> Point3 {
    na::Point3::new(x, y, z)
}

fn prm_full(c: &mut Criterion) {
    let start = point3(10.0, 10.0, 10.0);
    let goal = point3(50.0, 50.0, 50.0);

    let mut obstacle_rng = StdRng::seed_from_u64(42);
    let obstacles: Vec<Point3> = std::iter::repeat_with(|| obstacle_rng.gen::<Point3>() * 60.0)
        .take(50)
        .collect();

    let mut group = c.benchmark_group("PRM");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    for n_samples in [500, 2_000] {
        group.bench_function(BenchmarkId::from_parameter(n_samples), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                PRMBuilder::new(start, goal)
                    .extend_obstacles(obstacles.iter().copied())
                    .with_clearance(2.0)
                    .with_n_samples(n_samples)
                    .solve(&mut rng)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, prm_full);
criterion_main!(benches);
