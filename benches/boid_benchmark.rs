/*
 * Boid Simulation Benchmark
 *
 * Measures the pairwise force pass (sequential and rayon) and a full frame
 * step for growing flock sizes.
 */

use boid_arena::{physics, Obstacle, ResponseCurve, Simulation, SimulationParams};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FLOCK_SIZES: [usize; 3] = [100, 500, 1000];

// Dense flock so most pairs land inside the interaction ranges
fn dense_params(num_boids: usize, enable_parallel: bool) -> SimulationParams {
    SimulationParams {
        num_boids,
        arena_radius: 2.0,
        enable_parallel,
        ..SimulationParams::default()
    }
}

fn build(num_boids: usize, enable_parallel: bool) -> Simulation {
    let mut rng = StdRng::seed_from_u64(7);
    Simulation::with_random_flock(
        dense_params(num_boids, enable_parallel),
        ResponseCurve::smoothstep(ResponseCurve::DEFAULT_BUCKETS).unwrap(),
        &mut rng,
    )
    .unwrap()
}

fn bench_pairwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise");

    for &n in FLOCK_SIZES.iter() {
        let simulation = build(n, false);
        let mut boids = simulation.boids().to_vec();

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, _| {
            b.iter(|| {
                physics::accumulate_pairwise(black_box(&mut boids), simulation.params(), simulation.curve())
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |b, _| {
            b.iter(|| {
                physics::accumulate_pairwise_parallel(
                    black_box(&mut boids),
                    simulation.params(),
                    simulation.curve(),
                )
            });
        });
    }

    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    group.sample_size(20);

    for &n in FLOCK_SIZES.iter() {
        for enable_parallel in [false, true] {
            let mut simulation = build(n, enable_parallel);
            simulation.add_obstacle(Obstacle::reference_column(simulation.params()));
            simulation.set_obstacle_mode(true);
            let label = if enable_parallel { "parallel" } else { "sequential" };

            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| black_box(simulation.step()).ok());
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_pairwise, bench_step);
criterion_main!(benches);
