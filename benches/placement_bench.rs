//! Criterion benchmarks for u-placement.
//!
//! Uses synthetic grid instances: devices scattered over a 3 km square
//! and candidate sites on a regular grid above it.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_placement::ga::{GaConfig, GaRunner};
use u_placement::model::{CandidatePosition, Device, GatewayProfile, Position};
use u_placement::neighbor::NeighborGenerator;
use u_placement::problem::{Problem, ProblemConfig};
use u_placement::random::create_rng;
use u_placement::sa::{SaConfig, SaRunner};
use u_placement::solution::Solution;
use u_placement::tabu::{TabuConfig, TabuRunner};

// ===========================================================================
// Instances
// ===========================================================================

fn grid(num_devices: usize, num_sites: usize, num_slices: usize) -> Problem {
    const SIDE: f64 = 3_000.0;
    let devices = (0..num_devices)
        .map(|i| {
            let x = (i as f64 * 0.618_033_988_75).fract() * SIDE;
            let y = (i as f64 * 0.754_877_666_25).fract() * SIDE;
            Device::new(i, Position::new(x, y, 0.0), i % num_slices)
        })
        .collect();
    let per_row = (num_sites as f64).sqrt().ceil() as usize;
    let step = SIDE / per_row as f64;
    let sites = (0..num_sites)
        .map(|i| {
            let x = (i % per_row) as f64 * step + step / 2.0;
            let y = (i / per_row) as f64 * step + step / 2.0;
            CandidatePosition::new(i, Position::new(x, y, 30.0))
        })
        .collect();
    Problem::new(
        ProblemConfig::default(),
        devices,
        sites,
        GatewayProfile::reference(num_slices),
    )
    .expect("grid instance is feasible")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_neighbor_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_batch");

    for &(devices, sites) in &[(50, 16), (200, 36), (800, 64)] {
        let problem = grid(devices, sites, 3);
        let mut rng = create_rng(42);
        let solution = Solution::random(&problem, &mut rng).expect("random solution");
        let generator = NeighborGenerator::site_aware();
        group.bench_with_input(
            BenchmarkId::new(format!("d{devices}_s{sites}"), devices),
            &solution,
            |b, s| {
                b.iter(|| {
                    let batch = generator.batch(black_box(s), 20, &mut rng);
                    black_box(batch)
                })
            },
        );
    }
    group.finish();
}

fn bench_tabu(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabu");
    group.sample_size(10);

    for &devices in &[50, 200] {
        let problem = grid(devices, 25, 3);
        let config = TabuConfig::default()
            .with_max_iterations(500)
            .with_time_limit(None)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(devices), &config, |b, c| {
            b.iter(|| {
                let result = TabuRunner::run(black_box(&problem), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_sa(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa");
    group.sample_size(10);

    for &devices in &[50, 200] {
        let problem = grid(devices, 25, 3);
        let config = SaConfig::default()
            .with_max_iterations(5_000)
            .with_time_limit(None)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(devices), &config, |b, c| {
            b.iter(|| {
                let result = SaRunner::run(black_box(&problem), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_ga(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga");
    group.sample_size(10);

    let problem = grid(100, 25, 2);
    for &workers in &[1, 4] {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(5)
            .with_workers(workers)
            .with_time_limit(None)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::new("workers", workers), &config, |b, c| {
            b.iter(|| {
                let result = GaRunner::run(black_box(&problem), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_neighbor_batch, bench_tabu, bench_sa, bench_ga);
criterion_main!(benches);
