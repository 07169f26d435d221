//! Engine throughput benchmarks: matrix assembly and metric aggregation.
//!
//! Run with: `cargo bench`
//! Results show mean time per run and throughput in events per second.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use catrisk::engine::{aggregate, build_with_pool, BuildConfig};
use catrisk::exposure::{ExposureInventory, ExposurePoint};
use catrisk::geo::{assign, AssignStrategy, GridCell, HazardGrid, LatLon};
use catrisk::hazard::{HazardEvent, HazardEventSet, IntensityField};
use catrisk::parallel::WorkerPool;
use catrisk::vulnerability::VulnerabilityModel;

const GRID_SIDE: u32 = 40;
const N_POINTS: usize = 2_000;
const N_EVENTS: u64 = 500;

fn synthetic_grid() -> HazardGrid {
    HazardGrid::new(
        (0..GRID_SIDE * GRID_SIDE)
            .map(|i| GridCell {
                id: i,
                coord: LatLon::new(
                    f64::from(i / GRID_SIDE) * 0.02,
                    f64::from(i % GRID_SIDE) * 0.02,
                ),
            })
            .collect(),
    )
}

fn synthetic_exposure() -> ExposureInventory {
    ExposureInventory::new(
        (0..N_POINTS)
            .map(|i| ExposurePoint {
                coord: LatLon::new(
                    (i % 1600 / 40) as f64 * 0.02 + 0.003,
                    (i % 40) as f64 * 0.02 + 0.003,
                ),
                value: 10_000.0 + (i % 97) as f64 * 1_000.0,
                asset_type: "building".to_string(),
            })
            .collect(),
    )
}

fn synthetic_events() -> HazardEventSet {
    HazardEventSet::new(
        "TC",
        (0..N_EVENTS)
            .map(|e| {
                // Each event touches one band of the grid.
                let band = (e % u64::from(GRID_SIDE)) as u32;
                let entries = (0..GRID_SIDE)
                    .map(|c| (band * GRID_SIDE + c, 10.0 + ((e * 13 + u64::from(c)) % 45) as f64))
                    .collect();
                HazardEvent::new(
                    e,
                    format!("ev-{e}"),
                    0.001 + (e % 17) as f64 * 0.0005,
                    IntensityField::from_entries(entries),
                )
            })
            .collect(),
    )
}

fn model() -> VulnerabilityModel {
    let mut model = VulnerabilityModel::new();
    model
        .insert_points("TC", "building", vec![(0.0, 0.0), (30.0, 0.1), (60.0, 0.5)])
        .expect("valid curve");
    model
}

fn bench_engine(c: &mut Criterion) {
    let grid = synthetic_grid();
    let exposure = synthetic_exposure();
    let events = synthetic_events();
    let model = model();
    let assignment = assign(&exposure, &grid, AssignStrategy::default());
    let config = BuildConfig::default();

    let mut group = c.benchmark_group("engine");
    group.sample_size(20);
    group.throughput(Throughput::Elements(N_EVENTS));

    group.bench_function("assign_nearest", |b| {
        b.iter(|| assign(black_box(&exposure), black_box(&grid), AssignStrategy::default()))
    });

    for workers in [1usize, 4] {
        let pool = WorkerPool::with_workers(workers);
        group.bench_function(format!("build_matrix_{workers}_workers"), |b| {
            b.iter(|| {
                build_with_pool(
                    black_box(&events),
                    black_box(&exposure),
                    black_box(&assignment),
                    black_box(&model),
                    config,
                    &pool,
                )
                .expect("build")
            })
        });
    }

    let (matrix, diagnostics) = build_with_pool(
        &events,
        &exposure,
        &assignment,
        &model,
        config,
        &WorkerPool::default(),
    )
    .expect("build");
    group.bench_function("aggregate_metrics", |b| {
        b.iter(|| {
            aggregate(
                black_box(&matrix),
                black_box(&events),
                black_box(&exposure),
                diagnostics.clone(),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
