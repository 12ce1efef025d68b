//! Step throughput of both field variants.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wavegrid::{AcousticParams, DampedHeightField, GridWaveField, WaterParams};

const SIZES: [u32; 3] = [64, 256, 1024];

fn bench_acoustic_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Acoustic Step");

    for size in SIZES {
        let mut field = GridWaveField::new(size, size, AcousticParams::default()).unwrap();
        field.place_walls(&[(size as i32 / 4, 0), (size as i32 / 4, size as i32 / 2)]);
        field.inject_source(size as i32 / 2, size as i32 / 2, 1.0).unwrap();

        group.throughput(Throughput::Elements(size as u64 * size as u64));
        group.bench_function(format!("{}x{}", size, size), |b| {
            b.iter(|| {
                field.step();
                black_box(field.value(0, 0).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_water_step(c: &mut Criterion) {
    let params = WaterParams::default();
    let mut group = c.benchmark_group("Water Step");

    for size in SIZES {
        let mut field = DampedHeightField::new(size, size).unwrap();
        let mid = size as i32 / 2;
        field.carve_barrier(&[(8, mid - 7), (size as i32 - 8, mid - 7)]);
        field.set_velocity(mid, mid, 50_000.0).unwrap();

        group.throughput(Throughput::Elements(size as u64 * size as u64));
        group.bench_function(format!("{}x{}", size, size), |b| {
            b.iter(|| {
                field.step_with(black_box(&params));
                black_box(field.cell(0, 0).unwrap().pos)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_acoustic_step, bench_water_step);
criterion_main!(benches);
