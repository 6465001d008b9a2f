//! Criterion benchmarks for floor generation and pathfinding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use warren::{FloorCatalog, FloorGenerator, GenerationOptions, GridPoint, PathGrid};

fn bench_generate_floor(c: &mut Criterion) {
    let catalog = FloorCatalog::demo().expect("demo catalog");
    c.bench_function("generate_floor_1", |b| {
        b.iter(|| {
            let mut generator = FloorGenerator::new(
                catalog.clone(),
                GenerationOptions::for_testing(black_box(42)),
            )
            .expect("generator");
            generator.generate().expect("floor")
        })
    });
}

fn bench_find_path(c: &mut Criterion) {
    let mut grid = PathGrid::new(64, 64);
    // A few long walls to force detours.
    for y in 8..56 {
        grid.set_walkable(20, y, false);
    }
    for y in 8..56 {
        grid.set_walkable(44, 63 - y, false);
    }

    c.bench_function("find_path_64x64", |b| {
        b.iter(|| {
            grid.find_path(
                black_box(GridPoint::new(0, 0)),
                black_box(GridPoint::new(63, 63)),
                true,
            )
        })
    });
}

criterion_group!(benches, bench_generate_floor, bench_find_path);
criterion_main!(benches);
