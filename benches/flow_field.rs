//! Measure flow field generation, once on an open grid and once on a
//! generated level the size the game ships with.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dungeon_nav::{generate_bsp_dungeon, generate_flow_field, get_flow_direction, Grid};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn open_grid(width: usize, height: usize) -> Grid {
    let rows = vec![vec![1u8; width]; height];
    // rows are rectangular and binary by construction
    Grid::from_rows(&rows).unwrap()
}

fn flow_open(c: &mut Criterion) {
    let grid = open_grid(100, 100);
    c.bench_function("flow_field_open_100x100", |b| {
        b.iter(|| generate_flow_field(black_box(1000.0), black_box(1000.0), &grid, 20.0))
    });
}

fn flow_level(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let layout = generate_bsp_dungeon(2000.0, 2000.0, 100.0, 5, &mut rng);
    let target = layout.rooms[0].center();
    c.bench_function("flow_field_level_2000", |b| {
        b.iter(|| {
            generate_flow_field(
                black_box(target.x),
                black_box(target.y),
                &layout.grid,
                layout.cell_size,
            )
        })
    });

    let field = generate_flow_field(target.x, target.y, &layout.grid, layout.cell_size)
        .unwrap()
        .unwrap();
    let samples: Vec<_> = layout.rooms.iter().map(|r| r.center()).collect();
    c.bench_function("flow_direction_per_room", |b| {
        b.iter(|| {
            for p in &samples {
                black_box(get_flow_direction(p.x, p.y, Some(&field)));
            }
        })
    });
}

criterion_group!(benches, flow_open, flow_level);
criterion_main!(benches);
