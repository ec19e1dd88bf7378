// Generation and frame-step throughput.
//
// `terrain_*` measures the parallel block builder over widening ranges,
// `populate_window` a full terrain-plus-flora build for one window, and
// `step_dense_world` one frame of a heavily forested world with a jump.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sidescape_sim::avatar::ActionInput;
use sidescape_sim::config::WorldConfig;
use sidescape_sim::terrain::TerrainBuilder;
use sidescape_sim::world::World;
use std::hint::black_box;

fn bench_terrain(c: &mut Criterion) {
    let config = WorldConfig::default();
    let Ok(terrain) = TerrainBuilder::from_config(7, &config) else {
        return;
    };
    let mut group = c.benchmark_group("terrain");
    for width in [800, 8_000, 80_000] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &w| {
            b.iter(|| black_box(terrain.generate_blocks(0, w).map(|v| v.len())));
        });
    }
    group.finish();
}

fn bench_populate(c: &mut Criterion) {
    c.bench_function("populate_window", |b| {
        b.iter(|| {
            let Ok(mut world) = World::new(WorldConfig::default(), 7) else {
                return;
            };
            black_box(world.populate(0, 800).ok());
        });
    });
}

fn bench_step(c: &mut Criterion) {
    let mut config = WorldConfig::default();
    config.flora.tree_probability = 1.0;
    config.flora.leaf_probability = 1.0;
    config.flora.fruit_probability = 1.0;
    let Ok(mut world) = World::new(config, 7) else {
        return;
    };
    if world.populate(0, 8_000).is_err() {
        return;
    }
    let jump = ActionInput {
        jump: true,
        ..Default::default()
    };

    c.bench_function("step_dense_world", |b| {
        b.iter(|| {
            // Keep the avatar grounded so every frame jumps.
            world.avatar_mut().body.velocity.y = 0.0;
            black_box(world.step(0.04, &jump))
        });
    });
}

criterion_group!(benches, bench_terrain, bench_populate, bench_step);
criterion_main!(benches);
