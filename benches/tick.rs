//! Benchmarks for the CPU simulation step.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

use holofield::config::{BackdropConfig, SPHERE_BASE_COLOR};
use holofield::cursor::CursorTracker;
use holofield::field::{fibonacci_sphere, ParticleField};
use holofield::forces::{self, ForceParams};
use holofield::scene::SphereScene;

fn bench_force_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_step");
    let params = ForceParams::default();

    for count in [1_000, 5_000, 20_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut field = ParticleField::new(fibonacci_sphere(count, 80.0), SPHERE_BASE_COLOR);
            let cursor_point = Vec3::new(20.0, 10.0, 50.0);
            b.iter(|| {
                forces::step(&mut field, black_box(cursor_point), &params);
            });
        });
    }

    group.finish();
}

fn bench_scene_tick(c: &mut Criterion) {
    let cfg = BackdropConfig::default();
    let mut scene = SphereScene::new(&cfg);
    let cursor = CursorTracker::new(1920, 1080);
    let mut frame = 0u32;

    c.bench_function("scene_tick", |b| {
        b.iter(|| {
            frame += 1;
            scene.tick(black_box(&cursor), frame as f32 / 60.0);
        })
    });
}

criterion_group!(benches, bench_force_step, bench_scene_tick);
criterion_main!(benches);
