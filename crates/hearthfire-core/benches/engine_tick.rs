//! Per-tick cost of the full engine update with many fires and fuel sources.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hearthfire_core::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_engine(fires: usize) -> SimulationEngine {
    let mut rng = StdRng::seed_from_u64(7);
    let mut engine = SimulationEngine::new();
    let extent = (fires as f32).sqrt() * 25.0;

    for _ in 0..fires {
        let at = Vec3::new(rng.gen_range(0.0..extent), 0.0, rng.gen_range(0.0..extent));
        let fire = engine.spawn_campfire(at);
        let _ = engine.add_fuel(fire, rng.gen_range(10.0..100.0));
    }
    for i in 0..fires * 5 {
        let kind = FuelKind::ALL[i % FuelKind::ALL.len()];
        let at = Vec3::new(rng.gen_range(0.0..extent), 0.0, rng.gen_range(0.0..extent));
        engine.spawn_fuel(kind, at);
    }
    for i in 0..4 {
        let at = Vec3::new(i as f32 * extent / 4.0, 0.0, extent / 2.0);
        let player = engine.spawn_player(format!("P{}", i), at);
        engine.set_input(
            player,
            PlayerInput {
                aim: Ray::new(at, Vec3::new(1.0, 0.0, 0.0)),
                interact_held: false,
            },
        );
    }
    engine
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_update");
    for &n in &[10usize, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut engine = make_engine(n);
            b.iter(|| {
                engine.update(1.0 / 60.0);
                engine.drain_events();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
