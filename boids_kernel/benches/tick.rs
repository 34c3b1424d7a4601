use boids_kernel::{flock::Flock, options::SimulationOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn flock(agents: usize) -> Flock {
    let options = SimulationOptions {
        init_agents: agents,
        seed: Some(1),
        area_size: (agents as f32).sqrt() * 8.,
        ..SimulationOptions::default()
    };

    Flock::new(options).expect("default options are valid")
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for agents in [256_usize, 1024, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(agents), &agents, |b, &agents| {
            let mut flock = flock(agents);
            b.iter(|| flock.update(black_box(0.016)).expect("flock stays attached"))
        });
    }

    group.finish();
}

fn acceleration_pass(c: &mut Criterion) {
    let mut flock = flock(2048);

    c.bench_function("acceleration pass 2048", |b| {
        b.iter(|| {
            flock
                .run_acceleration_pass(black_box(0.016))
                .expect("flock stays attached")
        })
    });
}

criterion_group!(benches, criterion_benchmark, acceleration_pass);
criterion_main!(benches);
