//! ECS benchmarks using Criterion.
//!
//! - Entity create/destroy
//! - Component attach/detach
//! - Query scans
//! - The add_remove, simple and complex workloads

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sprocket_bench::{NUM_ENTITIES, WORLD_UPDATES, components::*, scenarios};
use sprocket_ecs::ecs::{Query, World};

// =============================================================================
// Workloads
// =============================================================================

fn bench_workloads(c: &mut Criterion) {
    let mut group = c.benchmark_group("workloads");
    group.sample_size(20);

    group.bench_function("add_remove", |b| {
        b.iter_batched(
            World::new,
            |mut world| scenarios::add_remove(&mut world, NUM_ENTITIES),
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function("simple", |b| {
        b.iter_batched(
            || scenarios::simple(NUM_ENTITIES).expect("simple world"),
            |mut world| scenarios::run(&mut world, WORLD_UPDATES).expect("simple tick"),
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function("complex", |b| {
        b.iter_batched(
            || scenarios::complex(NUM_ENTITIES).expect("complex world"),
            |mut world| scenarios::run(&mut world, WORLD_UPDATES).expect("complex tick"),
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// =============================================================================
// Create / Destroy Benchmarks
// =============================================================================

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("empty", count), &count, |b, &n| {
            b.iter(|| {
                let mut world = World::new();
                black_box(world.create_many(n));
            });
        });

        group.bench_with_input(BenchmarkId::new("two_components", count), &count, |b, &n| {
            b.iter(|| {
                let mut world = World::new();
                for _ in 0..n {
                    black_box(world.spawn((Position::default(), Sprite::default())));
                }
            });
        });
    }

    group.finish();
}

fn bench_destroy(c: &mut Criterion) {
    let mut group = c.benchmark_group("destroy");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("three_components", count), &count, |b, &n| {
            b.iter_batched(
                || {
                    let mut world = World::new();
                    let entities: Vec<_> = (0..n)
                        .map(|_| {
                            world.spawn((Position::default(), Life::default(), Sprite::default()))
                        })
                        .collect();
                    (world, entities)
                },
                |(mut world, entities)| {
                    for entity in entities {
                        world.destroy(entity);
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Attach / Detach Benchmarks
// =============================================================================

fn bench_attach_detach(c: &mut Criterion) {
    let mut group = c.benchmark_group("attach_detach");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("attach", count), &count, |b, &n| {
            b.iter_batched(
                || {
                    let mut world = World::new();
                    let entities: Vec<_> =
                        (0..n).map(|_| world.spawn(Position::default())).collect();
                    (world, entities)
                },
                |(mut world, entities)| {
                    for entity in entities {
                        let _ = world.attach(entity, Life::default());
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("detach", count), &count, |b, &n| {
            b.iter_batched(
                || {
                    let mut world = World::new();
                    let entities: Vec<_> = (0..n)
                        .map(|_| world.spawn((Position::default(), Life::default())))
                        .collect();
                    (world, entities)
                },
                |(mut world, entities)| {
                    for entity in entities {
                        black_box(world.detach::<Life>(entity));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Query Benchmarks
// =============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for count in [1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        // Every third entity has a life, every other a sprite.
        let mut world = World::new();
        for n in 0..count {
            let entity = world.spawn(Position::default());
            if n % 3 == 0 {
                let _ = world.attach(entity, Life::default());
            }
            if n % 2 == 0 {
                let _ = world.attach(entity, Sprite::default());
            }
        }
        let query = Query::new()
            .with::<Position>()
            .without::<Life>()
            .any_of::<Sprite>();
        let filter = world.filter(&query).expect("valid query");

        group.bench_with_input(BenchmarkId::new("scan", count), &count, |b, _| {
            b.iter(|| black_box(world.resolve_filter(&filter).count()));
        });

        group.bench_with_input(BenchmarkId::new("column", count), &count, |b, _| {
            b.iter(|| {
                black_box(
                    world
                        .components::<Position>()
                        .map(|(_, position)| position.x)
                        .sum::<f32>(),
                )
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_workloads,
    bench_create,
    bench_destroy,
    bench_attach_detach,
    bench_resolve,
);

criterion_main!(benches);
