//! Benchmarks for directional resolution over growing layouts.
//!
//! Run with: cargo bench -p spatnav

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use spatnav::{Navigator, Registry, Resolver};
use spatnav_core::{Direction, NavConfig};
use spatnav_harness::{RecordingEffects, grid};
use std::hint::black_box;

// ============================================================================
// Registry enumeration
// ============================================================================

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatnav/enumerate");

    for side in [4usize, 10, 20] {
        let doc = grid(side, side, 40.0);
        group.bench_with_input(
            BenchmarkId::new("grid", format!("{side}x{side}")),
            &doc,
            |b, doc| {
                b.iter(|| black_box(Registry::new(doc).enumerate(None)));
            },
        );
    }

    group.finish();
}

// ============================================================================
// Resolve (ray + bucket + arbiter)
// ============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatnav/resolve");
    let config = NavConfig::default();

    for side in [4usize, 10, 20] {
        let doc = grid(side, side, 40.0);
        let center = doc.cell(side / 2, side / 2);
        group.bench_with_input(
            BenchmarkId::new("grid", format!("{side}x{side}")),
            &doc,
            |b, doc| {
                let resolver = Resolver::new(doc, &config);
                b.iter(|| {
                    for direction in Direction::ALL {
                        black_box(resolver.resolve(center, direction));
                    }
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Navigator sweep
// ============================================================================

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatnav/sweep");
    let side = 10usize;
    let doc = grid(side, side, 40.0);

    group.bench_function("row_and_back", |b| {
        b.iter(|| {
            let mut nav = Navigator::default();
            let mut effects = RecordingEffects::default();
            nav.set_active(&doc, doc.cell(0, side / 2));
            for _ in 0..side {
                nav.move_focus(&doc, &mut effects, Direction::Right);
            }
            for _ in 0..side {
                nav.move_focus(&doc, &mut effects, Direction::Left);
            }
            black_box(nav.current())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_enumerate, bench_resolve, bench_sweep);

criterion_main!(benches);
