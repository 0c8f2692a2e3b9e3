//! Benchmarks for the grid layout engine.
//!
//! Run with: cargo bench -p dashgrid-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use dashgrid_layout::{Grid, LayoutItem, normalize, pack, reconcile};
use std::hint::black_box;

/// A widget population with mixed spans, repeating 3/4/6/8.
fn make_items(n: usize) -> Vec<LayoutItem> {
    (0..n)
        .map(|i| {
            let span = match i % 4 {
                0 => 3,
                1 => 4,
                2 => 6,
                3 => 8,
                _ => unreachable!(),
            };
            LayoutItem::new(format!("w{i}"), span)
        })
        .collect()
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/pack");
    for n in [4, 12, 32, 64] {
        let items = make_items(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &items, |b, items| {
            b.iter(|| black_box(pack(items)))
        });
    }
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/reconcile");
    for n in [12, 32, 64] {
        let items = make_items(n);
        let packed = pack(&items);
        // Hide every third widget, then reconcile.
        let visible: Vec<LayoutItem> = items
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 0)
            .map(|(_, item)| item.clone())
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(packed, visible),
            |b, (packed, visible)| {
                b.iter_batched(
                    || packed.clone(),
                    |mut grid: Grid| {
                        reconcile(&mut grid, visible);
                        black_box(grid)
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/normalize");
    for n in [12, 32, 64] {
        let items = make_items(n);
        let mut gappy = pack(&items);
        let visible: Vec<LayoutItem> = items
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 0)
            .map(|(_, item)| item.clone())
            .collect();
        reconcile(&mut gappy, &visible);
        group.bench_with_input(BenchmarkId::from_parameter(n), &gappy, |b, gappy| {
            b.iter_batched(
                || gappy.clone(),
                |mut grid: Grid| black_box(normalize(&mut grid)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pack, bench_reconcile, bench_normalize);
criterion_main!(benches);
