// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_reserve::{FlatVec, RTreeI32, Region, ReservationEngine};
use understory_reserve_index::{Aabb2D, Index};

fn gen_grid_regions(n: i32, cell: i32) -> Vec<Region> {
    let mut out = Vec::new();
    for y in 0..n {
        for x in 0..n {
            if let Ok(r) = Region::from_xywh(x * cell, y * cell, cell, cell) {
                out.push(r);
            }
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, bound: i32) -> i32 {
        let bound = u64::try_from(bound.max(1)).unwrap_or(1);
        i32::try_from(self.next_u64() % bound).unwrap_or(0)
    }
}

/// Random HUD-sized claims on a 1920x1080 screen; many of them collide.
fn gen_random_regions(count: usize) -> Vec<Region> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let w = 16 + rng.below(160);
        let h = 8 + rng.below(64);
        if let Ok(r) = Region::from_xywh(rng.below(1920 - w), rng.below(1080 - h), w, h) {
            out.push(r);
        }
    }
    out
}

fn bench_try_occupy(c: &mut Criterion) {
    let mut group = c.benchmark_group("try_occupy");
    for &n in &[16_i32, 32, 64] {
        let regions = gen_grid_regions(n, 10);
        group.throughput(Throughput::Elements(regions.len() as u64));
        group.bench_function(format!("flatvec_grid_n{n}"), |b| {
            b.iter_batched(
                || ReservationEngine::<usize, FlatVec<i32>>::default(),
                |mut engine| {
                    for (i, r) in regions.iter().copied().enumerate() {
                        black_box(engine.try_occupy(i, r));
                    }
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("rtree_grid_n{n}"), |b| {
            b.iter_batched(
                ReservationEngine::<usize, RTreeI32>::new,
                |mut engine| {
                    for (i, r) in regions.iter().copied().enumerate() {
                        black_box(engine.try_occupy(i, r));
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    let regions = gen_random_regions(2048);
    group.bench_function("rtree_random_contended", |b| {
        b.iter_batched(
            ReservationEngine::<usize>::new,
            |mut engine| {
                let won = regions
                    .iter()
                    .copied()
                    .enumerate()
                    .filter(|&(i, r)| engine.try_occupy(i, r))
                    .count();
                black_box(won);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let regions = gen_grid_regions(32, 10);
    group.bench_function("rtree_free_then_reclaim", |b| {
        b.iter_batched(
            || {
                let mut engine = ReservationEngine::<usize>::new();
                for (i, r) in regions.iter().copied().enumerate() {
                    engine.force_occupy(i, r);
                }
                engine
            },
            |mut engine| {
                for (i, r) in regions.iter().copied().enumerate().step_by(3) {
                    engine.free(&i);
                    black_box(engine.try_occupy(i + regions.len(), r));
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("rtree_move_claims", |b| {
        b.iter_batched(
            || {
                let mut engine = ReservationEngine::<usize>::new();
                for (i, r) in regions.iter().copied().enumerate() {
                    engine.force_occupy(i, r);
                }
                engine
            },
            |mut engine| {
                for (i, r) in regions.iter().copied().enumerate() {
                    if let Ok(moved) = Region::from_xywh(r.x() + 2, r.y() + 2, 6, 6) {
                        black_box(engine.try_occupy(i, moved));
                    }
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let entries: Vec<_> = gen_grid_regions(128, 8)
        .into_iter()
        .enumerate()
        .map(|(i, r)| (Aabb2D::from(r), i))
        .collect();
    let probes: Vec<_> = (0..256)
        .map(|q| Aabb2D::<i32>::from_xywh((q % 64) * 16, (q / 64) * 16, 24, 24))
        .collect();

    let flat = {
        let mut idx = Index::<i32, usize>::new();
        for (aabb, i) in entries.iter().copied() {
            let _ = idx.insert(aabb, i);
        }
        idx
    };
    let rtree = Index::<i32, usize>::with_rtree_bulk(entries);

    group.bench_function("flatvec_any_overlap", |b| {
        b.iter(|| probes.iter().filter(|&&p| flat.any_overlap(p)).count());
    });
    group.bench_function("rtree_any_overlap", |b| {
        b.iter(|| probes.iter().filter(|&&p| rtree.any_overlap(p)).count());
    });
    group.bench_function("rtree_query_rect", |b| {
        b.iter(|| {
            probes
                .iter()
                .map(|&p| rtree.query_rect(p).count())
                .sum::<usize>()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_try_occupy, bench_churn, bench_query);
criterion_main!(benches);
