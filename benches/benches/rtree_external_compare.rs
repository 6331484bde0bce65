// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_reserve_index::{Aabb2D, Index};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: i32, cell: i32) -> Vec<Aabb2D<i32>> {
    let mut out = Vec::new();
    for y in 0..n {
        for x in 0..n {
            out.push(Aabb2D::<i32>::from_xywh(x * cell, y * cell, cell, cell));
        }
    }
    out
}

fn to_rstar_rects(v: &[Aabb2D<i32>]) -> Vec<Rectangle<[i32; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y]))
        .collect()
}

fn bench_rtree_external_compare_i32(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_i32");
    for &n in &[64_i32, 128] {
        let rects = gen_grid_rects(n, 10);
        let query = Aabb2D::<i32>::from_xywh(100, 100, 400, 400);
        group.throughput(Throughput::Elements(rects.len() as u64));

        group.bench_function(format!("understory_build_query_n{n}"), |b| {
            b.iter_batched(
                Index::<i32, usize>::with_rtree,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(r, i);
                    }
                    let hits: usize = idx.query_rect(query).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("understory_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || rects.iter().copied().zip(0_usize..).collect::<Vec<_>>(),
                |entries| {
                    let idx = Index::<i32, usize>::with_rtree_bulk(entries);
                    let hits: usize = idx.query_rect(query).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });

        // rstar treats touching envelopes as intersecting, so its hit counts run higher.
        group.bench_function(format!("rstar_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [query.min_x, query.min_y],
                        [query.max_x, query.max_y],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_i32);
criterion_main!(benches);
