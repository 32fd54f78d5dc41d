// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use thicket_broadphase::BroadPhase;
use thicket_tree::{Aabb, CastOutcome, ProxyId, RayCastInput, TreeF64, Vec2};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb::<f64>::from_xywh(x0, y0, cell, cell));
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
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, world: f64, rect_w: f64, rect_h: f64) -> Vec<Aabb<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (world - rect_w).max(1.0);
        let y0 = rng.next_f64() * (world - rect_h).max(1.0);
        out.push(Aabb::<f64>::from_xywh(x0, y0, rect_w, rect_h));
    }
    out
}

fn build_tree(rects: &[Aabb<f64>]) -> (TreeF64<u32>, Vec<ProxyId>) {
    let mut tree: TreeF64<u32> = TreeF64::new();
    let ids = rects
        .iter()
        .enumerate()
        .map(|(i, r)| tree.create_proxy(*r, i as u32))
        .collect();
    (tree, ids)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[32usize, 64] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_insert_n{}", n), |b| {
            b.iter_batched(
                || rects.clone(),
                |rects| {
                    let (tree, _) = build_tree(&rects);
                    black_box(tree.height());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_move_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_churn");
    let count = 4096;
    let rects = gen_random_rects(count, 2000.0, 8.0, 8.0);
    group.throughput(Throughput::Elements(count as u64));
    group.bench_function("random_reinsert_all", |b| {
        b.iter_batched(
            || {
                let (tree, ids) = build_tree(&rects);
                let mut rng = Rng::new(0xBADC_F00D_1234_5678);
                let targets: Vec<Aabb<f64>> = (0..count)
                    .map(|_| {
                        let x = rng.next_f64() * 1990.0;
                        let y = rng.next_f64() * 1990.0;
                        Aabb::<f64>::from_xywh(x, y, 8.0, 8.0)
                    })
                    .collect();
                (tree, ids, targets)
            },
            |(mut tree, ids, targets)| {
                for (id, target) in ids.iter().zip(&targets) {
                    let _ = tree.move_proxy(*id, *target, Vec2::new(5.0, 5.0));
                }
                black_box(tree.height());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let (tree, _) = build_tree(&rects);
        let probe = Aabb::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("rect_n{}", n), |b| {
            b.iter(|| {
                let hits = tree.overlaps(black_box(&probe)).len();
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_ray_cast(c: &mut Criterion) {
    let mut group = c.benchmark_group("ray_cast");
    let rects = gen_random_rects(8192, 2000.0, 6.0, 6.0);
    let (tree, _) = build_tree(&rects);
    let input = RayCastInput {
        p1: Vec2::new(0.0, 0.0),
        p2: Vec2::new(2000.0, 2000.0),
        max_fraction: 1.0,
    };
    group.bench_function("diagonal_count_candidates", |b| {
        b.iter(|| {
            let mut candidates = 0u32;
            tree.ray_cast(black_box(&input), |_, _| {
                candidates += 1;
                CastOutcome::Miss
            });
            black_box(candidates);
        })
    });
    group.finish();
}

fn bench_update_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_pairs");
    let count = 2048;
    let rects = gen_random_rects(count, 800.0, 10.0, 10.0);
    group.throughput(Throughput::Elements(count as u64));
    group.bench_function("dense_first_frame", |b| {
        b.iter_batched(
            || {
                let mut bp: BroadPhase<f64, u32> = BroadPhase::new();
                for (i, r) in rects.iter().enumerate() {
                    let _ = bp.create_proxy(*r, i as u32);
                }
                bp
            },
            |mut bp| {
                let mut pairs = 0u32;
                bp.update_pairs(|_, _| pairs += 1);
                black_box(pairs);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_move_churn,
    bench_query,
    bench_ray_cast,
    bench_update_pairs
);
criterion_main!(benches);
