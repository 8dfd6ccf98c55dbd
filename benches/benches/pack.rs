// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use pinboard_geometry::Grid;
use pinboard_pack::{Curve, Depth, Packer, PackingSession, fit_curve, pack, reorganize};
use pinboard_tree::{LayoutConfig, LocalNode, MonospaceMeasure, NoViewport, NodeId, Tree};

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
    fn cells(&mut self, max: u64) -> f64 {
        (1 + self.next_u64() % max) as f64
    }
}

/// A board with `n` children of random grid-aligned sizes in one long row.
fn gen_board(n: usize, cell: f64, seed: u64) -> (Tree, NodeId) {
    let mut rng = Rng::new(seed);
    let mut tree = Tree::new();
    let board = tree
        .insert(tree.root(), LocalNode::from_rect(Rect::new(0.0, 0.0, cell, cell)))
        .unwrap();
    let mut x = 0.0;
    for _ in 0..n {
        let size = Size::new(rng.cells(6) * cell, rng.cells(4) * cell);
        tree.insert(board, LocalNode::from_rect(Rect::from_origin_size((x, 0.0), size)))
            .unwrap();
        x += size.width + cell;
    }
    (tree, board)
}

/// A two-level tree: `n` branches each holding `n` leaves.
fn gen_nested(n: usize, cell: f64) -> (Tree, NodeId) {
    let mut tree = Tree::new();
    let board = tree
        .insert(tree.root(), LocalNode::from_rect(Rect::new(0.0, 0.0, cell, cell)))
        .unwrap();
    for i in 0..n {
        let x = i as f64 * 10.0 * cell;
        let branch = tree
            .insert(board, LocalNode::from_rect(Rect::from_origin_size((x, 0.0), (cell, cell))))
            .unwrap();
        for j in 0..n {
            let leaf = LocalNode {
                label: format!("card {i}.{j}"),
                ..LocalNode::from_rect(Rect::from_origin_size((j as f64 * cell, 0.0), (cell, cell)))
            };
            tree.insert(branch, leaf).unwrap();
        }
    }
    (tree, board)
}

fn bench_pack(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let packers = [
        ("stack", Packer::default()),
        ("list", Packer::list()),
        ("grid", Packer::Grid),
        ("circle", Packer::Curve(Curve::Circle)),
    ];
    let mut group = c.benchmark_group("pack");
    for &n in &[16_usize, 64, 256] {
        group.throughput(Throughput::Elements(n as u64));
        for (name, packer) in &packers {
            group.bench_function(format!("{name}_n{n}"), |b| {
                b.iter_batched(
                    || gen_board(n, config.grid.cell(), 0x9E37_79B9),
                    |(mut tree, board)| {
                        let mut session = PackingSession::new();
                        pack(packer, &mut tree, board, &mut session, &config).unwrap();
                        black_box(tree.child_bounds(board));
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_fit_curve(c: &mut Criterion) {
    let grid = Grid::new(8.0);
    let mut group = c.benchmark_group("fit_curve");
    for curve in Curve::ALL {
        for &n in &[4_usize, 12, 32] {
            group.bench_function(format!("{curve:?}_n{n}"), |b| {
                b.iter(|| black_box(fit_curve(curve, n, Size::new(96.0, 64.0), 0.05, &grid, 10_000)));
            });
        }
    }
    group.finish();
}

fn bench_reorganize(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let measure = MonospaceMeasure::default();
    let mut group = c.benchmark_group("reorganize");
    for &n in &[4_usize, 8, 16] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("stack_nested_n{n}"), |b| {
            b.iter_batched(
                || gen_nested(n, config.grid.cell()),
                |(mut tree, board)| {
                    let changed = reorganize(
                        &mut tree,
                        board,
                        Packer::default(),
                        Depth::Infinite,
                        &config,
                        &measure,
                        &mut NoViewport,
                    )
                    .unwrap();
                    black_box(changed.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pack, bench_fit_curve, bench_reorganize);
criterion_main!(benches);
