// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use pinboard_geometry::{Grid, find_free_position};
use pinboard_tree::{LayoutConfig, LocalNode, NodeId, Tree, move_node, resize_node};

/// `n × n` cards of `cell × cell` with a one-cell gap between neighbors.
fn gen_spaced_grid(n: usize, cell: f64) -> (Tree, Vec<NodeId>) {
    let mut tree = Tree::new();
    let root = tree.root();
    let mut ids = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let origin = (x as f64 * 2.0 * cell, y as f64 * 2.0 * cell);
            let rect = Rect::from_origin_size(origin, (cell, cell));
            ids.push(tree.insert(root, LocalNode::from_rect(rect)).unwrap());
        }
    }
    (tree, ids)
}

/// `n` cards side by side with no gap, so every one follows a resize of the first.
fn gen_attached_row(n: usize, cell: f64) -> (Tree, Vec<NodeId>) {
    let mut tree = Tree::new();
    let root = tree.root();
    let ids = (0..n)
        .map(|x| {
            let rect = Rect::from_origin_size((x as f64 * cell, 0.0), (cell, cell));
            tree.insert(root, LocalNode::from_rect(rect)).unwrap()
        })
        .collect();
    (tree, ids)
}

fn bench_resize(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let cell = config.grid.cell() * 8.0;
    let mut group = c.benchmark_group("resize");
    for &n in &[4_usize, 8, 16] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("push_grid_n{n}"), |b| {
            b.iter_batched(
                || gen_spaced_grid(n, cell),
                |(mut tree, ids)| {
                    let grown = Size::new(cell * 3.0, cell * 3.0);
                    black_box(resize_node(&mut tree, ids[0], grown, &config).unwrap());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("attached_row_n{n}"), |b| {
            b.iter_batched(
                || gen_attached_row(n, cell),
                |(mut tree, ids)| {
                    let grown = Size::new(cell * 2.0, cell);
                    black_box(resize_node(&mut tree, ids[0], grown, &config).unwrap());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_move(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let cell = config.grid.cell() * 8.0;
    let mut group = c.benchmark_group("move");
    for &n in &[4_usize, 8, 16] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("across_grid_n{n}"), |b| {
            b.iter_batched(
                || gen_spaced_grid(n, cell),
                |(mut tree, ids)| {
                    let target = Point::new(cell * 3.0, cell * 3.0);
                    black_box(move_node(&mut tree, ids[0], target, &config).unwrap());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_free_position(c: &mut Criterion) {
    let grid = Grid::new(8.0);
    let mut group = c.benchmark_group("find_free_position");
    for &n in &[8_usize, 16, 32] {
        // A solid block of obstacles with the query in its middle.
        let obstacles: Vec<Rect> = (0..n * n)
            .map(|i| {
                let (x, y) = ((i % n) as f64 * 16.0, (i / n) as f64 * 16.0);
                Rect::from_origin_size((x, y), (16.0, 16.0))
            })
            .collect();
        let middle = Point::new(n as f64 * 8.0, n as f64 * 8.0);
        group.throughput(Throughput::Elements(obstacles.len() as u64));
        group.bench_function(format!("blocked_n{n}"), |b| {
            b.iter(|| {
                black_box(find_free_position(
                    Size::new(16.0, 16.0),
                    middle,
                    middle,
                    &obstacles,
                    &grid,
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resize, bench_move, bench_free_position);
criterion_main!(benches);
