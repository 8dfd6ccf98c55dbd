// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascade basics.
//!
//! Lay out a row of attached cards plus a loose neighbor, grow the first
//! card, and watch the row follow while the neighbor is pushed aside.
//!
//! Run:
//! - `cargo run -p pinboard_demos --example cascade_basics`

use kurbo::{Point, Rect, Size};
use pinboard_tree::{Cascade, LayoutConfig, LocalNode, Tree, move_node};

fn main() {
    let config = LayoutConfig::default();
    let mut tree = Tree::new();
    let root = tree.root();

    // Three 64x64 cards touching edge to edge, and one 32px to the right.
    let row: Vec<_> = (0..3)
        .map(|i| {
            let rect = Rect::from_origin_size((f64::from(i) * 64.0, 0.0), (64.0, 64.0));
            tree.insert(root, LocalNode::from_rect(rect)).unwrap()
        })
        .collect();
    let loose = tree
        .insert(root, LocalNode::from_rect(Rect::new(224.0, 0.0, 288.0, 64.0)))
        .unwrap();
    let _ = tree.commit();

    let mut cascade = Cascade::begin_resize(&tree, row[0], &config).unwrap();
    println!("island: {:?}", cascade.island());
    println!("followers: {:?}", cascade.followers().collect::<Vec<_>>());
    cascade.resize_to(&mut tree, Size::new(128.0, 96.0)).unwrap();
    for (id, instruction) in cascade.instructions() {
        println!("{id:?} -> {instruction:?}");
    }
    let changed = cascade.finish(&mut tree).expect("the row has room to grow");
    println!("changed: {changed:?}");

    for id in row.iter().chain([&loose]) {
        println!("{id:?}: {:?}", tree.rect(*id));
    }
    // The row keeps touching and the loose card is clear of it.
    assert_eq!(tree.rect(row[1]).x0, tree.rect(row[0]).x1);
    assert!(tree.rect(loose).x0 >= tree.rect(row[2]).x1);

    // Dropping the loose card onto the row pushes the row out of the way.
    let moved = move_node(&mut tree, loose, Point::new(0.0, 32.0), &config).unwrap();
    println!("moved: {moved:?}");

    let changes = tree.commit();
    println!("committed {} nodes, damage {:?}", changes.nodes.len(), changes.union_rect());
}
