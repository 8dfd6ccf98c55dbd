// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reorganize a board with every packer.
//!
//! Build a board of text cards with one nested group, reorganize it with each
//! packer in turn, and print where every card ends up.
//!
//! Run:
//! - `cargo run -p pinboard_demos --example reorganize_board`

use kurbo::{Rect, Size};
use pinboard_pack::{Curve, Depth, Packer, reorganize};
use pinboard_tree::{LayoutConfig, LocalNode, MonospaceMeasure, NodeId, Tree, Viewport};

struct PrintViewport;

impl Viewport for PrintViewport {
    fn center_on(&mut self, id: NodeId, rect: Rect) {
        println!("  viewport centers on {id:?} at {:?}", rect.center());
    }
}

fn card(tree: &mut Tree, parent: NodeId, x: f64, label: &str) -> NodeId {
    let node = LocalNode {
        label: label.into(),
        ..LocalNode::from_rect(Rect::from_origin_size((x, 0.0), (64.0, 32.0)))
    };
    tree.insert(parent, node).unwrap()
}

fn build() -> (Tree, NodeId) {
    let mut tree = Tree::new();
    let root = tree.root();
    let board = card(&mut tree, root, 0.0, "Trip planning");
    for (i, label) in ["Flights", "Hotel in the old town", "Museum passes", "Packing list"]
        .into_iter()
        .enumerate()
    {
        card(&mut tree, board, i as f64 * 400.0, label);
    }
    let group = card(&mut tree, board, 2000.0, "Day trips");
    for (i, label) in ["Lake", "Vineyards", "Castle ruins"].into_iter().enumerate() {
        card(&mut tree, group, i as f64 * 200.0, label);
    }
    (tree, board)
}

fn main() {
    let config = LayoutConfig::default();
    let measure = MonospaceMeasure::default();
    let packers = [
        ("stack", Packer::default()),
        ("list", Packer::list()),
        ("grid", Packer::Grid),
        ("circle", Packer::Curve(Curve::Circle)),
        ("heart", Packer::Curve(Curve::Heart)),
        ("infinity", Packer::Curve(Curve::Infinity)),
    ];

    for (name, packer) in packers {
        let (mut tree, board) = build();
        println!("{name}:");
        let changed = reorganize(
            &mut tree,
            board,
            packer,
            Depth::Infinite,
            &config,
            &measure,
            &mut PrintViewport,
        )
        .unwrap();
        println!("  {} nodes changed", changed.len());
        for id in tree.descendants(board) {
            let depth = tree.depth(id).unwrap_or(0);
            let indent = "  ".repeat(depth);
            let rect = tree.rect(id);
            println!(
                "{indent}{:<24} {:?}",
                tree.label(id),
                Size::new(rect.width(), rect.height())
            );
        }
    }
}
