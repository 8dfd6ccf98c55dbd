// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for resize and move cascades.
//!
//! 1. A settled resize leaves every sibling clear and on the grid, with the
//!    seed at the requested size. One that cannot settle changes nothing.
//! 2. A settled move leaves every sibling clear, with the seed at the
//!    requested origin. One that cannot settle changes nothing.
//! 3. Requesting the current size changes nothing.
//! 4. Resizes inside blocks of attached cards, where neighbors follow the
//!    seed and push the cards beyond them, keep the same guarantees as 1.

use kurbo::{Point, Rect, Size};
use pinboard_tree::{LayoutConfig, LocalNode, NodeId, Tree, move_node, resize_node};
use proptest::prelude::*;
use proptest::sample::Index;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Cells of a 5x5 lattice, each holding a 2x2 card.
fn cells() -> impl Strategy<Value = Vec<usize>> {
    proptest::sample::subsequence((0..25).collect::<Vec<usize>>(), 1..=12)
}

/// One free cell between neighbors.
fn layout(cells: &[usize]) -> (Tree, Vec<NodeId>) {
    layout_with_pitch(cells, 3.0)
}

/// Cards on adjacent lattice cells share an edge, forming attached blocks.
fn attached_layout(cells: &[usize]) -> (Tree, Vec<NodeId>) {
    layout_with_pitch(cells, 2.0)
}

fn layout_with_pitch(cells: &[usize], pitch: f64) -> (Tree, Vec<NodeId>) {
    let mut tree = Tree::new();
    let root = tree.root();
    let ids = cells
        .iter()
        .map(|c| {
            #[allow(clippy::cast_precision_loss, reason = "Lattice indices are tiny.")]
            let (x, y) = ((c % 5) as f64 * pitch, (c / 5) as f64 * pitch);
            let rect = Rect::from_origin_size((x, y), (2.0, 2.0));
            tree.insert(root, LocalNode::from_rect(rect)).unwrap()
        })
        .collect();
    (tree, ids)
}

fn snapshot(tree: &Tree, ids: &[NodeId]) -> Vec<Rect> {
    ids.iter().map(|id| tree.rect(*id)).collect()
}

fn overlap(tree: &Tree, ids: &[NodeId]) -> Option<(NodeId, NodeId)> {
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            if pinboard_geometry::rect_intersects(tree.rect(*a), tree.rect(*b)) {
                return Some((*a, *b));
            }
        }
    }
    None
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Settled resizes are clear and aligned
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn settled_resize_is_clear_and_aligned(
        cells in cells(),
        seed in any::<Index>(),
        w in 1_u8..=8,
        h in 1_u8..=8,
    ) {
        let config = LayoutConfig::unit(1.0);
        let (mut tree, ids) = layout(&cells);
        let seed = ids[seed.index(ids.len())];
        let before = snapshot(&tree, &ids);
        let target = Size::new(f64::from(w), f64::from(h));

        match resize_node(&mut tree, seed, target, &config).unwrap() {
            Some(changed) => {
                prop_assert!(changed.windows(2).all(|p| p[0] < p[1]));
                prop_assert_eq!(overlap(&tree, &ids), None);
                prop_assert_eq!(tree.rect(seed).size(), target);
                for id in &ids {
                    prop_assert!(config.grid.is_rect_aligned(tree.rect(*id)));
                }
                for (id, old) in ids.iter().zip(&before) {
                    prop_assert_eq!(changed.contains(id), tree.rect(*id) != *old);
                }
            }
            None => prop_assert_eq!(snapshot(&tree, &ids), before),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Settled moves are clear and land where asked
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn settled_move_is_clear(
        cells in cells(),
        seed in any::<Index>(),
        x in 0_u8..=14,
        y in 0_u8..=14,
    ) {
        let config = LayoutConfig::unit(1.0);
        let (mut tree, ids) = layout(&cells);
        let seed = ids[seed.index(ids.len())];
        let before = snapshot(&tree, &ids);
        let target = Point::new(f64::from(x), f64::from(y));

        match move_node(&mut tree, seed, target, &config).unwrap() {
            Some(_) => {
                prop_assert_eq!(overlap(&tree, &ids), None);
                prop_assert_eq!(tree.rect(seed).origin(), target);
                prop_assert_eq!(tree.rect(seed).size(), Size::new(2.0, 2.0));
            }
            None => prop_assert_eq!(snapshot(&tree, &ids), before),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Resizing to the current size is a no-op
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn current_size_is_a_no_op(cells in cells(), seed in any::<Index>()) {
        let config = LayoutConfig::unit(1.0);
        let (mut tree, ids) = layout(&cells);
        let seed = ids[seed.index(ids.len())];
        let before = snapshot(&tree, &ids);

        let changed = resize_node(&mut tree, seed, Size::new(2.0, 2.0), &config).unwrap();
        prop_assert_eq!(changed, Some(Vec::new()));
        prop_assert_eq!(snapshot(&tree, &ids), before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Attached blocks
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn attached_block_resize_is_clear_and_aligned(
        cells in proptest::sample::subsequence((0..25).collect::<Vec<usize>>(), 4..=16),
        seed in any::<Index>(),
        w in 1_u8..=6,
        h in 1_u8..=6,
    ) {
        let config = LayoutConfig::unit(1.0);
        let (mut tree, ids) = attached_layout(&cells);
        let seed = ids[seed.index(ids.len())];
        let before = snapshot(&tree, &ids);
        let target = Size::new(f64::from(w), f64::from(h));

        match resize_node(&mut tree, seed, target, &config).unwrap() {
            Some(changed) => {
                prop_assert_eq!(overlap(&tree, &ids), None);
                prop_assert_eq!(tree.rect(seed).size(), target);
                for id in &ids {
                    prop_assert!(config.grid.is_rect_aligned(tree.rect(*id)));
                }
                for (id, old) in ids.iter().zip(&before) {
                    prop_assert_eq!(changed.contains(id), tree.rect(*id) != *old);
                }
            }
            None => prop_assert_eq!(snapshot(&tree, &ids), before),
        }
    }
}
