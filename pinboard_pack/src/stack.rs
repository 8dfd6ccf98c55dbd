// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shelf packing: children stacked into vertical shelves laid out left to right.

use kurbo::{Point, Rect, Size};
use pinboard_geometry::approx::{bucket, is_greater};
use pinboard_geometry::{Grid, Rounding};
use pinboard_tree::{NodeId, Tree};

/// One vertical stack of children.
#[derive(Clone, Debug, PartialEq)]
pub struct Shelf {
    /// Members from top to bottom.
    pub members: Vec<NodeId>,
    /// Left edge of the shelf.
    pub x: f64,
    /// Width of the widest member.
    pub width: f64,
    /// Sum of member heights.
    pub height: f64,
}

impl Shelf {
    fn at(x: f64) -> Self {
        Self {
            members: Vec::new(),
            x,
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Shelves a stack pack produced.
#[derive(Clone, Debug, PartialEq)]
pub struct StackRecord {
    /// Height a shelf may not exceed, unless a single child is taller.
    pub max_height: f64,
    /// Shelves from left to right.
    pub shelves: Vec<Shelf>,
}

/// Height limit for shelves holding children of `sizes`, aiming at `aspect_ratio`.
///
/// The limit is `max(tallest, sqrt(2 · area / aspect_ratio))` rounded up to the
/// grid. A ratio that is not positive and finite removes the limit.
pub fn shelf_limit(sizes: impl IntoIterator<Item = Size>, aspect_ratio: f64, grid: &Grid) -> f64 {
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return f64::INFINITY;
    }
    let (area, tallest) = sizes
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(area, tallest), s| {
            (area + s.area(), tallest.max(s.height))
        });
    let target = (2.0 * area / aspect_ratio).sqrt();
    grid.quantize(tallest.max(target), Rounding::Ceil)
}

pub(crate) fn place(tree: &mut Tree, branch: NodeId, aspect_ratio: f64, grid: &Grid) -> StackRecord {
    let mut children = tree.child_rects(branch);
    children.sort_by(|a, b| {
        bucket(a.1.x0)
            .total_cmp(&bucket(b.1.x0))
            .then(bucket(a.1.y0).total_cmp(&bucket(b.1.y0)))
            .then(a.0.cmp(&b.0))
    });
    let max_height = shelf_limit(children.iter().map(|(_, r)| r.size()), aspect_ratio, grid);

    let mut shelves = Vec::new();
    let mut current = Shelf::at(0.0);
    for (id, rect) in children {
        if !current.members.is_empty() && is_greater(current.height + rect.height(), max_height) {
            let next = Shelf::at(current.x + current.width);
            shelves.push(core::mem::replace(&mut current, next));
        }
        tree.set_origin(id, Point::new(current.x, current.height));
        current.height += rect.height();
        current.width = current.width.max(rect.width());
        current.members.push(id);
    }
    shelves.push(current);
    tracing::trace!(shelves = shelves.len(), max_height, "stack placed");
    StackRecord {
        max_height,
        shelves,
    }
}

/// Share spare width among shelves by width and spare height among each
/// shelf's members by height, whole grid cells at a time.
pub(crate) fn expand(
    tree: &mut Tree,
    record: &mut StackRecord,
    available: Size,
    grid: &Grid,
) -> Vec<NodeId> {
    let total_width: f64 = record.shelves.iter().map(|s| s.width).sum();
    let extra_width = available.width - total_width;
    let mut grown = Vec::new();
    let mut x = 0.0;
    for shelf in &mut record.shelves {
        let add_width = if is_greater(extra_width, 0.0) && is_greater(total_width, 0.0) {
            grid.quantize(extra_width * shelf.width / total_width, Rounding::Floor)
        } else {
            0.0
        };
        let extra_height = available.height - shelf.height;
        let mut y = 0.0;
        for id in &shelf.members {
            let Some(g) = tree.geometry(*id) else {
                continue;
            };
            let r = g.rect;
            let add_height = if is_greater(extra_height, 0.0) && is_greater(shelf.height, 0.0) {
                grid.quantize(extra_height * r.height() / shelf.height, Rounding::Floor)
            } else {
                0.0
            };
            let rect = Rect::from_origin_size((x, y), (r.width() + add_width, r.height() + add_height));
            if rect != r {
                tree.set_rect(*id, rect);
                grown.push(*id);
            }
            y += rect.height();
        }
        shelf.x = x;
        shelf.width += add_width;
        shelf.height = y;
        x += shelf.width;
    }
    grown
}
