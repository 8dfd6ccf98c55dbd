// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rigid attachment between rectangles.
//!
//! Two rectangles are attached when one's far edge coincides with the other's
//! near edge on one axis and both cover exactly the same span on the other axis.
//! Attached rectangles form gap-free chains that move together when a
//! rectangle in the chain is resized.
//!
//! Candidates are passed as `(key, rect)` pairs so that callers can work with
//! whatever identifier they use for their nodes; results are returned as keys.

use std::collections::{BTreeSet, VecDeque};

use kurbo::Rect;

use crate::approx::{is_equal, is_greater, is_less};
use crate::rect::Axis;

/// Direction of an attachment query, relative to the seed rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Decreasing x.
    Left,
    /// Increasing x.
    Right,
    /// Decreasing y.
    Above,
    /// Increasing y.
    Below,
}

impl Direction {
    /// Axis the chain runs along.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::X,
            Self::Above | Self::Below => Axis::Y,
        }
    }

    /// Whether the chain runs towards increasing coordinates.
    #[inline]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Right | Self::Below)
    }
}

/// Ordered chain of rectangles rigidly attached to `seed` in `direction`.
///
/// The chain starts at the nearest neighbor and stops at the first gap, so a
/// rectangle further out is never included unless every rectangle between it
/// and `seed` is part of the chain as well.
pub fn attached_chain<K: Copy>(seed: Rect, candidates: &[(K, Rect)], direction: Direction) -> Vec<K> {
    let axis = direction.axis();
    let cross = axis.cross();
    let mut row: Vec<&(K, Rect)> = candidates
        .iter()
        .filter(|(_, r)| {
            is_equal(cross.min(*r), cross.min(seed)) && is_equal(cross.max(*r), cross.max(seed))
        })
        .collect();

    let mut chain = Vec::new();
    if direction.is_forward() {
        row.sort_by(|a, b| axis.min(a.1).total_cmp(&axis.min(b.1)));
        let mut edge = axis.max(seed);
        for (key, r) in row {
            if is_equal(axis.min(*r), edge) {
                chain.push(*key);
                edge = axis.max(*r);
            } else if is_greater(axis.min(*r), edge) {
                break;
            }
        }
    } else {
        row.sort_by(|a, b| axis.max(b.1).total_cmp(&axis.max(a.1)));
        let mut edge = axis.min(seed);
        for (key, r) in row {
            if is_equal(axis.max(*r), edge) {
                chain.push(*key);
                edge = axis.min(*r);
            } else if is_less(axis.max(*r), edge) {
                break;
            }
        }
    }
    chain
}

/// Chain attached to the left of `seed`, nearest first.
pub fn attached_left<K: Copy>(seed: Rect, candidates: &[(K, Rect)]) -> Vec<K> {
    attached_chain(seed, candidates, Direction::Left)
}

/// Chain attached to the right of `seed`, nearest first.
pub fn attached_right<K: Copy>(seed: Rect, candidates: &[(K, Rect)]) -> Vec<K> {
    attached_chain(seed, candidates, Direction::Right)
}

/// Chain attached above `seed`, nearest first.
pub fn attached_above<K: Copy>(seed: Rect, candidates: &[(K, Rect)]) -> Vec<K> {
    attached_chain(seed, candidates, Direction::Above)
}

/// Chain attached below `seed`, nearest first.
pub fn attached_below<K: Copy>(seed: Rect, candidates: &[(K, Rect)]) -> Vec<K> {
    attached_chain(seed, candidates, Direction::Below)
}

/// Both horizontal chains: the left chain followed by the right chain.
pub fn all_attached_x<K: Copy>(seed: Rect, candidates: &[(K, Rect)]) -> Vec<K> {
    let mut out = attached_left(seed, candidates);
    out.extend(attached_right(seed, candidates));
    out
}

/// Both vertical chains: the chain above followed by the chain below.
pub fn all_attached_y<K: Copy>(seed: Rect, candidates: &[(K, Rect)]) -> Vec<K> {
    let mut out = attached_above(seed, candidates);
    out.extend(attached_below(seed, candidates));
    out
}

/// Whether `seed` has at least one attached neighbor on either axis.
pub fn is_attached<K: Copy>(seed: Rect, candidates: &[(K, Rect)]) -> bool {
    [
        Direction::Left,
        Direction::Right,
        Direction::Above,
        Direction::Below,
    ]
    .into_iter()
    .any(|d| !attached_chain(seed, candidates, d).is_empty())
}

/// The grid island of `seed`: `seed` plus every candidate transitively
/// attached to it on either axis.
///
/// `seed` must be one of the candidate keys; its rectangle is looked up there.
/// Returns an empty set when it is not.
pub fn grid_island<K: Copy + Ord>(seed: K, candidates: &[(K, Rect)]) -> BTreeSet<K> {
    let mut island = BTreeSet::new();
    if !candidates.iter().any(|(k, _)| *k == seed) {
        return island;
    }
    let mut queue = VecDeque::from([seed]);
    island.insert(seed);
    while let Some(key) = queue.pop_front() {
        let Some(rect) = candidates.iter().find(|(k, _)| *k == key).map(|(_, r)| *r) else {
            continue;
        };
        let neighbors = all_attached_x(rect, candidates)
            .into_iter()
            .chain(all_attached_y(rect, candidates));
        for n in neighbors {
            if island.insert(n) {
                queue.push_back(n);
            }
        }
    }
    island
}
