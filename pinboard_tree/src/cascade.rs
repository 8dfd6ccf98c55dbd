// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision-free resize and move of a single node.
//!
//! A [`Cascade`] is one edit of one node. It is created with
//! [`Cascade::begin_resize`] or [`Cascade::begin_move`], driven by any number
//! of [`Cascade::resize_to`] / [`Cascade::move_to`] calls (one per pointer
//! event during a drag, say), and ended with [`Cascade::finish`] or
//! [`Cascade::discard`].
//!
//! Each request is split into increments of at most half a grid cell. After
//! every increment the seed's rigidly attached neighbors follow it, and any
//! other sibling that now overlaps the moving group receives a
//! [`RepositionInstruction`] that pushes it clear. Pushed siblings push their
//! own neighbors the same way. A sibling receives at most one instruction for
//! the lifetime of the cascade, which bounds the recursion.

use std::collections::{BTreeMap, BTreeSet};

use kurbo::{Point, Rect, Size, Vec2};
use pinboard_geometry::approx::{EPSILON, is_equal, is_less, is_zero};
use pinboard_geometry::{
    Axis, Grid, Rounding, attached_below, attached_right, bounding_rect, find_free_position,
    grid_island, rect_intersects, spans_overlap,
};

use crate::error::{Error, Result};
use crate::tree::Tree;
use crate::types::{LayoutConfig, NodeId};

/// How an external sibling is pushed clear of the node it collided with.
///
/// Instructions are re-evaluated against the start geometry on every
/// increment: while the reference still covers the sibling's span on the
/// cross axis, the sibling sits flush against it; once it does not, the
/// sibling is released back to where it started.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RepositionInstruction {
    /// Axis the sibling moves along.
    pub axis: Axis,
    /// True when the sibling is pushed towards increasing coordinates.
    pub forward: bool,
    /// The sibling's starting near edge (forward) or far edge (backward) on `axis`.
    pub start_value: f64,
    /// The node whose collision created the instruction.
    pub reference: NodeId,
}

impl RepositionInstruction {
    /// The cheapest push that separates `other` from `mover`.
    ///
    /// Ties prefer the x axis, then the forward direction.
    fn clearing(mover: Rect, other: Rect, reference: NodeId) -> Self {
        let options = [
            (Axis::X, true, mover.x1 - other.x0),
            (Axis::X, false, other.x1 - mover.x0),
            (Axis::Y, true, mover.y1 - other.y0),
            (Axis::Y, false, other.y1 - mover.y0),
        ];
        let mut best = options[0];
        for option in &options[1..] {
            if is_less(option.2, best.2) {
                best = *option;
            }
        }
        let (axis, forward, _) = best;
        Self {
            axis,
            forward,
            start_value: if forward { axis.min(other) } else { axis.max(other) },
            reference,
        }
    }

    /// Where a sibling that started at `start` sits given the reference's current bounds.
    fn apply(&self, start: Rect, reference: Rect) -> Rect {
        if !spans_overlap(self.axis.cross(), reference, start) {
            return start;
        }
        if self.forward {
            let min = self.start_value.max(self.axis.max(reference));
            self.axis.with_min(start, min)
        } else {
            let max = self.start_value.min(self.axis.min(reference));
            let extent = self.axis.max(start) - self.axis.min(start);
            self.axis.with_min(start, max - extent)
        }
    }
}

/// How a rigidly attached neighbor tracks the seed's size change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Follow {
    shift_x: bool,
    shift_y: bool,
    grow_w: bool,
    grow_h: bool,
}

impl Follow {
    /// Attached to the right of the seed.
    const RIGHT: Self = Self {
        shift_x: true,
        shift_y: false,
        grow_w: false,
        grow_h: true,
    };
    /// Attached below the seed.
    const BELOW: Self = Self {
        shift_x: false,
        shift_y: true,
        grow_w: true,
        grow_h: false,
    };
    /// Below the right chain or right of the below chain.
    const CORNER: Self = Self {
        shift_x: true,
        shift_y: true,
        grow_w: false,
        grow_h: false,
    };

    fn apply(self, start: Rect, delta: Vec2) -> Rect {
        let pick = |on: bool, v: f64| if on { v } else { 0.0 };
        let shift = Vec2::new(pick(self.shift_x, delta.x), pick(self.shift_y, delta.y));
        let origin = start.origin() + shift;
        let size = Size::new(
            start.width() + pick(self.grow_w, delta.x),
            start.height() + pick(self.grow_h, delta.y),
        );
        Rect::from_origin_size(origin, size)
    }
}

/// One in-progress resize or move.
///
/// The cascade owns no reference to the tree; every call takes it explicitly.
/// Only one cascade may be active on a tree at a time.
#[derive(Clone, Debug)]
pub struct Cascade {
    seed: NodeId,
    grid: Grid,
    min_size: Size,
    max_steps: u32,
    /// Bounds of the seed and all of its siblings when the cascade began.
    start: BTreeMap<NodeId, Rect>,
    island: BTreeSet<NodeId>,
    followers: BTreeMap<NodeId, Follow>,
    instructions: BTreeMap<NodeId, RepositionInstruction>,
    touched: BTreeSet<NodeId>,
}

impl Cascade {
    /// Start resizing `seed`.
    ///
    /// Neighbors attached to the right of and below the seed, and their own
    /// attached neighbors further right and below, follow the seed's far edges.
    pub fn begin_resize(tree: &Tree, seed: NodeId, config: &LayoutConfig) -> Result<Self> {
        let mut cascade = Self::begin(tree, seed, config)?;
        let seed_rect = tree.rect(seed);
        let siblings = tree.sibling_rects(seed);
        let mut candidates = siblings.clone();
        candidates.push((seed, seed_rect));
        cascade.island = grid_island(seed, &candidates);
        cascade.followers = resize_followers(seed_rect, &siblings);
        cascade.touched.extend(cascade.followers.keys().copied());
        tracing::debug!(
            ?seed,
            island = cascade.island.len(),
            followers = cascade.followers.len(),
            "resize cascade initialized"
        );
        Ok(cascade)
    }

    /// Start moving `seed`. Attached neighbors stay where they are.
    pub fn begin_move(tree: &Tree, seed: NodeId, config: &LayoutConfig) -> Result<Self> {
        let cascade = Self::begin(tree, seed, config)?;
        tracing::debug!(?seed, "move cascade initialized");
        Ok(cascade)
    }

    fn begin(tree: &Tree, seed: NodeId, config: &LayoutConfig) -> Result<Self> {
        if !tree.is_alive(seed) {
            return Err(Error::StaleNode(seed));
        }
        if tree.is_root(seed) {
            return Err(Error::RootNotEditable);
        }
        let mut start: BTreeMap<NodeId, Rect> = tree.sibling_rects(seed).into_iter().collect();
        start.insert(seed, tree.rect(seed));
        Ok(Self {
            seed,
            grid: config.grid,
            min_size: Size::new(config.min_width, config.min_height),
            max_steps: config.max_cascade_steps,
            start,
            island: BTreeSet::from([seed]),
            followers: BTreeMap::new(),
            instructions: BTreeMap::new(),
            touched: BTreeSet::from([seed]),
        })
    }

    /// The node being edited.
    pub fn seed(&self) -> NodeId {
        self.seed
    }

    /// The seed plus every sibling transitively attached to it when the cascade began.
    ///
    /// Reported for callers and logs only. Propagation does not consult it:
    /// members that do not [follow](Self::followers) the seed are pushed like
    /// any other sibling, and collisions are tested per moving rect.
    pub fn island(&self) -> &BTreeSet<NodeId> {
        &self.island
    }

    /// Attached neighbors that move or grow with the seed.
    pub fn followers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.followers.keys().copied()
    }

    /// Instructions handed out so far, at most one per sibling.
    pub fn instructions(&self) -> &BTreeMap<NodeId, RepositionInstruction> {
        &self.instructions
    }

    /// Resize the seed towards `size`, keeping its top-left corner.
    ///
    /// The target is raised to the configured minimums and rounded up to the
    /// grid. A request equal to the current size does nothing. A non-finite
    /// size, or one further away than `max_cascade_steps` half cells, is
    /// logged and rejected without touching the tree.
    pub fn resize_to(&mut self, tree: &mut Tree, size: Size) -> Result<()> {
        if !(size.width.is_finite() && size.height.is_finite()) {
            tracing::warn!(seed = ?self.seed, ?size, "rejecting resize with a non-finite size");
            return Err(Error::NonFinite(self.seed));
        }
        let from = tree.rect(self.seed).size();
        if is_equal(from.width, size.width) && is_equal(from.height, size.height) {
            return Ok(());
        }
        let _span = tracing::debug_span!("resize", seed = ?self.seed).entered();
        let target = self.grid.quantize_size(
            Size::new(
                size.width.max(self.min_size.width),
                size.height.max(self.min_size.height),
            ),
            Rounding::Ceil,
        );
        let delta = target - from;
        let steps = self.step_count(delta.width.abs().max(delta.height.abs()))?;
        for k in 1..=steps {
            let t = f64::from(k) / f64::from(steps);
            let size = Size::new(from.width + delta.width * t, from.height + delta.height * t);
            tracing::trace!(step = k, ?size, "resize increment");
            self.apply_resize(tree, size);
            self.propagate(tree);
        }
        Ok(())
    }

    /// Move the seed's top-left corner towards `origin`, snapped to the grid.
    ///
    /// A request equal to the current origin does nothing. A non-finite origin
    /// is logged and rejected without touching the tree.
    pub fn move_to(&mut self, tree: &mut Tree, origin: Point) -> Result<()> {
        if !(origin.x.is_finite() && origin.y.is_finite()) {
            tracing::warn!(seed = ?self.seed, ?origin, "rejecting move with a non-finite origin");
            return Err(Error::NonFinite(self.seed));
        }
        let from = tree.rect(self.seed).origin();
        if is_equal(from.x, origin.x) && is_equal(from.y, origin.y) {
            return Ok(());
        }
        let _span = tracing::debug_span!("move", seed = ?self.seed).entered();
        let target = self.grid.quantize_point(origin, Rounding::Nearest);
        let delta = target - from;
        let steps = self.step_count(delta.x.abs().max(delta.y.abs()))?;
        for k in 1..=steps {
            let t = f64::from(k) / f64::from(steps);
            let origin = from + delta * t;
            tracing::trace!(step = k, ?origin, "move increment");
            tree.set_origin(self.seed, origin);
            self.propagate(tree);
        }
        Ok(())
    }

    /// Settle the layout and end the cascade.
    ///
    /// Changed nodes are snapped to the grid and any overlap that remains is
    /// resolved by moving the offending sibling to the nearest free slot.
    /// Returns the nodes whose bounds differ from the start, sorted by id.
    /// If an overlap cannot be resolved, every touched node is restored and
    /// `None` is returned: the edit did not happen.
    pub fn finish(mut self, tree: &mut Tree) -> Option<Vec<NodeId>> {
        let changed = self.changed(tree);
        for id in &changed {
            let snapped = self.grid.quantize_rect(tree.rect(*id));
            tree.set_rect(*id, snapped);
        }
        if !changed.is_empty() && !self.settle(tree) {
            tracing::debug!(seed = ?self.seed, "cascade could not settle; restoring");
            self.discard(tree);
            return None;
        }
        Some(self.changed(tree))
    }

    /// Abandon the cascade, restoring every touched node to its start bounds.
    pub fn discard(self, tree: &mut Tree) {
        for id in &self.touched {
            if let Some(rect) = self.start.get(id) {
                tree.set_rect(*id, *rect);
            }
        }
    }

    /// Half-cell increments needed to cover `distance`.
    ///
    /// Increments never grow past half a cell, so no sibling on the way can be
    /// stepped over. Requests needing more than the configured limit fail.
    fn step_count(&self, distance: f64) -> Result<u32> {
        if is_zero(distance) {
            return Ok(0);
        }
        let steps = (distance / self.grid.half_cell() - EPSILON).ceil().max(1.0);
        if steps > f64::from(self.max_steps) {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Only reported; saturates for absurd distances."
            )]
            let steps = steps as u64;
            tracing::warn!(
                seed = ?self.seed,
                steps,
                limit = self.max_steps,
                "rejecting edit beyond the step limit"
            );
            return Err(Error::TooFar {
                node: self.seed,
                steps,
            });
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Bounded by the configured step limit."
        )]
        let steps = steps as u32;
        Ok(steps)
    }

    fn apply_resize(&self, tree: &mut Tree, size: Size) {
        let origin = tree.rect(self.seed).origin();
        tree.set_rect(self.seed, Rect::from_origin_size(origin, size));
        let delta = size - self.start_rect(self.seed).size();
        let delta = Vec2::new(delta.width, delta.height);
        for (id, follow) in &self.followers {
            tree.set_rect(*id, follow.apply(self.start_rect(*id), delta));
        }
    }

    /// Push every sibling that now overlaps the moving group, recursively.
    fn propagate(&mut self, tree: &mut Tree) {
        let movers: Vec<NodeId> = core::iter::once(self.seed)
            .chain(self.followers.keys().copied())
            .collect();
        let Some(bounds) = bounding_rect(movers.iter().map(|m| tree.rect(*m))) else {
            return;
        };
        let mut visited: BTreeSet<NodeId> = movers.iter().copied().collect();
        for mover in movers {
            self.resolve(tree, mover, Some(bounds), &mut visited);
        }
    }

    /// Hand out instructions for siblings colliding with `mover`, then apply
    /// every instruction that refers to it and recurse into the pushed nodes.
    ///
    /// `visited` holds every node already placed during this increment.
    fn resolve(
        &mut self,
        tree: &mut Tree,
        mover: NodeId,
        broad: Option<Rect>,
        visited: &mut BTreeSet<NodeId>,
    ) {
        let mover_rect = tree.rect(mover);
        let candidates: Vec<NodeId> = self
            .start
            .keys()
            .copied()
            .filter(|id| !visited.contains(id) && !self.instructions.contains_key(id))
            .collect();
        for id in candidates {
            let rect = tree.rect(id);
            if broad.is_some_and(|b| !rect_intersects(b, rect)) {
                continue;
            }
            if rect_intersects(mover_rect, rect) {
                let instruction = RepositionInstruction::clearing(mover_rect, rect, mover);
                tracing::trace!(node = ?id, ?instruction, "new reposition instruction");
                self.instructions.insert(id, instruction);
            }
        }

        let assigned: Vec<(NodeId, RepositionInstruction)> = self
            .instructions
            .iter()
            .filter(|(id, ins)| ins.reference == mover && !visited.contains(*id))
            .map(|(id, ins)| (*id, *ins))
            .collect();
        for (id, instruction) in assigned {
            visited.insert(id);
            tree.set_rect(id, instruction.apply(self.start_rect(id), mover_rect));
            self.touched.insert(id);
            self.resolve(tree, id, None, visited);
        }
    }

    /// Move siblings out of any overlap involving a changed node.
    ///
    /// Returns false if some overlap has no free slot nearby.
    fn settle(&mut self, tree: &mut Tree) -> bool {
        for _ in 0..=self.start.len() {
            let Some((a, b)) = self.first_collision(tree) else {
                return true;
            };
            let victim = self.pick_victim(a, b);
            let rect = tree.rect(victim);
            let obstacles: Vec<Rect> = self
                .live(tree)
                .filter(|id| *id != victim)
                .map(|id| tree.rect(id))
                .collect();
            let Some(origin) =
                find_free_position(rect.size(), rect.origin(), rect.origin(), &obstacles, &self.grid)
            else {
                return false;
            };
            tracing::trace!(node = ?victim, ?origin, "relocated to free slot");
            tree.set_origin(victim, origin);
            self.touched.insert(victim);
        }
        self.first_collision(tree).is_none()
    }

    /// The node to relocate out of an `a`/`b` overlap: never the seed, and
    /// preferably not a member of the moving group.
    fn pick_victim(&self, a: NodeId, b: NodeId) -> NodeId {
        let moving = |id: NodeId| id == self.seed || self.followers.contains_key(&id);
        if !moving(b) {
            b
        } else if !moving(a) {
            a
        } else if b != self.seed {
            b
        } else {
            a
        }
    }

    fn first_collision(&self, tree: &Tree) -> Option<(NodeId, NodeId)> {
        let ids: Vec<NodeId> = self.live(tree).collect();
        let changed: BTreeSet<NodeId> = self.changed(tree).into_iter().collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                if !(changed.contains(a) || changed.contains(b)) {
                    continue;
                }
                if rect_intersects(tree.rect(*a), tree.rect(*b)) {
                    return Some((*a, *b));
                }
            }
        }
        None
    }

    /// Touched nodes whose bounds differ from the start, sorted by id.
    fn changed(&self, tree: &Tree) -> Vec<NodeId> {
        self.touched
            .iter()
            .copied()
            .filter(|id| {
                tree.geometry(*id)
                    .is_some_and(|g| Some(&g.rect) != self.start.get(id))
            })
            .collect()
    }

    fn live<'a>(&'a self, tree: &'a Tree) -> impl Iterator<Item = NodeId> + 'a {
        self.start.keys().copied().filter(|id| tree.is_alive(*id))
    }

    fn start_rect(&self, id: NodeId) -> Rect {
        self.start.get(&id).copied().unwrap_or(Rect::ZERO)
    }
}

/// Attached neighbors that track a resize of the seed at `seed_rect`.
fn resize_followers(seed_rect: Rect, siblings: &[(NodeId, Rect)]) -> BTreeMap<NodeId, Follow> {
    let rect_of = |id: NodeId| siblings.iter().find(|(k, _)| *k == id).map(|(_, r)| *r);
    let right = attached_right(seed_rect, siblings);
    let below = attached_below(seed_rect, siblings);

    let mut out = BTreeMap::new();
    for id in &right {
        out.entry(*id).or_insert(Follow::RIGHT);
    }
    for id in &below {
        out.entry(*id).or_insert(Follow::BELOW);
    }
    let corners = right
        .iter()
        .filter_map(|id| rect_of(*id))
        .flat_map(|r| attached_below(r, siblings))
        .chain(
            below
                .iter()
                .filter_map(|id| rect_of(*id))
                .flat_map(|r| attached_right(r, siblings)),
        );
    for id in corners.collect::<Vec<_>>() {
        out.entry(id).or_insert(Follow::CORNER);
    }
    out
}

/// Resize `id` to `size` and settle the layout in one call.
///
/// `Ok(None)` means the resize could not be settled and nothing changed.
pub fn resize_node(
    tree: &mut Tree,
    id: NodeId,
    size: Size,
    config: &LayoutConfig,
) -> Result<Option<Vec<NodeId>>> {
    let mut cascade = Cascade::begin_resize(tree, id, config)?;
    cascade.resize_to(tree, size)?;
    Ok(cascade.finish(tree))
}

/// Move `id` to `origin` and settle the layout in one call.
///
/// `Ok(None)` means the move could not be settled and nothing changed.
pub fn move_node(
    tree: &mut Tree,
    id: NodeId,
    origin: Point,
    config: &LayoutConfig,
) -> Result<Option<Vec<NodeId>>> {
    let mut cascade = Cascade::begin_move(tree, id, config)?;
    cascade.move_to(tree, origin)?;
    Ok(cascade.finish(tree))
}
