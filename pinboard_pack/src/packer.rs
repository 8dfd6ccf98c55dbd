// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packer selection, dispatch, and per-traversal packing state.

use std::collections::BTreeMap;

use kurbo::Size;
use pinboard_tree::{Error, LayoutConfig, NodeFlags, NodeId, Result, Tree};

use crate::curve::{self, Curve, CurveRecord};
use crate::grid::{self, GridRecord};
use crate::stack::{self, StackRecord};

/// A strategy for arranging a branch's children.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Packer {
    /// Vertical shelves laid out left to right, sized for a target width/height ratio.
    Stack {
        /// Desired width/height ratio of the packed children. Zero or less
        /// disables the shelf limit and yields a single vertical list.
        aspect_ratio: f64,
    },
    /// A square-ish grid filled column by column.
    Grid,
    /// Equal slots spaced along a closed curve.
    Curve(Curve),
}

impl Default for Packer {
    fn default() -> Self {
        Self::Stack { aspect_ratio: 1.5 }
    }
}

impl Packer {
    /// A stack packer with no shelf limit: every child in one vertical list.
    pub const fn list() -> Self {
        Self::Stack { aspect_ratio: 0.0 }
    }

    /// Whether [`expand_children`] can grow this packer's layouts.
    pub const fn supports_expand(&self) -> bool {
        !matches!(self, Self::Curve(_))
    }

    /// Short human-readable name, for logs and menus.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stack { .. } => "stack",
            Self::Grid => "grid",
            Self::Curve(Curve::Circle) => "circle",
            Self::Curve(Curve::Heart) => "heart",
            Self::Curve(Curve::Infinity) => "infinity",
        }
    }
}

/// Layout a packer computed for one branch, kept for a later expansion.
#[derive(Clone, Debug, PartialEq)]
pub enum PackingRecord {
    /// Shelves produced by [`Packer::Stack`].
    Stack(StackRecord),
    /// Columns and rows produced by [`Packer::Grid`].
    Grid(GridRecord),
    /// Slots produced by [`Packer::Curve`].
    Curve(CurveRecord),
}

/// Mutable state scoped to one reorganize traversal.
///
/// Holds the layout each packed branch received, keyed by branch, and the
/// temporary inflation applied to children so that packed neighbors keep one
/// grid cell between them. Create one per traversal, or [`reset`](Self::reset)
/// it between traversals.
#[derive(Clone, Debug, Default)]
pub struct PackingSession {
    records: BTreeMap<NodeId, PackingRecord>,
    inflated: BTreeMap<NodeId, f64>,
}

impl PackingSession {
    /// An empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every record and every pending inflation.
    ///
    /// Inflated nodes are not deflated; call [`deflate_all`](Self::deflate_all) first.
    pub fn reset(&mut self) {
        self.records.clear();
        self.inflated.clear();
    }

    /// The layout last computed for `branch`.
    pub fn record(&self, branch: NodeId) -> Option<&PackingRecord> {
        self.records.get(&branch)
    }

    /// Grow `id` by `amount` on both axes and remember it.
    pub fn inflate(&mut self, tree: &mut Tree, id: NodeId, amount: f64) {
        let Some(g) = tree.geometry(id) else {
            return;
        };
        tree.set_size(id, g.rect.size() + Size::new(amount, amount));
        *self.inflated.entry(id).or_insert(0.0) += amount;
    }

    /// Undo every inflation of `id`. Returns false if it was not inflated.
    pub fn deflate(&mut self, tree: &mut Tree, id: NodeId) -> bool {
        let Some(amount) = self.inflated.remove(&id) else {
            return false;
        };
        if let Some(g) = tree.geometry(id) {
            tree.set_size(id, g.rect.size() - Size::new(amount, amount));
        }
        true
    }

    /// Undo every pending inflation.
    pub fn deflate_all(&mut self, tree: &mut Tree) {
        let ids: Vec<NodeId> = self.inflated.keys().copied().collect();
        for id in ids {
            self.deflate(tree, id);
        }
    }

    /// Whether `id` currently carries an inflation.
    pub fn is_inflated(&self, id: NodeId) -> bool {
        self.inflated.contains_key(&id)
    }

    /// Total pending inflation of `id`, in its parent's space.
    pub fn inflation(&self, id: NodeId) -> f64 {
        self.inflated.get(&id).copied().unwrap_or(0.0)
    }

    pub(crate) fn store(&mut self, branch: NodeId, record: PackingRecord) {
        self.records.insert(branch, record);
    }
}

/// Arrange the children of `branch` in its child space, starting at the origin.
///
/// The branch's own bounds are not touched. Fails with
/// [`Error::EmptyBranch`] when `branch` has no children.
pub fn pack(
    packer: &Packer,
    tree: &mut Tree,
    branch: NodeId,
    session: &mut PackingSession,
    config: &LayoutConfig,
) -> Result<()> {
    if !tree.is_alive(branch) {
        return Err(Error::StaleNode(branch));
    }
    if tree.children(branch).is_empty() {
        return Err(Error::EmptyBranch(branch));
    }
    let _span = tracing::debug_span!("pack", ?branch, packer = packer.name()).entered();
    let record = match packer {
        Packer::Stack { aspect_ratio } => {
            PackingRecord::Stack(stack::place(tree, branch, *aspect_ratio, &config.grid))
        }
        Packer::Grid => PackingRecord::Grid(grid::place(tree, branch)),
        Packer::Curve(c) => PackingRecord::Curve(curve::place(tree, branch, *c, config)),
    };
    tracing::debug!(children = tree.children(branch).len(), "packed");
    session.store(branch, record);
    Ok(())
}

/// Grow the layout previously packed into `branch` so it fills `available`
/// (in the branch's child space).
///
/// Returns the grown children that are themselves expandable branches, so
/// the caller can recurse into them. Packers that do not support expansion,
/// and branches without a record in `session`, are left alone.
pub fn expand_children(
    packer: &Packer,
    tree: &mut Tree,
    branch: NodeId,
    available: Size,
    session: &mut PackingSession,
    config: &LayoutConfig,
) -> Vec<NodeId> {
    if !packer.supports_expand() {
        return Vec::new();
    }
    let grown = match session.records.get_mut(&branch) {
        Some(PackingRecord::Stack(record)) => stack::expand(tree, record, available, &config.grid),
        Some(PackingRecord::Grid(record)) => grid::expand(tree, record, available, &config.grid),
        Some(PackingRecord::Curve(_)) => Vec::new(),
        None => {
            tracing::debug!(?branch, "no packing record to expand");
            Vec::new()
        }
    };
    grown
        .into_iter()
        .filter(|id| tree.is_branch(*id) && !tree.flags(*id).contains(NodeFlags::COLLAPSED))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use pinboard_tree::LocalNode;

    #[test]
    fn empty_branch_is_an_error() {
        let mut tree = Tree::new();
        let branch = tree
            .insert(tree.root(), LocalNode::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0)))
            .unwrap();
        let mut session = PackingSession::new();
        let config = LayoutConfig::unit(1.0);
        for packer in [Packer::Grid, Packer::list(), Packer::Curve(Curve::Circle)] {
            assert_eq!(
                pack(&packer, &mut tree, branch, &mut session, &config),
                Err(Error::EmptyBranch(branch))
            );
        }
    }

    #[test]
    fn inflation_ledger_round_trips() {
        let mut tree = Tree::new();
        let a = tree
            .insert(tree.root(), LocalNode::from_rect(Rect::new(0.0, 0.0, 2.0, 3.0)))
            .unwrap();
        let mut session = PackingSession::new();
        session.inflate(&mut tree, a, 1.0);
        assert!(session.is_inflated(a));
        session.inflate(&mut tree, a, 1.0);
        assert_eq!(session.inflation(a), 2.0);
        assert_eq!(tree.rect(a).size(), Size::new(4.0, 5.0));
        tree.set_origin(a, kurbo::Point::new(5.0, 5.0));
        session.deflate_all(&mut tree);
        assert_eq!(tree.rect(a), Rect::new(5.0, 5.0, 7.0, 8.0));
        assert!(!session.deflate(&mut tree, a));
        assert_eq!(session.inflation(a), 0.0);
    }

    #[test]
    fn capabilities() {
        assert!(Packer::Grid.supports_expand());
        assert!(Packer::default().supports_expand());
        assert!(!Packer::Curve(Curve::Heart).supports_expand());
        assert_eq!(Packer::list(), Packer::Stack { aspect_ratio: 0.0 });
    }
}
