// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first reorganize traversal: fit, pack, expand, deflate, fit the seed.

use std::collections::BTreeMap;

use kurbo::{Point, Size};
use pinboard_geometry::Rounding;
use pinboard_tree::{
    Geometry, LayoutConfig, Measure, NodeFlags, NodeId, Result, Tree, Viewport, resize_node,
};

use crate::packer::{Packer, PackingSession, expand_children, pack};

/// How far below the seed a traversal descends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Depth {
    /// Descend at most this many levels below the seed. `Limited(0)` packs the
    /// seed's children as they are, without fitting or repacking them.
    Limited(u32),
    /// No bound.
    #[default]
    Infinite,
}

impl Depth {
    /// Whether nodes `level` levels below the seed are visited.
    pub const fn allows(self, level: u32) -> bool {
        match self {
            Self::Limited(max) => level <= max,
            Self::Infinite => true,
        }
    }
}

/// One reorganize traversal over a tree.
///
/// The traversal runs these phases once, in order:
///
/// 1. Reset the [`PackingSession`].
/// 2. Rearrange, depth first: leaves are sized to fit their text (media
///    leaves are left alone); each branch first rearranges its children, then
///    grows every child by one grid cell, packs them, and shrinks itself to
///    fit them. Collapsed branches count as leaves.
/// 3. Expand, if the packer supports it: every branch hands its spare room to
///    its children, recursing into the branches that grew.
/// 4. Deflate: the one-cell growth from step 2 is undone.
/// 5. The seed (unless it is the root) is resized to fit its children through
///    a [`Cascade`](pinboard_tree::Cascade), so its siblings stay clear.
/// 6. The viewport is asked to center on the seed.
pub struct Reorganizer<'a, M: Measure + ?Sized> {
    tree: &'a mut Tree,
    packer: Packer,
    config: &'a LayoutConfig,
    measure: &'a M,
    session: PackingSession,
}

impl<M: Measure + ?Sized> core::fmt::Debug for Reorganizer<'_, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reorganizer")
            .field("packer", &self.packer)
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<'a, M: Measure + ?Sized> Reorganizer<'a, M> {
    /// A traversal over `tree` packing with `packer`.
    pub fn new(tree: &'a mut Tree, packer: Packer, config: &'a LayoutConfig, measure: &'a M) -> Self {
        Self {
            tree,
            packer,
            config,
            measure,
            session: PackingSession::new(),
        }
    }

    /// Packing state left by the last traversal.
    pub fn session(&self) -> &PackingSession {
        &self.session
    }

    /// Reorganize the subtree under `seed`.
    ///
    /// Returns every node whose geometry differs from before the traversal,
    /// sorted by id, for the store to persist.
    pub fn reorganize(
        &mut self,
        seed: NodeId,
        depth: Depth,
        viewport: &mut dyn Viewport,
    ) -> Result<Vec<NodeId>> {
        if !self.tree.is_alive(seed) {
            return Err(pinboard_tree::Error::StaleNode(seed));
        }
        let _span = tracing::debug_span!(
            "reorganize",
            ?seed,
            packer = self.packer.name(),
            ?depth
        )
        .entered();

        self.session.reset();
        let before: BTreeMap<NodeId, Geometry> = self
            .tree
            .ids()
            .filter_map(|id| self.tree.geometry(id).map(|g| (id, g)))
            .collect();

        if let Err(err) = self.rearrange(seed, 0, depth) {
            self.session.deflate_all(self.tree);
            self.restore(&before);
            return Err(err);
        }
        if self.packer.supports_expand() {
            self.expand(seed, 0, depth);
        }
        self.session.deflate_all(self.tree);
        if !self.tree.is_root(seed) {
            self.fit_seed(seed)?;
        }
        viewport.center_on(seed, self.tree.rect(seed));

        let mut changed: Vec<NodeId> = self
            .tree
            .ids()
            .filter(|id| self.tree.geometry(*id).as_ref() != before.get(id))
            .collect();
        changed.sort();
        tracing::debug!(changed = changed.len(), "reorganized");
        Ok(changed)
    }

    fn is_leaf_like(&self, id: NodeId) -> bool {
        !self.tree.is_branch(id) || self.tree.flags(id).contains(NodeFlags::COLLAPSED)
    }

    fn rearrange(&mut self, id: NodeId, level: u32, depth: Depth) -> Result<()> {
        if self.is_leaf_like(id) {
            if level > 0 {
                self.fit_leaf(id);
            }
            return Ok(());
        }
        let children = self.tree.children(id).to_vec();
        if depth.allows(level + 1) {
            for child in &children {
                self.rearrange(*child, level + 1, depth)?;
            }
        }
        let cell = self.config.grid.cell();
        for child in &children {
            self.session.inflate(self.tree, *child, cell);
        }
        pack(&self.packer, self.tree, id, &mut self.session, self.config)?;
        if level > 0 {
            if let Some(size) = self.branch_size(id) {
                self.tree.set_size(id, size);
            }
        }
        Ok(())
    }

    fn expand(&mut self, id: NodeId, level: u32, depth: Depth) {
        if self.is_leaf_like(id) {
            return;
        }
        let grown = if self.tree.is_root(id) {
            // The root has no bounds to fill.
            let children = self.tree.children(id).to_vec();
            children.into_iter().filter(|c| !self.is_leaf_like(*c)).collect()
        } else {
            let available = self.available(id);
            expand_children(
                &self.packer,
                self.tree,
                id,
                available,
                &mut self.session,
                self.config,
            )
        };
        if depth.allows(level + 1) {
            for child in grown {
                self.expand(child, level + 1, depth);
            }
        }
    }

    /// Room for children inside `id`, in its child space.
    ///
    /// Measured on the bounds `id` will have once deflated. The children are
    /// still one cell larger than they will end up, so that cell is added
    /// back in child space.
    fn available(&self, id: NodeId) -> Size {
        let rect = self.tree.rect(id);
        let own = self.session.inflation(id);
        let (width, height) = (rect.width() - own, rect.height() - own);
        let scale = self.tree.scale(id);
        let pad = 2.0 * self.config.padding;
        let header = self.measure.header_height(self.tree.label(id), width);
        let slack = self
            .tree
            .children(id)
            .iter()
            .map(|c| self.session.inflation(*c))
            .fold(0.0, f64::max);
        Size::new(
            ((width - pad) / scale + slack).max(0.0),
            ((height - header - pad) / scale + slack).max(0.0),
        )
    }

    fn fit_leaf(&mut self, id: NodeId) {
        if self.tree.flags(id).contains(NodeFlags::MEDIA) {
            return;
        }
        let size = self.leaf_size(id);
        self.tree.set_size(id, size);
    }

    /// Smallest grid-aligned size showing the label of `id`.
    fn leaf_size(&self, id: NodeId) -> Size {
        let label = self.tree.label(id);
        let pad = 2.0 * self.config.padding;
        let text = self.measure.measure_text(label, self.config.max_text_width);
        let width = (text.width + pad).max(self.config.min_width);
        let header = self.measure.header_height(label, width);
        let height = (text.height + pad)
            .max(self.config.min_height)
            .max(header);
        self.config
            .grid
            .quantize_size(Size::new(width, height), Rounding::Ceil)
    }

    /// Smallest grid-aligned size holding the children of `id` below its header.
    fn branch_size(&self, id: NodeId) -> Option<Size> {
        let extent = self.tree.child_bounds(id)?.union_pt(Point::ZERO).size();
        let scale = self.tree.scale(id);
        let pad = 2.0 * self.config.padding;
        let width = (pad + extent.width * scale).max(self.config.min_width);
        let header = self.measure.header_height(self.tree.label(id), width);
        let height = (header + pad + extent.height * scale).max(self.config.min_height);
        Some(
            self.config
                .grid
                .quantize_size(Size::new(width, height), Rounding::Ceil),
        )
    }

    fn fit_seed(&mut self, seed: NodeId) -> Result<()> {
        let target = if self.is_leaf_like(seed) {
            if self.tree.flags(seed).contains(NodeFlags::MEDIA) {
                return Ok(());
            }
            self.leaf_size(seed)
        } else {
            match self.branch_size(seed) {
                Some(size) => size,
                None => return Ok(()),
            }
        };
        if resize_node(self.tree, seed, target, self.config)?.is_none() {
            tracing::debug!(?seed, "seed could not be resized without overlap");
        }
        Ok(())
    }

    fn restore(&mut self, before: &BTreeMap<NodeId, Geometry>) {
        for (id, g) in before {
            self.tree.set_rect(*id, g.rect);
        }
    }
}

/// Reorganize the subtree under `seed` with `packer` in one call.
///
/// See [`Reorganizer`] for the phases.
pub fn reorganize<M: Measure + ?Sized>(
    tree: &mut Tree,
    seed: NodeId,
    packer: Packer,
    depth: Depth,
    config: &LayoutConfig,
    measure: &M,
    viewport: &mut dyn Viewport,
) -> Result<Vec<NodeId>> {
    Reorganizer::new(tree, packer, config, measure).reorganize(seed, depth, viewport)
}
