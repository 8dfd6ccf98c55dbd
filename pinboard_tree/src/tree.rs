// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, working/committed geometry, queries.

use kurbo::{Point, Rect, Size, Vec2};
use pinboard_geometry::{bounding_rect, is_finite_rect, rect_contains};

use crate::error::{Error, Result};
use crate::types::{Geometry, LocalNode, NodeFlags, NodeId};

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena of card geometry nodes.
///
/// Nodes refer to their parent and children by [`NodeId`]; the arena owns all
/// of them. Every node carries two copies of its geometry: the working copy
/// that layout operations read and write, and the copy last accepted by
/// [`Tree::commit`]. [`Tree::reset`] throws the working copy away.
///
/// The tree always has exactly one root, created by [`Tree::new`]. The root
/// has no meaningful bounds of its own and is never moved or resized.
pub struct Tree {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    epoch: u64,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

/// A node whose geometry differs between two commits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChangedNode {
    /// The node.
    pub id: NodeId,
    /// Geometry at the previous commit.
    pub old: Geometry,
    /// Geometry now committed.
    pub new: Geometry,
}

/// Nodes accepted by [`Tree::commit`], for the store to persist as move/resize records.
#[derive(Clone, Debug, Default)]
pub struct Changes {
    /// Changed nodes in id order.
    pub nodes: Vec<ChangedNode>,
}

impl Changes {
    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Identifiers of the changed nodes.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|c| c.id)
    }

    /// Union of old and new bounds of every changed node.
    ///
    /// Bounds live in each node's parent space, so this is only meaningful
    /// when the changed nodes are siblings.
    pub fn union_rect(&self) -> Option<Rect> {
        bounding_rect(self.nodes.iter().map(|c| c.old.rect.union(c.new.rect)))
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    working: Geometry,
    committed: Geometry,
    flags: NodeFlags,
    label: String,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        let geometry = Geometry {
            rect: Rect::from_origin_size(local.origin, local.size),
            scale: local.scale,
        };
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            working: geometry,
            committed: geometry,
            flags: local.flags,
            label: local.label,
        }
    }
}

impl Tree {
    /// Create a tree holding only its root.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            epoch: 0,
        };
        tree.root = tree.alloc(LocalNode::default());
        tree
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` is the root.
    #[inline]
    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Insert a new node as the last child of `parent`.
    ///
    /// Fails if `parent` is stale, the scale is not positive, or the geometry is not finite.
    pub fn insert(&mut self, parent: NodeId, local: LocalNode) -> Result<NodeId> {
        if !self.is_alive(parent) {
            return Err(Error::StaleNode(parent));
        }
        if !(local.scale.is_finite() && local.scale > 0.0) {
            return Err(Error::InvalidScale(local.scale));
        }
        let rect = Rect::from_origin_size(local.origin, local.size);
        if !is_finite_rect(rect) {
            return Err(Error::NonFiniteInsert);
        }
        let id = self.alloc(local);
        self.link_parent(id, parent);
        Ok(id)
    }

    /// Remove a node and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || self.is_root(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Reparent `id` under `new_parent`, appending it to the new parent's children.
    ///
    /// Coordinates are kept as-is; they are reinterpreted in the new parent's space.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<()> {
        for n in [id, new_parent] {
            if !self.is_alive(n) {
                return Err(Error::StaleNode(n));
            }
        }
        if self.is_root(id) {
            return Err(Error::RootNotEditable);
        }
        if id == new_parent || self.is_ancestor(id, new_parent) {
            return Err(Error::Cycle {
                node: id,
                parent: new_parent,
            });
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.link_parent(id, new_parent);
        Ok(())
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Live node identifiers in slot order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| {
            n.as_ref().map(|n| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId uses 32-bit indices by design."
                )]
                NodeId::new(i as u32, n.generation)
            })
        })
    }

    /// Parent of `id`; `None` for the root and for stale ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order; empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// All other children of `id`'s parent.
    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(p) => self.children(p).iter().copied().filter(|c| *c != id).collect(),
            None => Vec::new(),
        }
    }

    /// Siblings of `id` paired with their working bounds.
    pub fn sibling_rects(&self, id: NodeId) -> Vec<(NodeId, Rect)> {
        self.siblings(id).into_iter().map(|s| (s, self.rect(s))).collect()
    }

    /// Children of `id` paired with their working bounds.
    pub fn child_rects(&self, id: NodeId) -> Vec<(NodeId, Rect)> {
        self.children(id).iter().map(|c| (*c, self.rect(*c))).collect()
    }

    /// Distance from the root (the root has depth 0); `None` for stale ids.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        if !self.is_alive(id) {
            return None;
        }
        let mut depth = 0;
        let mut cur = id;
        while let Some(p) = self.node(cur).parent {
            depth += 1;
            cur = p;
        }
        Some(depth)
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    /// Whether `id` has at least one child.
    pub fn is_branch(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Working geometry of `id`, or `None` if stale.
    pub fn geometry(&self, id: NodeId) -> Option<Geometry> {
        self.node_opt(id).map(|n| n.working)
    }

    /// Working bounds of `id` in its parent's child space.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn rect(&self, id: NodeId) -> Rect {
        self.node(id).working.rect
    }

    /// Scale of `id`'s child coordinate space.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn scale(&self, id: NodeId) -> f64 {
        self.node(id).working.scale
    }

    /// Content flags of `id`; empty for stale ids.
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.node_opt(id).map(|n| n.flags).unwrap_or_default()
    }

    /// Label of `id`; empty for stale ids.
    pub fn label(&self, id: NodeId) -> &str {
        self.node_opt(id).map(|n| n.label.as_str()).unwrap_or("")
    }

    /// Bounding box of `id`'s children in its child space, or `None` without children.
    pub fn child_bounds(&self, id: NodeId) -> Option<Rect> {
        bounding_rect(self.children(id).iter().map(|c| self.rect(*c)))
    }

    /// Children of `parent` lying strictly inside `viewport` (child space of `parent`).
    pub fn children_within(
        &self,
        parent: NodeId,
        viewport: Rect,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .iter()
            .copied()
            .filter(move |c| rect_contains(viewport, self.rect(*c)))
    }

    /// `id` followed by all of its descendants, depth first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if !self.is_alive(n) {
                continue;
            }
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Replace the working bounds of `id`.
    ///
    /// Stale ids and the root are ignored; non-finite bounds are logged and ignored.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if self.is_root(id) {
            return;
        }
        if !is_finite_rect(rect) {
            tracing::warn!(?id, ?rect, "ignoring non-finite bounds");
            return;
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.working.rect = rect;
        }
    }

    /// Move `id` so its top-left corner is at `origin`, keeping its size.
    pub fn set_origin(&mut self, id: NodeId, origin: Point) {
        if let Some(g) = self.geometry(id) {
            self.set_rect(id, g.rect.with_origin(origin));
        }
    }

    /// Resize `id`, keeping its top-left corner.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(g) = self.geometry(id) {
            self.set_rect(id, g.rect.with_size(size));
        }
    }

    /// Translate `id` by `delta`.
    pub fn translate(&mut self, id: NodeId, delta: Vec2) {
        if let Some(g) = self.geometry(id) {
            self.set_rect(id, g.rect + delta);
        }
    }

    /// Set the scale of `id`'s child coordinate space.
    pub fn set_scale(&mut self, id: NodeId, scale: f64) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidScale(scale));
        }
        let n = self.node_opt_mut(id).ok_or(Error::StaleNode(id))?;
        n.working.scale = scale;
        Ok(())
    }

    /// Nodes whose working geometry differs from their committed geometry, in id order.
    pub fn pending(&self) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .ids()
            .filter(|id| {
                let n = self.node(*id);
                n.working != n.committed
            })
            .collect();
        out.sort();
        out
    }

    /// Accept every working geometry and return what changed since the last commit.
    pub fn commit(&mut self) -> Changes {
        self.epoch = self.epoch.wrapping_add(1);
        let mut changes = Changes::default();
        for id in self.pending() {
            let n = self.node_mut(id);
            changes.nodes.push(ChangedNode {
                id,
                old: n.committed,
                new: n.working,
            });
            n.committed = n.working;
        }
        changes
    }

    /// Restore every node to its committed geometry. Returns the restored ids.
    pub fn reset(&mut self) -> Vec<NodeId> {
        let restored = self.pending();
        for id in &restored {
            let n = self.node_mut(*id);
            n.working = n.committed;
        }
        restored
    }

    // --- internals ---

    fn alloc(&mut self, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
