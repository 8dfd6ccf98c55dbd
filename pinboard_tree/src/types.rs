// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the geometry tree: node identifiers, flags, local geometry, and configuration.

use kurbo::{Point, Rect, Size};
use pinboard_geometry::Grid;

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// `NodeId` is totally ordered (slot first, then generation). The layout
/// engine keys all of its sets and maps by `NodeId`, so iteration order, and
/// with it every tie-break, is deterministic.
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether a `NodeId` still refers to a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Content flags supplied by the store.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node shows non-text content (an image or a file); its size is never
        /// fitted to measured text.
        const MEDIA     = 0b0000_0001;
        /// Branch whose children are hidden; laid out like a leaf.
        const COLLAPSED = 0b0000_0010;
    }
}

/// Geometry and content of a node as supplied by the store.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Top-left corner in the parent's child coordinate space.
    pub origin: Point,
    /// Own size, in the parent's child coordinate space.
    pub size: Size,
    /// Uniform scale applied to this node's child coordinate space. Must be positive.
    pub scale: f64,
    /// Content flags.
    pub flags: NodeFlags,
    /// Text shown in the node's header and body; measured when fitting leaves.
    pub label: String,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            size: Size::ZERO,
            scale: 1.0,
            flags: NodeFlags::default(),
            label: String::new(),
        }
    }
}

impl LocalNode {
    /// A node occupying `rect`, with default scale and no content.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            origin: rect.origin(),
            size: rect.size(),
            ..Default::default()
        }
    }
}

/// The mutable geometry the engine reads and writes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    /// Bounds in the parent's child coordinate space.
    pub rect: Rect,
    /// Scale of this node's child coordinate space.
    pub scale: f64,
}

/// Tuning knobs shared by cascades, packers, and the reorganize traversal.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Grid every committed coordinate snaps to.
    pub grid: Grid,
    /// Smallest width a node may have.
    pub min_width: f64,
    /// Smallest height a node may have; the measured header height raises it further.
    pub min_height: f64,
    /// Inner padding between a node's frame and its content.
    pub padding: f64,
    /// Line width leaf text is wrapped at when fitting a leaf.
    pub max_text_width: f64,
    /// Scale increment used while growing a curve until its slots stop overlapping.
    pub curve_step: f64,
    /// Upper bound on curve growth iterations.
    pub max_curve_steps: u32,
    /// Upper bound on the half-cell increments a single resize or move may
    /// take. Longer requests are rejected rather than taken in larger strides.
    pub max_cascade_steps: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid: Grid::new(8.0),
            min_width: 64.0,
            min_height: 32.0,
            padding: 8.0,
            max_text_width: 320.0,
            curve_step: 0.05,
            max_curve_steps: 10_000,
            max_cascade_steps: 1 << 16,
        }
    }
}

impl LayoutConfig {
    /// A configuration on a grid of `cell`, with minimums of one cell and no padding.
    ///
    /// Convenient for unit-square layouts.
    pub fn unit(cell: f64) -> Self {
        Self {
            grid: Grid::new(cell),
            min_width: cell,
            min_height: cell,
            padding: 0.0,
            ..Default::default()
        }
    }
}
