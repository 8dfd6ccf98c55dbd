// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinboard Pack: automatic arrangement of card trees.
//!
//! A [`Packer`] arranges the children of one branch into a compact layout
//! that starts at the branch's child-space origin:
//!
//! - [`Packer::Stack`]: children in reading order stacked into vertical
//!   shelves whose height aims at a target width/height ratio.
//!   [`Packer::list`] is the degenerate case with a single shelf.
//! - [`Packer::Grid`]: a `ceil(sqrt(n))`-row grid filled column by column.
//! - [`Packer::Curve`]: equal slots along a circle, heart, or figure eight,
//!   grown in fixed increments until no two slots overlap.
//!
//! [`reorganize`] walks a subtree depth first: it fits leaves to their text,
//! packs every branch, lets branches with spare room grow their children,
//! and finally resizes the seed through a collision-free
//! [`Cascade`](pinboard_tree::Cascade). The state shared by those passes lives
//! in an explicit [`PackingSession`].
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::Rect;
//! use pinboard_pack::{Depth, Packer, reorganize};
//! use pinboard_tree::{LayoutConfig, LocalNode, MonospaceMeasure, NoViewport, Tree};
//!
//! let config = LayoutConfig::unit(1.0);
//! let measure = MonospaceMeasure { char_width: 1.0, line_height: 1.0 };
//! let mut tree = Tree::new();
//! let board = tree
//!     .insert(tree.root(), LocalNode::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0)))
//!     .unwrap();
//! for i in 0..4 {
//!     let rect = Rect::from_origin_size((f64::from(i) * 3.0, 0.0), (1.0, 1.0));
//!     tree.insert(board, LocalNode::from_rect(rect)).unwrap();
//! }
//!
//! let changed = reorganize(
//!     &mut tree,
//!     board,
//!     Packer::Grid,
//!     Depth::Infinite,
//!     &config,
//!     &measure,
//!     &mut NoViewport,
//! )
//! .unwrap();
//! assert!(changed.contains(&board));
//! ```

mod curve;
mod grid;
mod packer;
mod reorganize;
mod stack;

pub use curve::{Curve, CurveFit, CurveRecord, curve_slots, fit_curve};
pub use grid::{GridRecord, grid_grade};
pub use packer::{Packer, PackingRecord, PackingSession, expand_children, pack};
pub use reorganize::{Depth, Reorganizer, reorganize};
pub use stack::{Shelf, StackRecord, shelf_limit};
