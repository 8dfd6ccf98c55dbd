// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinboard Tree: the card geometry tree and its collision-free edit cascade.
//!
//! Cards on a Pinboard canvas nest: a card with children is a *branch* whose
//! children live in its own, uniformly scaled coordinate space. This crate
//! stores that hierarchy and keeps sibling cards from overlapping while one of
//! them is resized or moved.
//!
//! - [`Tree`]: an arena of nodes keyed by generational [`NodeId`]s. Parents and
//!   children refer to each other by id, so there are no ownership cycles.
//! - Working and committed geometry: layout operations edit a working copy;
//!   [`Tree::commit`] accepts it and reports [`Changes`] for the store to
//!   persist, and [`Tree::reset`] throws it away.
//! - [`Cascade`]: one resize or move, propagated through rigidly attached
//!   neighbors and then through every sibling the moving group runs into.
//! - [`Measure`] and [`Viewport`]: the collaborators layout calls out to.
//!
//! ## Not a renderer
//!
//! Nothing here draws, hit-tests, or persists. The caller owns the tree, feeds it
//! the store's geometry, and writes back the nodes reported as changed.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Rect, Size};
//! use pinboard_tree::{LayoutConfig, LocalNode, Tree, resize_node};
//!
//! let config = LayoutConfig::unit(1.0);
//! let mut tree = Tree::new();
//! let root = tree.root();
//! let ids: Vec<_> = (0..3)
//!     .map(|i| {
//!         let rect = Rect::from_origin_size((f64::from(i), 0.0), (1.0, 1.0));
//!         tree.insert(root, LocalNode::from_rect(rect)).unwrap()
//!     })
//!     .collect();
//!
//! // Widening the first card pushes the attached row along.
//! let changed = resize_node(&mut tree, ids[0], Size::new(2.0, 1.0), &config)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(changed, ids);
//! assert_eq!(tree.rect(ids[2]).x0, 3.0);
//!
//! // Accept the edit.
//! let changes = tree.commit();
//! assert_eq!(changes.nodes.len(), 3);
//! ```

mod cascade;
mod error;
mod measure;
mod tree;
mod types;

pub use cascade::{Cascade, RepositionInstruction, move_node, resize_node};
pub use error::{Error, Result};
pub use measure::{Measure, MonospaceMeasure, NoViewport, Viewport};
pub use tree::{ChangedNode, Changes, Tree};
pub use types::{Geometry, LayoutConfig, LocalNode, NodeFlags, NodeId};
