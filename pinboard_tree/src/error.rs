// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy.

use crate::types::NodeId;

/// Errors reported by the geometry tree, cascades, packers, and traversals.
///
/// Unsatisfiable searches are not errors; they surface as `None`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The identifier is stale or was never issued by this tree.
    #[error("node {0:?} is not alive in this tree")]
    StaleNode(NodeId),
    /// The root was passed where an editable node is required.
    #[error("the tree root cannot be moved or resized")]
    RootNotEditable,
    /// A packer was asked to lay out a node without children.
    #[error("branch {0:?} has no children to pack")]
    EmptyBranch(NodeId),
    /// A scale that is zero, negative, or not finite.
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),
    /// A requested coordinate or size for an existing node was NaN or infinite.
    #[error("geometry for node {0:?} has a non-finite coordinate")]
    NonFinite(NodeId),
    /// A node offered for insertion has a NaN or infinite coordinate or size.
    #[error("the inserted node has a non-finite coordinate")]
    NonFiniteInsert,
    /// A resize or move needs more half-cell increments than the configured limit.
    #[error("editing node {node:?} needs {steps} increments, more than the configured limit")]
    TooFar {
        /// The node being edited.
        node: NodeId,
        /// Increments the request would take.
        steps: u64,
    },
    /// Reparenting would make a node its own ancestor.
    #[error("cannot place node {node:?} under {parent:?}: it would become its own ancestor")]
    Cycle {
        /// The node being moved.
        node: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
