// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinboard Geometry: the rectangle toolkit underneath the Pinboard layout engine.
//!
//! Cards on an infinite canvas are axis-aligned rectangles on an integer grid.
//! This crate holds the leaf-level pieces every higher layer builds on:
//!
//! - [`approx`]: epsilon-tolerant scalar comparisons. Nothing above this crate
//!   compares coordinates with raw `==` or `<`.
//! - [`Grid`]: quantization of coordinates to a fixed cell size with nearest,
//!   floor, and ceil rounding.
//! - [`rect_intersects`] / [`rect_contains`]: overlap and strict containment.
//!   Rectangles that merely share an edge do not intersect.
//! - [`attach`]: rigid attachment chains (rectangles sharing a full edge) and
//!   the transitive [`grid_island`] of a seed rectangle.
//! - [`find_free_position`]: the nearest collision-free grid slot within a
//!   bounded search area.
//!
//! Rectangles are [`kurbo::Rect`] values; identifiers for attachment queries are
//! whatever `Copy` key the caller uses.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use pinboard_geometry::{Grid, all_attached_x, find_free_position, rect_intersects};
//!
//! let cards: Vec<(u32, Rect)> = (0..3)
//!     .map(|i| (i, Rect::from_origin_size((f64::from(i) * 10.0, 0.0), (10.0, 10.0))))
//!     .collect();
//!
//! // The middle card is rigidly attached to both neighbors.
//! assert_eq!(all_attached_x(cards[1].1, &cards), [0, 2]);
//! assert!(!rect_intersects(cards[0].1, cards[1].1));
//!
//! // Find room for a card displaced from the middle slot. Rows are scanned
//! // top to bottom, so the slot above wins the tie with the slot below.
//! let grid = Grid::new(10.0);
//! let obstacles: Vec<Rect> = cards.iter().map(|(_, r)| *r).collect();
//! let slot = find_free_position(
//!     Size::new(10.0, 10.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     &obstacles,
//!     &grid,
//! );
//! assert_eq!(slot, Some(Point::new(10.0, -10.0)));
//! ```

pub mod approx;
pub mod attach;
pub mod grid;
pub mod rect;
pub mod search;

pub use approx::EPSILON;
pub use attach::{
    Direction, all_attached_x, all_attached_y, attached_above, attached_below, attached_chain,
    attached_left, attached_right, grid_island, is_attached,
};
pub use grid::{Grid, Rounding};
pub use rect::{
    Axis, bounding_rect, is_finite_rect, point_inside, rect_contains, rect_intersects,
    spans_overlap,
};
pub use search::find_free_position;
