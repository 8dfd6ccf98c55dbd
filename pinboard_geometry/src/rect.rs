// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle predicates and small helpers over [`kurbo::Rect`].

use kurbo::{Point, Rect};

use crate::approx::{is_greater, is_less};

/// One of the two canvas axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Near (minimum) edge of `r` on this axis.
    #[inline]
    pub fn min(self, r: Rect) -> f64 {
        match self {
            Self::X => r.x0,
            Self::Y => r.y0,
        }
    }

    /// Far (maximum) edge of `r` on this axis.
    #[inline]
    pub fn max(self, r: Rect) -> f64 {
        match self {
            Self::X => r.x1,
            Self::Y => r.y1,
        }
    }

    /// Move `r` so its near edge on this axis sits at `v`, keeping its size.
    pub fn with_min(self, r: Rect, v: f64) -> Rect {
        match self {
            Self::X => Rect::new(v, r.y0, v + r.width(), r.y1),
            Self::Y => Rect::new(r.x0, v, r.x1, v + r.height()),
        }
    }
}

/// Whether `a` and `b` overlap with positive area.
///
/// Rectangles that only share an edge or a corner do not intersect: grid
/// neighbors are a valid layout.
#[inline]
pub fn rect_intersects(a: Rect, b: Rect) -> bool {
    is_less(a.x0, b.x1) && is_less(b.x0, a.x1) && is_less(a.y0, b.y1) && is_less(b.y0, a.y1)
}

/// Whether `inner` lies strictly inside `outer`.
#[inline]
pub fn rect_contains(outer: Rect, inner: Rect) -> bool {
    is_less(outer.x0, inner.x0)
        && is_less(outer.y0, inner.y0)
        && is_greater(outer.x1, inner.x1)
        && is_greater(outer.y1, inner.y1)
}

/// Whether `p` lies strictly inside `r`.
#[inline]
pub fn point_inside(r: Rect, p: Point) -> bool {
    is_less(r.x0, p.x) && is_less(p.x, r.x1) && is_less(r.y0, p.y) && is_less(p.y, r.y1)
}

/// Whether the spans of `a` and `b` on `axis` overlap with positive length.
#[inline]
pub fn spans_overlap(axis: Axis, a: Rect, b: Rect) -> bool {
    is_less(axis.min(a), axis.max(b)) && is_less(axis.min(b), axis.max(a))
}

/// Whether every coordinate of `r` is finite.
#[inline]
pub fn is_finite_rect(r: Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}

/// Union of all rectangles, or `None` for an empty set.
pub fn bounding_rect(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    let mut it = rects.into_iter();
    let first = it.next()?;
    Some(it.fold(first, |acc, r| acc.union(r)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(x: f64, y: f64) -> Rect {
        Rect::from_origin_size((x, y), (1.0, 1.0))
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        assert!(!rect_intersects(unit(0.0, 0.0), unit(1.0, 0.0)));
        assert!(!rect_intersects(unit(0.0, 0.0), unit(0.0, 1.0)));
        assert!(!rect_intersects(unit(0.0, 0.0), unit(1.0, 1.0)));
        assert!(rect_intersects(unit(0.0, 0.0), unit(0.5, 0.5)));
    }

    #[test]
    fn float_noise_on_shared_edge_is_ignored() {
        let a = Rect::new(0.0, 0.0, 0.1 + 0.2, 1.0);
        let b = Rect::new(0.3, 0.0, 1.0, 1.0);
        assert!(!rect_intersects(a, b));
    }

    #[test]
    fn containment_is_strict() {
        let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_contains(outer, Rect::new(1.0, 1.0, 9.0, 9.0)));
        assert!(!rect_contains(outer, Rect::new(0.0, 1.0, 9.0, 9.0)));
        assert!(!rect_contains(outer, outer));
    }

    #[test]
    fn bounding_rect_of_set() {
        assert_eq!(bounding_rect(core::iter::empty()), None);
        let r = bounding_rect([unit(0.0, 0.0), unit(3.0, 2.0)]).unwrap();
        assert_eq!(r, Rect::new(0.0, 0.0, 4.0, 3.0));
    }

    #[test]
    fn axis_helpers() {
        let r = Rect::new(1.0, 2.0, 4.0, 8.0);
        assert_eq!(Axis::X.min(r), 1.0);
        assert_eq!(Axis::Y.max(r), 8.0);
        assert_eq!(Axis::X.cross(), Axis::Y);
        assert_eq!(Axis::Y.with_min(r, 0.0), Rect::new(1.0, 0.0, 4.0, 6.0));
        assert!(spans_overlap(Axis::X, r, Rect::new(3.0, 20.0, 5.0, 21.0)));
        assert!(!spans_overlap(Axis::Y, r, Rect::new(3.0, 8.0, 5.0, 21.0)));
    }
}
