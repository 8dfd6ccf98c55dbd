// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid quantization.

use kurbo::{Point, Rect, Size};

use crate::approx::{EPSILON, is_zero};

/// How [`Grid::quantize`] maps a coordinate onto the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Nearest grid line.
    #[default]
    Nearest,
    /// Largest grid line not above the value.
    Floor,
    /// Smallest grid line not below the value.
    Ceil,
}

/// A uniform square grid anchored at the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
    cell: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl Grid {
    /// Create a grid with the given cell size.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is not a positive finite number.
    pub fn new(cell: f64) -> Self {
        assert!(
            cell.is_finite() && cell > 0.0,
            "grid cell size must be positive and finite, got {cell}"
        );
        Self { cell }
    }

    /// Edge length of one grid cell.
    #[inline]
    pub const fn cell(&self) -> f64 {
        self.cell
    }

    /// Half of one grid cell; the largest increment a cascade applies at once.
    #[inline]
    pub fn half_cell(&self) -> f64 {
        self.cell * 0.5
    }

    /// Map `v` onto a multiple of the cell size.
    ///
    /// Floor and ceil absorb [`EPSILON`] of error so that a value that is
    /// already on a grid line (up to accumulated float error) stays there.
    pub fn quantize(&self, v: f64, rounding: Rounding) -> f64 {
        let cells = v / self.cell;
        let snapped = match rounding {
            Rounding::Nearest => cells.round(),
            Rounding::Floor => (cells + EPSILON).floor(),
            Rounding::Ceil => (cells - EPSILON).ceil(),
        };
        // Avoid handing out negative zero.
        if snapped == 0.0 {
            0.0
        } else {
            snapped * self.cell
        }
    }

    /// Quantize both coordinates of a point.
    pub fn quantize_point(&self, p: Point, rounding: Rounding) -> Point {
        Point::new(self.quantize(p.x, rounding), self.quantize(p.y, rounding))
    }

    /// Quantize both dimensions of a size.
    pub fn quantize_size(&self, s: Size, rounding: Rounding) -> Size {
        Size::new(
            self.quantize(s.width, rounding),
            self.quantize(s.height, rounding),
        )
    }

    /// Snap origin and size of `r` to the grid with nearest rounding.
    pub fn quantize_rect(&self, r: Rect) -> Rect {
        let origin = self.quantize_point(r.origin(), Rounding::Nearest);
        let size = self.quantize_size(r.size(), Rounding::Nearest);
        Rect::from_origin_size(origin, size)
    }

    /// Whether `v` lies on a grid line.
    pub fn is_aligned(&self, v: f64) -> bool {
        is_zero(self.quantize(v, Rounding::Nearest) - v)
    }

    /// Whether origin and size of `r` lie on grid lines.
    pub fn is_rect_aligned(&self, r: Rect) -> bool {
        self.is_aligned(r.x0)
            && self.is_aligned(r.y0)
            && self.is_aligned(r.width())
            && self.is_aligned(r.height())
    }

    /// Number of whole cells spanned by `v`, rounding up.
    pub fn cells_ceil(&self, v: f64) -> f64 {
        self.quantize(v, Rounding::Ceil) / self.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_floor_ceil() {
        let g = Grid::new(10.0);
        assert_eq!(g.quantize(14.0, Rounding::Nearest), 10.0);
        assert_eq!(g.quantize(15.5, Rounding::Nearest), 20.0);
        assert_eq!(g.quantize(19.0, Rounding::Floor), 10.0);
        assert_eq!(g.quantize(11.0, Rounding::Ceil), 20.0);
        assert_eq!(g.quantize(-11.0, Rounding::Floor), -20.0);
    }

    #[test]
    fn near_grid_values_do_not_jump_cells() {
        let g = Grid::new(1.0);
        assert_eq!(g.quantize(2.999_999_9, Rounding::Floor), 3.0);
        assert_eq!(g.quantize(3.000_000_1, Rounding::Ceil), 3.0);
        assert!(g.is_aligned(3.000_000_1));
        assert!(!g.is_aligned(3.5));
    }

    #[test]
    fn no_negative_zero() {
        let g = Grid::new(4.0);
        let z = g.quantize(-0.4, Rounding::Nearest);
        assert_eq!(z, 0.0);
        assert!(z.is_sign_positive());
    }

    #[test]
    fn rect_snapping() {
        let g = Grid::new(8.0);
        let r = g.quantize_rect(Rect::from_origin_size((7.0, 17.0), (30.0, 9.0)));
        assert_eq!(r, Rect::new(8.0, 16.0, 40.0, 24.0));
        assert!(g.is_rect_aligned(r));
    }

    #[test]
    #[should_panic(expected = "grid cell size must be positive")]
    fn zero_cell_panics() {
        let _ = Grid::new(0.0);
    }
}
