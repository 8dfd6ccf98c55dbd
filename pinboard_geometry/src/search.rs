// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest free grid slot search.

use kurbo::{Point, Rect, Size};

use crate::approx::{EPSILON, is_less, is_zero};
use crate::grid::{Grid, Rounding};
use crate::rect::{is_finite_rect, rect_intersects};

/// Find the grid-aligned position nearest to `target` where a rectangle of
/// `size` collides with none of `obstacles`.
///
/// The search covers the union of the rectangle at `current` and at the
/// quantized `target`, grown by one rectangle size on every side. Positions are
/// visited row by row; among collision-free positions the one closest to the
/// quantized target wins, earlier positions winning ties.
///
/// Returns `None` when the bounded area has no free slot, or when `size` is
/// empty or any input is non-finite (the request is logged and ignored).
///
/// Cost is proportional to `rows × cols × obstacles.len()`, so callers should
/// pass only the obstacles that can plausibly be near `target`.
pub fn find_free_position(
    size: Size,
    current: Point,
    target: Point,
    obstacles: &[Rect],
    grid: &Grid,
) -> Option<Point> {
    let current_rect = Rect::from_origin_size(current, size);
    if is_zero(size.width) || is_zero(size.height) || size.width < 0.0 || size.height < 0.0 {
        tracing::warn!(?size, "rejecting free-position search for an empty size");
        return None;
    }
    if !is_finite_rect(current_rect) || !target.x.is_finite() || !target.y.is_finite() {
        tracing::warn!(?current, ?target, ?size, "rejecting free-position search with non-finite input");
        return None;
    }

    let target = grid.quantize_point(target, Rounding::Nearest);
    let area = current_rect
        .union(Rect::from_origin_size(target, size))
        .inflate(size.width, size.height);
    let area = Rect::new(
        grid.quantize(area.x0, Rounding::Floor),
        grid.quantize(area.y0, Rounding::Floor),
        grid.quantize(area.x1, Rounding::Ceil),
        grid.quantize(area.y1, Rounding::Ceil),
    );

    let cell = grid.cell();
    let cols = slot_count(area.width() - size.width, cell);
    let rows = slot_count(area.height() - size.height, cell);

    let mut best: Option<(Point, f64)> = None;
    for row in 0..rows {
        let y = area.y0 + row as f64 * cell;
        for col in 0..cols {
            let x = area.x0 + col as f64 * cell;
            let candidate = Rect::from_origin_size((x, y), size);
            if obstacles.iter().any(|o| rect_intersects(candidate, *o)) {
                continue;
            }
            let p = Point::new(x, y);
            let dist = p.distance(target);
            match best {
                Some((_, best_dist)) if !is_less(dist, best_dist) => {}
                _ => best = Some((p, dist)),
            }
        }
    }
    best.map(|(p, _)| p)
}

/// Number of grid positions a span of `free` length offers, counting both ends.
fn slot_count(free: f64, cell: f64) -> usize {
    if free < -EPSILON {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The search area is bounded by a few rectangle sizes; counts are small and non-negative."
    )]
    let n = (free / cell + EPSILON).floor().max(0.0) as usize;
    n + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn unit(x: f64, y: f64) -> Rect {
        Rect::from_origin_size((x, y), (1.0, 1.0))
    }

    #[test]
    fn nearest_uncovered_cell_wins() {
        // Cover the 3×3 block from (4,4) to (6,6) except (6,5).
        let mut obstacles = Vec::new();
        for y in 4..=6 {
            for x in 4..=6 {
                if (x, y) != (6, 5) {
                    obstacles.push(unit(f64::from(x), f64::from(y)));
                }
            }
        }
        let grid = Grid::new(1.0);
        let found = find_free_position(
            Size::new(1.0, 1.0),
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
            &obstacles,
            &grid,
        );
        assert_eq!(found, Some(Point::new(6.0, 5.0)));
    }

    #[test]
    fn free_target_is_returned_as_is() {
        let grid = Grid::new(8.0);
        let found = find_free_position(
            Size::new(16.0, 16.0),
            Point::new(0.0, 0.0),
            Point::new(41.0, 39.0),
            &[Rect::new(0.0, 0.0, 16.0, 16.0)],
            &grid,
        );
        assert_eq!(found, Some(Point::new(40.0, 40.0)));
    }

    #[test]
    fn fully_covered_area_yields_none() {
        let grid = Grid::new(1.0);
        let wall = Rect::new(-10.0, -10.0, 10.0, 10.0);
        let found = find_free_position(
            Size::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            &[wall],
            &grid,
        );
        assert_eq!(found, None);
    }

    #[test]
    #[traced_test]
    fn empty_size_is_rejected_and_logged() {
        let grid = Grid::new(1.0);
        let found =
            find_free_position(Size::ZERO, Point::ZERO, Point::new(3.0, 3.0), &[], &grid);
        assert_eq!(found, None);
        assert!(logs_contain("rejecting free-position search"));
    }

    #[test]
    #[traced_test]
    fn non_finite_target_is_rejected() {
        let grid = Grid::new(1.0);
        let found = find_free_position(
            Size::new(1.0, 1.0),
            Point::ZERO,
            Point::new(f64::NAN, 0.0),
            &[],
            &grid,
        );
        assert_eq!(found, None);
        assert!(logs_contain("non-finite"));
    }
}
