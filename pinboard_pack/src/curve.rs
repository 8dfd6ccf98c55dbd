// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curve packing: equal slots spaced along a closed curve, grown until they stop overlapping.

use core::f64::consts::TAU;

use kurbo::{Point, Rect, Size, Vec2};
use pinboard_geometry::approx::is_greater;
use pinboard_geometry::{Grid, Rounding, bounding_rect, rect_intersects};
use pinboard_tree::{LayoutConfig, NodeId, Tree};

/// Samples used to measure arc length.
const ARC_SAMPLES: usize = 1024;

/// A closed curve children are laid out along.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    /// The unit circle.
    Circle,
    /// The classic parametric heart, normalized to roughly unit size.
    Heart,
    /// A figure eight lying on its side (lemniscate of Gerono).
    Infinity,
}

impl Curve {
    /// Every curve, in menu order.
    pub const ALL: [Self; 3] = [Self::Circle, Self::Heart, Self::Infinity];

    /// Point at `t ∈ [0, 1]`, with y pointing up.
    ///
    /// `t = 0` and `t = 1` are the same point.
    pub fn point(self, t: f64) -> Point {
        let a = TAU * t;
        match self {
            Self::Circle => Point::new(a.cos(), a.sin()),
            Self::Heart => {
                let x = a.sin().powi(3);
                let y = (13.0 * a.cos()
                    - 5.0 * (2.0 * a).cos()
                    - 2.0 * (3.0 * a).cos()
                    - (4.0 * a).cos())
                    / 16.0;
                Point::new(x, y)
            }
            Self::Infinity => Point::new(a.cos(), a.sin() * a.cos()),
        }
    }

    /// Where along the curve the first of `n` evenly spaced parameters sits,
    /// as a fraction of the spacing.
    ///
    /// The figure eight crosses itself at a quarter and three quarters of its
    /// length; a third of a spacing never lands there for any `n`.
    fn phase(self) -> f64 {
        match self {
            Self::Circle | Self::Heart => 0.0,
            Self::Infinity => 1.0 / 3.0,
        }
    }

    /// `n` parameters spaced evenly by arc length, in increasing order.
    pub fn parameters(self, n: usize) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        let mut lengths = Vec::with_capacity(ARC_SAMPLES + 1);
        lengths.push(0.0);
        let mut total = 0.0;
        let mut prev = self.point(0.0);
        for i in 1..=ARC_SAMPLES {
            let p = self.point(i as f64 / ARC_SAMPLES as f64);
            total += prev.distance(p);
            lengths.push(total);
            prev = p;
        }

        (0..n)
            .map(|k| {
                let target = (k as f64 + self.phase()) / n as f64 * total;
                let i = lengths.partition_point(|l| *l < target).clamp(1, ARC_SAMPLES);
                let (l0, l1) = (lengths[i - 1], lengths[i]);
                let frac = if l1 > l0 { (target - l0) / (l1 - l0) } else { 0.0 };
                ((i - 1) as f64 + frac.clamp(0.0, 1.0)) / ARC_SAMPLES as f64
            })
            .collect()
    }
}

/// Slots found by [`fit_curve`].
#[derive(Clone, Debug, PartialEq)]
pub struct CurveFit {
    /// Number of scale increments taken.
    pub steps: u32,
    /// The curve scale, `steps · step`.
    pub scale: f64,
    /// One slot per parameter, shifted so the slots start at the origin.
    pub slots: Vec<Rect>,
}

/// Slots of `slot` size centered on `n` points of `curve` at `scale`.
///
/// The curve is stretched by the slot's width and height, flipped so y
/// points down, shifted so the slots' bounding box starts at the origin, and
/// every slot origin is snapped to the grid.
pub fn curve_slots(curve: Curve, n: usize, slot: Size, scale: f64, grid: &Grid) -> Vec<Rect> {
    slots_at(curve, &curve.parameters(n), slot, scale, grid)
}

fn slots_at(curve: Curve, params: &[f64], slot: Size, scale: f64, grid: &Grid) -> Vec<Rect> {
    let rects: Vec<Rect> = params
        .iter()
        .map(|t| {
            let p = curve.point(*t);
            let center = Point::new(p.x * slot.width * scale, -p.y * slot.height * scale);
            Rect::from_center_size(center, slot)
        })
        .collect();
    let Some(bounds) = bounding_rect(rects.iter().copied()) else {
        return rects;
    };
    let shift = bounds.origin().to_vec2();
    rects
        .into_iter()
        .map(|r| {
            let origin = grid.quantize_point(r.origin() - shift, Rounding::Nearest);
            Rect::from_origin_size(origin, slot)
        })
        .collect()
}

fn pairwise_clear(slots: &[Rect]) -> bool {
    slots
        .iter()
        .enumerate()
        .all(|(i, a)| slots[i + 1..].iter().all(|b| !rect_intersects(*a, *b)))
}

/// Grow `curve` in increments of `step` until `n` slots of `slot` size no
/// longer overlap.
///
/// The first scale tested is `step` itself. Gives up after `max_steps`
/// increments, returning the last attempt.
pub fn fit_curve(
    curve: Curve,
    n: usize,
    slot: Size,
    step: f64,
    grid: &Grid,
    max_steps: u32,
) -> CurveFit {
    let params = curve.parameters(n);
    let max_steps = max_steps.max(1);
    let mut steps = 1;
    loop {
        let scale = f64::from(steps) * step;
        let slots = slots_at(curve, &params, slot, scale, grid);
        let clear = pairwise_clear(&slots);
        if clear || steps >= max_steps {
            if !clear {
                tracing::warn!(?curve, n, steps, "curve slots still overlap at the step limit");
            }
            return CurveFit {
                steps,
                scale,
                slots,
            };
        }
        steps += 1;
    }
}

/// Slots a curve pack assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveRecord {
    /// The curve used.
    pub curve: Curve,
    /// The fitted curve scale.
    pub scale: f64,
    /// Each child with the slot it was centered in.
    pub slots: Vec<(NodeId, Rect)>,
}

/// Center of the padded content box of `branch`, in its child space.
///
/// `None` for the root and for branches too small to have a content box.
fn content_center(tree: &Tree, branch: NodeId, config: &LayoutConfig) -> Option<Point> {
    if tree.is_root(branch) {
        return None;
    }
    let rect = tree.rect(branch);
    let scale = tree.scale(branch);
    let pad = 2.0 * config.padding;
    let (w, h) = (rect.width() - pad, rect.height() - pad);
    (is_greater(w, 0.0) && is_greater(h, 0.0)).then(|| Point::new(0.5 * w / scale, 0.5 * h / scale))
}

/// Children ordered counter-clockwise by angle around `center`, starting from
/// the positive x axis. Without a center, the center of the children's
/// bounding box is used.
fn polar_order(children: &[(NodeId, Rect)], center: Option<Point>) -> Vec<(NodeId, Rect)> {
    let Some(bounds) = bounding_rect(children.iter().map(|(_, r)| *r)) else {
        return Vec::new();
    };
    let center = center.unwrap_or_else(|| bounds.center());
    let angle = |r: &Rect| {
        let c = r.center();
        // Screen y points down.
        let a = (center.y - c.y).atan2(c.x - center.x);
        if a < 0.0 { a + TAU } else { a }
    };
    let mut out = children.to_vec();
    out.sort_by(|a, b| angle(&a.1).total_cmp(&angle(&b.1)).then(a.0.cmp(&b.0)));
    out
}

pub(crate) fn place(tree: &mut Tree, branch: NodeId, curve: Curve, config: &LayoutConfig) -> CurveRecord {
    let grid = &config.grid;
    let children = tree.child_rects(branch);
    let largest = children.iter().fold(Size::ZERO, |acc, (_, r)| {
        Size::new(acc.width.max(r.width()), acc.height.max(r.height()))
    });
    let slot = grid.quantize_size(largest, Rounding::Ceil);
    let fit = fit_curve(
        curve,
        children.len(),
        slot,
        config.curve_step,
        grid,
        config.max_curve_steps,
    );

    let center = content_center(tree, branch, config);
    let mut slots = Vec::with_capacity(children.len());
    for ((id, rect), slot_rect) in polar_order(&children, center).into_iter().zip(fit.slots) {
        let inset = Vec2::new(
            grid.quantize((slot.width - rect.width()) * 0.5, Rounding::Floor),
            grid.quantize((slot.height - rect.height()) * 0.5, Rounding::Floor),
        );
        tree.set_origin(id, slot_rect.origin() + inset);
        slots.push((id, slot_rect));
    }
    tracing::trace!(?curve, steps = fit.steps, scale = fit.scale, "curve placed");
    CurveRecord {
        curve,
        scale: fit.scale,
        slots,
    }
}
