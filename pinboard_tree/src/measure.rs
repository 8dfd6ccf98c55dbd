// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborators the engine calls out to: text measurement and the viewport.

use kurbo::{Rect, Size};

use crate::types::NodeId;

/// Text measurement supplied by the rendering layer.
///
/// Implementations must be pure: the same inputs always produce the same output.
pub trait Measure {
    /// Size of `text` wrapped at `max_width`.
    fn measure_text(&self, text: &str, max_width: f64) -> Size;

    /// Minimum height of a single-line header showing `text` in a node of `width`.
    fn header_height(&self, text: &str, width: f64) -> f64;
}

/// Receives the request to bring a node into view at the end of a traversal.
pub trait Viewport {
    /// Center the view on `rect`, the bounds of `id` in its parent's child space.
    fn center_on(&mut self, id: NodeId, rect: Rect);
}

/// A viewport that ignores every request.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoViewport;

impl Viewport for NoViewport {
    fn center_on(&mut self, _id: NodeId, _rect: Rect) {}
}

/// Fixed-pitch text measurement with greedy word wrapping.
///
/// Every character is `char_width` wide and every line `line_height` tall.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance of a single character.
    pub char_width: f64,
    /// Height of one line of text.
    pub line_height: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl MonospaceMeasure {
    fn chars_per_line(&self, max_width: f64) -> usize {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Line capacity is a small, non-negative character count."
        )]
        let n = (max_width / self.char_width).floor().max(1.0) as usize;
        n
    }

    /// Wrapped line lengths, in characters.
    fn line_lengths(&self, text: &str, max_width: f64) -> Vec<usize> {
        let cap = self.chars_per_line(max_width);
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = 0_usize;
            for word in paragraph.split_whitespace() {
                let mut len = word.chars().count();
                // Hard-break words longer than a line.
                while len > cap {
                    if current > 0 {
                        lines.push(current);
                        current = 0;
                    }
                    lines.push(cap);
                    len -= cap;
                }
                let needed = if current == 0 { len } else { current + 1 + len };
                if needed > cap {
                    lines.push(current);
                    current = len;
                } else {
                    current = needed;
                }
            }
            lines.push(current);
        }
        lines
    }
}

impl Measure for MonospaceMeasure {
    fn measure_text(&self, text: &str, max_width: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let lines = self.line_lengths(text, max_width);
        let widest = lines.iter().copied().max().unwrap_or(0);
        Size::new(
            widest as f64 * self.char_width,
            lines.len() as f64 * self.line_height,
        )
    }

    fn header_height(&self, _text: &str, _width: f64) -> f64 {
        self.line_height
    }
}
