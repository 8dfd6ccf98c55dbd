// Copyright 2025 the Pinboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid packing: a square-ish grid filled column by column.

use kurbo::{Point, Rect, Size};
use pinboard_geometry::approx::is_greater;
use pinboard_geometry::{Grid, Rounding};
use pinboard_tree::{NodeId, Tree};

/// Cell assignment a grid pack produced.
#[derive(Clone, Debug, PartialEq)]
pub struct GridRecord {
    /// Number of rows per column, `ceil(sqrt(n))`.
    pub grade: usize,
    /// `(child, column, row)` for every packed child, in child order.
    pub cells: Vec<(NodeId, usize, usize)>,
    /// Width of each column: its widest member.
    pub column_widths: Vec<f64>,
    /// Height of each row: its tallest member.
    pub row_heights: Vec<f64>,
}

impl GridRecord {
    /// Left edge of every column.
    pub fn column_offsets(&self) -> Vec<f64> {
        prefix_sums(&self.column_widths)
    }

    /// Top edge of every row.
    pub fn row_offsets(&self) -> Vec<f64> {
        prefix_sums(&self.row_heights)
    }

    /// Size of the whole grid.
    pub fn extent(&self) -> Size {
        Size::new(self.column_widths.iter().sum(), self.row_heights.iter().sum())
    }
}

fn prefix_sums(values: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    values
        .iter()
        .map(|v| {
            let start = acc;
            acc += v;
            start
        })
        .collect()
}

/// Rows per column for `n` children.
pub fn grid_grade(n: usize) -> usize {
    // Exact for any child count a canvas will hold.
    let mut g = 0;
    while g * g < n {
        g += 1;
    }
    g
}

pub(crate) fn place(tree: &mut Tree, branch: NodeId) -> GridRecord {
    let children = tree.child_rects(branch);
    let grade = grid_grade(children.len()).max(1);
    let columns = children.len().div_ceil(grade);
    let rows = grade.min(children.len());

    let mut column_widths = vec![0.0_f64; columns];
    let mut row_heights = vec![0.0_f64; rows];
    let mut cells = Vec::with_capacity(children.len());
    for (i, (id, rect)) in children.iter().enumerate() {
        let (col, row) = (i / grade, i % grade);
        column_widths[col] = column_widths[col].max(rect.width());
        row_heights[row] = row_heights[row].max(rect.height());
        cells.push((*id, col, row));
    }

    let record = GridRecord {
        grade,
        cells,
        column_widths,
        row_heights,
    };
    let xs = record.column_offsets();
    let ys = record.row_offsets();
    for (id, col, row) in &record.cells {
        tree.set_origin(*id, Point::new(xs[*col], ys[*row]));
    }
    tracing::trace!(grade, columns, rows, "grid placed");
    record
}

/// Hand spare space out one grid cell at a time, round-robin over columns
/// and rows; every member grows by what its column and row received.
pub(crate) fn expand(
    tree: &mut Tree,
    record: &mut GridRecord,
    available: Size,
    grid: &Grid,
) -> Vec<NodeId> {
    let extent = record.extent();
    let add_columns = round_robin(
        available.width - extent.width,
        record.column_widths.len(),
        grid,
    );
    let add_rows = round_robin(
        available.height - extent.height,
        record.row_heights.len(),
        grid,
    );
    for (w, add) in record.column_widths.iter_mut().zip(&add_columns) {
        *w += add;
    }
    for (h, add) in record.row_heights.iter_mut().zip(&add_rows) {
        *h += add;
    }

    let xs = record.column_offsets();
    let ys = record.row_offsets();
    let mut grown = Vec::new();
    for (id, col, row) in &record.cells {
        let Some(g) = tree.geometry(*id) else {
            continue;
        };
        let size = g.rect.size() + Size::new(add_columns[*col], add_rows[*row]);
        let rect = Rect::from_origin_size((xs[*col], ys[*row]), size);
        if rect != g.rect {
            tree.set_rect(*id, rect);
            grown.push(*id);
        }
    }
    grown
}

/// Split `spare` into whole cells and deal them out to `slots` in turn.
fn round_robin(spare: f64, slots: usize, grid: &Grid) -> Vec<f64> {
    let mut out = vec![0.0; slots];
    if slots == 0 || !is_greater(spare, 0.0) {
        return out;
    }
    let cells = grid.quantize(spare, Rounding::Floor) / grid.cell();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Spare space is a non-negative, bounded number of cells."
    )]
    let cells = cells.max(0.0) as usize;
    for i in 0..cells {
        out[i % slots] += grid.cell();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinboard_tree::LocalNode;

    fn branch_with(sizes: &[(f64, f64)]) -> (Tree, NodeId, Vec<NodeId>) {
        let mut tree = Tree::new();
        let branch = tree
            .insert(tree.root(), LocalNode::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0)))
            .unwrap();
        let ids = sizes
            .iter()
            .enumerate()
            .map(|(i, (w, h))| {
                let x = i as f64 * 10.0;
                let rect = Rect::from_origin_size((x, 0.0), (*w, *h));
                tree.insert(branch, LocalNode::from_rect(rect)).unwrap()
            })
            .collect();
        (tree, branch, ids)
    }

    #[test]
    fn grade_is_ceil_sqrt() {
        assert_eq!(grid_grade(0), 0);
        assert_eq!(grid_grade(1), 1);
        assert_eq!(grid_grade(4), 2);
        assert_eq!(grid_grade(5), 3);
        assert_eq!(grid_grade(10), 4);
    }

    #[test]
    fn columns_fill_first() {
        let (mut tree, branch, ids) =
            branch_with(&[(2.0, 1.0), (1.0, 3.0), (1.0, 1.0), (4.0, 1.0), (1.0, 1.0)]);
        let record = place(&mut tree, branch);
        assert_eq!(record.grade, 3);
        assert_eq!(record.column_widths, [2.0, 4.0]);
        assert_eq!(record.row_heights, [1.0, 3.0, 1.0]);
        assert_eq!(tree.rect(ids[1]).origin(), Point::new(0.0, 1.0));
        assert_eq!(tree.rect(ids[2]).origin(), Point::new(0.0, 4.0));
        assert_eq!(tree.rect(ids[3]).origin(), Point::new(2.0, 0.0));
        assert_eq!(tree.rect(ids[4]).origin(), Point::new(2.0, 1.0));
    }

    #[test]
    fn packing_is_deterministic() {
        let sizes = [(2.0, 1.0), (1.0, 3.0), (1.0, 1.0), (4.0, 1.0), (1.0, 1.0)];
        let (mut a, branch_a, ids_a) = branch_with(&sizes);
        let (mut b, branch_b, ids_b) = branch_with(&sizes);
        let first = place(&mut a, branch_a);
        let again = place(&mut a, branch_a);
        let other = place(&mut b, branch_b);
        assert_eq!(first, again);
        let pos_a: Vec<Rect> = ids_a.iter().map(|id| a.rect(*id)).collect();
        let pos_b: Vec<Rect> = ids_b.iter().map(|id| b.rect(*id)).collect();
        assert_eq!(pos_a, pos_b);
        assert_eq!(first.column_widths, other.column_widths);
    }

    #[test]
    fn spare_cells_are_dealt_round_robin() {
        let (mut tree, branch, ids) = branch_with(&[(1.0, 1.0); 4]);
        let mut record = place(&mut tree, branch);
        // 2x2 grid of unit cells; three spare columns' worth of width.
        let grown = expand(&mut tree, &mut record, Size::new(5.0, 2.0), &Grid::new(1.0));
        assert_eq!(record.column_widths, [3.0, 2.0]);
        assert_eq!(record.row_heights, [1.0, 1.0]);
        assert_eq!(grown, ids);
        assert_eq!(tree.rect(ids[0]), Rect::new(0.0, 0.0, 3.0, 1.0));
        assert_eq!(tree.rect(ids[3]), Rect::new(3.0, 1.0, 5.0, 2.0));
    }
}
