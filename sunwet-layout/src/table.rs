//! TableNode - rows of cells on a shared grid.
//!
//! Every row has the same number of cells, fixed by the row shape rather than
//! the data. Logical rows run along the orientation's `conv` direction and
//! the cells of a row along its `trans` direction. Each axis applies the same
//! reversal rule independently, so a single rule covers all 8 orientations.

use serde::Serialize;
use sunwet_api::{Axis, Orientation, TransAlign};

use crate::edge::{axis_position, Edge};
use crate::error::LayoutError;
use crate::node::RenderNode;

/// A cell placed on the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    /// 1-based grid row (screen, top to bottom).
    pub row: usize,
    /// 1-based grid column (screen, left to right).
    pub column: usize,
    /// Index of the data row this cell belongs to.
    pub logical_row: usize,
    /// Index of the cell within its row.
    pub logical_column: usize,
    pub edge: Edge,
    pub node: RenderNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableNode {
    pub orientation: Orientation,
    pub align: TransAlign,
    pub grid_rows: usize,
    pub grid_columns: usize,
    /// Cells in screen order (by grid row, then grid column).
    pub cells: Vec<TableCell>,
}

impl TableNode {
    /// Place `rows` (each exactly `columns` cells, reading order) on a grid.
    pub fn build(
        orientation: Orientation,
        align: TransAlign,
        columns: usize,
        rows: Vec<Vec<RenderNode>>,
    ) -> Result<Self, LayoutError> {
        if columns == 0 {
            return Err(LayoutError::NoColumns);
        }
        // Check arity up front so nothing is composed for a malformed table.
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != columns {
                return Err(LayoutError::Arity {
                    row,
                    expected: columns,
                    found: cells.len(),
                });
            }
        }

        let conv = orientation.conv();
        let trans = orientation.trans();
        let row_count = rows.len();
        let (grid_rows, grid_columns) = match conv.axis() {
            Axis::Vertical => (row_count, columns),
            Axis::Horizontal => (columns, row_count),
        };

        let mut cells = Vec::with_capacity(row_count * columns);
        for (r, row) in rows.into_iter().enumerate() {
            let conv_pos = axis_position(conv, r, row_count);
            for (c, node) in row.into_iter().enumerate() {
                let trans_pos = axis_position(trans, c, columns);
                let (grid_row, grid_column) = match conv.axis() {
                    Axis::Vertical => (conv_pos, trans_pos),
                    Axis::Horizontal => (trans_pos, conv_pos),
                };
                let edge = Edge::for_align(trans, node.align());
                cells.push(TableCell {
                    row: grid_row,
                    column: grid_column,
                    logical_row: r,
                    logical_column: c,
                    edge,
                    node,
                });
            }
        }
        cells.sort_by_key(|cell| (cell.row, cell.column));

        Ok(Self {
            orientation,
            align,
            grid_rows,
            grid_columns,
            cells,
        })
    }
}
