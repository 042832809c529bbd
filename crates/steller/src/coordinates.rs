//! Grid-to-pixel conversion.
//!
//! Rows, columns, and their interleaved edge lanes each know their final
//! size after packing; rolling them into cumulative offsets turns every grid
//! coordinate into a pixel position in one pass.

use indexmap::IndexMap;

use crate::model::{Block, BlockId, LayoutConfig, Point, Size};
use crate::state::LayoutState;

/// Roll cell and edge-lane sizes into cumulative offsets. Lanes and cells
/// interleave starting and ending with a lane; returns the total extent.
pub(crate) fn calculate_axis_offsets(
    cell_size: &[i32],
    edge_size: &[i32],
    cell_offset: &mut Vec<i32>,
    edge_offset: &mut Vec<i32>,
) -> i32 {
    debug_assert_eq!(edge_size.len(), cell_size.len() + 1);
    edge_offset.clear();
    edge_offset.resize(edge_size.len(), 0);
    cell_offset.clear();
    cell_offset.resize(cell_size.len(), 0);

    let mut position = 0;
    for i in 0..cell_size.len() {
        edge_offset[i] = position;
        position += edge_size[i];
        cell_offset[i] = position;
        position += cell_size[i];
    }
    let last = edge_size.len() - 1;
    edge_offset[last] = position;
    position + edge_size[last]
}

/// Fill pixel positions on the caller's blocks and emit the polylines.
pub(crate) fn convert_to_pixels(
    state: &mut LayoutState,
    blocks: &mut IndexMap<BlockId, Block>,
    config: &LayoutConfig,
) -> Size {
    let width = calculate_axis_offsets(
        &state.column_width,
        &state.edge_column_width,
        &mut state.column_offset,
        &mut state.edge_column_offset,
    );
    let height = calculate_axis_offsets(
        &state.row_height,
        &state.edge_row_height,
        &mut state.row_offset,
        &mut state.edge_row_offset,
    );

    for (ix, grid_block) in state.blocks.iter().enumerate() {
        let Some(block) = blocks.get_mut(&state.ids[ix]) else {
            continue;
        };
        let col = grid_block.col as usize;
        let row = grid_block.row as usize;
        // Centered on the block's own edge column rather than on the column
        // pair: the edge column width varies per column.
        block.x = state.edge_column_offset[col + 1] + state.edge_column_width[col + 1] / 2
            - block.width / 2;
        block.y = state.row_offset[row];
        if config.vertical_block_alignment_middle {
            block.y += (state.row_height[row] - block.height) / 2;
        }
    }

    for ix in 0..state.blocks.len() {
        let id = state.ids[ix];
        let Some(source) = blocks.get(&id) else {
            continue;
        };
        let source_bottom = source.y + source.height;

        for edge_ix in 0..state.edges[ix].len() {
            let grid_edge = &state.edges[ix][edge_ix];
            let target_id = state.ids[grid_edge.dest];
            let Some(target) = blocks.get(&target_id) else {
                continue;
            };
            let target_top = target.y;

            let mut polyline: Vec<Point> = Vec::with_capacity(grid_edge.points.len());
            // The x of the first point comes from the first vertical segment.
            polyline.push(Point {
                x: 0,
                y: source_bottom,
            });
            for (j, point) in grid_edge.points.iter().enumerate().skip(1) {
                if j % 2 == 1 {
                    let x = state.edge_column_offset[point.col as usize] + point.offset;
                    if let Some(last) = polyline.last_mut() {
                        last.x = x;
                    }
                    polyline.push(Point { x, y: 0 });
                } else {
                    let y = state.edge_row_offset[point.row as usize] + point.offset;
                    if let Some(last) = polyline.last_mut() {
                        last.y = y;
                    }
                    polyline.push(Point { x: 0, y });
                }
            }
            if let Some(last) = polyline.last_mut() {
                last.y = target_top;
            }

            if let Some(source) = blocks.get_mut(&id) {
                if let Some(edge) = source.edges.get_mut(edge_ix) {
                    edge.polyline = polyline;
                }
            }
        }
    }

    Size { width, height }
}
