//! Edge routing: main-column selection and rough grid paths.
//!
//! Every edge changes rows on a single vertical run, its main column. A
//! sweep over the rows keeps, per edge column, the last row where a block
//! occupied it; a min tree over those values answers "nearest free column"
//! queries. Rough routing then expands each edge into at most five grid
//! segments (a sideways U or a square Z) around that column.

use crate::data::trees::PointSetMinTree;
use crate::error::{Error, Result};
use crate::model::LayoutConfig;
use crate::state::LayoutState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    // Edges are processed before blocks entering the same row, so a
    // transition into a row may still use the columns those blocks occupy.
    Edge,
    Block,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    row: i32,
    kind: EventKind,
    block: usize,
    edge: usize,
}

pub(crate) fn select_main_columns(state: &mut LayoutState) -> Result<()> {
    let mut events = Vec::with_capacity(state.blocks.len() * 2);
    for block in 0..state.blocks.len() {
        events.push(Event {
            row: state.blocks[block].row,
            kind: EventKind::Block,
            block,
            edge: 0,
        });
        let start_row = state.blocks[block].row + 1;
        for (edge, grid_edge) in state.edges[block].iter().enumerate() {
            let end_row = state.blocks[grid_edge.dest].row;
            events.push(Event {
                row: start_row.max(end_row),
                kind: EventKind::Edge,
                block,
                edge,
            });
        }
    }
    events.sort_by(|a, b| a.row.cmp(&b.row).then(a.kind.cmp(&b.kind)));

    // Last row at which each edge column was occupied by a block; -1 when
    // never. The sentinel columns 0 and `columns` are never set, so a free
    // column always exists on both sides.
    let mut blocked_columns = PointSetMinTree::new(state.columns + 1, -1);
    for event in &events {
        match event.kind {
            EventKind::Block => {
                let col = state.blocks[event.block].col;
                blocked_columns.set((col + 1) as usize, event.row);
            }
            EventKind::Edge => {
                let source_row = state.blocks[event.block].row;
                let column = state.blocks[event.block].col + 1;
                let dest = state.edges[event.block][event.edge].dest;
                let target_row = state.blocks[dest].row;
                let target_column = state.blocks[dest].col + 1;
                let top_row = (source_row + 1).min(target_row);

                let main_column = if blocked_columns.value_at(column as usize) < top_row {
                    // The source column is free: no horizontal detour needed.
                    column
                } else if blocked_columns.value_at(target_column as usize) < top_row {
                    target_column
                } else {
                    pick_nearest_free_column(
                        &blocked_columns,
                        column,
                        target_column,
                        top_row,
                        source_row,
                        target_row,
                        event.edge,
                        state.edges[event.block].len(),
                    )?
                };
                state.edges[event.block][event.edge].main_column = main_column;
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn pick_nearest_free_column(
    blocked_columns: &PointSetMinTree,
    column: i32,
    target_column: i32,
    top_row: i32,
    source_row: i32,
    target_row: i32,
    edge_index: usize,
    edge_count: usize,
) -> Result<i32> {
    let nearest_left = blocked_columns.rightmost_less_than(column as usize, top_row);
    let nearest_right = blocked_columns.leftmost_less_than(column as usize, top_row);
    let (Some(nearest_left), Some(nearest_right)) = (nearest_left, nearest_right) else {
        return Err(Error::InternalInvariant {
            message: "no free edge column at the side of the drawing",
        });
    };
    let nearest_left = nearest_left as i32;
    let nearest_right = nearest_right as i32;

    // Cost counts the horizontal runs at both ends.
    let distance_left = column - nearest_left + (target_column - nearest_left).abs();
    let distance_right = nearest_right - column + (target_column - nearest_right).abs();

    // For upward edges prefer a loop just past the source over a figure
    // eight: slightly longer, but it crosses less.
    if target_row < source_row {
        if target_column < column
            && blocked_columns.value_at((column + 1) as usize) < top_row
            && column - target_column <= distance_left + 2
        {
            return Ok(column + 1);
        } else if target_column > column
            && blocked_columns.value_at((column - 1) as usize) < top_row
            && target_column - column <= distance_right + 2
        {
            return Ok(column - 1);
        }
    }

    if distance_left != distance_right {
        Ok(if distance_left < distance_right {
            nearest_left
        } else {
            nearest_right
        })
    } else {
        // Tie: split by edge position so true branches gather on one side
        // and false branches on the other.
        Ok(if edge_index < edge_count / 2 {
            nearest_left
        } else {
            nearest_right
        })
    }
}

/// Expand every edge into grid points around its main column. Odd point
/// indices anchor vertical segments, even ones horizontal segments; the
/// redundant pairs are skipped when the main column already matches an
/// endpoint column.
pub(crate) fn rough_route(state: &mut LayoutState, config: &LayoutConfig) {
    let spacing_override = |block_width: i32, edge_count: i32| -> i16 {
        let max_spacing = block_width / edge_count.max(1);
        if max_spacing < config.edge_horizontal_spacing {
            max_spacing.max(1) as i16
        } else {
            0
        }
    };

    for block in 0..state.blocks.len() {
        for i in 0..state.edges[block].len() {
            let dest = state.edges[block][i].dest;
            let main = state.edges[block][i].main_column;
            let source_row = state.blocks[block].row;
            let source_col = state.blocks[block].col;
            let target_row = state.blocks[dest].row;
            let target_col = state.blocks[dest].col;
            let upward = target_row <= source_row;
            let start_override = spacing_override(state.widths[block], state.blocks[block].output_count);
            let target_override = spacing_override(state.widths[dest], state.blocks[dest].input_count);

            let edge = &mut state.edges[block][i];
            edge.add_point(source_row + 1, source_col + 1, 0);
            if main != source_col + 1 {
                edge.add_point(
                    source_row + 1,
                    source_col + 1,
                    if main < source_col + 1 { -1 } else { 1 },
                );
                edge.add_point(source_row + 1, main, if upward { -2 } else { 0 });
            }
            let main_kind: i16 = if main < source_col + 1 && main < target_col + 1 {
                2
            } else if main > source_col + 1 && main > target_col + 1 {
                -2
            } else if main == source_col + 1 && main != target_col + 1 {
                if main < target_col + 1 { 1 } else { -1 }
            } else if main == target_col + 1 && main != source_col + 1 {
                if main < source_col + 1 { 1 } else { -1 }
            } else {
                0
            };
            edge.add_point(target_row, main, main_kind);
            if target_col + 1 != main {
                edge.add_point(target_row, target_col + 1, if upward { 2 } else { 0 });
                edge.add_point(
                    target_row,
                    target_col + 1,
                    if target_col + 1 < main { 1 } else { -1 },
                );
            }

            // Blocks with many edges trade spacing for keeping every anchor
            // within the block width. The exit override goes on the first
            // segment anchor (index 1); on straight two-point edges the
            // entry override wins.
            if let Some(first_anchor) = edge.points.get_mut(1) {
                first_anchor.spacing_override = start_override;
            }
            if let Some(last) = edge.points.last_mut() {
                last.spacing_override = target_override;
            }

            let mut length = 0;
            for j in 1..edge.points.len() {
                length += (edge.points[j].row - edge.points[j - 1].row).abs()
                    + (edge.points[j].col - edge.points[j - 1].col).abs();
            }
            edge.secondary_priority = 2 * length + i32::from(target_row >= source_row);
        }
    }
}
