//! Merge-point hints and subtree placement on the grid.
//!
//! Placement reduces the DAG to the spanning forest and packs subtrees side
//! by side, bottom-up. Each subtree carries two linked lists describing its
//! left and right silhouette as column deltas from the top row down; merging
//! a sibling walks the touching profiles once and splices the leftovers in
//! O(1), so the whole pass stays linear in rows touched.

use crate::data::list_pool::ListPool;
use crate::error::{Error, Result};
use crate::model::LayoutType;
use crate::state::LayoutState;

/// Detect if/else diamonds: a block whose tree children all jump to a single
/// shared grandchild. Nudging the one child that continues the chain toward
/// the middle of the run keeps the merge block under its parent once the
/// subtrees are packed.
pub(crate) fn find_merge_points(state: &mut LayoutState) {
    for source in 0..state.blocks.len() {
        let mut merge_block = None;
        let mut grand_child_count = 0;
        for i in 0..state.blocks[source].tree_edges.len() {
            let child = state.blocks[source].tree_edges[i];
            if let Some(&grand_child) = state.blocks[child].tree_edges.first() {
                merge_block = Some(grand_child);
            }
            grand_child_count += state.blocks[child].tree_edges.len();
        }
        let Some(merge_block) = merge_block else {
            continue;
        };
        if grand_child_count != 1 {
            continue;
        }

        let mut blocks_going_to_merge: i32 = 0;
        let mut block_with_tree_edge: usize = 0;
        for i in 0..state.blocks[source].tree_edges.len() {
            let child = state.blocks[source].tree_edges[i];
            let goes_to_merge = state.blocks[child]
                .dag_edges
                .iter()
                .any(|&target| target == merge_block);
            if !goes_to_merge {
                break;
            }
            if state.blocks[child].tree_edges.len() == 1 {
                block_with_tree_edge = blocks_going_to_merge as usize;
            }
            blocks_going_to_merge += 1;
        }
        if blocks_going_to_merge > 0 {
            let nudged = state.blocks[source].tree_edges[block_with_tree_edge];
            state.blocks[nudged].col =
                block_with_tree_edge as i32 * 2 - (blocks_going_to_merge - 1);
        }
    }
}

/// Bottom-up subtree packing over the post-order, then absolute root
/// placement and a top-down rebase of the relative child columns.
pub(crate) fn place_subtrees(
    state: &mut LayoutState,
    block_order: &[usize],
    layout_type: LayoutType,
) -> Result<()> {
    let tight = layout_type.tight_subtree_placement();
    // Two shape lists per node.
    let mut sides: ListPool<i32> = ListPool::with_capacity(block_order.len() * 2);

    for &current in block_order {
        if state.blocks[current].tree_edges.is_empty() {
            let block = &mut state.blocks[current];
            block.row_count = 1;
            block.col = 0;
            block.last_row_left = 0;
            block.last_row_right = 2;
            block.left_position = 0;
            block.right_position = 2;
            block.left_shape = sides.make_list(0);
            block.right_shape = sides.make_list(2);
            continue;
        }

        let first_child = state.blocks[current].tree_edges[0];
        // Left and right silhouettes of the children packed so far.
        let mut left_side = state.blocks[first_child].left_shape;
        let mut right_side = state.blocks[first_child].right_shape;
        {
            let first = &state.blocks[first_child];
            let (row_count, last_left, last_right, left_pos, right_pos) = (
                first.row_count,
                first.last_row_left,
                first.last_row_right,
                first.left_position,
                first.right_position,
            );
            let block = &mut state.blocks[current];
            block.row_count = row_count;
            block.last_row_left = last_left;
            block.last_row_right = last_right;
            block.left_position = left_pos;
            block.right_position = right_pos;
        }

        for i in 1..state.blocks[current].tree_edges.len() {
            let child = state.blocks[current].tree_edges[i];

            // Walk the part of the two silhouettes that touch when the
            // child subtree is placed to the right of what is packed so far.
            let mut min_pos = i32::MIN;
            let mut left_pos = 0;
            let mut right_pos = 0;
            let mut max_left_width = 0;
            let mut min_right_pos = state.blocks[child].col;
            let mut left_it = sides.head(right_side);
            let mut right_it = sides.head(state.blocks[child].left_shape);
            while left_it.is_some() && right_it.is_some() {
                left_pos += *sides.value(left_it);
                right_pos += *sides.value(right_it);
                min_pos = min_pos.max(left_pos - right_pos);
                max_left_width = max_left_width.max(left_pos);
                min_right_pos = min_right_pos.min(right_pos);
                left_it = sides.next(left_it);
                right_it = sides.next(right_it);
            }

            let right_tree_offset = if tight {
                // Exact shapes, packed as closely as possible.
                min_pos
            } else if left_it.is_some() {
                // Bounding box of the shorter side against the full shape of
                // the deeper one.
                max_left_width - state.blocks[child].left_position
            } else {
                state.blocks[current].right_position - min_right_pos
            };

            state.blocks[child].col += right_tree_offset;
            if left_it.is_some() {
                // The packed subtrees go deeper than the child: keep their
                // leftover right silhouette below the child's.
                let adjust =
                    right_tree_offset + state.blocks[child].last_row_right - left_pos;
                *sides.value_mut(left_it) -= adjust;
                let tail = sides.split_tail(right_side, left_it);
                right_side = sides.append(state.blocks[child].right_shape, tail);
            } else if right_it.is_some() {
                // The child goes deeper: its leftover left silhouette extends
                // the packed left side, and the bottom row moves to the child.
                let adjust = right_pos + right_tree_offset - state.blocks[current].last_row_left;
                *sides.value_mut(right_it) += adjust;
                let tail = sides.split_tail(state.blocks[child].left_shape, right_it);
                left_side = sides.append(left_side, tail);

                right_side = state.blocks[child].right_shape;
                state.blocks[current].last_row_right =
                    state.blocks[child].last_row_right + right_tree_offset;
                state.blocks[current].last_row_left =
                    state.blocks[child].last_row_left + right_tree_offset;
            } else {
                right_side = state.blocks[child].right_shape;
            }
            let head = sides.head(right_side);
            *sides.value_mut(head) += right_tree_offset;

            let (child_rows, child_left, child_right) = {
                let child_block = &state.blocks[child];
                (
                    child_block.row_count,
                    child_block.left_position,
                    child_block.right_position,
                )
            };
            let block = &mut state.blocks[current];
            block.row_count = block.row_count.max(child_rows);
            block.left_position = block.left_position.min(child_left + right_tree_offset);
            block.right_position = block.right_position.max(right_tree_offset + child_right);
        }

        let col = if layout_type.parent_between_direct_children() {
            // Average of the direct children: one child stays left, the other
            // right, making edge directions easy to follow.
            let mut sum = 0;
            for &child in &state.blocks[current].tree_edges {
                sum += state.blocks[child].col;
            }
            sum / state.blocks[current].tree_edges.len() as i32
        } else {
            // Middle of the subtree bounds, clamped so the parent stays
            // between its first and last direct child. Yields layouts closer
            // to a single vertical line.
            let first = state.blocks[current].tree_edges[0];
            let last = state.blocks[current].tree_edges[state.blocks[current].tree_edges.len() - 1];
            let block = &state.blocks[current];
            let mid = (block.right_position + block.left_position) / 2 - 1;
            mid.max(state.blocks[first].col - 1)
                .min(state.blocks[last].col + 1)
        };

        // += keeps the merge-point offset applied before this pass.
        let parent_col = {
            let block = &mut state.blocks[current];
            block.col += col;
            block.row_count += 1;
            block.left_position = block.left_position.min(block.col);
            block.right_position = block.right_position.max(block.col + 2);
            block.col
        };

        let head = sides.head(left_side);
        *sides.value_mut(head) -= parent_col;
        let top = sides.make_list(parent_col);
        state.blocks[current].left_shape = sides.append(top, left_side);

        let head = sides.head(right_side);
        *sides.value_mut(head) -= parent_col + 2;
        let top = sides.make_list(parent_col + 2);
        state.blocks[current].right_shape = sides.append(top, right_side);

        // Keep children relative to the parent so that moving the parent
        // later moves the whole subtree.
        for i in 0..state.blocks[current].tree_edges.len() {
            let child = state.blocks[current].tree_edges[i];
            state.blocks[child].col -= parent_col;
        }
    }

    // Place the roots left to right. A typical function has a single root
    // matching the entry point; unreachable blocks and failed analysis can
    // leave more.
    let mut next_empty_column = 0;
    for block in &mut state.blocks {
        if block.row == 0 {
            let offset = -block.left_position;
            block.col += next_empty_column + offset;
            next_empty_column = block.right_position + offset;
        }
    }

    // Top-down: convert the relative child columns to absolute ones.
    for &current in block_order.iter().rev() {
        if state.blocks[current].col < 0 {
            return Err(Error::InternalInvariant {
                message: "negative column after absolute placement",
            });
        }
        let parent_col = state.blocks[current].col;
        for i in 0..state.blocks[current].tree_edges.len() {
            let child = state.blocks[current].tree_edges[i];
            state.blocks[child].col += parent_col;
        }
    }

    Ok(())
}
