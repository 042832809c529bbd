//! Segment offset packing inside edge columns and rows.
//!
//! After rough routing every edge is a handful of grid-aligned segments.
//! This stage spreads the segments sharing an edge column (and then an edge
//! row) so that none overlap: each segment gets the maximum offset already
//! assigned in its span plus a spacing, tracked by a range-assign/range-max
//! tree. The assignment order is a carefully tuned sort; it keeps segments
//! nested like matched parentheses and biases wings toward the side of the
//! column they exit from.

use crate::coordinates::calculate_axis_offsets;
use crate::data::trees::RangeAssignMaxTree;
use crate::model::LayoutConfig;
use crate::state::LayoutState;

/// One vertical (or, with axes swapped, horizontal) piece of an edge.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeSegment {
    pub y0: i32,
    pub y1: i32,
    pub x: i32,
    pub edge_index: usize,
    pub secondary_priority: i32,
    pub kind: i16,
    /// 0 means the pass default spacing applies.
    pub spacing_override: i16,
}

/// Side of a block facing an edge column (or edge row). `size` is the block
/// extent in the packing direction; segments must clear it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeSide {
    pub x: i32,
    pub y0: i32,
    pub y1: i32,
    pub size: i32,
}

pub(crate) fn pack_segments(state: &mut LayoutState, config: &LayoutConfig) {
    // --- vertical segments, one per odd rough-routing point ---
    let mut segments: Vec<EdgeSegment> = Vec::new();
    let mut right_sides: Vec<NodeSide> = Vec::new();
    let mut left_sides: Vec<NodeSide> = Vec::new();

    let mut edge_index = 0;
    for block in 0..state.edges.len() {
        for edge in &state.edges[block] {
            for j in (1..edge.points.len()).step_by(2) {
                segments.push(EdgeSegment {
                    // Edge rows are even, block rows odd.
                    y0: edge.points[j - 1].row * 2,
                    y1: edge.points[j].row * 2,
                    x: edge.points[j].col,
                    edge_index,
                    secondary_priority: edge.secondary_priority,
                    kind: edge.points[j].kind,
                    spacing_override: edge.points[j].spacing_override,
                });
                edge_index += 1;
            }
        }
    }
    for (ix, block) in state.blocks.iter().enumerate() {
        let width = state.widths[ix];
        let left_width = width / 2;
        // Not the same as left_width for odd widths; the one pixel shows.
        let right_width = width - left_width;
        let row = block.row * 2 + 1;
        left_sides.push(NodeSide {
            x: block.col,
            y0: row,
            y1: row,
            size: left_width,
        });
        right_sides.push(NodeSide {
            x: block.col + 1,
            y0: row,
            y1: row,
            size: right_width,
        });
    }

    state.edge_column_width = vec![config.block_horizontal_spacing; state.columns + 1];
    state.edge_column_width[0] = config.edge_horizontal_spacing;
    state.edge_column_width[state.columns] = config.edge_horizontal_spacing;

    let mut edge_offsets = vec![0; edge_index];
    calculate_segment_offsets(
        &mut segments,
        &mut edge_offsets,
        &mut state.edge_column_width,
        &mut right_sides,
        &mut left_sides,
        &state.column_width,
        2 * state.rows + 1,
        config.edge_horizontal_spacing,
    );
    center_edges(
        &mut edge_offsets,
        &state.edge_column_width,
        &segments,
        config.block_horizontal_spacing,
    );

    // Column widths shrink once the edge columns know their final widths;
    // wings glued to a column wall must follow the wall.
    let old_column_widths = state.column_width.clone();
    adjust_column_widths(state);
    for segment in &segments {
        let x = segment.x as usize;
        let offset = &mut edge_offsets[segment.edge_index];
        if segment.kind == -2 {
            *offset -= (state.edge_column_width[x - 1] / 2 + state.column_width[x - 1])
                - old_column_widths[x - 1];
        } else if segment.kind == 2 {
            *offset +=
                (state.edge_column_width[x + 1] / 2 + state.column_width[x]) - old_column_widths[x];
        }
    }
    calculate_axis_offsets(
        &state.column_width,
        &state.edge_column_width,
        &mut state.column_offset,
        &mut state.edge_column_offset,
    );
    copy_offsets_to_points(state, &edge_offsets, true);

    // --- horizontal segments, using exact pixel x coordinates ---
    segments.clear();
    left_sides.clear();
    right_sides.clear();

    let mut edge_index = 0;
    for block in 0..state.edges.len() {
        for edge in &state.edges[block] {
            for j in (2..edge.points.len()).step_by(2) {
                let y0 = state.edge_column_offset[edge.points[j - 1].col as usize]
                    + edge.points[j - 1].offset;
                let y1 = state.edge_column_offset[edge.points[j + 1].col as usize]
                    + edge.points[j + 1].offset;
                segments.push(EdgeSegment {
                    y0,
                    y1,
                    x: edge.points[j].row,
                    edge_index,
                    secondary_priority: edge.secondary_priority,
                    kind: edge.points[j].kind,
                    spacing_override: edge.points[j].spacing_override,
                });
                edge_index += 1;
            }
        }
    }
    for (ix, block) in state.blocks.iter().enumerate() {
        let width = state.widths[ix];
        let col = block.col as usize;
        let left = state.edge_column_offset[col + 1] + state.edge_column_width[col + 1] / 2
            - width / 2;
        let right = left + width;

        let height = state.heights[ix];
        let row_height = state.row_height[block.row as usize];
        let free_space = row_height - height;
        let mut top_profile = row_height;
        let mut bottom_profile = height;
        if config.vertical_block_alignment_middle {
            top_profile -= free_space / 2;
            bottom_profile += free_space / 2;
        }
        left_sides.push(NodeSide {
            x: block.row,
            y0: left,
            y1: right,
            size: top_profile,
        });
        right_sides.push(NodeSide {
            x: block.row,
            y0: left,
            y1: right,
            size: bottom_profile,
        });
    }

    state.edge_row_height = vec![config.block_vertical_spacing; state.rows + 1];
    state.edge_row_height[0] = config.edge_vertical_spacing;
    state.edge_row_height[state.rows] = config.edge_vertical_spacing;

    let mut edge_offsets = vec![0; edge_index];
    // Pixel coordinates are sparse; densify them before they index the tree.
    let range = compress_coordinates(&mut segments, &mut left_sides, &mut right_sides);
    calculate_segment_offsets(
        &mut segments,
        &mut edge_offsets,
        &mut state.edge_row_height,
        &mut right_sides,
        &mut left_sides,
        &state.row_height,
        range,
        config.edge_vertical_spacing,
    );
    copy_offsets_to_points(state, &edge_offsets, false);
}

/// Assign an offset within its column to every segment.
///
/// Names use the vertical-pass reading (columns, y spans); the horizontal
/// pass feeds rows through the same routine with axes swapped. Segments with
/// `kind <= 1` pack left to right against the left block column; `kind == 2`
/// segments pack in a second sweep and are mirrored onto the far wall, so
/// wings outside both endpoints hug the column edge nearest their blocks.
#[allow(clippy::too_many_arguments)]
pub(crate) fn calculate_segment_offsets(
    segments: &mut [EdgeSegment],
    edge_offsets: &mut [i32],
    edge_column_width: &mut [i32],
    node_right_side: &mut [NodeSide],
    node_left_side: &mut [NodeSide],
    column_width: &[i32],
    range: usize,
    segment_spacing: i32,
) {
    for segment in segments.iter_mut() {
        if segment.y0 > segment.y1 {
            std::mem::swap(&mut segment.y0, &mut segment.y1);
        }
    }
    segments.sort_by(|a, b| {
        a.x.cmp(&b.x).then(a.kind.cmp(&b.kind)).then_with(|| {
            let ordering = (a.y1 - a.y0)
                .cmp(&(b.y1 - b.y0))
                .then(a.secondary_priority.cmp(&b.secondary_priority));
            // Wings leaving the source toward the right pack outside-in.
            if a.kind == 1 { ordering.reverse() } else { ordering }
        })
    });
    node_right_side.sort_by_key(|side| side.x);
    node_left_side.sort_by_key(|side| side.x);

    let mut max_segment = RangeAssignMaxTree::new(range, i32::MIN);
    let mut next_segment = 0;
    let mut right_side = 0;
    let mut left_side = 0;
    while next_segment < segments.len() {
        let x = segments[next_segment].x;

        let left_column_width = if x > 0 { column_width[(x - 1) as usize] } else { 0 };
        max_segment.assign(0, range, -left_column_width);
        while right_side < node_right_side.len() && node_right_side[right_side].x + 1 < x {
            right_side += 1;
        }
        while right_side < node_right_side.len() && node_right_side[right_side].x + 1 == x {
            let side = node_right_side[right_side];
            max_segment.assign(
                side.y0 as usize,
                side.y1 as usize + 1,
                side.size - left_column_width,
            );
            right_side += 1;
        }

        while next_segment < segments.len()
            && segments[next_segment].x == x
            && segments[next_segment].kind <= 1
        {
            let segment = segments[next_segment];
            let mut y = max_segment.range_max(segment.y0 as usize, segment.y1 as usize + 1);
            if segment.kind != -2 {
                // Wings sharing the left wall may go negative, everything
                // else starts inside the column.
                y = y.max(0);
            }
            y += if segment.spacing_override != 0 {
                i32::from(segment.spacing_override)
            } else {
                segment_spacing
            };
            max_segment.assign(segment.y0 as usize, segment.y1 as usize + 1, y);
            edge_offsets[segment.edge_index] = y;
            next_segment += 1;
        }

        let first_right_side_segment = next_segment;
        let middle_width = max_segment.range_max(0, range).max(0);

        let right_column_width = if (x as usize) < column_width.len() {
            column_width[x as usize]
        } else {
            0
        };
        max_segment.assign(0, range, -right_column_width);
        while left_side < node_left_side.len() && node_left_side[left_side].x < x {
            left_side += 1;
        }
        while left_side < node_left_side.len() && node_left_side[left_side].x == x {
            let side = node_left_side[left_side];
            max_segment.assign(
                side.y0 as usize,
                side.y1 as usize + 1,
                side.size - right_column_width,
            );
            left_side += 1;
        }
        while next_segment < segments.len() && segments[next_segment].x == x {
            let segment = segments[next_segment];
            let mut y = max_segment.range_max(segment.y0 as usize, segment.y1 as usize + 1);
            y += if segment.spacing_override != 0 {
                i32::from(segment.spacing_override)
            } else {
                segment_spacing
            };
            max_segment.assign(segment.y0 as usize, segment.y1 as usize + 1, y);
            edge_offsets[segment.edge_index] = y;
            next_segment += 1;
        }

        let mut right_side_middle = max_segment.range_max(0, range).max(0);
        right_side_middle =
            right_side_middle.max(edge_column_width[x as usize] - middle_width - segment_spacing);
        // Mirror the far-wall sweep: offsets grow from the right edge of the
        // column toward the middle.
        for segment in &segments[first_right_side_segment..next_segment] {
            edge_offsets[segment.edge_index] =
                middle_width + (right_side_middle - edge_offsets[segment.edge_index])
                    + segment_spacing;
        }
        edge_column_width[x as usize] = middle_width + segment_spacing + right_side_middle;
    }
}

/// Center each bundle of mutually overlapping segments inside its edge
/// column. Segments outside the column (wings between blocks) stay put;
/// moving them could collide with a block.
pub(crate) fn center_edges(
    segment_offsets: &mut [i32],
    edge_column_width: &[i32],
    segments: &[EdgeSegment],
    min_spacing: i32,
) {
    #[derive(Debug, Clone, Copy)]
    struct Event {
        x: i32,
        y: i32,
        index: usize,
        start: bool,
    }

    let mut events = Vec::with_capacity(segments.len() * 2);
    for segment in segments {
        let offset = segment_offsets[segment.edge_index];
        if offset >= 0 && offset <= edge_column_width[segment.x as usize] {
            events.push(Event {
                x: segment.x,
                y: segment.y0,
                index: segment.edge_index,
                start: true,
            });
            events.push(Event {
                x: segment.x,
                y: segment.y1,
                index: segment.edge_index,
                start: false,
            });
        }
    }
    // Starts sort before ends so the active count only hits zero between
    // disjoint chunks.
    events.sort_by(|a, b| {
        a.x.cmp(&b.x)
            .then(a.y.cmp(&b.y))
            .then(b.start.cmp(&a.start))
    });

    let mut i = 0;
    while i < events.len() {
        let chunk_start = i;
        i += 1;
        let mut active_segments = 1;
        let mut chunk_width = 0;
        while active_segments > 0 {
            let event = events[i];
            active_segments += if event.start { 1 } else { -1 };
            chunk_width = chunk_width.max(segment_offsets[event.index]);
            i += 1;
        }
        // The leftmost offset already includes spacing on the left; add the
        // matching amount on the right before centering.
        chunk_width += min_spacing;

        let x = events[chunk_start].x as usize;
        let spacing = (edge_column_width[x].max(min_spacing) - chunk_width) / 2;
        for event in &events[chunk_start..i] {
            if event.start {
                segment_offsets[event.index] += spacing;
            }
        }
    }
}

/// Map the sparse pixel coordinates of the horizontal pass onto a dense
/// `0..n` range. Left and right node sides share y spans, so only one of
/// them feeds the coordinate list.
pub(crate) fn compress_coordinates(
    segments: &mut [EdgeSegment],
    left_sides: &mut [NodeSide],
    right_sides: &mut [NodeSide],
) -> usize {
    let mut positions = Vec::with_capacity((segments.len() + left_sides.len()) * 2);
    for segment in segments.iter() {
        positions.push(segment.y0);
        positions.push(segment.y1);
    }
    for side in left_sides.iter() {
        positions.push(side.y0);
        positions.push(side.y1);
    }
    positions.sort_unstable();
    positions.dedup();

    let index_of = |position: i32| -> i32 {
        match positions.binary_search(&position) {
            Ok(i) => i as i32,
            Err(i) => i as i32,
        }
    };
    for segment in segments.iter_mut() {
        segment.y0 = index_of(segment.y0);
        segment.y1 = index_of(segment.y1);
    }
    for i in 0..left_sides.len() {
        let y0 = index_of(left_sides[i].y0);
        let y1 = index_of(left_sides[i].y1);
        left_sides[i].y0 = y0;
        left_sides[i].y1 = y1;
        right_sides[i].y0 = y0;
        right_sides[i].y1 = y1;
    }
    positions.len()
}

/// Re-derive block column widths now that the interior edge columns know
/// their width: each block only needs to cover what its center edge column
/// does not.
pub(crate) fn adjust_column_widths(state: &mut LayoutState) {
    state.row_height = vec![0; state.rows];
    state.column_width = vec![0; state.columns];
    for (ix, block) in state.blocks.iter().enumerate() {
        let row = block.row as usize;
        let col = block.col as usize;
        state.row_height[row] = state.row_height[row].max(state.heights[ix]);
        let edge_width = state.edge_column_width[col + 1];
        let width = (state.widths[ix] - edge_width) / 2;
        state.column_width[col] = state.column_width[col].max(width);
        state.column_width[col + 1] = state.column_width[col + 1].max(width);
    }
}

fn copy_offsets_to_points(state: &mut LayoutState, edge_offsets: &[i32], vertical: bool) {
    let first = if vertical { 1 } else { 2 };
    let mut edge_index = 0;
    for block in 0..state.edges.len() {
        for edge in state.edges[block].iter_mut() {
            let mut j = first;
            while j < edge.points.len() {
                edge.points[j].offset = edge_offsets[edge_index];
                edge_index += 1;
                j += 2;
            }
        }
    }
}
