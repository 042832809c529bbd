use indexmap::IndexMap;
use steller::{Block, BlockEdge, BlockId, Error, LayoutConfig, LayoutType, Size, compute_layout};

fn block(width: i32, height: i32, targets: &[BlockId]) -> Block {
    Block {
        width,
        height,
        x: 0,
        y: 0,
        edges: targets.iter().map(|&t| BlockEdge::new(t)).collect(),
    }
}

/// Graph of 100x50 blocks from (id, targets) pairs.
fn graph(spec: &[(BlockId, &[BlockId])]) -> IndexMap<BlockId, Block> {
    spec.iter()
        .map(|&(id, targets)| (id, block(100, 50, targets)))
        .collect()
}

fn layout(blocks: &mut IndexMap<BlockId, Block>, entry: BlockId) -> Size {
    compute_layout(blocks, entry, &LayoutConfig::default()).unwrap()
}

/// Checks that hold for every successful layout: anchored polylines with
/// alternating segments, vertical segments clear of all block interiors, and
/// everything inside the canvas.
fn assert_layout_invariants(blocks: &IndexMap<BlockId, Block>, size: Size) {
    for (id, source) in blocks {
        assert!(source.x >= 0 && source.y >= 0, "block {id} left the canvas");
        assert!(source.x + source.width <= size.width);
        assert!(source.y + source.height <= size.height);

        for edge in &source.edges {
            let target = &blocks[&edge.target];
            let points = &edge.polyline;
            assert!(points.len() >= 2, "edge {id} -> {} has no path", edge.target);

            let first = points[0];
            assert_eq!(first.y, source.y + source.height);
            assert!(
                first.x >= source.x && first.x <= source.x + source.width,
                "edge {id} -> {} exits outside its source",
                edge.target
            );
            let last = points[points.len() - 1];
            assert_eq!(last.y, target.y);
            assert!(
                last.x >= target.x && last.x <= target.x + target.width,
                "edge {id} -> {} enters outside its target",
                edge.target
            );

            for (i, pair) in points.windows(2).enumerate() {
                if i % 2 == 0 {
                    assert_eq!(pair[0].x, pair[1].x, "segment {i} of {id} not vertical");
                } else {
                    assert_eq!(pair[0].y, pair[1].y, "segment {i} of {id} not horizontal");
                }
            }

            // Vertical segments may touch block borders but never cross the
            // interior.
            for (i, pair) in points.windows(2).enumerate() {
                if i % 2 != 0 {
                    continue;
                }
                let x = pair[0].x;
                let (y0, y1) = (pair[0].y.min(pair[1].y), pair[0].y.max(pair[1].y));
                for (other_id, other) in blocks {
                    let crosses = other.x < x
                        && x < other.x + other.width
                        && y0.max(other.y) < y1.min(other.y + other.height);
                    assert!(
                        !crosses,
                        "edge {id} -> {} crosses block {other_id}",
                        edge.target
                    );
                }
            }
        }
    }
}

#[test]
fn a_single_block_sits_inside_the_outer_margins() {
    let mut blocks = graph(&[(1, &[])]);
    let size = layout(&mut blocks, 1);
    assert_eq!(
        size,
        Size {
            width: 120,
            height: 70
        }
    );
    assert_eq!((blocks[&1].x, blocks[&1].y), (10, 10));
    assert_layout_invariants(&blocks, size);
}

#[test]
fn an_empty_graph_yields_an_empty_canvas() {
    let mut blocks: IndexMap<BlockId, Block> = IndexMap::new();
    let size = compute_layout(&mut blocks, 1, &LayoutConfig::default()).unwrap();
    assert_eq!(size, Size::default());
}

#[test]
fn a_linear_chain_stacks_into_one_straight_column() {
    let mut blocks = graph(&[(1, &[2]), (2, &[3]), (3, &[])]);
    let size = layout(&mut blocks, 1);
    assert_layout_invariants(&blocks, size);

    assert_eq!(blocks[&1].x, blocks[&2].x);
    assert_eq!(blocks[&2].x, blocks[&3].x);
    assert!(blocks[&1].y < blocks[&2].y);
    assert!(blocks[&2].y < blocks[&3].y);

    for id in [1u64, 2] {
        let polyline = &blocks[&id].edges[0].polyline;
        assert_eq!(polyline.len(), 2, "chain edges are straight verticals");
        assert_eq!(polyline[0].x, polyline[1].x);
    }
}

#[test]
fn a_diamond_centers_the_merge_block_and_splits_the_branches() {
    let mut blocks = graph(&[(1, &[2, 3]), (2, &[4]), (3, &[4]), (4, &[])]);
    let size = layout(&mut blocks, 1);
    assert_layout_invariants(&blocks, size);

    // Rows 0 / 1 / 1 / 2.
    assert!(blocks[&1].y < blocks[&2].y);
    assert_eq!(blocks[&2].y, blocks[&3].y);
    assert!(blocks[&3].y < blocks[&4].y);

    // The merge block comes back under the fork.
    assert_eq!(blocks[&4].x, blocks[&1].x);

    // True and false branches leave on opposite sides of the exit.
    let to_left = &blocks[&1].edges[0].polyline;
    let to_right = &blocks[&1].edges[1].polyline;
    assert!(to_left[0].x < to_right[0].x);
    assert!(to_left[to_left.len() - 1].x < to_right[to_right.len() - 1].x);
}

#[test]
fn a_back_edge_loops_around_the_blocks_it_revisits() {
    let mut blocks = graph(&[(1, &[2]), (2, &[1])]);
    let size = layout(&mut blocks, 1);
    assert_layout_invariants(&blocks, size);

    let back = &blocks[&2].edges[0].polyline;
    // V, H, V, H, V: two horizontal runs around the revisited block.
    assert_eq!(back.len(), 6);
    // The long vertical run stays clear of both block columns.
    let main_x = back[2].x;
    for id in [1u64, 2] {
        let b = &blocks[&id];
        assert!(main_x <= b.x || main_x >= b.x + b.width);
    }
    assert_eq!(back[back.len() - 1].y, blocks[&1].y);
}

#[test]
fn a_self_loop_is_routed_out_and_back_without_crossing_its_block() {
    let mut blocks = graph(&[(1, &[1])]);
    let size = layout(&mut blocks, 1);
    assert_layout_invariants(&blocks, size);
    assert_eq!(blocks[&1].edges[0].polyline.len(), 6);
}

#[test]
fn a_switch_fan_out_compresses_its_exit_anchors() {
    let targets: Vec<BlockId> = (2..8).collect();
    let mut spec: Vec<(BlockId, Vec<BlockId>)> = vec![(1, targets.clone())];
    for &t in &targets {
        spec.push((t, vec![8]));
    }
    spec.push((8, vec![]));
    let mut blocks: IndexMap<BlockId, Block> = spec
        .iter()
        .map(|(id, targets)| (*id, block(100, 50, targets)))
        .collect();

    let config = LayoutConfig {
        edge_horizontal_spacing: 20,
        layout_type: LayoutType::Narrow,
        ..Default::default()
    };
    let size = compute_layout(&mut blocks, 1, &config).unwrap();
    assert_layout_invariants(&blocks, size);

    // Narrow mode pulls the post-switch block back under the switch.
    assert_eq!(blocks[&8].x, blocks[&1].x);

    // 100 / 6 = 16 < 20: the exits compress to sixteen pixels apart instead
    // of the configured twenty, each one distinct.
    let mut exits: Vec<i32> = blocks[&1]
        .edges
        .iter()
        .map(|e| e.polyline[0].x)
        .collect();
    exits.sort_unstable();
    for pair in exits.windows(2) {
        assert_eq!(pair[1] - pair[0], 16);
    }
}

#[test]
fn unreachable_components_are_placed_beside_the_entry_component() {
    let mut blocks = graph(&[(1, &[2]), (2, &[]), (3, &[4]), (4, &[])]);
    let size = layout(&mut blocks, 1);
    assert_layout_invariants(&blocks, size);

    assert_eq!(blocks[&1].y, blocks[&3].y, "both roots sit in row zero");
    assert!(
        blocks[&3].x >= blocks[&1].x + blocks[&1].width,
        "the second root clears the first root's right edge"
    );
}

#[test]
fn an_entry_inside_a_loop_still_rises_to_the_top() {
    let mut blocks = graph(&[(1, &[2]), (2, &[3]), (3, &[1])]);
    let size = layout(&mut blocks, 1);
    assert_layout_invariants(&blocks, size);
    assert!(blocks[&1].y < blocks[&2].y);
    assert!(blocks[&2].y < blocks[&3].y);
}

#[test]
fn cross_edges_skipping_rows_keep_every_invariant() {
    let mut blocks = graph(&[
        (1, &[2, 5]),
        (2, &[3, 4]),
        (3, &[6]),
        (4, &[6]),
        (5, &[6, 1]),
        (6, &[2]),
    ]);
    let size = layout(&mut blocks, 1);
    assert_layout_invariants(&blocks, size);
}

#[test]
fn every_layout_type_produces_a_valid_drawing() {
    for layout_type in [LayoutType::Narrow, LayoutType::Medium, LayoutType::Wide] {
        let mut blocks = graph(&[
            (1, &[2, 3]),
            (2, &[4, 5]),
            (3, &[6]),
            (4, &[7]),
            (5, &[7]),
            (6, &[7]),
            (7, &[1]),
        ]);
        let config = LayoutConfig {
            layout_type,
            ..Default::default()
        };
        let size = compute_layout(&mut blocks, 1, &config).unwrap();
        assert_layout_invariants(&blocks, size);
    }
}

#[test]
fn vertical_middle_alignment_centers_short_blocks_in_their_row() {
    let mut blocks = graph(&[(1, &[2, 3]), (2, &[]), (3, &[])]);
    blocks[&2].height = 20;
    let config = LayoutConfig {
        vertical_block_alignment_middle: true,
        ..Default::default()
    };
    let size = compute_layout(&mut blocks, 1, &config).unwrap();
    assert_layout_invariants(&blocks, size);
    // Row height is 50; the 20 high block floats 15 below the row top.
    assert_eq!(blocks[&2].y, blocks[&3].y + 15);
}

#[test]
fn identical_inputs_produce_identical_outputs() {
    let spec: &[(BlockId, &[BlockId])] = &[
        (1, &[2, 3]),
        (2, &[4]),
        (3, &[4, 5]),
        (4, &[6]),
        (5, &[6]),
        (6, &[2]),
    ];
    let mut a = graph(spec);
    let mut b = graph(spec);
    let size_a = layout(&mut a, 1);
    let size_b = layout(&mut b, 1);
    assert_eq!(size_a, size_b);
    assert_eq!(a, b);
}

#[test]
fn insertion_order_of_the_block_map_does_not_matter() {
    let spec: &[(BlockId, &[BlockId])] = &[(1, &[2, 3]), (2, &[4]), (3, &[4]), (4, &[])];
    let mut forward = graph(spec);
    let mut reversed: IndexMap<BlockId, Block> = IndexMap::new();
    for &(id, targets) in spec.iter().rev() {
        reversed.insert(id, block(100, 50, targets));
    }
    let size_forward = layout(&mut forward, 1);
    let size_reversed = layout(&mut reversed, 1);
    assert_eq!(size_forward, size_reversed);
    for (id, b) in &forward {
        assert_eq!(b, &reversed[id]);
    }
}

#[test]
fn rerunning_after_resetting_outputs_is_idempotent() {
    let spec: &[(BlockId, &[BlockId])] = &[(1, &[2, 3]), (2, &[4]), (3, &[4]), (4, &[1])];
    let mut blocks = graph(spec);
    let first_size = layout(&mut blocks, 1);
    let snapshot = blocks.clone();

    for (_, b) in blocks.iter_mut() {
        b.x = 0;
        b.y = 0;
        for edge in &mut b.edges {
            edge.polyline.clear();
        }
    }
    let second_size = layout(&mut blocks, 1);
    assert_eq!(first_size, second_size);
    assert_eq!(blocks, snapshot);
}

#[test]
fn doubling_every_size_doubles_the_drawing() {
    let spec: &[(BlockId, &[BlockId])] = &[(1, &[2, 3]), (2, &[4]), (3, &[4]), (4, &[])];
    let mut base = graph(spec);
    let base_size = layout(&mut base, 1);

    let mut doubled: IndexMap<BlockId, Block> = spec
        .iter()
        .map(|&(id, targets)| (id, block(200, 100, targets)))
        .collect();
    let config = LayoutConfig {
        block_horizontal_spacing: 20,
        block_vertical_spacing: 20,
        edge_horizontal_spacing: 20,
        edge_vertical_spacing: 20,
        ..Default::default()
    };
    let doubled_size = compute_layout(&mut doubled, 1, &config).unwrap();

    assert_eq!(doubled_size.width, base_size.width * 2);
    assert_eq!(doubled_size.height, base_size.height * 2);
    for (id, b) in &base {
        assert_eq!(doubled[id].x, b.x * 2);
        assert_eq!(doubled[id].y, b.y * 2);
    }
}

#[test]
fn an_unknown_edge_target_is_rejected() {
    let mut blocks = graph(&[(1, &[99])]);
    let err = compute_layout(&mut blocks, 1, &LayoutConfig::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidGraph { target: 99 }));
}

#[test]
fn an_unknown_entry_is_rejected() {
    let mut blocks = graph(&[(1, &[])]);
    let err = compute_layout(&mut blocks, 7, &LayoutConfig::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidGraph { target: 7 }));
}

#[test]
fn non_positive_spacing_is_rejected() {
    let mut blocks = graph(&[(1, &[])]);
    let config = LayoutConfig {
        edge_vertical_spacing: 0,
        ..Default::default()
    };
    let err = compute_layout(&mut blocks, 1, &config).unwrap_err();
    assert!(matches!(
        err,
        Error::ConfigOutOfRange {
            field: "edge_vertical_spacing",
            value: 0
        }
    ));
}

#[test]
fn a_large_mixed_graph_keeps_every_invariant() {
    // Chains, a switch, nested diamonds and two loops in one function body.
    let mut blocks = graph(&[
        (1, &[2]),
        (2, &[3, 4, 5, 6]),
        (3, &[7]),
        (4, &[7, 8]),
        (5, &[8]),
        (6, &[9]),
        (7, &[10]),
        (8, &[10]),
        (9, &[10, 2]),
        (10, &[11, 12]),
        (11, &[13]),
        (12, &[13]),
        (13, &[14, 10]),
        (14, &[]),
    ]);
    let size = layout(&mut blocks, 1);
    assert_layout_invariants(&blocks, size);
}
