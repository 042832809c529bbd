//! Cycle removal and topological ordering in a single DFS pass.
//!
//! Edges whose target is still on the DFS stack close a cycle and are
//! dropped from the DAG subset; edges to finished targets are kept as
//! forward/cross edges. The traversal starts at the entry block so that it
//! lands last in post-order (first after reversal) even when it sits inside
//! a loop, then restarts from every still-unvisited block in ascending id
//! order.

use crate::state::{GridBlock, GridEdge, LayoutState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Visit {
    #[default]
    NotVisited,
    InStack,
    Finished,
}

/// Returns the post-order over dense block indices.
pub(crate) fn topo_sort(state: &mut LayoutState, entry: usize) -> Vec<usize> {
    let block_count = state.blocks.len();
    let mut visited = vec![Visit::NotVisited; block_count];
    let mut order = Vec::with_capacity(block_count);
    // Explicit stack of (block, next edge index) frames; graphs with tens of
    // thousands of blocks would overflow the call stack otherwise.
    let mut stack: Vec<(usize, usize)> = Vec::new();

    dfs_fragment(
        entry,
        &state.edges,
        &mut state.blocks,
        &mut visited,
        &mut order,
        &mut stack,
    );
    for start in 0..block_count {
        if visited[start] == Visit::NotVisited {
            dfs_fragment(
                start,
                &state.edges,
                &mut state.blocks,
                &mut visited,
                &mut order,
                &mut stack,
            );
        }
    }

    order
}

fn dfs_fragment(
    first: usize,
    edges: &[Vec<GridEdge>],
    blocks: &mut [GridBlock],
    visited: &mut [Visit],
    order: &mut Vec<usize>,
    stack: &mut Vec<(usize, usize)>,
) {
    visited[first] = Visit::InStack;
    stack.push((first, 0));
    while let Some(&(block, edge_index)) = stack.last() {
        if edge_index < edges[block].len() {
            if let Some(frame) = stack.last_mut() {
                frame.1 += 1;
            }
            let target = edges[block][edge_index].dest;
            match visited[target] {
                Visit::NotVisited => {
                    visited[target] = Visit::InStack;
                    stack.push((target, 0));
                    blocks[block].dag_edges.push(target);
                }
                Visit::Finished => blocks[block].dag_edges.push(target),
                // Target is on the stack: loop edge, drop it from the DAG.
                Visit::InStack => {}
            }
        } else {
            stack.pop();
            visited[block] = Visit::Finished;
            order.push(block);
        }
    }
}
