//! Internal grid state shared by the pipeline stages.
//!
//! Blocks are addressed by dense index everywhere inside the engine. The
//! indices follow ascending block id, which pins down every iteration order
//! the pipeline relies on for deterministic output.

use indexmap::IndexMap;
use rustc_hash::FxHashMap as HashMap;

use crate::data::list_pool::ListRef;
use crate::error::{Error, Result};
use crate::model::{Block, BlockId};

/// Grid data for one input block. Rows count whole block rows; columns count
/// half-block lanes, so a block occupies the column interval
/// `[col, col + 2)`. Between (and outside) the block columns sit the edge
/// columns where vertical edge segments run.
#[derive(Debug, Clone, Default)]
pub(crate) struct GridBlock {
    pub row: i32,
    pub col: i32,
    /// Forward edges kept after cycle removal, in input edge order.
    pub dag_edges: Vec<usize>,
    /// Subset of `dag_edges` forming the spanning forest used for placement.
    pub tree_edges: Vec<usize>,
    pub has_parent: bool,

    // Subtree bounding profile, maintained bottom-up during placement.
    pub row_count: i32,
    pub left_position: i32,
    pub right_position: i32,
    pub last_row_left: i32,
    pub last_row_right: i32,
    pub left_shape: ListRef,
    pub right_shape: ListRef,

    pub input_count: i32,
    pub output_count: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EdgePoint {
    pub row: i32,
    pub col: i32,
    /// Segment hand: ±1 for wings exiting/entering next to a block, ±2 for
    /// wings outside both endpoints, 0 for interior segments. Drives the
    /// packing order inside an edge column.
    pub kind: i16,
    /// Replaces the default segment spacing at a fan-out/fan-in anchor;
    /// 0 means default.
    pub spacing_override: i16,
    /// Pixel offset within the segment's edge column/row, filled by packing.
    pub offset: i32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct GridEdge {
    pub dest: usize,
    /// The edge column carrying this edge's vertical row transition.
    pub main_column: i32,
    /// Rough route. Odd indices anchor vertical segments, even indices
    /// horizontal ones; the path starts with a vertical drop.
    pub points: Vec<EdgePoint>,
    pub secondary_priority: i32,
}

impl GridEdge {
    pub fn add_point(&mut self, row: i32, col: i32, kind: i16) {
        self.points.push(EdgePoint {
            row,
            col,
            kind,
            spacing_override: 0,
            offset: 0,
        });
    }
}

pub(crate) struct LayoutState {
    /// Block ids in ascending order; every other vector is parallel to this.
    pub ids: Vec<BlockId>,
    pub blocks: Vec<GridBlock>,
    /// Outgoing edges per block, in input edge order.
    pub edges: Vec<Vec<GridEdge>>,
    pub widths: Vec<i32>,
    pub heights: Vec<i32>,

    pub rows: usize,
    pub columns: usize,
    pub row_height: Vec<i32>,
    pub column_width: Vec<i32>,
    /// One edge column between and outside block columns: `columns + 1`.
    pub edge_column_width: Vec<i32>,
    pub edge_row_height: Vec<i32>,
    pub column_offset: Vec<i32>,
    pub edge_column_offset: Vec<i32>,
    pub row_offset: Vec<i32>,
    pub edge_row_offset: Vec<i32>,
}

impl LayoutState {
    /// Build the dense state from the caller's block map. Returns the state
    /// together with the dense index of the entry block.
    pub fn build(blocks: &IndexMap<BlockId, Block>, entry: BlockId) -> Result<(Self, usize)> {
        let mut ids: Vec<BlockId> = blocks.keys().copied().collect();
        ids.sort_unstable();

        let mut index_of: HashMap<BlockId, usize> = HashMap::default();
        index_of.reserve(ids.len());
        for (ix, &id) in ids.iter().enumerate() {
            index_of.insert(id, ix);
        }
        let Some(&entry_ix) = index_of.get(&entry) else {
            return Err(Error::InvalidGraph { target: entry });
        };

        let mut grid_blocks = vec![GridBlock::default(); ids.len()];
        let mut edges: Vec<Vec<GridEdge>> = Vec::with_capacity(ids.len());
        let mut widths = Vec::with_capacity(ids.len());
        let mut heights = Vec::with_capacity(ids.len());

        for &id in &ids {
            let block = &blocks[&id];
            widths.push(block.width);
            heights.push(block.height);

            let mut out = Vec::with_capacity(block.edges.len());
            for edge in &block.edges {
                let Some(&dest) = index_of.get(&edge.target) else {
                    return Err(Error::InvalidGraph {
                        target: edge.target,
                    });
                };
                out.push(GridEdge {
                    dest,
                    ..Default::default()
                });
            }
            edges.push(out);
        }

        for (source, out) in edges.iter().enumerate() {
            grid_blocks[source].output_count = out.len() as i32;
            for edge in out {
                grid_blocks[edge.dest].input_count += 1;
            }
        }

        Ok((
            Self {
                ids,
                blocks: grid_blocks,
                edges,
                widths,
                heights,
                rows: 0,
                columns: 0,
                row_height: Vec::new(),
                column_width: Vec::new(),
                edge_column_width: Vec::new(),
                edge_row_height: Vec::new(),
                column_offset: Vec::new(),
                edge_column_offset: Vec::new(),
                row_offset: Vec::new(),
                edge_row_offset: Vec::new(),
            },
            entry_ix,
        ))
    }

    /// Derive the grid extent and the initial row/column sizes from the
    /// placed blocks.
    pub fn compute_grid_metrics(&mut self) {
        self.rows = 1;
        self.columns = 1;
        for block in &self.blocks {
            self.rows = self.rows.max(block.row as usize + 1);
            // A block is two columns wide.
            self.columns = self.columns.max(block.col as usize + 2);
        }

        self.row_height = vec![0; self.rows];
        self.column_width = vec![0; self.columns];
        for (ix, block) in self.blocks.iter().enumerate() {
            let row = block.row as usize;
            let col = block.col as usize;
            self.row_height[row] = self.row_height[row].max(self.heights[ix]);
            let half = self.widths[ix] / 2;
            self.column_width[col] = self.column_width[col].max(half);
            self.column_width[col + 1] = self.column_width[col + 1].max(half);
        }
    }
}
