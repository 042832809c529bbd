//! Public data model: blocks, edges, and layout configuration.
//!
//! These are intentionally lightweight and `Clone`-friendly. The engine
//! mutates `Block::x`/`Block::y` and each edge's polyline in place and leaves
//! everything else untouched, so a caller can re-run a layout after resetting
//! only the output fields.

use serde::{Deserialize, Serialize};

/// Opaque block identity. Control-flow graphs typically use the address of
/// the basic block here, but the engine never interprets the value.
pub type BlockId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// An outgoing edge. The order of edges within [`Block::edges`] is
/// significant: conditional branches keep their input order so that the true
/// and false targets land on predictable sides of the drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEdge {
    pub target: BlockId,
    /// Axis-aligned path filled in by the layout. Points alternate between
    /// vertical and horizontal movement, starting with a vertical drop out of
    /// the source block.
    pub polyline: Vec<Point>,
}

impl BlockEdge {
    pub fn new(target: BlockId) -> Self {
        Self {
            target,
            polyline: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub width: i32,
    pub height: i32,
    /// Output: left edge of the block in pixels.
    pub x: i32,
    /// Output: top edge of the block in pixels.
    pub y: i32,
    pub edges: Vec<BlockEdge>,
}

/// Density presets. Narrow packs subtree shapes exactly and stacks parents
/// over the middle of their subtree bounds; Wide spreads children using
/// bounding boxes and centers parents between their direct children; Medium
/// sits in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutType {
    Narrow,
    #[default]
    Medium,
    Wide,
}

impl LayoutType {
    pub(crate) fn tight_subtree_placement(self) -> bool {
        matches!(self, LayoutType::Narrow)
    }

    pub(crate) fn parent_between_direct_children(self) -> bool {
        matches!(self, LayoutType::Wide)
    }
}

/// All distances are pixels and must be positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Minimum horizontal gap between two blocks in the same row.
    pub block_horizontal_spacing: i32,
    /// Minimum vertical gap between two rows of blocks.
    pub block_vertical_spacing: i32,
    /// Gap between parallel vertical edge segments, and the left/right canvas
    /// margin.
    pub edge_horizontal_spacing: i32,
    /// Gap between parallel horizontal edge segments, and the top/bottom
    /// canvas margin.
    pub edge_vertical_spacing: i32,
    pub layout_type: LayoutType,
    /// Center blocks vertically within their row instead of aligning tops.
    pub vertical_block_alignment_middle: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            block_horizontal_spacing: 10,
            block_vertical_spacing: 10,
            edge_horizontal_spacing: 10,
            edge_vertical_spacing: 10,
            layout_type: LayoutType::default(),
            vertical_block_alignment_middle: false,
        }
    }
}

impl LayoutConfig {
    pub(crate) fn validate(&self) -> crate::error::Result<()> {
        let fields = [
            ("block_horizontal_spacing", self.block_horizontal_spacing),
            ("block_vertical_spacing", self.block_vertical_spacing),
            ("edge_horizontal_spacing", self.edge_horizontal_spacing),
            ("edge_vertical_spacing", self.edge_vertical_spacing),
        ];
        for (field, value) in fields {
            if value <= 0 {
                return Err(crate::error::Error::ConfigOutOfRange { field, value });
            }
        }
        Ok(())
    }
}
