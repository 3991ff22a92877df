//! Layout engine: partitions a sorted roster into blocks.
//!
//! This module handles:
//! - Cutting the roster into fixed-size blocks
//! - Placing blocks on a row-major grid (or stacking them)
//! - Border weights for cells on and inside a block outline

mod block_layout;

pub use block_layout::{
    Block, BlockLayout, BlockRow, CellEdges, EdgeWeight, LayoutConfig, LayoutMode,
    DEFAULT_BLOCKS_PER_ROW, DEFAULT_BLOCK_SIZE, DOCUMENT_BLOCKS_PER_ROW,
};
