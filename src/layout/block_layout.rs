//! Block partitioning of a sorted roster.
//!
//! The sorted participants are cut into consecutive chunks of `block_size`
//! and the chunks are placed on a grid, row-major, `blocks_per_row` wide.
//! Every renderer walks the same [`BlockLayout`].

use serde::{Deserialize, Serialize};

use crate::error::{FirmasError, Result};
use crate::types::ParticipantRecord;

/// Rows per block on a printed sheet.
pub const DEFAULT_BLOCK_SIZE: usize = 8;

/// Blocks side by side in grid mode.
pub const DEFAULT_BLOCKS_PER_ROW: usize = 2;

/// Blocks side by side on the HTML and PDF documents, in every mode.
pub const DOCUMENT_BLOCKS_PER_ROW: usize = 2;

/// How blocks are arranged on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// `blocks_per_row` blocks on each visual row.
    #[default]
    Grid,
    /// One block per visual row.
    Stacked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub block_size: usize,
    pub blocks_per_row: usize,
    pub mode: LayoutMode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            blocks_per_row: DEFAULT_BLOCKS_PER_ROW,
            mode: LayoutMode::Grid,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(FirmasError::Config("block size must be at least 1".into()));
        }
        if self.blocks_per_row == 0 {
            return Err(FirmasError::Config(
                "blocks per row must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Blocks per visual row after applying the mode.
    pub fn effective_blocks_per_row(&self) -> usize {
        match self.mode {
            LayoutMode::Grid => self.blocks_per_row.max(1),
            LayoutMode::Stacked => 1,
        }
    }
}

/// Border weight of one cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeWeight {
    Thin,
    Thick,
}

impl EdgeWeight {
    fn thick_if(cond: bool) -> Self {
        if cond {
            Self::Thick
        } else {
            Self::Thin
        }
    }
}

/// Border weights of a cell inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellEdges {
    pub top: EdgeWeight,
    pub right: EdgeWeight,
    pub bottom: EdgeWeight,
    pub left: EdgeWeight,
}

/// A consecutive chunk of the sorted roster and its grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub index: usize,
    pub grid_row: usize,
    pub grid_col: usize,
    pub participants: &'a [ParticipantRecord],
}

impl<'a> Block<'a> {
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Occupied rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = BlockRow<'a>> + 'a {
        let last = self.participants.len().saturating_sub(1);
        self.participants
            .iter()
            .enumerate()
            .map(move |(row, participant)| BlockRow {
                participant,
                row,
                is_first: row == 0,
                is_last: row == last,
            })
    }
}

/// One occupied row of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRow<'a> {
    pub participant: &'a ParticipantRecord,
    /// 0-based row within the block.
    pub row: usize,
    pub is_first: bool,
    /// Last occupied row; a short block closes here, not at `block_size`.
    pub is_last: bool,
}

impl BlockRow<'_> {
    /// Edges of column `col` in a block `columns` wide.
    ///
    /// The block outline is thick and everything inside it is thin.
    pub fn edges(&self, col: usize, columns: usize) -> CellEdges {
        CellEdges {
            top: EdgeWeight::thick_if(self.is_first),
            right: EdgeWeight::thick_if(col + 1 >= columns),
            bottom: EdgeWeight::thick_if(self.is_last),
            left: EdgeWeight::thick_if(col == 0),
        }
    }
}

/// Blocks of a roster with their grid positions.
#[derive(Debug, Clone)]
pub struct BlockLayout<'a> {
    blocks: Vec<Block<'a>>,
    config: LayoutConfig,
    participant_count: usize,
}

impl<'a> BlockLayout<'a> {
    /// Partition `participants` (already sorted) into blocks.
    pub fn new(participants: &'a [ParticipantRecord], config: &LayoutConfig) -> Result<Self> {
        config.validate()?;
        let per_row = config.effective_blocks_per_row();

        let blocks = participants
            .chunks(config.block_size)
            .enumerate()
            .map(|(index, chunk)| Block {
                index,
                grid_row: index / per_row,
                grid_col: index % per_row,
                participants: chunk,
            })
            .collect();

        Ok(Self {
            blocks,
            config: config.clone(),
            participant_count: participants.len(),
        })
    }

    pub fn blocks(&self) -> &[Block<'a>] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn participant_count(&self) -> usize {
        self.participant_count
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    pub fn blocks_per_row(&self) -> usize {
        self.config.effective_blocks_per_row()
    }

    /// Number of visual rows of blocks.
    pub fn grid_rows(&self) -> usize {
        self.blocks.len().div_ceil(self.blocks_per_row())
    }

    /// Blocks paired for the printable documents, independent of `mode`
    /// and `blocks_per_row`.
    pub fn document_rows(&self) -> std::slice::Chunks<'_, Block<'a>> {
        self.blocks.chunks(DOCUMENT_BLOCKS_PER_ROW)
    }

    /// Column groups in use: `blocks_per_row`, or fewer when there are not
    /// enough blocks to fill the first row. Never less than one.
    pub fn column_groups(&self) -> usize {
        self.blocks_per_row().min(self.blocks.len()).max(1)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<ParticipantRecord> {
        (0..n)
            .map(|i| ParticipantRecord::new(&format!("P{i:03}"), "X"))
            .collect()
    }

    #[test]
    fn test_block_count_and_short_last_block() {
        let people = roster(53);
        let layout = BlockLayout::new(&people, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.block_count(), 7);
        assert_eq!(layout.blocks()[6].len(), 5);
        assert!(layout.blocks()[..6].iter().all(|b| b.len() == 8));
        assert_eq!(layout.participant_count(), 53);
    }

    #[test]
    fn test_blocks_preserve_sorted_order() {
        let people = roster(20);
        let layout = BlockLayout::new(&people, &LayoutConfig::default()).unwrap();
        let flat: Vec<&ParticipantRecord> = layout
            .blocks()
            .iter()
            .flat_map(|b| b.participants.iter())
            .collect();
        assert_eq!(flat.len(), people.len());
        assert!(flat.iter().zip(&people).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_grid_positions_row_major() {
        let people = roster(40);
        let layout = BlockLayout::new(&people, &LayoutConfig::default()).unwrap();
        let positions: Vec<(usize, usize)> = layout
            .blocks()
            .iter()
            .map(|b| (b.grid_row, b.grid_col))
            .collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
        assert_eq!(layout.grid_rows(), 3);
        let row_sizes: Vec<usize> = layout.document_rows().map(|row| row.len()).collect();
        assert_eq!(row_sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_stacked_mode_uses_one_column() {
        let people = roster(17);
        let config = LayoutConfig {
            mode: LayoutMode::Stacked,
            ..LayoutConfig::default()
        };
        let layout = BlockLayout::new(&people, &config).unwrap();
        assert_eq!(layout.block_count(), 3);
        assert!(layout.blocks().iter().all(|b| b.grid_col == 0));
        assert_eq!(layout.grid_rows(), 3);
        assert_eq!(layout.column_groups(), 1);
    }

    #[test]
    fn test_document_rows_pair_blocks_in_every_mode() {
        let people = roster(40);
        for config in [
            LayoutConfig {
                mode: LayoutMode::Stacked,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                blocks_per_row: 4,
                ..LayoutConfig::default()
            },
        ] {
            let layout = BlockLayout::new(&people, &config).unwrap();
            let sizes: Vec<usize> = layout.document_rows().map(<[Block<'_>]>::len).collect();
            assert_eq!(sizes, vec![2, 2, 1]);
        }
    }

    #[test]
    fn test_exactly_one_thick_top_and_bottom_per_block() {
        let people = roster(53);
        let layout = BlockLayout::new(&people, &LayoutConfig::default()).unwrap();
        for block in layout.blocks() {
            for col in 0..3 {
                let edges: Vec<CellEdges> = block.rows().map(|r| r.edges(col, 3)).collect();
                let tops = edges.iter().filter(|e| e.top == EdgeWeight::Thick).count();
                let bottoms = edges
                    .iter()
                    .filter(|e| e.bottom == EdgeWeight::Thick)
                    .count();
                assert_eq!(tops, 1, "block {} col {col}", block.index);
                assert_eq!(bottoms, 1, "block {} col {col}", block.index);
                assert_eq!(edges[0].top, EdgeWeight::Thick);
                assert_eq!(edges[block.len() - 1].bottom, EdgeWeight::Thick);
            }
        }
    }

    #[test]
    fn test_side_edges() {
        let people = roster(2);
        let layout = BlockLayout::new(&people, &LayoutConfig::default()).unwrap();
        let row = layout.blocks()[0].rows().next().unwrap();
        assert_eq!(row.edges(0, 3).left, EdgeWeight::Thick);
        assert_eq!(row.edges(0, 3).right, EdgeWeight::Thin);
        assert_eq!(row.edges(1, 3).left, EdgeWeight::Thin);
        assert_eq!(row.edges(1, 3).right, EdgeWeight::Thin);
        assert_eq!(row.edges(2, 3).right, EdgeWeight::Thick);
    }

    #[test]
    fn test_single_row_block_is_closed() {
        let people = roster(9);
        let layout = BlockLayout::new(&people, &LayoutConfig::default()).unwrap();
        let row = layout.blocks()[1].rows().next().unwrap();
        let edges = row.edges(1, 3);
        assert_eq!(edges.top, EdgeWeight::Thick);
        assert_eq!(edges.bottom, EdgeWeight::Thick);
    }

    #[test]
    fn test_empty_roster_has_no_blocks() {
        let layout = BlockLayout::new(&[], &LayoutConfig::default()).unwrap();
        assert_eq!(layout.block_count(), 0);
        assert_eq!(layout.grid_rows(), 0);
        assert_eq!(layout.document_rows().count(), 0);
        assert_eq!(layout.column_groups(), 1);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let people = roster(30);
        let config = LayoutConfig::default();
        let a = BlockLayout::new(&people, &config).unwrap();
        let b = BlockLayout::new(&people, &config).unwrap();
        assert_eq!(a.blocks(), b.blocks());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let people = roster(3);
        for config in [
            LayoutConfig {
                block_size: 0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                blocks_per_row: 0,
                ..LayoutConfig::default()
            },
        ] {
            assert!(matches!(
                BlockLayout::new(&people, &config),
                Err(FirmasError::Config(_))
            ));
        }
    }

    #[test]
    fn test_layout_config_serde_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"mode":"stacked"}"#).unwrap();
        assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(config.mode, LayoutMode::Stacked);
        assert_eq!(config.effective_blocks_per_row(), 1);
    }
}
