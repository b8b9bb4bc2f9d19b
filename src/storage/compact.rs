use serde::{Deserialize, Serialize};

use crate::errors::SGError;

/// Lanes per `IndexBlock`.
pub const VECTOR_WIDTH: usize = 8;

///
/// `VECTOR_WIDTH` compacted rows of one dimension: the encoded pair and the
/// renumbered node each lane belongs to. A lane holding `(0, 0, 0)` is padding.
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C, align(32))]
pub struct IndexBlock
{
    pub level: [u32; VECTOR_WIDTH],
    pub index: [u32; VECTOR_WIDTH],
    pub node: [u32; VECTOR_WIDTH],
}

impl IndexBlock
{
    pub const EMPTY: IndexBlock = IndexBlock { level: [0; VECTOR_WIDTH], index: [0; VECTOR_WIDTH], node: [0; VECTOR_WIDTH] };

    #[inline]
    pub fn is_empty(&self) -> bool
    {
        *self == Self::EMPTY
    }

    #[inline]
    pub fn is_sentinel(&self, lane: usize) -> bool
    {
        self.level[lane] == 0 && self.index[lane] == 0
    }
}

///
/// Evaluation-ready layout of a `GridData`: per dimension, the constrained pairs
/// packed into `IndexBlock`s, node ids renumbered in first-sighting order and the
/// surplus rows permuted to match.
///
/// Within a dimension all real entries precede all padding entries. Only the first
/// `active_len(d)` blocks of dimension `d` are visited during evaluation.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactGrid
{
    pub(crate) num_inputs: usize,
    pub(crate) num_nodes: usize,
    pub(crate) num_outputs: usize,
    pub(crate) columns: Vec<Vec<IndexBlock>>,
    pub(crate) active: Vec<usize>,
    pub(crate) mapping: Vec<u32>,
    pub(crate) surplus: Vec<f64>,
}

impl CompactGrid
{
    pub fn num_inputs(&self) -> usize
    {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize
    {
        self.num_outputs
    }

    pub fn len(&self) -> usize
    {
        self.num_nodes
    }

    pub fn is_empty(&self) -> bool
    {
        self.num_nodes == 0
    }

    /// All blocks of dimension `dim`, padding included.
    pub fn blocks(&self, dim: usize) -> &[IndexBlock]
    {
        &self.columns[dim]
    }

    #[inline]
    pub fn active_blocks(&self, dim: usize) -> &[IndexBlock]
    {
        &self.columns[dim][..self.active[dim]]
    }

    pub fn active_len(&self, dim: usize) -> usize
    {
        self.active[dim]
    }

    /// Old node id to new node id.
    pub fn mapping(&self) -> &[u32]
    {
        &self.mapping
    }

    pub fn surplus(&self) -> &[f64]
    {
        &self.surplus
    }

    #[inline]
    pub fn surplus_row(&self, node: usize) -> &[f64]
    {
        &self.surplus[node * self.num_outputs..(node + 1) * self.num_outputs]
    }

    ///
    /// Recomputes the active length of every dimension: the number of blocks
    /// before the first block that is entirely padding.
    ///
    pub fn calculate_lengths(&mut self)
    {
        self.active = self.lengths();
    }

    fn lengths(&self) -> Vec<usize>
    {
        self.columns.iter()
            .map(|blocks| blocks.iter().take_while(|block| !block.is_empty()).count())
            .collect()
    }

    ///
    /// Appends `count` all-padding blocks to dimension `dim`.
    ///
    pub fn pad_dimension(&mut self, dim: usize, count: usize)
    {
        let len = self.columns[dim].len();
        self.columns[dim].resize(len + count, IndexBlock::EMPTY);
    }

    ///
    /// True if, in every dimension, no real entry follows a padding entry in
    /// block order, and no real entry lies beyond the active length.
    ///
    pub fn is_front_packed(&self) -> bool
    {
        self.columns.iter().zip(self.active.iter()).all(|(blocks, &active)|
        {
            let mut seen_padding = false;
            for (b, block) in blocks.iter().enumerate()
            {
                for lane in 0..VECTOR_WIDTH
                {
                    if block.is_sentinel(lane)
                    {
                        seen_padding = true;
                    }
                    else if seen_padding || b >= active
                    {
                        return false;
                    }
                }
            }
            true
        })
    }

    ///
    /// Writes the compacted grid to file with the specified serialization format.
    ///
    pub fn write(&self, path: &str, format: crate::serialization::SerializationFormat) -> Result<(), SGError>
    {
        use std::io::Write;
        let mut file = std::io::BufWriter::new(std::fs::File::create(path).map_err(|_|SGError::FileIOError)?);
        let buffer = crate::serialization::serialize(self, format)?;
        file.write_all(&buffer).map_err(|_|SGError::WriteBufferFailed)?;
        Ok(())
    }

    pub fn write_buffer(&self, format: crate::serialization::SerializationFormat) -> Result<Vec<u8>, SGError>
    {
        crate::serialization::serialize(self, format)
    }

    pub fn read_buffer(buffer: &[u8], format: crate::serialization::SerializationFormat) -> Result<Self, SGError>
    {
        let grid: Self = crate::serialization::deserialize(buffer, format)?;
        grid.validate()?;
        Ok(grid)
    }

    pub fn read<Reader: std::io::Read>(mut reader: Reader, format: crate::serialization::SerializationFormat) -> Result<Self, SGError>
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|_|SGError::ReadBufferFailed)?;
        Self::read_buffer(&bytes, format)
    }

    ///
    /// Structural checks for a grid that did not come out of the compactor: table
    /// shapes, active lengths that match the blocks, front packing, node ids inside
    /// `num_nodes` on every visited lane, and a bijective `mapping`.
    ///
    pub(crate) fn validate(&self) -> Result<(), SGError>
    {
        if self.columns.len() != self.num_inputs || self.active.len() != self.num_inputs
            || self.mapping.len() != self.num_nodes
        {
            return Err(SGError::IndexTableSizeMismatch);
        }
        if self.surplus.len() != self.num_nodes * self.num_outputs
        {
            return Err(SGError::SurplusSizeMismatch);
        }
        if self.lengths() != self.active || !self.is_front_packed()
        {
            return Err(SGError::InvalidCompactLayout);
        }
        for d in 0..self.num_inputs
        {
            if self.active_blocks(d).iter().flat_map(|block| block.node.iter()).any(|&node| node as usize >= self.num_nodes)
            {
                return Err(SGError::NodeIndexOverflow);
            }
        }
        let mut seen = vec![false; self.num_nodes];
        for &new in &self.mapping
        {
            match seen.get_mut(new as usize)
            {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(SGError::InvalidCompactLayout),
            }
        }
        Ok(())
    }
}
