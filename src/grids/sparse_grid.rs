use std::marker::PhantomData;
use std::sync::OnceLock;

use crate::algorithms::compaction::IndexCompactor;
use crate::basis::base::BasisKernel;
use crate::errors::SGError;
use crate::storage::{compact::{CompactGrid, VECTOR_WIDTH}, grid_data::GridData};

///
/// One grid instance ("surplus state"): the raw `GridData` plus its compacted form,
/// built on first use.
///
/// The first caller of `compact` runs the compactor while concurrent callers block;
/// afterwards every caller reads the same immutable `CompactGrid` without locking.
/// `B` fixes the basis the index pairs were encoded for.
///
pub struct SparseGridState<B: BasisKernel>
{
    data: GridData,
    compact: OnceLock<CompactGrid>,
    _basis: PhantomData<B>,
}

impl<B: BasisKernel> SparseGridState<B>
{
    pub fn new(data: GridData) -> Self
    {
        Self { data, compact: OnceLock::new(), _basis: PhantomData }
    }

    ///
    /// Seeds the state with a previously built (e.g. deserialized) compacted grid.
    ///
    pub fn with_compact(data: GridData, compact: CompactGrid) -> Result<Self, SGError>
    {
        compact.validate()?;
        if compact.num_inputs != data.num_inputs || compact.num_nodes != data.num_nodes
        {
            return Err(SGError::IndexTableSizeMismatch);
        }
        if compact.num_outputs != data.num_outputs
        {
            return Err(SGError::SurplusSizeMismatch);
        }
        Self::check_matches(&data, &compact)?;
        Ok(Self { data, compact: OnceLock::from(compact), _basis: PhantomData })
    }

    ///
    /// The compacted grid must hold exactly the pairs and surplus rows of `data`,
    /// moved through its `mapping`.
    ///
    fn check_matches(data: &GridData, compact: &CompactGrid) -> Result<(), SGError>
    {
        let mut old_of = vec![0_usize; data.num_nodes];
        for (old, &new) in compact.mapping().iter().enumerate()
        {
            old_of[new as usize] = old;
            let same = compact.surplus_row(new as usize).iter().zip(data.surplus_row(old))
                .all(|(a, b)| a.to_bits() == b.to_bits());
            if !same
            {
                return Err(SGError::CompactGridMismatch);
            }
        }
        for d in 0..data.num_inputs
        {
            let mut placed = 0;
            for block in compact.active_blocks(d)
            {
                for lane in (0..VECTOR_WIDTH).filter(|&lane| !block.is_sentinel(lane))
                {
                    if data.pair(old_of[block.node[lane] as usize], d) != (block.level[lane], block.index[lane])
                    {
                        return Err(SGError::CompactGridMismatch);
                    }
                    placed += 1;
                }
            }
            let constrained = (0..data.num_nodes).filter(|&node| data.pair(node, d) != (0, 0)).count();
            if placed != constrained
            {
                return Err(SGError::CompactGridMismatch);
            }
        }
        Ok(())
    }

    pub fn data(&self) -> &GridData
    {
        &self.data
    }

    #[inline]
    pub fn compact(&self) -> &CompactGrid
    {
        self.compact.get_or_init(|| IndexCompactor(&self.data).compact())
    }

    pub fn is_compacted(&self) -> bool
    {
        self.compact.get().is_some()
    }

    pub fn num_inputs(&self) -> usize
    {
        self.data.num_inputs
    }

    pub fn num_outputs(&self) -> usize
    {
        self.data.num_outputs
    }

    pub fn len(&self) -> usize
    {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.data.is_empty()
    }
}

impl<B: BasisKernel> From<GridData> for SparseGridState<B>
{
    fn from(value: GridData) -> Self {
        Self::new(value)
    }
}
