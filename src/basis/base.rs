use serde::{Deserialize, Serialize};

use crate::errors::SGError;
use crate::storage::compact::{IndexBlock, VECTOR_WIDTH};

///
/// Per-lane weights of one `IndexBlock`, aligned so a block's worth of `f64`
/// fills whole vector registers.
///
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C, align(64))]
pub struct BlockWeights(pub [f64; VECTOR_WIDTH]);

impl Default for BlockWeights
{
    fn default() -> Self {
        Self([1.0; VECTOR_WIDTH])
    }
}

///
/// One-dimensional weight function evaluated on the encoded `(i, j)` pairs of
/// a compacted grid.
///
/// The pair `(0, 0)` is the unconstrained sentinel and must weigh exactly `1.0`,
/// so padding lanes never change a product. `block_weights` has to perform the
/// same floating point operations as `weight` lane by lane: the accumulator
/// relies on exact zeros to skip nodes.
///
pub trait BasisKernel: Copy + Default + Send + Sync + 'static
{
    fn weight(x: f64, i: u32, j: u32) -> f64;

    /// Maps a grid file `(level, index)` pair onto the `(i, j)` pair `weight` expects.
    fn encode(level: u32, index: u32) -> Result<(u32, u32), SGError>;

    fn basis_type() -> BasisFunction;

    #[inline]
    fn block_weights(x: f64, block: &IndexBlock) -> BlockWeights
    {
        let mut lanes = BlockWeights::default();
        for k in 0..VECTOR_WIDTH
        {
            lanes.0[k] = Self::weight(x, block.level[k], block.index[k]);
        }
        lanes
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BasisFunction
{
    Linear = 0,
    Polynomial = 1,
}
