use crate::storage::compact::{IndexBlock, VECTOR_WIDTH};

use crate::errors::SGError;

use super::base::{BasisFunction, BasisKernel, BlockWeights};

///
/// Piecewise linear hat `max(0, 1 - |x*i - j|)`, where `i = 2^(level-1)` and
/// `j = index - 1` have been precomputed by `encode`.
///
#[derive(Copy, Clone, Debug, Default)]
pub struct LinearBasis;

impl BasisKernel for LinearBasis
{
    #[inline]
    fn weight(x: f64, i: u32, j: u32) -> f64 {
        // x * 0 is NaN for non-finite x, so the sentinel needs its own branch.
        if i == 0 && j == 0
        {
            return 1.0;
        }
        0.0_f64.max(1.0 - f64::abs(x * i as f64 - j as f64))
    }

    #[inline]
    fn encode(level: u32, index: u32) -> Result<(u32, u32), SGError> {
        if level <= 1
        {
            return Ok((0, 0));
        }
        let i = 1_u32.checked_shl(level - 1).ok_or(SGError::LevelOutOfRange)?;
        Ok((i, index.saturating_sub(1)))
    }

    fn basis_type() -> BasisFunction {
        BasisFunction::Linear
    }

    #[inline]
    fn block_weights(x: f64, block: &IndexBlock) -> BlockWeights
    {
        // Split into straight-line lane loops so the compiler can keep the
        // conversions and the clamp in vector registers.
        let mut i = [0.0; VECTOR_WIDTH];
        let mut j = [0.0; VECTOR_WIDTH];
        let mut sentinel = [false; VECTOR_WIDTH];
        for k in 0..VECTOR_WIDTH
        {
            i[k] = block.level[k] as f64;
            j[k] = block.index[k] as f64;
            sentinel[k] = block.is_sentinel(k);
        }
        let mut lanes = BlockWeights::default();
        for k in 0..VECTOR_WIDTH
        {
            let w = 0.0_f64.max(1.0 - f64::abs(x * i[k] - j[k]));
            lanes.0[k] = if sentinel[k] { 1.0 } else { w };
        }
        lanes
    }
}
