use rayon::{iter::{IndexedParallelIterator, ParallelIterator}, slice::{ParallelSlice, ParallelSliceMut}};

use crate::basis::base::BasisKernel;
use crate::errors::SGError;
use crate::kernels::specializer::KernelSpecializer;
use crate::storage::compact::CompactGrid;

use super::sparse_grid::SparseGridState;

///
/// Entry points for the four call shapes. Each call resolves its kernel through the
/// `KernelSpecializer` and runs it on the compacted form of the selected state(s).
///
/// The DOF span `dof_start..=dof_end` and output buffer sizes are checked before
/// anything is written, so a call that returns an error leaves its buffers untouched.
/// Coordinate vectors are expected to hold at least `num_inputs` values; this is
/// only asserted in debug builds, release builds panic on the short slice.
///
pub struct Interpolator<'a, B: BasisKernel>
{
    states: &'a [SparseGridState<B>],
    kernels: &'a KernelSpecializer<B>,
}

impl<'a, B: BasisKernel> Interpolator<'a, B>
{
    pub fn new(states: &'a [SparseGridState<B>], kernels: &'a KernelSpecializer<B>) -> Self
    {
        Self { states, kernels }
    }

    pub fn states(&self) -> &'a [SparseGridState<B>]
    {
        self.states
    }

    pub fn kernels(&self) -> &'a KernelSpecializer<B>
    {
        self.kernels
    }

    fn state(&self, istate: usize) -> Result<&'a SparseGridState<B>, SGError>
    {
        self.states.get(istate).ok_or(SGError::InvalidStateIndex)
    }

    #[inline]
    fn dof_span(num_outputs: usize, dof_start: usize, dof_end: usize) -> Result<usize, SGError>
    {
        if dof_start > dof_end || dof_end >= num_outputs
        {
            return Err(SGError::InvalidDofRange);
        }
        Ok(dof_end - dof_start + 1)
    }

    ///
    /// Interpolates a single DOF.
    ///
    pub fn interpolate_value(&self, istate: usize, x: &[f64], dof: usize) -> Result<f64, SGError>
    {
        let state = self.state(istate)?;
        Self::dof_span(state.num_outputs(), dof, dof)?;
        debug_assert!(x.len() >= state.num_inputs());
        let kernel = self.kernels.value(state.num_inputs());
        Ok(kernel(state.compact(), x, dof))
    }

    ///
    /// Interpolates the DOFs `dof_start..=dof_end` into `value[..span]`.
    ///
    pub fn interpolate_array(&self, istate: usize, x: &[f64], dof_start: usize, dof_end: usize, value: &mut [f64]) -> Result<(), SGError>
    {
        let state = self.state(istate)?;
        let span = Self::dof_span(state.num_outputs(), dof_start, dof_end)?;
        if value.len() < span
        {
            return Err(SGError::OutputBufferTooSmall);
        }
        debug_assert!(x.len() >= state.num_inputs());
        let kernel = self.kernels.array(state.num_inputs());
        kernel(state.compact(), x, dof_start, dof_end, value);
        Ok(())
    }

    ///
    /// Interpolates `count` coordinate vectors stored back to back in `x` against one
    /// state. Result `k` occupies `value[k * span..(k + 1) * span]`.
    ///
    pub fn interpolate_array_many_stateless(&self, istate: usize, x: &[f64], dof_start: usize, dof_end: usize, count: usize, value: &mut [f64]) -> Result<(), SGError>
    {
        let state = self.state(istate)?;
        let span = Self::dof_span(state.num_outputs(), dof_start, dof_end)?;
        if value.len() < span * count
        {
            return Err(SGError::OutputBufferTooSmall);
        }
        debug_assert!(x.len() >= state.num_inputs() * count);
        let kernel = self.kernels.many_stateless(state.num_inputs(), count);
        kernel(state.compact(), x, dof_start, dof_end, count, value);
        Ok(())
    }

    ///
    /// Interpolates `x[k]` against state `k` into `value[k]`, for every state.
    ///
    pub fn interpolate_array_many_multistate(&self, x: &[&[f64]], dof_start: usize, dof_end: usize, value: &mut [&mut [f64]]) -> Result<(), SGError>
    {
        let count = self.states.len();
        if x.len() != count || value.len() != count
        {
            return Err(SGError::StateCountMismatch);
        }
        let Some(first) = self.states.first() else
        {
            return Ok(());
        };
        let num_inputs = first.num_inputs();
        for (state, value) in self.states.iter().zip(value.iter())
        {
            if state.num_inputs() != num_inputs
            {
                return Err(SGError::StateDimensionMismatch);
            }
            let span = Self::dof_span(state.num_outputs(), dof_start, dof_end)?;
            if value.len() < span
            {
                return Err(SGError::OutputBufferTooSmall);
            }
        }
        debug_assert!(x.iter().all(|x| x.len() >= num_inputs));
        let grids: Vec<&CompactGrid> = self.states.iter().map(|state| state.compact()).collect();
        let kernel = self.kernels.many_multistate(num_inputs, count);
        kernel(&grids, x, dof_start, dof_end, value);
        Ok(())
    }

    ///
    /// Like `interpolate_array_many_stateless`, but spreads the coordinate vectors over
    /// the rayon thread pool. Each vector is evaluated exactly as `interpolate_array`
    /// would, so results do not depend on scheduling.
    ///
    /// `x.len()` must be a nonzero multiple of the state's dimension; a
    /// zero-dimensional state has no coordinate vectors to count, use
    /// `interpolate_array` for it.
    ///
    pub fn interpolate_batch(&self, istate: usize, x: &[f64], dof_start: usize, dof_end: usize) -> Result<Vec<f64>, SGError>
    {
        let state = self.state(istate)?;
        let span = Self::dof_span(state.num_outputs(), dof_start, dof_end)?;
        let num_inputs = state.num_inputs();
        if num_inputs == 0 || x.len() % num_inputs != 0
        {
            return Err(SGError::IndexTableSizeMismatch);
        }
        let count = x.len() / num_inputs;
        let kernel = self.kernels.array(num_inputs);
        let grid = state.compact();
        let mut results = vec![0.0; count * span];
        results.par_chunks_mut(span).zip(x.par_chunks_exact(num_inputs)).for_each(|(value, x)|
        {
            kernel(grid, x, dof_start, dof_end, value);
        });
        Ok(results)
    }
}
