use std::marker::PhantomData;

use crate::basis::base::BasisKernel;
use crate::storage::compact::{CompactGrid, VECTOR_WIDTH};

///
/// First stage of an evaluation: multiplies, per node, the basis weights of all
/// constrained dimensions into `temps`.
///
/// Weights of a block are computed lane-parallel; folding them into `temps` is a
/// scatter over unrelated node ids and stays scalar.
///
pub trait ProductStage
{
    fn products(grid: &CompactGrid, x: &[f64], temps: &mut [f64]);
}

/// Dimension count read from the grid at run time.
pub struct Generic<B: BasisKernel>(PhantomData<B>);

/// Dimension count fixed at compile time, `D` must equal the grid's.
pub struct Fixed<B: BasisKernel, const D: usize>(PhantomData<B>);

#[inline(always)]
fn fold_dimension<B: BasisKernel>(grid: &CompactGrid, dim: usize, x: f64, temps: &mut [f64])
{
    for block in grid.active_blocks(dim)
    {
        let weights = B::block_weights(x, block);
        for k in 0..VECTOR_WIDTH
        {
            temps[block.node[k] as usize] *= weights.0[k];
        }
    }
}

impl<B: BasisKernel> ProductStage for Generic<B>
{
    fn products(grid: &CompactGrid, x: &[f64], temps: &mut [f64]) {
        debug_assert!(x.len() >= grid.num_inputs(), "coordinate vector shorter than grid dimension");
        temps.fill(1.0);
        for (dim, &xd) in x[..grid.num_inputs()].iter().enumerate()
        {
            fold_dimension::<B>(grid, dim, xd, temps);
        }
    }
}

impl<B: BasisKernel, const D: usize> ProductStage for Fixed<B, D>
{
    #[inline]
    fn products(grid: &CompactGrid, x: &[f64], temps: &mut [f64]) {
        debug_assert_eq!(grid.num_inputs(), D, "kernel specialized for another dimension");
        let Some(x) = x.first_chunk::<D>() else
        {
            // Short coordinate vector, let the generic path report it.
            return Generic::<B>::products(grid, x, temps);
        };
        temps.fill(1.0);
        for dim in 0..D
        {
            fold_dimension::<B>(grid, dim, x[dim], temps);
        }
    }
}

///
/// Second stage: `value[k] += temps[node] * surplus[node][start + k]` over all nodes
/// with a nonzero product, in node order.
///
#[inline(always)]
fn accumulate(grid: &CompactGrid, temps: &[f64], dof_start: usize, dof_end: usize, value: &mut [f64])
{
    let value = &mut value[..=dof_end - dof_start];
    value.fill(0.0);
    for (node, &temp) in temps.iter().enumerate()
    {
        if temp == 0.0
        {
            continue;
        }
        let surplus = &grid.surplus_row(node)[dof_start..=dof_end];
        for (v, &s) in value.iter_mut().zip(surplus)
        {
            *v += temp * s;
        }
    }
}

pub fn interpolate_value<P: ProductStage>(grid: &CompactGrid, x: &[f64], dof: usize) -> f64
{
    let mut value = [0.0];
    interpolate_array::<P>(grid, x, dof, dof, &mut value);
    value[0]
}

pub fn interpolate_array<P: ProductStage>(grid: &CompactGrid, x: &[f64], dof_start: usize, dof_end: usize, value: &mut [f64])
{
    let mut temps = vec![1.0; grid.len()];
    P::products(grid, x, &mut temps);
    accumulate(grid, &temps, dof_start, dof_end, value);
}

///
/// `count` coordinate vectors stored back to back in `x` (stride = grid dimension),
/// results back to back in `value` (stride = `dof_end - dof_start + 1`).
///
pub fn interpolate_array_many_stateless<P: ProductStage>(grid: &CompactGrid, x: &[f64], dof_start: usize, dof_end: usize, count: usize, value: &mut [f64])
{
    let stride = grid.num_inputs();
    let span = dof_end - dof_start + 1;
    let mut temps = vec![1.0; grid.len()];
    for many in 0..count
    {
        P::products(grid, &x[many * stride..], &mut temps);
        accumulate(grid, &temps, dof_start, dof_end, &mut value[many * span..(many + 1) * span]);
    }
}

///
/// One coordinate vector and one output buffer per grid.
///
pub fn interpolate_array_many_multistate<P: ProductStage>(grids: &[&CompactGrid], x: &[&[f64]], dof_start: usize, dof_end: usize, value: &mut [&mut [f64]])
{
    let mut temps = Vec::new();
    for ((grid, x), value) in grids.iter().zip(x.iter()).zip(value.iter_mut())
    {
        temps.clear();
        temps.resize(grid.len(), 1.0);
        P::products(grid, x, &mut temps);
        accumulate(grid, &temps, dof_start, dof_end, value);
    }
}
