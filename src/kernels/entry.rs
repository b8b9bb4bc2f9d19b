use bitfield_struct::bitfield;
use serde::{Deserialize, Serialize};

use crate::algorithms::accumulation::{self, Fixed, Generic};
use crate::basis::base::BasisKernel;
use crate::storage::compact::CompactGrid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CallShape
{
    /// One DOF, one coordinate vector.
    Value,
    /// Contiguous DOF span, one coordinate vector.
    Array,
    /// Many coordinate vectors against one grid.
    ManyStateless,
    /// One coordinate vector per grid.
    ManyMultistate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KernelKey
{
    pub dimension: usize,
    pub shape: CallShape,
    pub batch_count: usize,
}

impl KernelKey
{
    pub fn new(dimension: usize, shape: CallShape, batch_count: usize) -> Self
    {
        Self { dimension, shape, batch_count }
    }
}

pub type ValueFn = fn(&CompactGrid, &[f64], usize) -> f64;
pub type ArrayFn = fn(&CompactGrid, &[f64], usize, usize, &mut [f64]);
pub type ManyStatelessFn = fn(&CompactGrid, &[f64], usize, usize, usize, &mut [f64]);
pub type ManyMultistateFn = fn(&[&CompactGrid], &[&[f64]], usize, usize, &mut [&mut [f64]]);

#[derive(Copy, Clone, Debug)]
pub enum EntryPoint
{
    Value(ValueFn),
    Array(ArrayFn),
    ManyStateless(ManyStatelessFn),
    ManyMultistate(ManyMultistateFn),
}

impl EntryPoint
{
    pub fn shape(&self) -> CallShape
    {
        match self
        {
            EntryPoint::Value(_) => CallShape::Value,
            EntryPoint::Array(_) => CallShape::Array,
            EntryPoint::ManyStateless(_) => CallShape::ManyStateless,
            EntryPoint::ManyMultistate(_) => CallShape::ManyMultistate,
        }
    }

    /// Dimension-generic implementation of `shape`.
    pub fn generic<B: BasisKernel>(shape: CallShape) -> Self
    {
        match shape
        {
            CallShape::Value => EntryPoint::Value(accumulation::interpolate_value::<Generic<B>>),
            CallShape::Array => EntryPoint::Array(accumulation::interpolate_array::<Generic<B>>),
            CallShape::ManyStateless => EntryPoint::ManyStateless(accumulation::interpolate_array_many_stateless::<Generic<B>>),
            CallShape::ManyMultistate => EntryPoint::ManyMultistate(accumulation::interpolate_array_many_multistate::<Generic<B>>),
        }
    }

    /// Implementation of `shape` compiled for exactly `D` dimensions.
    pub fn fixed<B: BasisKernel, const D: usize>(shape: CallShape) -> Self
    {
        match shape
        {
            CallShape::Value => EntryPoint::Value(accumulation::interpolate_value::<Fixed<B, D>>),
            CallShape::Array => EntryPoint::Array(accumulation::interpolate_array::<Fixed<B, D>>),
            CallShape::ManyStateless => EntryPoint::ManyStateless(accumulation::interpolate_array_many_stateless::<Fixed<B, D>>),
            CallShape::ManyMultistate => EntryPoint::ManyMultistate(accumulation::interpolate_array_many_multistate::<Fixed<B, D>>),
        }
    }
}

#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct KernelFlags
{
    /// The entry point is a dimension-specialized kernel.
    pub specialized: bool,
    /// Specialization was attempted for this key.
    pub attempted: bool,
    #[bits(6)]
    pub _empty: u8,
}

#[derive(Copy, Clone, Debug)]
pub struct KernelCacheEntry
{
    pub entry: EntryPoint,
    pub flags: KernelFlags,
}

impl KernelCacheEntry
{
    pub fn is_specialized(&self) -> bool
    {
        self.flags.specialized()
    }
}
