//!
//! Evaluation kernels for sparse grid interpolants.
//!
//! A grid (`GridData`) is compacted once into a vector-width blocked layout
//! (`CompactGrid`); interpolation then multiplies per-dimension basis weights into
//! per-node products and sums the weighted surpluses of all nodes with a nonzero
//! product. `Interpolator` exposes four call shapes, each dispatched through a
//! `KernelSpecializer` that picks a dimension-specialized kernel when one is
//! compiled in and the generic one otherwise.
//!
pub mod algorithms;
pub mod basis;
pub mod errors;
pub mod grids;
pub mod kernels;
pub mod options;
pub mod serialization;
pub mod storage;
pub(crate) mod utilities;

pub use basis::{base::{BasisFunction, BasisKernel}, linear::LinearBasis, polynomial::PolynomialBasis};
pub use errors::SGError;
pub use grids::{interpolator::Interpolator, sparse_grid::SparseGridState};
pub use kernels::specializer::KernelSpecializer;
pub use options::InterpolatorOptions;
pub use storage::{compact::{CompactGrid, IndexBlock, VECTOR_WIDTH}, grid_data::GridData};
