pub mod interpolator;
pub mod sparse_grid;
