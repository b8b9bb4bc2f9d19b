#![allow(dead_code)]

use rand::prelude::*;
use rand::rngs::StdRng;
use sgeval::{BasisKernel, GridData};

/// Random grid: each node is constrained in a dimension with probability `density`,
/// with levels drawn from `min_level..=max_level` and indices valid for the level.
pub fn random_grid<B: BasisKernel>(rng: &mut StdRng, num_inputs: usize, num_nodes: usize, num_outputs: usize, density: f64) -> GridData
{
    let mut data = GridData::new(num_inputs, num_outputs);
    for _ in 0..num_nodes
    {
        let mut levels = vec![1; num_inputs];
        let mut indices = vec![1; num_inputs];
        for d in 0..num_inputs
        {
            if rng.random_bool(density)
            {
                let level = rng.random_range(2..=6_u32);
                levels[d] = level;
                indices[d] = rng.random_range(1..=(1_u32 << (level - 1)) + 1);
            }
        }
        let surplus: Vec<f64> = (0..num_outputs).map(|_| rng.random_range(-1.0..1.0)).collect();
        data.push_node_levels::<B>(&levels, &indices, &surplus).unwrap();
    }
    data
}

pub fn random_points(rng: &mut StdRng, num_inputs: usize, count: usize) -> Vec<f64>
{
    (0..num_inputs * count).map(|_| rng.random_range(0.0..=1.0)).collect()
}

pub fn assert_close(a: &[f64], b: &[f64])
{
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter())
    {
        approx::assert_relative_eq!(*x, *y, max_relative = 1e-9, epsilon = 1e-12);
    }
}
