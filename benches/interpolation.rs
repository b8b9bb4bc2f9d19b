use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sgeval::{errors::SGError, GridData, Interpolator, InterpolatorOptions, KernelSpecializer, LinearBasis, SparseGridState};

fn build_grid(dim: usize, num_nodes: usize) -> Result<SparseGridState<LinearBasis>, SGError>
{
    let mut rng = StdRng::seed_from_u64(dim as u64);
    let mut data = GridData::new(dim, 4);
    for _ in 0..num_nodes
    {
        let mut levels = vec![1; dim];
        let mut indices = vec![1; dim];
        // roughly three constrained dimensions per node, like a regular sparse grid
        for _ in 0..3
        {
            let d = rng.random_range(0..dim);
            levels[d] = rng.random_range(2..=5);
            indices[d] = 2 * rng.random_range(0..(1_u32 << (levels[d] - 2))) + 1;
        }
        let surplus: Vec<f64> = (0..4).map(|_| rng.random_range(-1.0..1.0)).collect();
        data.push_node_levels::<LinearBasis>(&levels, &indices, &surplus)?;
    }
    Ok(data.into())
}

fn points(dim: usize, count: usize) -> Vec<f64>
{
    let mut rng = StdRng::seed_from_u64(42);
    (0..dim * count).map(|_| rng.random_range(0.0..=1.0)).collect()
}

fn run_array(c: &mut Criterion)
{
    let mut group = c.benchmark_group("array");
    for dim in [6, 20, 37]
    {
        let states = [build_grid(dim, 2000).unwrap()];
        let x = points(dim, 1);
        let specialized = KernelSpecializer::default();
        let generic = KernelSpecializer::new(InterpolatorOptions { runtime_optimization: false });
        let mut value = [0.0; 4];
        let interp = Interpolator::new(&states, &specialized);
        group.bench_with_input(BenchmarkId::new("specialized", dim), &x, |b, x| b.iter(|| interp.interpolate_array(0, x, 0, 3, &mut value).unwrap()));
        let interp = Interpolator::new(&states, &generic);
        group.bench_with_input(BenchmarkId::new("generic", dim), &x, |b, x| b.iter(|| interp.interpolate_array(0, x, 0, 3, &mut value).unwrap()));
    }
    group.finish();
}

fn run_batch(c: &mut Criterion)
{
    let states = [build_grid(6, 2000).unwrap()];
    let kernels = KernelSpecializer::default();
    let interp = Interpolator::new(&states, &kernels);
    let x = points(6, 1000);
    let mut value = vec![0.0; 4000];
    c.bench_function("6d stateless 1000", |b| b.iter(|| interp.interpolate_array_many_stateless(0, &x, 0, 3, 1000, &mut value).unwrap()));
    c.bench_function("6d batch 1000", |b| b.iter(|| interp.interpolate_batch(0, &x, 0, 3).unwrap()));
}

criterion_group!(benches, run_array, run_batch);
criterion_main!(benches);
