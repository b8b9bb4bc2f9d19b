use sgeval::{errors::SGError, serialization::SerializationFormat, BasisKernel, CompactGrid, GridData, Interpolator, KernelSpecializer, LinearBasis, SparseGridState};

/// Grid file indices introduced on a level of the nested hat rule.
fn new_indices(level: u32) -> Vec<u32>
{
    match level
    {
        1 => vec![1],
        2 => vec![1, 3],
        _ => (1..=1_u32 << (level - 2)).map(|k| 2 * k).collect(),
    }
}

fn coordinate(level: u32, index: u32) -> f64
{
    if level == 1 { 0.5 } else { (index - 1) as f64 / (1_u32 << (level - 1)) as f64 }
}

///
/// Builds a 2D regular sparse grid of the given depth and hierarchises `f` on it:
/// nodes are visited by increasing total level, and each surplus is the residual of
/// the interpolant built from all coarser nodes.
///
fn build(depth: u32, f: impl Fn(f64, f64) -> [f64; 2]) -> Result<GridData, SGError>
{
    let mut data = GridData::new(2, 2);
    let mut nodes: Vec<([u32; 2], [u32; 2])> = Vec::new();
    for total in 2..=depth + 1
    {
        for l0 in 1..total
        {
            let l1 = total - l0;
            for &i0 in &new_indices(l0)
            {
                for &i1 in &new_indices(l1)
                {
                    nodes.push(([l0, l1], [i0, i1]));
                }
            }
        }
    }
    let mut pairs: Vec<[(u32, u32); 2]> = Vec::new();
    for (levels, indices) in nodes
    {
        let x = [coordinate(levels[0], indices[0]), coordinate(levels[1], indices[1])];
        let mut surplus = f(x[0], x[1]);
        for (node, pair) in pairs.iter().enumerate()
        {
            let w = LinearBasis::weight(x[0], pair[0].0, pair[0].1) * LinearBasis::weight(x[1], pair[1].0, pair[1].1);
            let row = data.surplus_row(node);
            surplus[0] -= w * row[0];
            surplus[1] -= w * row[1];
        }
        data.push_node_levels::<LinearBasis>(&levels, &indices, &surplus)?;
        pairs.push([LinearBasis::encode(levels[0], indices[0])?, LinearBasis::encode(levels[1], indices[1])?]);
    }
    Ok(data)
}

fn main() -> Result<(), SGError>
{
    let f = |x: f64, y: f64| [(-x * x - y * y).exp(), x * y];
    let data = build(7, f)?;
    println!("Number of points: {}", data.len());

    let states = [SparseGridState::<LinearBasis>::new(data.clone())];
    let kernels = KernelSpecializer::default();
    let interp = Interpolator::new(&states, &kernels);

    for x in [[0.3, 0.1], [0.77, 0.42], [0.5, 0.5]]
    {
        let mut value = [0.0; 2];
        interp.interpolate_array(0, &x, 0, 1, &mut value)?;
        let expected = f(x[0], x[1]);
        println!("x={:?}, calculated {:?}, expected {:?}. Error={:e}", x, value, expected, (value[0] - expected[0]).abs().max((value[1] - expected[1]).abs()));
    }

    // The compacted layout can be stored and handed to a new state to skip the compaction step.
    let buffer = states[0].compact().write_buffer(SerializationFormat::BincodeLz4)?;
    println!("Compacted grid: {} bytes", buffer.len());
    let restored = SparseGridState::<LinearBasis>::with_compact(data, CompactGrid::read_buffer(&buffer, SerializationFormat::BincodeLz4)?)?;
    let restored = [restored];
    let interp = Interpolator::new(&restored, &kernels);
    println!("restored value at [0.3, 0.1]: {}", interp.interpolate_value(0, &[0.3, 0.1], 0)?);
    Ok(())
}
