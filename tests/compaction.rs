//! Property tests for the index compactor: layout invariants must hold for any
//! node insertion order, and trailing padding must never change a result.

use proptest::prelude::*;
use sgeval::algorithms::accumulation::{interpolate_array, Generic};
use sgeval::algorithms::compaction::IndexCompactor;
use sgeval::{CompactGrid, GridData, LinearBasis, VECTOR_WIDTH};

const NUM_OUTPUTS: usize = 2;

fn pair() -> impl Strategy<Value = (u32, u32)>
{
    prop_oneof![
        2 => Just((0_u32, 0_u32)),
        3 => (1_u32..16, 0_u32..16),
    ]
}

/// Dimension count, node pairs and a permutation of the nodes.
fn shuffled_nodes() -> impl Strategy<Value = (usize, Vec<Vec<(u32, u32)>>, Vec<usize>)>
{
    (1_usize..6)
        .prop_flat_map(|dims| (Just(dims), prop::collection::vec(prop::collection::vec(pair(), dims), 0..40)))
        .prop_flat_map(|(dims, nodes)|
        {
            let order: Vec<usize> = (0..nodes.len()).collect();
            (Just(dims), Just(nodes), Just(order).prop_shuffle())
        })
}

/// Surplus rows are tied to the node's identity, not its position.
fn build(dims: usize, nodes: &[Vec<(u32, u32)>], order: &[usize]) -> GridData
{
    let mut data = GridData::new(dims, NUM_OUTPUTS);
    for &k in order
    {
        data.push_node(&nodes[k], &[k as f64 + 1.0, -0.5 * k as f64]).unwrap();
    }
    data
}

fn evaluate(grid: &CompactGrid, x: &[f64]) -> [f64; NUM_OUTPUTS]
{
    let mut value = [0.0; NUM_OUTPUTS];
    interpolate_array::<Generic<LinearBasis>>(grid, x, 0, NUM_OUTPUTS - 1, &mut value);
    value
}

proptest! {
    #[test]
    fn prop_front_packed_for_any_order((dims, nodes, order) in shuffled_nodes()) {
        let data = build(dims, &nodes, &order);
        let grid = IndexCompactor(&data).compact();
        prop_assert!(grid.is_front_packed());
        for d in 0..dims {
            let constrained = (0..data.len()).filter(|&n| data.pair(n, d) != (0, 0)).count();
            prop_assert_eq!(grid.active_len(d), constrained.div_ceil(VECTOR_WIDTH));
        }
    }

    #[test]
    fn prop_mapping_is_bijection((dims, nodes, order) in shuffled_nodes()) {
        let data = build(dims, &nodes, &order);
        let grid = IndexCompactor(&data).compact();
        let mut seen = grid.mapping().to_vec();
        seen.sort_unstable();
        prop_assert!(seen.iter().enumerate().all(|(k, &n)| k as u32 == n));
        for old in 0..data.len() {
            prop_assert_eq!(grid.surplus_row(grid.mapping()[old] as usize), data.surplus_row(old));
        }
    }

    #[test]
    fn prop_every_pair_lands_once((dims, nodes, order) in shuffled_nodes()) {
        let data = build(dims, &nodes, &order);
        let grid = IndexCompactor(&data).compact();
        for d in 0..dims {
            let mut expected: Vec<(u32, u32, u32)> = (0..data.len())
                .map(|n| (data.pair(n, d), grid.mapping()[n]))
                .filter(|&(pair, _)| pair != (0, 0))
                .map(|((i, j), n)| (i, j, n))
                .collect();
            let mut packed: Vec<(u32, u32, u32)> = grid.blocks(d).iter()
                .flat_map(|block| (0..VECTOR_WIDTH).filter(|&k| !block.is_sentinel(k)).map(move |k| (block.level[k], block.index[k], block.node[k])))
                .collect();
            expected.sort_unstable();
            packed.sort_unstable();
            prop_assert_eq!(packed, expected);
        }
    }

    #[test]
    fn prop_padding_is_neutral(
        (dims, nodes, order) in shuffled_nodes(),
        extra in prop::collection::vec(0_usize..4, 5),
        x in prop::collection::vec(0.0_f64..=1.0, 5),
    ) {
        let data = build(dims, &nodes, &order);
        let grid = IndexCompactor(&data).compact();
        let mut padded = grid.clone();
        for d in 0..dims {
            padded.pad_dimension(d, extra[d]);
        }
        padded.calculate_lengths();
        for d in 0..dims {
            prop_assert_eq!(padded.active_len(d), grid.active_len(d));
        }
        prop_assert!(padded.is_front_packed());
        let a = evaluate(&grid, &x[..dims]);
        let b = evaluate(&padded, &x[..dims]);
        prop_assert_eq!(a[0].to_bits(), b[0].to_bits());
        prop_assert_eq!(a[1].to_bits(), b[1].to_bits());
    }

    #[test]
    fn prop_result_independent_of_order(
        (dims, nodes, order) in shuffled_nodes(),
        x in prop::collection::vec(0.0_f64..=1.0, 5),
    ) {
        let identity: Vec<usize> = (0..nodes.len()).collect();
        let reference = IndexCompactor(&build(dims, &nodes, &identity)).compact();
        let shuffled = IndexCompactor(&build(dims, &nodes, &order)).compact();
        let a = evaluate(&reference, &x[..dims]);
        let b = evaluate(&shuffled, &x[..dims]);
        for k in 0..NUM_OUTPUTS {
            prop_assert!((a[k] - b[k]).abs() <= 1e-9 * (1.0 + a[k].abs()), "{} vs {}", a[k], b[k]);
        }
    }
}

#[test]
fn staggered_insertion_keeps_columns_dense()
{
    // node k is constrained only in dimension k % 3, so every column fills from row 0
    let mut data = GridData::new(3, NUM_OUTPUTS);
    for k in 0..30_u32
    {
        let mut pairs = [(0, 0); 3];
        pairs[k as usize % 3] = (4, k % 4 + 1);
        data.push_node(&pairs, &[k as f64, 0.0]).unwrap();
    }
    let grid = IndexCompactor(&data).compact();
    assert!(grid.is_front_packed());
    assert!((0..3).all(|d| grid.active_len(d) == 2));
    assert!((0..3).all(|d| grid.blocks(d).len() == 2));
}
