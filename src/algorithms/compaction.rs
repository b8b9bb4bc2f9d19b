use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use crate::storage::{compact::{CompactGrid, IndexBlock, VECTOR_WIDTH}, grid_data::GridData};
use crate::utilities::timed::Timed;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
struct Entry
{
    level: u32,
    index: u32,
    node: u32,
}

impl Entry
{
    #[inline]
    fn is_zero(&self) -> bool
    {
        self.level == 0 && self.index == 0
    }
}

///
/// One-time transform of a `GridData` into a `CompactGrid`.
///
/// 1. Every constrained pair is placed into the first row of its dimension's
///    column that is still free, appending a row when none is (first-fit, so the
///    order in which nodes are visited decides row occupancy).
/// 2. Node ids are renumbered in the order they are first seen when scanning
///    dimension-major, row-major; nodes that are unconstrained everywhere follow
///    in insertion order.
/// 3. Surplus rows are moved to their new ids.
/// 4. Rows are padded to a multiple of `VECTOR_WIDTH` and grouped into blocks.
///
pub struct IndexCompactor<'a>(pub &'a GridData);

impl IndexCompactor<'_>
{
    pub fn compact(&self) -> CompactGrid
    {
        let _t = Timed::debug("index compaction");
        let data = self.0;
        let num_inputs = data.num_inputs;
        let num_outputs = data.num_outputs;

        let mut rows = self.pack_rows();
        let order = Self::renumber(&mut rows, num_inputs, data.num_nodes);

        let mut mapping = vec![0_u32; data.num_nodes];
        let mut surplus = vec![0.0; data.surplus.len()];
        for (new, &old) in order.iter().enumerate()
        {
            mapping[old as usize] = new as u32;
            surplus[new * num_outputs..(new + 1) * num_outputs].copy_from_slice(data.surplus_row(old as usize));
        }

        let mut grid = CompactGrid {
            num_inputs,
            num_nodes: data.num_nodes,
            num_outputs,
            columns: Self::into_blocks(&rows, num_inputs),
            active: Vec::new(),
            mapping,
            surplus,
        };
        grid.calculate_lengths();
        log::debug!("compacted {} nodes x {} dimensions into {} rows, active blocks {:?}",
            data.num_nodes, num_inputs, Self::row_count(&rows, num_inputs), grid.active);
        grid
    }

    #[inline]
    fn row_count(rows: &[Entry], num_inputs: usize) -> usize
    {
        if num_inputs == 0 { 0 } else { rows.len() / num_inputs }
    }

    /// Row-major `rows x num_inputs` table of first-fit placed pairs, nodes still carry old ids.
    fn pack_rows(&self) -> Vec<Entry>
    {
        let data = self.0;
        let num_inputs = data.num_inputs;
        let mut rows: Vec<Entry> = Vec::new();
        // Slots are never released, so every row below the cursor is occupied.
        let mut first_free = vec![0_usize; num_inputs];
        for node in 0..data.num_nodes
        {
            for d in 0..num_inputs
            {
                let (level, index) = data.pair(node, d);
                if level == 0 && index == 0
                {
                    continue;
                }
                let nrows = rows.len() / num_inputs;
                let mut row = first_free[d];
                while row < nrows && !rows[row * num_inputs + d].is_zero()
                {
                    row += 1;
                }
                if row == nrows
                {
                    rows.resize(rows.len() + num_inputs, Entry::default());
                }
                rows[row * num_inputs + d] = Entry { level, index, node: node as u32 };
                first_free[d] = row + 1;
            }
        }
        rows
    }

    /// Rewrites node ids in place and returns the new order, `order[new] == old`.
    fn renumber(rows: &mut [Entry], num_inputs: usize, num_nodes: usize) -> IndexSet<u32, FxBuildHasher>
    {
        let mut order = IndexSet::with_capacity_and_hasher(num_nodes, FxBuildHasher);
        let nrows = Self::row_count(rows, num_inputs);
        for d in 0..num_inputs
        {
            for row in 0..nrows
            {
                let entry = &mut rows[row * num_inputs + d];
                if entry.is_zero()
                {
                    continue;
                }
                let (new, _) = order.insert_full(entry.node);
                entry.node = new as u32;
            }
        }
        for node in 0..num_nodes as u32
        {
            order.insert(node);
        }
        order
    }

    fn into_blocks(rows: &[Entry], num_inputs: usize) -> Vec<Vec<IndexBlock>>
    {
        let nrows = Self::row_count(rows, num_inputs);
        let nblocks = nrows.div_ceil(VECTOR_WIDTH);
        (0..num_inputs).map(|d|
        {
            (0..nblocks).map(|b|
            {
                let mut block = IndexBlock::EMPTY;
                for k in 0..VECTOR_WIDTH
                {
                    let row = b * VECTOR_WIDTH + k;
                    if row >= nrows
                    {
                        break;
                    }
                    let entry = rows[row * num_inputs + d];
                    block.level[k] = entry.level;
                    block.index[k] = entry.index;
                    block.node[k] = entry.node;
                }
                block
            }).collect()
        }).collect()
    }
}
