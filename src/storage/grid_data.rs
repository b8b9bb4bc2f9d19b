use serde::{Deserialize, Serialize};

use crate::{basis::base::BasisKernel, errors::SGError};

///
/// Raw sparse grid as handed over by a loader: one encoded `(i, j)` pair per node
/// and dimension plus one surplus row per node. Node `n`, dimension `d` lives at
/// `n * num_inputs + d`; surplus row `n` at `n * num_outputs..(n + 1) * num_outputs`.
///
/// Immutable once it is wrapped in a grid state.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GridData
{
    pub(crate) num_inputs: usize,
    pub(crate) num_nodes: usize,
    pub(crate) num_outputs: usize,
    pub(crate) level: Vec<u32>,
    pub(crate) index: Vec<u32>,
    pub(crate) surplus: Vec<f64>,
}

/// Borrowed view of a single node.
pub struct NodeRef<'a>
{
    pub level: &'a [u32],
    pub index: &'a [u32],
    pub surplus: &'a [f64],
}

impl NodeRef<'_>
{
    /// Dimensions in which the node is constrained, i.e. the pair is not `(0, 0)`.
    pub fn constrained(&self) -> impl Iterator<Item = (usize, (u32, u32))> + '_
    {
        self.level.iter().zip(self.index.iter()).enumerate()
            .filter(|(_, (i, j))| **i != 0 || **j != 0)
            .map(|(d, (&i, &j))| (d, (i, j)))
    }
}

impl GridData
{
    pub fn new(num_inputs: usize, num_outputs: usize) -> Self
    {
        Self { num_inputs, num_outputs, ..Default::default() }
    }

    ///
    /// Wraps already encoded index tables.
    ///
    pub fn from_raw(num_inputs: usize, num_outputs: usize, level: Vec<u32>, index: Vec<u32>, surplus: Vec<f64>) -> Result<Self, SGError>
    {
        let num_nodes = if num_inputs > 0
        {
            level.len() / num_inputs
        }
        else if num_outputs > 0
        {
            surplus.len() / num_outputs
        }
        else
        {
            0
        };
        if level.len() != num_nodes * num_inputs || index.len() != level.len()
        {
            return Err(SGError::IndexTableSizeMismatch);
        }
        if surplus.len() != num_nodes * num_outputs
        {
            return Err(SGError::SurplusSizeMismatch);
        }
        if num_nodes > u32::MAX as usize
        {
            return Err(SGError::NodeIndexOverflow);
        }
        Ok(Self { num_inputs, num_nodes, num_outputs, level, index, surplus })
    }

    ///
    /// Builds the index tables from grid file `(level, index)` pairs, encoding each
    /// with `B::encode`.
    ///
    pub fn from_levels<B: BasisKernel>(num_inputs: usize, num_outputs: usize, levels: &[u32], indices: &[u32], surplus: Vec<f64>) -> Result<Self, SGError>
    {
        if levels.len() != indices.len()
        {
            return Err(SGError::IndexTableSizeMismatch);
        }
        let pairs = levels.iter().zip(indices.iter())
            .map(|(&l, &i)| B::encode(l, i))
            .collect::<Result<Vec<_>, SGError>>()?;
        let (level, index) = pairs.into_iter().unzip();
        Self::from_raw(num_inputs, num_outputs, level, index, surplus)
    }

    ///
    /// Appends one node given its encoded `(i, j)` pairs.
    ///
    pub fn push_node(&mut self, pairs: &[(u32, u32)], surplus: &[f64]) -> Result<usize, SGError>
    {
        if pairs.len() != self.num_inputs
        {
            return Err(SGError::IndexTableSizeMismatch);
        }
        if surplus.len() != self.num_outputs
        {
            return Err(SGError::SurplusSizeMismatch);
        }
        if self.num_nodes == u32::MAX as usize
        {
            return Err(SGError::NodeIndexOverflow);
        }
        for &(i, j) in pairs
        {
            self.level.push(i);
            self.index.push(j);
        }
        self.surplus.extend_from_slice(surplus);
        self.num_nodes += 1;
        Ok(self.num_nodes - 1)
    }

    ///
    /// Appends one node given grid file `(level, index)` pairs.
    ///
    pub fn push_node_levels<B: BasisKernel>(&mut self, levels: &[u32], indices: &[u32], surplus: &[f64]) -> Result<usize, SGError>
    {
        if levels.len() != indices.len()
        {
            return Err(SGError::IndexTableSizeMismatch);
        }
        let pairs = levels.iter().zip(indices.iter())
            .map(|(&l, &i)| B::encode(l, i))
            .collect::<Result<Vec<_>, SGError>>()?;
        self.push_node(&pairs, surplus)
    }

    pub fn num_inputs(&self) -> usize
    {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize
    {
        self.num_outputs
    }

    pub fn len(&self) -> usize
    {
        self.num_nodes
    }

    pub fn is_empty(&self) -> bool
    {
        self.num_nodes == 0
    }

    #[inline]
    pub fn pair(&self, node: usize, dim: usize) -> (u32, u32)
    {
        let k = node * self.num_inputs + dim;
        (self.level[k], self.index[k])
    }

    #[inline]
    pub fn surplus_row(&self, node: usize) -> &[f64]
    {
        &self.surplus[node * self.num_outputs..(node + 1) * self.num_outputs]
    }

    pub fn node(&self, node: usize) -> NodeRef<'_>
    {
        let range = node * self.num_inputs..(node + 1) * self.num_inputs;
        NodeRef { level: &self.level[range.clone()], index: &self.index[range], surplus: self.surplus_row(node) }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>>
    {
        (0..self.num_nodes).map(|n| self.node(n))
    }

    pub fn surplus(&self) -> &[f64]
    {
        &self.surplus
    }

    ///
    /// Writes the grid to file with the specified serialization format.
    ///
    pub fn write(&self, path: &str, format: crate::serialization::SerializationFormat) -> Result<(), SGError>
    {
        use std::io::Write;
        let mut file = std::io::BufWriter::new(std::fs::File::create(path).map_err(|_|SGError::FileIOError)?);
        let buffer = crate::serialization::serialize(self, format)?;
        file.write_all(&buffer).map_err(|_|SGError::WriteBufferFailed)?;
        Ok(())
    }

    pub fn write_buffer(&self, format: crate::serialization::SerializationFormat) -> Result<Vec<u8>, SGError>
    {
        crate::serialization::serialize(self, format)
    }

    pub fn read_buffer(buffer: &[u8], format: crate::serialization::SerializationFormat) -> Result<Self, SGError>
    {
        let data: Self = crate::serialization::deserialize(buffer, format)?;
        // Re-validate table sizes, the buffer may come from anywhere.
        Self::from_raw(data.num_inputs, data.num_outputs, data.level, data.index, data.surplus)
    }

    pub fn read<Reader: std::io::Read>(mut reader: Reader, format: crate::serialization::SerializationFormat) -> Result<Self, SGError>
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|_|SGError::ReadBufferFailed)?;
        Self::read_buffer(&bytes, format)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::basis::linear::LinearBasis;
    use crate::serialization::SerializationFormat;

    #[test]
    fn push_and_view_nodes()
    {
        let mut data = GridData::new(3, 2);
        assert_eq!(data.push_node(&[(0, 0), (2, 1), (0, 0)], &[1.0, 2.0]), Ok(0));
        assert_eq!(data.push_node_levels::<LinearBasis>(&[3, 1, 2], &[3, 1, 2], &[3.0, 4.0]), Ok(1));
        assert_eq!(data.len(), 2);
        assert_eq!(data.pair(1, 0), (4, 2));
        assert_eq!(data.pair(1, 1), (0, 0));
        assert_eq!(data.surplus_row(1), &[3.0, 4.0]);
        let constrained: Vec<_> = data.node(0).constrained().collect();
        assert_eq!(constrained, vec![(1, (2, 1))]);
        assert_eq!(data.push_node(&[(0, 0)], &[1.0, 2.0]), Err(SGError::IndexTableSizeMismatch));
        assert_eq!(data.push_node(&[(0, 0); 3], &[1.0]), Err(SGError::SurplusSizeMismatch));
        assert_eq!(data.push_node_levels::<LinearBasis>(&[2, 40, 1], &[1, 1, 1], &[0.0, 0.0]), Err(SGError::LevelOutOfRange));
        assert_eq!(data.len(), 2);
        assert_eq!(GridData::from_levels::<LinearBasis>(1, 1, &[33], &[1], vec![1.0]), Err(SGError::LevelOutOfRange));
    }

    #[test]
    fn raw_tables_are_checked()
    {
        assert_eq!(GridData::from_raw(2, 1, vec![0; 4], vec![0; 3], vec![0.0; 2]), Err(SGError::IndexTableSizeMismatch));
        assert_eq!(GridData::from_raw(2, 1, vec![0; 4], vec![0; 4], vec![0.0; 3]), Err(SGError::SurplusSizeMismatch));
        let data = GridData::from_raw(2, 1, vec![0; 4], vec![0; 4], vec![0.0; 2]).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn buffer_roundtrip()
    {
        let data = GridData::from_levels::<LinearBasis>(2, 1, &[1, 2, 2, 3], &[1, 2, 1, 3], vec![0.5, -1.5]).unwrap();
        for format in [SerializationFormat::Bincode, SerializationFormat::BincodeLz4]
        {
            let bytes = data.write_buffer(format).unwrap();
            assert_eq!(GridData::read_buffer(&bytes, format).unwrap(), data);
        }
    }
}
