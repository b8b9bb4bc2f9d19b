use crate::basis::base::BasisKernel;

use super::entry::{CallShape, EntryPoint};

macro_rules! specialized_dimensions {
    ($($d:literal),*) => {
        /// Dimension counts that have a compiled-in specialized kernel.
        pub const SPECIALIZED_DIMENSIONS: &[usize] = &[$($d),*];

        ///
        /// Looks up the kernel compiled for exactly `dimension` dimensions. `None` when
        /// no such kernel exists, callers then use `EntryPoint::generic`.
        ///
        pub fn specialized<B: BasisKernel>(dimension: usize, shape: CallShape) -> Option<EntryPoint>
        {
            match dimension
            {
                $( $d => Some(EntryPoint::fixed::<B, $d>(shape)), )*
                _ => None,
            }
        }
    };
}

specialized_dimensions!(1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 20, 24, 32, 48, 60, 64);

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::basis::linear::LinearBasis;

    #[test]
    fn table_covers_listed_dimensions()
    {
        for &d in SPECIALIZED_DIMENSIONS
        {
            let entry = specialized::<LinearBasis>(d, CallShape::Array);
            assert!(matches!(entry, Some(EntryPoint::Array(_))), "dimension {d}");
        }
        assert!(specialized::<LinearBasis>(0, CallShape::Value).is_none());
        assert!(specialized::<LinearBasis>(17, CallShape::Value).is_none());
        assert!(specialized::<LinearBasis>(1000, CallShape::ManyMultistate).is_none());
    }
}
