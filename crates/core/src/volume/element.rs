//! Voxel element trait for generic grid values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a voxel grid.
///
/// Multilabel kernels treat values as opaque identifiers with zero
/// reserved for background; grayscale kernels rely on the total order
/// and the type extrema. Only the eight fixed-width integer types
/// implement this trait.
pub trait VoxelElement:
    Copy + Clone + Debug + Ord + Eq + NumCast + Zero + Send + Sync + 'static
{
    /// Minimum value representable by this type
    fn min_value() -> Self;

    /// Maximum value representable by this type
    fn max_value() -> Self;
}

macro_rules! impl_voxel_element {
    ($t:ty) => {
        impl VoxelElement for $t {
            fn min_value() -> Self {
                <$t>::MIN
            }

            fn max_value() -> Self {
                <$t>::MAX
            }
        }
    };
}

impl_voxel_element!(i8);
impl_voxel_element!(i16);
impl_voxel_element!(i32);
impl_voxel_element!(i64);
impl_voxel_element!(u8);
impl_voxel_element!(u16);
impl_voxel_element!(u32);
impl_voxel_element!(u64);
