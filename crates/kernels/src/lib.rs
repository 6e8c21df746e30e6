//! # Voxmorph Kernels
//!
//! High-throughput morphology kernels over dense voxel grids, all under
//! a 3x3x3 (2D: 3x3) structuring element with every position active:
//!
//! - **Multilabel dilation**: each voxel becomes the mode of the
//!   non-zero labels around it (optionally background-only)
//! - **Multilabel erosion**: a voxel survives iff its entire
//!   neighborhood carries its own label
//! - **Grayscale dilation / erosion**: max / min filters
//!
//! Volumes are contiguous x-fastest buffers (or [`VoxelGrid`]s); the
//! element at (x, y, z) lives at index `x + sx * (y + sy * z)`. Work is
//! split into cubic blocks, one task per block, on a fixed-size worker
//! pool; zero threads means synchronous execution. Multilabel kernels
//! require the output buffer to be zero-initialized and leave
//! undecided voxels at zero; grayscale kernels write every voxel.
//!
//! [`VoxelGrid`]: voxmorph_core::VoxelGrid

pub mod dilate;
pub mod erode;
pub mod grey;
pub mod sort;

mod stencil;

pub use dilate::{
    multilabel_dilate, multilabel_dilate_2d, DilateParams, MultilabelDilate,
};
pub use erode::{multilabel_erode, multilabel_erode_2d, ErodeParams, MultilabelErode};
pub use grey::{
    grey_dilate, grey_dilate_2d, grey_erode, grey_erode_2d, GreyDilate, GreyErode, GreyParams,
};
pub use sort::small_sort;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dilate::{
        multilabel_dilate, multilabel_dilate_2d, DilateParams, MultilabelDilate,
    };
    pub use crate::erode::{multilabel_erode, multilabel_erode_2d, ErodeParams, MultilabelErode};
    pub use crate::grey::{
        grey_dilate, grey_dilate_2d, grey_erode, grey_erode_2d, GreyDilate, GreyErode, GreyParams,
    };
    pub use voxmorph_core::prelude::*;
}
