//! Dense voxel grid type

mod element;

pub use element::VoxelElement;

use crate::error::{Error, Result};
use ndarray::Array3;

/// A dense 3D voxel grid.
///
/// `VoxelGrid<T>` stores values of type `T` with x as the fastest-varying
/// axis: the element at (x, y, z) lives at linear index
/// `x + sx * (y + sy * z)` in the contiguous buffer. Internally the data
/// is an `ndarray::Array3` of shape `(sz, sy, sx)` in standard C order,
/// which produces exactly that layout. A 2D image is a grid with
/// `sz == 1`.
///
/// # Example
///
/// ```
/// use voxmorph_core::VoxelGrid;
///
/// let mut grid: VoxelGrid<u32> = VoxelGrid::new(64, 64, 64);
/// grid.set(10, 20, 30, 42)?;
/// assert_eq!(grid.get(10, 20, 30)?, 42);
/// # Ok::<(), voxmorph_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid<T: VoxelElement> {
    /// Grid data in (z, y, x) index order so x is contiguous
    data: Array3<T>,
}

impl<T: VoxelElement> VoxelGrid<T> {
    /// Create a new grid filled with zeros
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            data: Array3::zeros((sz, sy, sx)),
        }
    }

    /// Create a new grid filled with a specific value
    pub fn filled(sx: usize, sy: usize, sz: usize, value: T) -> Self {
        Self {
            data: Array3::from_elem((sz, sy, sx), value),
        }
    }

    /// Create a grid from existing data in x-fastest linear order
    pub fn from_vec(data: Vec<T>, sx: usize, sy: usize, sz: usize) -> Result<Self> {
        if sx == 0 || sy == 0 || sz == 0 {
            return Err(Error::InvalidDimensions { sx, sy, sz });
        }
        let expected = sx
            .checked_mul(sy)
            .and_then(|v| v.checked_mul(sz))
            .ok_or(Error::InvalidDimensions { sx, sy, sz })?;
        if data.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        let array = Array3::from_shape_vec((sz, sy, sx), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Create a single-slice (2D) grid from data in x-fastest linear order
    pub fn from_vec_2d(data: Vec<T>, sx: usize, sy: usize) -> Result<Self> {
        Self::from_vec(data, sx, sy, 1)
    }

    /// Create a grid with the same dimensions, filled with a value
    pub fn like(&self, fill_value: T) -> Self {
        Self {
            data: Array3::from_elem(self.data.dim(), fill_value),
        }
    }

    // Dimensions

    /// Extent along the x (fastest) axis
    pub fn sx(&self) -> usize {
        self.data.dim().2
    }

    /// Extent along the y axis
    pub fn sy(&self) -> usize {
        self.data.dim().1
    }

    /// Extent along the z (slowest) axis
    pub fn sz(&self) -> usize {
        self.data.dim().0
    }

    /// Dimensions as (sx, sy, sz)
    pub fn shape(&self) -> (usize, usize, usize) {
        let (sz, sy, sx) = self.data.dim();
        (sx, sy, sz)
    }

    /// Total number of voxels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no voxels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the grid is a single z-slice
    pub fn is_2d(&self) -> bool {
        self.data.dim().0 == 1
    }

    // Data access

    /// Get value at (x, y, z)
    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<T> {
        self.data
            .get((z, y, x))
            .copied()
            .ok_or_else(|| self.out_of_bounds(x, y, z))
    }

    /// Get value at (x, y, z) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure x < self.sx(), y < self.sy() and z < self.sz()
    pub unsafe fn get_unchecked(&self, x: usize, y: usize, z: usize) -> T {
        unsafe { *self.data.uget((z, y, x)) }
    }

    /// Set value at (x, y, z)
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) -> Result<()> {
        if x >= self.sx() || y >= self.sy() || z >= self.sz() {
            return Err(self.out_of_bounds(x, y, z));
        }
        self.data[(z, y, x)] = value;
        Ok(())
    }

    /// Set value at (x, y, z) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure x < self.sx(), y < self.sy() and z < self.sz()
    pub unsafe fn set_unchecked(&mut self, x: usize, y: usize, z: usize, value: T) {
        unsafe {
            *self.data.uget_mut((z, y, x)) = value;
        }
    }

    /// View the grid as a contiguous slice in x-fastest order
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice().expect("grid storage is contiguous")
    }

    /// View the grid as a mutable contiguous slice in x-fastest order
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.data
            .as_slice_mut()
            .expect("grid storage is contiguous")
    }

    /// Reference to the underlying array
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    fn out_of_bounds(&self, x: usize, y: usize, z: usize) -> Error {
        let (sx, sy, sz) = self.shape();
        Error::IndexOutOfBounds {
            x,
            y,
            z,
            sx,
            sy,
            sz,
        }
    }
}
